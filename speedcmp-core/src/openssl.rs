//! Reference Tool Adapter (OpenSSL)
//!
//! Builds `openssl speed` invocations per algorithm category and parses
//! the line-oriented `-mr` marker output into raw measurements.
//!
//! The grammars are coupled to OpenSSL's versioned CLI output contract:
//! throughput runs emit `+DT:` buffer-size headers paired with `+R:`
//! result lines, signature runs emit `+R1/R5/R7:` (sign) and `+R2/R6/R8:`
//! (verify) lines, and key-agreement runs emit `+R7/R9/R12/R14:` lines.
//! Every scanned line is classified into an explicit variant; a line that
//! is neither recognized nor ignorable is an error, not a fallthrough.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::algo::{Algorithm, Category, Operation};
use crate::error::CompareError;
use crate::measure::RawMeasurement;
use crate::process::run_tool;

/// Tool name used in logs and error messages.
pub const TOOL_NAME: &str = "openssl";

/// Handle on an OpenSSL binary.
#[derive(Debug, Clone)]
pub struct OpensslCli {
    path: PathBuf,
}

impl OpensslCli {
    /// Create an adapter for the binary at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the binary.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Query the tool's version string, reduced to the bare version number
    /// when the output matches the usual `OpenSSL <ver> ...` banner.
    pub fn version(&self) -> Result<String, CompareError> {
        let output = run_tool(&self.path, &["version".to_string()])?;
        Ok(match parse_version_banner(&output) {
            Some(version) => version,
            None => {
                tracing::warn!("unable to parse OpenSSL version output '{}'", output.trim());
                output.trim().to_string()
            }
        })
    }

    /// Run the benchmark for one algorithm and parse the output.
    ///
    /// A fixed one-second duration is always requested; the measured
    /// runtimes feed the target tool's calibration afterwards.
    pub fn benchmark(&self, algo: &Algorithm) -> Result<Vec<RawMeasurement>, CompareError> {
        tracing::info!("running OpenSSL benchmark for {}", algo.name);
        let args = benchmark_args(algo);
        let output = run_tool(&self.path, &args)?;
        parse_output(algo, &output)
    }
}

/// Arguments for one benchmark invocation. Throughput algorithms go
/// through the EVP interface; signature and key-agreement algorithms pass
/// their family identifier directly.
pub fn benchmark_args(algo: &Algorithm) -> Vec<String> {
    let mut args: Vec<String> = ["speed", "-seconds", "1", "-mr"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    match algo.category {
        Category::Throughput => {
            args.push("-evp".to_string());
            args.push(algo.openssl_id.to_string());
        }
        Category::Signature | Category::KeyAgreement => {
            args.push(algo.openssl_id.to_string());
        }
    }
    args
}

/// Parse benchmark output for `algo`'s category.
pub fn parse_output(algo: &Algorithm, output: &str) -> Result<Vec<RawMeasurement>, CompareError> {
    match algo.category {
        Category::Throughput => parse_throughput(algo.name, output),
        Category::Signature => parse_signature(algo.name, output),
        Category::KeyAgreement => parse_key_agreement(algo.name, output),
    }
}

fn parse_version_banner(output: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"OpenSSL ([0-9a-z.]+) .*").expect("hard-coded regex"));
    re.captures(output).map(|c| c[1].to_string())
}

fn unexpected(line: &str) -> CompareError {
    CompareError::UnexpectedOutput {
        tool: TOOL_NAME,
        context: line.to_string(),
    }
}

fn parse_u64(field: &str, line: &str) -> Result<u64, CompareError> {
    field.parse().map_err(|_| unexpected(line))
}

fn parse_f64(field: &str, line: &str) -> Result<f64, CompareError> {
    field.parse().map_err(|_| unexpected(line))
}

/// Classified throughput-mode output line.
#[derive(Debug, PartialEq)]
enum ThroughputLine {
    /// `+DT:<id>:<n>:<buf_size>` — announces the block size of the next
    /// result line
    Header { buf_size: u64 },
    /// `+R:<ops>:<id>:<runtime>` — operation count and runtime for the
    /// preceding header's block size
    Result { ops: u64, runtime_secs: f64 },
    Ignored,
    Unrecognized,
}

fn classify_throughput(line: &str) -> Result<ThroughputLine, CompareError> {
    static GRAMMAR: OnceLock<(Regex, Regex, Regex)> = OnceLock::new();
    let (header, result, ignored) = GRAMMAR.get_or_init(|| {
        (
            Regex::new(r"^\+DT:([a-zA-Z0-9-]+):([0-9]+):([0-9]+)$").expect("hard-coded regex"),
            Regex::new(r"^\+R:([0-9]+):[a-zA-Z0-9-]+:([0-9]+\.[0-9]+)$").expect("hard-coded regex"),
            Regex::new(r"^\+(H|F):").expect("hard-coded regex"),
        )
    });

    if ignored.is_match(line) {
        return Ok(ThroughputLine::Ignored);
    }
    if let Some(c) = header.captures(line) {
        return Ok(ThroughputLine::Header {
            buf_size: parse_u64(&c[3], line)?,
        });
    }
    if let Some(c) = result.captures(line) {
        return Ok(ThroughputLine::Result {
            ops: parse_u64(&c[1], line)?,
            runtime_secs: parse_f64(&c[2], line)?,
        });
    }
    Ok(ThroughputLine::Unrecognized)
}

/// Parse throughput output: alternating header/result pairs, one
/// measurement per completed pair.
fn parse_throughput(algo: &str, output: &str) -> Result<Vec<RawMeasurement>, CompareError> {
    let mut results = Vec::new();
    let mut pending: Option<(u64, String)> = None;

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match classify_throughput(line)? {
            ThroughputLine::Ignored => {}
            ThroughputLine::Header { buf_size } => {
                if let Some((_, header_line)) = pending {
                    return Err(unexpected(&format!(
                        "buffer-size header '{header_line}' has no matching result line"
                    )));
                }
                pending = Some((buf_size, line.to_string()));
            }
            ThroughputLine::Result { ops, runtime_secs } => match pending.take() {
                Some((buf_size, _)) => {
                    results.push(RawMeasurement::throughput(algo, buf_size, ops, runtime_secs)?);
                }
                None => {
                    return Err(unexpected(&format!(
                        "result line '{line}' has no preceding buffer-size header"
                    )));
                }
            },
            ThroughputLine::Unrecognized => return Err(unexpected(line)),
        }
    }

    if let Some((_, header_line)) = pending {
        return Err(unexpected(&format!(
            "buffer-size header '{header_line}' has no matching result line"
        )));
    }

    Ok(results)
}

/// Parse signature output: one measurement per sign or verify line.
fn parse_signature(algo: &str, output: &str) -> Result<Vec<RawMeasurement>, CompareError> {
    static GRAMMAR: OnceLock<(Regex, Regex, Regex)> = OnceLock::new();
    let (sign, verify, ignored) = GRAMMAR.get_or_init(|| {
        (
            Regex::new(r"^\+(R1|R5|R7):([0-9]+):([0-9]+):([0-9]+\.[0-9]+)$")
                .expect("hard-coded regex"),
            Regex::new(r"^\+(R2|R6|R8):([0-9]+):([0-9]+):([0-9]+\.[0-9]+)$")
                .expect("hard-coded regex"),
            Regex::new(r"^\+(DTP|F2|R3|R4|F4):").expect("hard-coded regex"),
        )
    });

    let mut results = Vec::new();
    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if ignored.is_match(line) {
            continue;
        }
        let (op, captures) = if let Some(c) = sign.captures(line) {
            (Operation::Sign, c)
        } else if let Some(c) = verify.captures(line) {
            (Operation::Verify, c)
        } else {
            return Err(unexpected(line));
        };
        results.push(RawMeasurement::ops(
            algo,
            parse_u64(&captures[3], line)?,
            Some(op),
            parse_u64(&captures[2], line)?,
            parse_f64(&captures[4], line)?,
        )?);
    }
    Ok(results)
}

/// Parse key-agreement output: one measurement per result line.
fn parse_key_agreement(algo: &str, output: &str) -> Result<Vec<RawMeasurement>, CompareError> {
    static GRAMMAR: OnceLock<(Regex, Regex)> = OnceLock::new();
    let (result, ignored) = GRAMMAR.get_or_init(|| {
        (
            Regex::new(r"^\+(R7|R9|R12|R14):([0-9]+):([0-9]+):([0-9]+\.[0-9]+)$")
                .expect("hard-coded regex"),
            Regex::new(r"^\+(DTP|F5|F8):").expect("hard-coded regex"),
        )
    });

    let mut results = Vec::new();
    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if ignored.is_match(line) {
            continue;
        }
        match result.captures(line) {
            Some(c) => results.push(RawMeasurement::ops(
                algo,
                parse_u64(&c[3], line)?,
                None,
                parse_u64(&c[2], line)?,
                parse_f64(&c[4], line)?,
            )?),
            None => return Err(unexpected(line)),
        }
    }
    Ok(results)
}
