//! Target Tool Adapter (Botan)
//!
//! Builds `botan speed --format=json` invocations and parses the emitted
//! JSON array into raw measurements. Botan does not report key sizes
//! directly for public-key algorithms; the key size is derived from the
//! trailing numeric component of the variant name (`RSA-2048` → 2048).

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use crate::algo::{Algorithm, Category, Operation};
use crate::error::CompareError;
use crate::measure::RawMeasurement;
use crate::process::run_tool;

/// Tool name used in logs and error messages.
pub const TOOL_NAME: &str = "botan";

/// One entry of Botan's `speed --format=json` output.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeedEntry {
    /// Variant name, e.g. `RSA-2048` or the cipher name
    pub algo: String,
    /// Operation name, e.g. `sign`, `verify`, `key agreements`, `encrypt`
    pub op: String,
    /// Number of events completed within the measured window
    pub events: u64,
    /// Measured wall-clock time in nanoseconds
    pub nanos: u64,
    /// Block size, present for throughput entries only
    #[serde(default)]
    pub buf_size: Option<u64>,
}

impl SpeedEntry {
    fn runtime_secs(&self) -> f64 {
        self.nanos as f64 / 1e9
    }
}

/// Handle on a Botan binary.
#[derive(Debug, Clone)]
pub struct BotanCli {
    path: PathBuf,
}

impl BotanCli {
    /// Create an adapter for the binary at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the binary.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Query the tool's version string.
    pub fn version(&self) -> Result<String, CompareError> {
        let output = run_tool(&self.path, &["version".to_string()])?;
        Ok(output.trim().to_string())
    }

    /// Run the benchmark for one algorithm and parse the output.
    ///
    /// The requested duration comes from the reference tool's calibrated
    /// runtime; for throughput the exact buffer sizes the reference tool
    /// reported are requested too, so both tools measure identical block
    /// sizes.
    pub fn benchmark(
        &self,
        algo: &Algorithm,
        runtime: Duration,
        buf_sizes: &[u64],
    ) -> Result<Vec<RawMeasurement>, CompareError> {
        tracing::info!("running Botan benchmark for {}", algo.name);
        let args = benchmark_args(algo, runtime, buf_sizes);
        let output = run_tool(&self.path, &args)?;
        parse_output(algo, &output)
    }
}

/// Arguments for one benchmark invocation. The duration is rounded down
/// to whole milliseconds.
pub fn benchmark_args(algo: &Algorithm, runtime: Duration, buf_sizes: &[u64]) -> Vec<String> {
    let mut args = vec![
        "speed".to_string(),
        "--format=json".to_string(),
        format!("--msec={}", runtime.as_millis()),
    ];
    if algo.category == Category::Throughput {
        let csv: Vec<String> = buf_sizes.iter().map(|s| s.to_string()).collect();
        args.push(format!("--buf-size={}", csv.join(",")));
    }
    args.push(algo.name.to_string());
    args
}

/// Parse benchmark output for `algo`'s category.
pub fn parse_output(algo: &Algorithm, output: &str) -> Result<Vec<RawMeasurement>, CompareError> {
    let entries: Vec<SpeedEntry> =
        serde_json::from_str(output).map_err(|source| CompareError::MalformedJson {
            tool: TOOL_NAME,
            source,
        })?;
    parse_entries(algo, &entries)
}

/// Reshape decoded JSON entries into raw measurements.
pub fn parse_entries(
    algo: &Algorithm,
    entries: &[SpeedEntry],
) -> Result<Vec<RawMeasurement>, CompareError> {
    match algo.category {
        Category::Throughput => parse_throughput(algo.name, entries),
        Category::Signature => parse_signature(algo.name, entries),
        Category::KeyAgreement => parse_key_agreement(algo.name, entries),
    }
}

fn unexpected(context: String) -> CompareError {
    CompareError::UnexpectedOutput {
        tool: TOOL_NAME,
        context,
    }
}

/// Extract the key size embedded in a variant name such as `RSA-2048` or
/// `ECDH-secp256r1`.
fn key_size_from_variant(variant: &str) -> Result<u64, CompareError> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"[A-Z]+-[a-z]*([0-9]+)").expect("hard-coded regex")
    });
    re.captures(variant)
        .and_then(|c| c[1].parse().ok())
        .ok_or_else(|| unexpected(format!("no key size in variant name '{variant}'")))
}

fn parse_throughput(
    algo: &str,
    entries: &[SpeedEntry],
) -> Result<Vec<RawMeasurement>, CompareError> {
    entries
        .iter()
        .map(|entry| {
            let buf_size = entry.buf_size.ok_or_else(|| {
                unexpected(format!(
                    "throughput entry for '{}' without a buffer size",
                    entry.algo
                ))
            })?;
            RawMeasurement::throughput(algo, buf_size, entry.events, entry.runtime_secs())
        })
        .collect()
}

/// Pair up sign/verify entries sharing a variant name; each pair yields
/// two measurements tagged with the key size from the variant name.
fn parse_signature(
    algo: &str,
    entries: &[SpeedEntry],
) -> Result<Vec<RawMeasurement>, CompareError> {
    let mut results = Vec::new();
    for verify in entries.iter().filter(|e| e.op == "verify") {
        for sign in entries.iter().filter(|e| e.op == "sign") {
            if sign.algo != verify.algo {
                continue;
            }
            let key_size = key_size_from_variant(&sign.algo)?;
            results.push(RawMeasurement::ops(
                algo,
                key_size,
                Some(Operation::Sign),
                sign.events,
                sign.runtime_secs(),
            )?);
            results.push(RawMeasurement::ops(
                algo,
                key_size,
                Some(Operation::Verify),
                verify.events,
                verify.runtime_secs(),
            )?);
        }
    }
    Ok(results)
}

fn parse_key_agreement(
    algo: &str,
    entries: &[SpeedEntry],
) -> Result<Vec<RawMeasurement>, CompareError> {
    entries
        .iter()
        .filter(|e| e.op == "key agreements")
        .map(|entry| {
            RawMeasurement::ops(
                algo,
                key_size_from_variant(&entry.algo)?,
                None,
                entry.events,
                entry.runtime_secs(),
            )
        })
        .collect()
}
