#![warn(missing_docs)]
//! speedcmp CLI
//!
//! Drives the whole comparison run: checks the two tool binaries, queries
//! their versions for context, then benchmarks each selected algorithm
//! strictly sequentially — the reference run must complete and parse
//! before the target invocation is constructed, because the target's
//! duration (and buffer-size list, for throughput) is derived from the
//! reference results.
//!
//! Error policy lives here and nowhere else: invocation failures and
//! unparseable output abort the run with a non-zero exit; an explicitly
//! requested unknown algorithm name is logged and skipped.

use clap::Parser;
use std::path::PathBuf;

use speedcmp_core::{
    algo, average_runtime, buffer_sizes, compare, AlignedComparison, Algorithm, BotanCli,
    Category, CompareError, OpensslCli,
};
use speedcmp_report::{
    format_comparison, generate_json_report, OutputFormat, Report, ReportMeta,
};

/// speedcmp CLI arguments
#[derive(Parser, Debug)]
#[command(name = "speedcmp")]
#[command(
    author,
    version,
    about = "Compare OpenSSL and Botan using their respective benchmark utils"
)]
pub struct Cli {
    /// Be noisy
    #[arg(long)]
    pub verbose: bool,

    /// Be very quiet
    #[arg(long)]
    pub quiet: bool,

    /// Path to openssl binary
    #[arg(long, value_name = "PATH", default_value = "/usr/bin/openssl")]
    pub openssl_cli: PathBuf,

    /// Path to botan binary
    #[arg(long, value_name = "PATH", default_value = "/usr/bin/botan")]
    pub botan_cli: PathBuf,

    /// Output format: human, json
    #[arg(long, default_value = "human")]
    pub format: String,

    /// Specific algorithms to benchmark (default: all known)
    #[arg(value_name = "ALGO")]
    pub algos: Vec<String>,
}

/// Run the speedcmp CLI. This is the binary's entry point.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the speedcmp CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("speedcmp_core=debug,speedcmp_cli=debug")
            .init();
    } else if cli.quiet {
        tracing_subscriber::fmt()
            .with_env_filter("speedcmp_core=warn,speedcmp_cli=warn")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("speedcmp_core=info,speedcmp_cli=info")
            .init();
    }

    let format: OutputFormat = cli
        .format
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    if !speedcmp_core::process::is_executable(&cli.openssl_cli) {
        anyhow::bail!(
            "unable to access openssl binary at {}",
            cli.openssl_cli.display()
        );
    }
    if !speedcmp_core::process::is_executable(&cli.botan_cli) {
        anyhow::bail!(
            "unable to access botan binary at {}",
            cli.botan_cli.display()
        );
    }

    let openssl = OpensslCli::new(&cli.openssl_cli);
    let botan = BotanCli::new(&cli.botan_cli);

    let openssl_version = openssl.version()?;
    let botan_version = botan.version()?;
    tracing::info!(
        "comparing Botan {} with OpenSSL {}",
        botan_version,
        openssl_version
    );

    let selected = select_algorithms(&cli.algos);

    let mut comparisons = Vec::with_capacity(selected.len());
    for algorithm in selected {
        let result = bench_algorithm(&openssl, &botan, &algorithm)?;
        if format == OutputFormat::Human {
            print!("{}", format_comparison(&result));
            println!();
        }
        comparisons.push(result);
    }

    if format == OutputFormat::Json {
        let report = Report {
            meta: ReportMeta {
                openssl_version,
                botan_version,
            },
            comparisons,
        };
        println!("{}", generate_json_report(&report)?);
    }

    Ok(())
}

/// Resolve requested algorithm names, or the full registry when none were
/// given. Unknown explicit names are logged at error level and skipped;
/// the rest of the run proceeds.
fn select_algorithms(names: &[String]) -> Vec<Algorithm> {
    if names.is_empty() {
        return algo::all_algorithms();
    }

    let mut selected = Vec::with_capacity(names.len());
    for name in names {
        match algo::lookup(name) {
            Ok(algorithm) => selected.push(algorithm),
            Err(e) => tracing::error!("{}", e),
        }
    }
    selected
}

/// Benchmark one algorithm on both tools and align the results.
///
/// The reference run happens first; its averaged runtime calibrates the
/// target invocation, and for throughput the reference's buffer sizes are
/// passed through so both tools measure identical block sizes.
fn bench_algorithm(
    openssl: &OpensslCli,
    botan: &BotanCli,
    algorithm: &Algorithm,
) -> Result<AlignedComparison, CompareError> {
    let reference = openssl.benchmark(algorithm)?;

    let runtime = average_runtime(algorithm.category, &reference).ok_or_else(|| {
        CompareError::UnexpectedOutput {
            tool: speedcmp_core::openssl::TOOL_NAME,
            context: format!("benchmark produced no measurements for {}", algorithm.name),
        }
    })?;

    let target = match algorithm.category {
        Category::Throughput => botan.benchmark(algorithm, runtime, &buffer_sizes(&reference))?,
        Category::Signature | Category::KeyAgreement => botan.benchmark(algorithm, runtime, &[])?,
    };

    compare(algorithm.category, algorithm.name, &reference, &target)
}
