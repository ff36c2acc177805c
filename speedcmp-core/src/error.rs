//! Error Types
//!
//! Every fatal error carries the offending command line or output fragment
//! verbatim, so a parse failure caused by a tool-version drift can be
//! diagnosed from the error message alone.

use thiserror::Error;

/// Errors produced while invoking the tools or reconciling their output.
#[derive(Debug, Error)]
pub enum CompareError {
    /// The tool binary could not be started at all.
    #[error("failed to spawn '{command}': {source}")]
    SpawnFailed {
        /// Full command line that failed to start
        command: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but exited with a non-zero status.
    #[error("command '{command}' failed with exit status {status}")]
    ToolInvocationFailed {
        /// Full command line that failed
        command: String,
        /// Exit status code (-1 if terminated by signal)
        status: i32,
    },

    /// A line or JSON entry did not match any recognized pattern for its
    /// category.
    #[error("unexpected output from {tool}: {context}")]
    UnexpectedOutput {
        /// Which tool produced the output
        tool: &'static str,
        /// The offending line or entry, verbatim
        context: String,
    },

    /// The target tool's output was not parseable as the expected JSON
    /// schema.
    #[error("malformed JSON from {tool}: {source}")]
    MalformedJson {
        /// Which tool produced the output
        tool: &'static str,
        /// Underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// A key inside the alignment intersection lacked a required
    /// measurement. This indicates an internal invariant violation: the
    /// intersection must be built from complete key sets only.
    #[error("no {op} measurement for key {key} in {tool} results for {algo}")]
    MissingExpectedKey {
        /// Algorithm being compared
        algo: String,
        /// Which tool's measurements were incomplete
        tool: &'static str,
        /// The alignment key (buffer size or key size)
        key: u64,
        /// Operation name ("sign", "verify", or the category's default)
        op: &'static str,
    },

    /// One tool reported two measurements for the same (key, operation)
    /// pair, which usually means malformed tool output.
    #[error("duplicate {op} measurement for key {key} in {tool} results for {algo}")]
    DuplicateKey {
        /// Algorithm being compared
        algo: String,
        /// Which tool reported the duplicate
        tool: &'static str,
        /// The duplicated alignment key
        key: u64,
        /// Operation name
        op: &'static str,
    },

    /// A reported runtime of zero cannot yield a finite rate or calibrate
    /// the target invocation; valid benchmark runs never produce it.
    #[error("zero runtime reported for {algo} key {key}")]
    ZeroRuntime {
        /// Algorithm being measured
        algo: String,
        /// The alignment key
        key: u64,
    },

    /// A measurement value of zero would make the speed ratio infinite;
    /// valid benchmark runs never produce it.
    #[error("{tool} reported a zero measurement for {algo} key {key}")]
    ZeroMeasurement {
        /// Algorithm being compared
        algo: String,
        /// Which tool reported zero
        tool: &'static str,
        /// The alignment key
        key: u64,
    },

    /// An explicitly requested algorithm name is not in any category
    /// mapping.
    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),
}
