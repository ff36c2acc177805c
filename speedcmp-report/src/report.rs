//! Report Data Structures

use serde::Serialize;
use speedcmp_core::AlignedComparison;

/// Context captured once per run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    /// Reference tool version string
    pub openssl_version: String,
    /// Target tool version string
    pub botan_version: String,
}

/// Complete comparison report for one run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Tool versions for context
    pub meta: ReportMeta,
    /// One comparison table per benchmarked algorithm
    pub comparisons: Vec<AlignedComparison>,
}
