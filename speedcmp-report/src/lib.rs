#![warn(missing_docs)]
//! speedcmp report — comparison rendering
//!
//! Pure formatting over the core crate's aligned comparisons, in two
//! flavors:
//! - fixed-width human-readable lines, one per aligned key (and per
//!   operation for signature algorithms)
//! - machine-readable JSON

mod human;
mod json;
mod report;

pub use human::format_comparison;
pub use json::generate_json_report;
pub use report::{Report, ReportMeta};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Fixed-width terminal lines
    Human,
    /// Machine-readable JSON
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("human".parse::<OutputFormat>().unwrap(), OutputFormat::Human);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
