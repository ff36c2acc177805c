//! Measurement Model
//!
//! A `RawMeasurement` is one observed data point from one tool for one
//! algorithm. Both adapters normalize into this shape; nothing mutates a
//! measurement after parsing.
//!
//! The calibration step lives here as a pure function so both adapters
//! stay independently testable: the driver feeds the averaged reference
//! runtime into the target tool's invocation, making both measurements
//! cover comparable wall-clock work.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::algo::{Category, Operation};
use crate::error::CompareError;

/// One observed data point from one tool.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMeasurement {
    /// Canonical algorithm name
    pub algo: String,
    /// Alignment key: buffer size (throughput) or key size (signature,
    /// key agreement), in bytes resp. bits
    pub key: u64,
    /// Operation tag for signature measurements
    pub op: Option<Operation>,
    /// Number of operations (or processed blocks) completed
    pub ops: u64,
    /// Measured wall-clock runtime in seconds
    pub runtime_secs: f64,
    /// Derived throughput in bytes per second, truncated; only present
    /// for throughput measurements
    pub bytes_per_sec: Option<u64>,
}

impl RawMeasurement {
    /// Build a throughput measurement, deriving the bytes-per-second rate
    /// from the operation count and buffer size. A runtime of zero is
    /// rejected here: dividing by it would saturate the rate instead of
    /// surfacing the broken tool output.
    pub fn throughput(
        algo: &str,
        buf_size: u64,
        ops: u64,
        runtime_secs: f64,
    ) -> Result<Self, CompareError> {
        check_runtime(algo, buf_size, runtime_secs)?;
        let bps = (ops as f64 * buf_size as f64 / runtime_secs) as u64;
        Ok(Self {
            algo: algo.to_string(),
            key: buf_size,
            op: None,
            ops,
            runtime_secs,
            bytes_per_sec: Some(bps),
        })
    }

    /// Build a signature or key-agreement measurement. A runtime of zero
    /// is rejected here as it would calibrate a zero-length target run.
    pub fn ops(
        algo: &str,
        key_size: u64,
        op: Option<Operation>,
        ops: u64,
        runtime_secs: f64,
    ) -> Result<Self, CompareError> {
        check_runtime(algo, key_size, runtime_secs)?;
        Ok(Self {
            algo: algo.to_string(),
            key: key_size,
            op,
            ops,
            runtime_secs,
            bytes_per_sec: None,
        })
    }
}

fn check_runtime(algo: &str, key: u64, runtime_secs: f64) -> Result<(), CompareError> {
    if runtime_secs <= 0.0 {
        return Err(CompareError::ZeroRuntime {
            algo: algo.to_string(),
            key,
        });
    }
    Ok(())
}

/// Average the reference tool's measured runtimes into the duration to
/// request from the target tool.
///
/// For throughput the mean is additionally divided by the distinct
/// buffer-size count: the reference tool's reported runtimes for that
/// category each cover one buffer size, while the target tool applies the
/// requested duration to every buffer size separately.
///
/// Returns `None` for an empty measurement set.
pub fn average_runtime(category: Category, measurements: &[RawMeasurement]) -> Option<Duration> {
    if measurements.is_empty() {
        return None;
    }

    let total: f64 = measurements.iter().map(|m| m.runtime_secs).sum();
    let mut mean = total / measurements.len() as f64;

    if category == Category::Throughput {
        let distinct: BTreeSet<u64> = measurements.iter().map(|m| m.key).collect();
        mean /= distinct.len() as f64;
    }

    Some(Duration::from_secs_f64(mean))
}

/// Distinct buffer sizes observed in a throughput measurement set, sorted
/// ascending. Passed to the target tool so both tools measure identical
/// block sizes.
pub fn buffer_sizes(measurements: &[RawMeasurement]) -> Vec<u64> {
    let sizes: BTreeSet<u64> = measurements.iter().map(|m| m.key).collect();
    sizes.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput_rate_derivation() {
        let m = RawMeasurement::throughput("AES-128/GCM", 8192, 250_000, 2.0).unwrap();
        // 250_000 * 8192 / 2.0 = 1_024_000_000, exactly representable
        assert_eq!(m.bytes_per_sec, Some(1_024_000_000));
        assert_eq!(m.key, 8192);
        assert_eq!(m.op, None);
    }

    #[test]
    fn test_rate_truncates_toward_zero() {
        let m = RawMeasurement::throughput("SHA-256", 16, 3, 2.0).unwrap();
        // 3 * 16 / 2.0 = 24.0; 7 * 16 / 3.0 = 37.33 → 37
        assert_eq!(m.bytes_per_sec, Some(24));
        let m = RawMeasurement::throughput("SHA-256", 16, 7, 3.0).unwrap();
        assert_eq!(m.bytes_per_sec, Some(37));
    }

    #[test]
    fn test_zero_runtime_is_rejected() {
        assert!(matches!(
            RawMeasurement::throughput("SHA-256", 16, 100, 0.0),
            Err(CompareError::ZeroRuntime { key: 16, .. })
        ));
        assert!(matches!(
            RawMeasurement::ops("RSA", 2048, Some(Operation::Sign), 100, 0.0),
            Err(CompareError::ZeroRuntime { key: 2048, .. })
        ));
    }

    #[test]
    fn test_average_runtime_signature() {
        let ms = vec![
            RawMeasurement::ops("RSA", 2048, Some(Operation::Sign), 100, 1.0).unwrap(),
            RawMeasurement::ops("RSA", 2048, Some(Operation::Verify), 200, 3.0).unwrap(),
        ];
        let runtime = average_runtime(Category::Signature, &ms).unwrap();
        assert_eq!(runtime, Duration::from_secs_f64(2.0));
    }

    #[test]
    fn test_average_runtime_throughput_divides_by_buffer_count() {
        // Two measurements over two distinct buffer sizes:
        // mean runtime 1.0s, divided by 2 buffer sizes → 0.5s
        let ms = vec![
            RawMeasurement::throughput("SHA-256", 16, 100, 1.0).unwrap(),
            RawMeasurement::throughput("SHA-256", 8192, 100, 1.0).unwrap(),
        ];
        let runtime = average_runtime(Category::Throughput, &ms).unwrap();
        assert_eq!(runtime, Duration::from_secs_f64(0.5));
    }

    #[test]
    fn test_average_runtime_empty() {
        assert_eq!(average_runtime(Category::Signature, &[]), None);
    }

    #[test]
    fn test_buffer_sizes_sorted_distinct() {
        let ms = vec![
            RawMeasurement::throughput("SHA-256", 8192, 1, 1.0).unwrap(),
            RawMeasurement::throughput("SHA-256", 16, 1, 1.0).unwrap(),
            RawMeasurement::throughput("SHA-256", 256, 1, 1.0).unwrap(),
        ];
        assert_eq!(buffer_sizes(&ms), vec![16, 256, 8192]);
    }
}
