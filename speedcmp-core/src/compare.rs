//! Aligner / Comparator
//!
//! Aligns the two tools' raw measurements on the intersection of their
//! alignment keys and computes a winner and a speed ratio per aligned
//! key. Keys present in only one tool's output are dropped silently; a
//! signature key size enters the alignment universe only when the tool
//! reported both a sign and a verify measurement for it, so per-key
//! lookups inside the intersection cannot miss an operation.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::algo::{Category, Operation};
use crate::error::CompareError;
use crate::measure::RawMeasurement;
use crate::{botan, openssl};

/// Which tool won a comparison row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    /// The reference tool (OpenSSL)
    Openssl,
    /// The target tool (Botan)
    Botan,
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::Openssl => write!(f, "{}", openssl::TOOL_NAME),
            Winner::Botan => write!(f, "{}", botan::TOOL_NAME),
        }
    }
}

/// One aligned key (and, for signature, one operation) with both tools'
/// values and the computed advantage.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    /// Alignment key: buffer size or key size
    pub key: u64,
    /// Operation, for signature rows
    pub op: Option<Operation>,
    /// Reference tool's value (bytes/sec or operation count)
    pub openssl: u64,
    /// Target tool's value (bytes/sec or operation count)
    pub botan: u64,
    /// Side with the larger value
    pub winner: Winner,
    /// Speed ratio, always >= 1.0 (larger value over smaller)
    pub ratio: f64,
}

/// Comparison table for one algorithm.
#[derive(Debug, Clone, Serialize)]
pub struct AlignedComparison {
    /// Canonical algorithm name
    pub algo: String,
    /// Benchmark category
    pub category: Category,
    /// Rows in ascending key order
    pub rows: Vec<ComparisonRow>,
}

/// Per-side measurement index: (key, op) → value, with duplicate
/// detection.
struct ValueMap {
    tool: &'static str,
    values: BTreeMap<(u64, Option<Operation>), u64>,
}

impl ValueMap {
    fn build(
        tool: &'static str,
        category: Category,
        algo: &str,
        measurements: &[RawMeasurement],
    ) -> Result<Self, CompareError> {
        let mut values = BTreeMap::new();
        for m in measurements {
            let value = match category {
                // A throughput measurement always carries a derived rate;
                // its absence means the caller mixed categories, not that
                // the tool reported zero.
                Category::Throughput => {
                    m.bytes_per_sec
                        .ok_or_else(|| CompareError::MissingExpectedKey {
                            algo: algo.to_string(),
                            tool,
                            key: m.key,
                            op: "rate",
                        })?
                }
                Category::Signature | Category::KeyAgreement => m.ops,
            };
            if values.insert((m.key, m.op), value).is_some() {
                return Err(CompareError::DuplicateKey {
                    algo: algo.to_string(),
                    tool,
                    key: m.key,
                    op: m.op.map(Operation::as_str).unwrap_or("result"),
                });
            }
        }
        Ok(Self { tool, values })
    }

    /// Keys that are complete for this category: signature keys need both
    /// operations present, other categories need the single measurement.
    fn complete_keys(&self, category: Category) -> BTreeSet<u64> {
        match category {
            Category::Signature => self
                .values
                .keys()
                .filter(|(key, op)| {
                    *op == Some(Operation::Sign)
                        && self.values.contains_key(&(*key, Some(Operation::Verify)))
                })
                .map(|(key, _)| *key)
                .collect(),
            Category::Throughput | Category::KeyAgreement => {
                self.values.keys().map(|(key, _)| *key).collect()
            }
        }
    }

    fn get(&self, algo: &str, key: u64, op: Option<Operation>) -> Result<u64, CompareError> {
        self.values
            .get(&(key, op))
            .copied()
            .ok_or_else(|| CompareError::MissingExpectedKey {
                algo: algo.to_string(),
                tool: self.tool,
                key,
                op: op.map(Operation::as_str).unwrap_or("result"),
            })
    }
}

/// Compute winner and ratio for one pair of values. A tie goes to the
/// target side, and a zero on either side is an error rather than an
/// infinite ratio.
fn score(
    algo: &str,
    key: u64,
    op: Option<Operation>,
    openssl: u64,
    botan: u64,
) -> Result<ComparisonRow, CompareError> {
    if openssl == 0 || botan == 0 {
        return Err(CompareError::ZeroMeasurement {
            algo: algo.to_string(),
            tool: if openssl == 0 {
                crate::openssl::TOOL_NAME
            } else {
                crate::botan::TOOL_NAME
            },
            key,
        });
    }

    let (winner, ratio) = if openssl > botan {
        (Winner::Openssl, openssl as f64 / botan as f64)
    } else {
        (Winner::Botan, botan as f64 / openssl as f64)
    };

    Ok(ComparisonRow {
        key,
        op,
        openssl,
        botan,
        winner,
        ratio,
    })
}

/// Align both tools' measurements for one algorithm and compute the
/// comparison table. An empty intersection yields an empty table, not an
/// error.
pub fn compare(
    category: Category,
    algo: &str,
    reference: &[RawMeasurement],
    target: &[RawMeasurement],
) -> Result<AlignedComparison, CompareError> {
    let reference = ValueMap::build(openssl::TOOL_NAME, category, algo, reference)?;
    let target = ValueMap::build(botan::TOOL_NAME, category, algo, target)?;

    let keys: Vec<u64> = reference
        .complete_keys(category)
        .intersection(&target.complete_keys(category))
        .copied()
        .collect();

    let mut rows = Vec::new();
    for key in keys {
        let ops: &[Option<Operation>] = match category {
            Category::Signature => &[Some(Operation::Sign), Some(Operation::Verify)],
            Category::Throughput | Category::KeyAgreement => &[None],
        };
        for &op in ops {
            rows.push(score(
                algo,
                key,
                op,
                reference.get(algo, key, op)?,
                target.get(algo, key, op)?,
            )?);
        }
    }

    Ok(AlignedComparison {
        algo: algo.to_string(),
        category,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::RawMeasurement;

    fn tp(key: u64, ops: u64, runtime: f64) -> RawMeasurement {
        RawMeasurement::throughput("AES-256/GCM", key, ops, runtime).unwrap()
    }

    fn sig(key: u64, op: Operation, ops: u64) -> RawMeasurement {
        RawMeasurement::ops("RSA", key, Some(op), ops, 1.0).unwrap()
    }

    #[test]
    fn test_alignment_intersects_keys() {
        // reference keys {128, 256, 512}, target keys {256, 512, 1024}
        let reference = vec![tp(128, 128, 1.0), tp(256, 256, 1.0), tp(512, 512, 1.0)];
        let target = vec![tp(256, 512, 1.0), tp(512, 1024, 1.0), tp(1024, 1, 1.0)];

        let cmp = compare(Category::Throughput, "AES-256/GCM", &reference, &target).unwrap();
        let keys: Vec<u64> = cmp.rows.iter().map(|r| r.key).collect();
        assert_eq!(keys, vec![256, 512]);
    }

    #[test]
    fn test_empty_intersection_is_empty_table() {
        let reference = vec![tp(16, 100, 1.0)];
        let target = vec![tp(8192, 100, 1.0)];
        let cmp = compare(Category::Throughput, "AES-256/GCM", &reference, &target).unwrap();
        assert!(cmp.rows.is_empty());
    }

    #[test]
    fn test_winner_and_ratio() {
        // key 16: openssl 1_000_000 bps, botan 1_200_000 bps → botan by 1.20
        // key 8192: openssl 2_000_000 bps, botan 1_900_000 bps → openssl by 1.05
        let reference = vec![tp(16, 1_000_000, 16.0), tp(8192, 2_000_000, 8192.0)];
        let target = vec![tp(16, 1_200_000, 16.0), tp(8192, 1_900_000, 8192.0)];

        let cmp = compare(Category::Throughput, "AES-256/GCM", &reference, &target).unwrap();
        assert_eq!(cmp.rows.len(), 2);

        assert_eq!(cmp.rows[0].key, 16);
        assert_eq!(cmp.rows[0].winner, Winner::Botan);
        assert!((cmp.rows[0].ratio - 1.20).abs() < 1e-9);

        assert_eq!(cmp.rows[1].key, 8192);
        assert_eq!(cmp.rows[1].winner, Winner::Openssl);
        assert!((cmp.rows[1].ratio - 1.05263157).abs() < 1e-6);
    }

    #[test]
    fn test_ratio_symmetric_under_side_swap() {
        let a = vec![tp(64, 3_000_000, 64.0)];
        let b = vec![tp(64, 2_000_000, 64.0)];

        let ab = compare(Category::Throughput, "AES-256/GCM", &a, &b).unwrap();
        let ba = compare(Category::Throughput, "AES-256/GCM", &b, &a).unwrap();

        assert_eq!(ab.rows[0].winner, Winner::Openssl);
        assert_eq!(ba.rows[0].winner, Winner::Botan);
        assert!((ab.rows[0].ratio - ba.rows[0].ratio).abs() < 1e-12);
    }

    #[test]
    fn test_tie_goes_to_target() {
        let a = vec![tp(64, 1_000, 64.0)];
        let cmp = compare(Category::Throughput, "AES-256/GCM", &a, &a).unwrap();
        assert_eq!(cmp.rows[0].winner, Winner::Botan);
        assert_eq!(cmp.rows[0].ratio, 1.0);
    }

    #[test]
    fn test_signature_requires_both_ops_before_intersecting() {
        // reference has sign+verify for 2048 but only sign for 4096;
        // target has both for both key sizes. Only 2048 aligns.
        let reference = vec![
            sig(2048, Operation::Sign, 100),
            sig(2048, Operation::Verify, 2000),
            sig(4096, Operation::Sign, 10),
        ];
        let target = vec![
            sig(2048, Operation::Sign, 150),
            sig(2048, Operation::Verify, 1500),
            sig(4096, Operation::Sign, 12),
            sig(4096, Operation::Verify, 300),
        ];

        let cmp = compare(Category::Signature, "RSA", &reference, &target).unwrap();
        let keys: BTreeSet<u64> = cmp.rows.iter().map(|r| r.key).collect();
        assert_eq!(keys, BTreeSet::from([2048]));

        // Two rows per aligned signature key: sign then verify
        assert_eq!(cmp.rows.len(), 2);
        assert_eq!(cmp.rows[0].op, Some(Operation::Sign));
        assert_eq!(cmp.rows[0].winner, Winner::Botan);
        assert_eq!(cmp.rows[1].op, Some(Operation::Verify));
        assert_eq!(cmp.rows[1].winner, Winner::Openssl);
    }

    #[test]
    fn test_duplicate_key_is_error() {
        let reference = vec![tp(64, 1_000, 1.0), tp(64, 2_000, 1.0)];
        let target = vec![tp(64, 1_000, 1.0)];
        assert!(matches!(
            compare(Category::Throughput, "AES-256/GCM", &reference, &target),
            Err(CompareError::DuplicateKey { tool: "openssl", key: 64, .. })
        ));
    }

    #[test]
    fn test_zero_measurement_is_error_not_infinity() {
        let reference = vec![RawMeasurement::ops("ECDH", 256, None, 0, 1.0).unwrap()];
        let target = vec![RawMeasurement::ops("ECDH", 256, None, 500, 1.0).unwrap()];
        assert!(matches!(
            compare(Category::KeyAgreement, "ECDH", &reference, &target),
            Err(CompareError::ZeroMeasurement { key: 256, .. })
        ));
    }

    #[test]
    fn test_throughput_measurement_without_rate_is_internal_error() {
        // An ops-style measurement slipped into a throughput comparison
        // must not masquerade as a zero value blamed on the tool.
        let reference = vec![RawMeasurement::ops("AES-256/GCM", 16, None, 100, 1.0).unwrap()];
        let target = vec![tp(16, 100, 1.0)];
        assert!(matches!(
            compare(Category::Throughput, "AES-256/GCM", &reference, &target),
            Err(CompareError::MissingExpectedKey {
                tool: "openssl",
                key: 16,
                op: "rate",
                ..
            })
        ));
    }
}
