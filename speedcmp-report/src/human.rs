//! Human-Readable Output
//!
//! One fixed-width line per aligned key (and per operation for signature
//! algorithms): algorithm name, key, both raw values, winning side, ratio
//! to two decimal places. No decision logic here.

use speedcmp_core::{AlignedComparison, Category};

/// Format one algorithm's comparison table as fixed-width lines.
pub fn format_comparison(cmp: &AlignedComparison) -> String {
    let mut out = String::new();
    for row in &cmp.rows {
        let line = match cmp.category {
            Category::Throughput => format!(
                "algo {} buf_size {:>6} botan {:>12} bps openssl {:>12} bps adv {} by {:.2}\n",
                cmp.algo, row.key, row.botan, row.openssl, row.winner, row.ratio
            ),
            Category::Signature => format!(
                "algo {} key_size {:>5} {:>8} botan {:>10} openssl {:>10} adv {} by {:.2}\n",
                cmp.algo,
                row.key,
                row.op.map(|op| op.as_str()).unwrap_or(""),
                row.botan,
                row.openssl,
                row.winner,
                row.ratio
            ),
            Category::KeyAgreement => format!(
                "algo {} key_size {:>6} botan {:>12} key agreements openssl {:>12} key agreements adv {} by {:.2}\n",
                cmp.algo, row.key, row.botan, row.openssl, row.winner, row.ratio
            ),
        };
        out.push_str(&line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use speedcmp_core::{compare, Operation, RawMeasurement};

    #[test]
    fn test_throughput_lines() {
        let reference = vec![
            RawMeasurement::throughput("AES-256/GCM", 16, 1_000_000, 16.0).unwrap(),
            RawMeasurement::throughput("AES-256/GCM", 8192, 2_000_000, 8192.0).unwrap(),
        ];
        let target = vec![
            RawMeasurement::throughput("AES-256/GCM", 16, 1_200_000, 16.0).unwrap(),
            RawMeasurement::throughput("AES-256/GCM", 8192, 1_900_000, 8192.0).unwrap(),
        ];
        let cmp = compare(Category::Throughput, "AES-256/GCM", &reference, &target).unwrap();

        let text = format_comparison(&cmp);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "algo AES-256/GCM buf_size     16 botan      1200000 bps openssl      1000000 bps adv botan by 1.20"
        );
        assert_eq!(
            lines[1],
            "algo AES-256/GCM buf_size   8192 botan      1900000 bps openssl      2000000 bps adv openssl by 1.05"
        );
    }

    #[test]
    fn test_signature_lines_carry_operation() {
        let reference = vec![
            RawMeasurement::ops("RSA", 2048, Some(Operation::Sign), 52_000, 1.0).unwrap(),
            RawMeasurement::ops("RSA", 2048, Some(Operation::Verify), 740_000, 1.0).unwrap(),
        ];
        let target = vec![
            RawMeasurement::ops("RSA", 2048, Some(Operation::Sign), 61_000, 1.0).unwrap(),
            RawMeasurement::ops("RSA", 2048, Some(Operation::Verify), 700_000, 1.0).unwrap(),
        ];
        let cmp = compare(Category::Signature, "RSA", &reference, &target).unwrap();

        let text = format_comparison(&cmp);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("key_size  2048     sign"));
        assert!(lines[0].ends_with("adv botan by 1.17"));
        assert!(lines[1].contains("verify"));
        assert!(lines[1].ends_with("adv openssl by 1.06"));
    }

    #[test]
    fn test_key_agreement_lines() {
        let reference = vec![RawMeasurement::ops("ECDH", 256, None, 19_000, 1.0).unwrap()];
        let target = vec![RawMeasurement::ops("ECDH", 256, None, 21_000, 1.0).unwrap()];
        let cmp = compare(Category::KeyAgreement, "ECDH", &reference, &target).unwrap();

        let text = format_comparison(&cmp);
        assert_eq!(
            text,
            "algo ECDH key_size    256 botan        21000 key agreements openssl        19000 key agreements adv botan by 1.11\n"
        );
    }

    #[test]
    fn test_empty_comparison_formats_to_nothing() {
        let cmp = compare(Category::Throughput, "SHA-1", &[], &[]).unwrap();
        assert_eq!(format_comparison(&cmp), "");
    }
}
