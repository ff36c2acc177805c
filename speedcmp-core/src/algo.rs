//! Algorithm Registry
//!
//! The fixed set of algorithms both tools can benchmark, with the
//! identifier OpenSSL expects for each. The mapping determines the
//! invocation shape, the parse grammar, and the alignment key (buffer
//! size vs. key size), and never changes at runtime.

use crate::error::CompareError;

/// Benchmark category. Determines which invocation shape, parser, and
/// alignment key apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Bulk ciphers and digests, aligned on buffer size, compared in
    /// bytes per second.
    Throughput,
    /// Signature schemes, aligned on key size, compared in sign/verify
    /// operation counts.
    Signature,
    /// Key agreement schemes, aligned on key size, compared in operation
    /// counts.
    KeyAgreement,
}

/// Operation a single measurement covers. Throughput and key-agreement
/// measurements carry no operation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Signature creation
    Sign,
    /// Signature verification
    Verify,
}

impl Operation {
    /// Lowercase name used in reports and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Sign => "sign",
            Operation::Verify => "verify",
        }
    }
}

/// One entry of the algorithm registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Algorithm {
    /// Canonical name, as Botan spells it (also the CLI-facing name)
    pub name: &'static str,
    /// Identifier OpenSSL's `speed` expects for this algorithm
    pub openssl_id: &'static str,
    /// Benchmark category
    pub category: Category,
}

/// Bulk ciphers and digests, keyed by Botan name → OpenSSL EVP identifier.
const THROUGHPUT: &[(&str, &str)] = &[
    ("AES-128/GCM", "aes-128-gcm"),
    ("AES-256/GCM", "aes-256-gcm"),
    ("ChaCha20", "chacha20"),
    ("SHA-1", "sha1"),
    ("SHA-256", "sha256"),
    ("SHA-384", "sha384"),
    ("SHA-512", "sha512"),
    ("SHA-3(256)", "sha3-256"),
    ("SHA-3(512)", "sha3-512"),
];

const SIGNATURE: &[(&str, &str)] = &[("ECDSA", "ecdsa"), ("RSA", "rsa")];

const KEY_AGREEMENT: &[(&str, &str)] = &[("DH", "ffdh"), ("ECDH", "ecdh")];

fn table(category: Category) -> &'static [(&'static str, &'static str)] {
    match category {
        Category::Throughput => THROUGHPUT,
        Category::Signature => SIGNATURE,
        Category::KeyAgreement => KEY_AGREEMENT,
    }
}

/// Category iteration order for full runs.
pub const CATEGORY_ORDER: [Category; 3] = [
    Category::Throughput,
    Category::Signature,
    Category::KeyAgreement,
];

/// Look up an algorithm by its canonical name.
pub fn lookup(name: &str) -> Result<Algorithm, CompareError> {
    for category in CATEGORY_ORDER {
        if let Some(&(name, openssl_id)) = table(category).iter().find(|(n, _)| *n == name) {
            return Ok(Algorithm {
                name,
                openssl_id,
                category,
            });
        }
    }
    Err(CompareError::UnknownAlgorithm(name.to_string()))
}

/// Every known algorithm, sorted by name within category, categories in
/// the fixed Throughput → Signature → KeyAgreement order.
pub fn all_algorithms() -> Vec<Algorithm> {
    let mut out = Vec::new();
    for category in CATEGORY_ORDER {
        let mut names: Vec<_> = table(category).to_vec();
        names.sort_by_key(|(name, _)| *name);
        out.extend(names.into_iter().map(|(name, openssl_id)| Algorithm {
            name,
            openssl_id,
            category,
        }));
    }
    out
}
