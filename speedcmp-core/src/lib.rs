#![warn(missing_docs)]
//! speedcmp core — measurement model and comparison engine
//!
//! Drives the benchmark modes of two cryptographic toolkits (OpenSSL as
//! the reference, Botan as the target), normalizes their incompatible
//! output formats into a common per-algorithm record set, and aligns the
//! records for comparison.
//!
//! The crate is strictly sequential and stateless across algorithms: each
//! comparison run creates, consumes, and discards its own records. The
//! reference tool's measured runtime calibrates the target tool's
//! requested duration, so both measurements cover comparable wall-clock
//! work.

pub mod algo;
pub mod botan;
pub mod compare;
pub mod error;
pub mod measure;
pub mod openssl;
pub mod process;

pub use algo::{all_algorithms, lookup, Algorithm, Category, Operation};
pub use botan::BotanCli;
pub use compare::{compare, AlignedComparison, ComparisonRow, Winner};
pub use error::CompareError;
pub use measure::{average_runtime, buffer_sizes, RawMeasurement};
pub use openssl::OpensslCli;
