//! `msf-histogram` is a Rust crate providing a mergeable histogram of weighted real-valued samples.
//!
//! Samples are binned by rounding them to a fixed number of significant decimal digits, which
//! bounds the relative error of every bin while keeping histograms built independently, even at
//! different resolutions, composable through sum, signed difference and pointwise minimum.
//!
//! ```
//! use msf_histogram::Histogram;
//!
//! let mut latencies = Histogram::new(2);
//! latencies.insert(123.3, 23.32);
//! latencies.insert(23456.43, 11.0);
//! assert_eq!(latencies.total(), 34.32);
//!
//! let bytes = latencies.serialize();
//! let restored = Histogram::deserialize(&bytes, 2).unwrap();
//! assert_eq!(restored, latencies);
//! ```
mod array;
mod encoding;
pub mod histogram;
mod map;
pub mod projection;
mod representation;
#[cfg(feature = "with_serde")]
mod serde;

pub use histogram::{Histogram, RawHist, DEFAULT_RESOLUTION};
pub use projection::{project, Key};

/// Errors returned when decoding a histogram or one of its keys
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unsupported format version: {0}")]
    UnsupportedVersion(u8),
    #[error("varint does not fit in 64 bits")]
    VarIntOverflow,
    #[error("{0} trailing bytes after histogram record")]
    TrailingBytes(usize),
    #[error("invalid bin key: {0:?}")]
    InvalidKey(String),
}
