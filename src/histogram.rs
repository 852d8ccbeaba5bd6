//! Histogram accumulates weighted observations of real-valued samples into bins
//! of fixed decimal precision, defined by a runtime `resolution` parameter:
//! the number of significant digits kept after the leading one.
//!
//! # Data-structure design rationale
//!
//! ## Bounded error
//! Every sample is projected onto `resolution + 1` significant decimal digits
//! (see [`crate::projection`]), so the relative error of a bin's location is at
//! most `0.5 * 10^-resolution`, whatever the magnitude of the sample.
//!
//! ## Mergeable
//! Histograms built independently compose through `combine` (sum), `cancel`
//! (signed difference) and `min` (pointwise minimum over shared bins). Composition
//! re-inserts the decoded bins of the operands, so operands may use different
//! resolutions: the result always follows the resolution of the receiving
//! histogram, and precision degrades to the coarser side.
//!
//! ## Unbounded storage
//! Bins are never evicted nor removed, even when their weight returns to zero,
//! so memory grows with the number of distinct projected values ever inserted:
//! - Up to 16 bins - inline array, searched linearly
//! - More bins - hash map keyed by bin
//!
//! No memory is allocated before the first insert.
//!
//! # Interchange format
//! [`RawHist`] is a pair of equally long arrays holding the decoded bin locations
//! in ascending order and their weights. It is the boundary used for byte
//! serialization and for rebuilding a histogram at another resolution.

use std::fmt::{Debug, Formatter};
use std::mem::size_of;

use log::debug;

use crate::encoding;
use crate::projection::{project, Key};
use crate::representation::{Representation, RepresentationTrait};
use crate::Error;

/// Resolution used by `Histogram::default()`
pub const DEFAULT_RESOLUTION: usize = 3;

/// Mergeable histogram of weighted samples
#[derive(Clone)]
pub struct Histogram {
    /// Number of significant fractional digits kept by projection
    resolution: usize,
    /// Accumulated weight per bin
    registers: Representation,
}

/// Interchange form of a histogram: bin locations in ascending order and their weights.
///
/// Locations are ordered by `f64::total_cmp`: `-Inf < ... < -0.0 < 0.0 < ... < +Inf < NaN`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "with_serde",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct RawHist {
    pub locations: Vec<f64>,
    pub weights: Vec<f64>,
}

impl Histogram {
    /// Creates new instance of `Histogram`
    #[inline]
    pub fn new(resolution: usize) -> Self {
        Self {
            resolution,
            registers: Representation::default(),
        }
    }

    /// Return resolution of `Histogram`
    #[inline]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Return the key of the bin `value` is accumulated in
    #[inline]
    pub fn project(&self, value: f64) -> Key {
        project(self.resolution, value)
    }

    /// Add `weight` to the bin of `value`.
    ///
    /// Weights are not validated: negative weights are accepted and may drive a bin negative.
    #[inline]
    pub fn insert(&mut self, value: f64, weight: f64) {
        let key = self.project(value);
        self.registers.insert(key, weight);
    }

    /// Return weight accumulated in the bin of `value`, or zero if the bin is empty
    #[inline]
    pub fn read(&self, value: f64) -> f64 {
        self.registers.get(&self.project(value)).unwrap_or(0.0)
    }

    /// Return sum of the weights of all bins
    #[inline]
    pub fn total(&self) -> f64 {
        self.registers.iter().fold(0.0, |total, (_, weight)| total + weight)
    }

    /// Return number of bins
    #[inline]
    pub fn len(&self) -> usize {
        self.registers.len()
    }

    /// Return whether no bin has been created yet
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over `(key, weight)` pairs of all bins in unspecified order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Key, f64)> + '_ {
        self.registers.iter()
    }

    /// Return pointwise minimum of two histograms.
    ///
    /// Only bins present in both histograms are kept, each with the smaller of the two
    /// weights. A bin missing from either side is left out rather than treated as zero.
    /// Bins are matched by key, so histograms of different resolutions rarely share any.
    pub fn min(&self, other: &Histogram) -> Histogram {
        let mut out = Histogram::new(self.resolution);
        for (key, weight) in self.iter() {
            if let Some(other_weight) = other.registers.get(&key) {
                let weight = if other_weight < weight {
                    other_weight
                } else {
                    weight
                };
                out.registers.insert(key, weight);
            }
        }
        out
    }

    /// Return sum of two histograms at the resolution of `self`.
    ///
    /// Bins of `other` are inserted first, then bins of `self`.
    pub fn combine(&self, other: &Histogram) -> Histogram {
        let mut out = Histogram::new(self.resolution);
        out.absorb(other, false);
        out.absorb(self, false);
        out
    }

    /// Return signed difference of two histograms at the resolution of `self`.
    ///
    /// Called cancel rather than subtract because the result holds negative weights
    /// wherever `other` outweighs `self`.
    pub fn cancel(&self, other: &Histogram) -> Histogram {
        let mut out = Histogram::new(self.resolution);
        out.absorb(self, false);
        out.absorb(other, true);
        out
    }

    /// Merge `other` into `self`, re-binning it at the resolution of `self`
    pub fn merge(&mut self, other: &Histogram) {
        self.absorb(other, false);
    }

    /// Re-insert every bin of `other` at its decoded location.
    ///
    /// Bins beyond the range of `f64` are re-inserted at the infinity of their sign, so
    /// that no weight is lost.
    fn absorb(&mut self, other: &Histogram, negate: bool) {
        for (key, weight) in other.iter() {
            let Some(value) = key.saturating_value() else {
                debug!("skipping undecodable bin {key:?}");
                continue;
            };
            self.insert(value, if negate { -weight } else { weight });
        }
    }

    /// Return interchange form of `Histogram`.
    ///
    /// Bins whose key can not be decoded are skipped, including bins of values close to
    /// `f64::MAX` that round up past the largest finite `f64`.
    pub fn to_raw_hist(&self) -> RawHist {
        let mut locations: Vec<f64> = self
            .iter()
            .filter_map(|(key, _)| {
                let value = key.value();
                if value.is_none() {
                    debug!("skipping undecodable bin {key:?}");
                }
                value
            })
            .collect();
        locations.sort_by(f64::total_cmp);

        // weights are read back through a fresh projection of each location,
        // which finds the original bin because projection round-trips
        let weights = locations.iter().map(|&location| self.read(location)).collect();

        RawHist { locations, weights }
    }

    /// Create new `Histogram` from interchange form at any resolution.
    ///
    /// Entries beyond the length of the shorter array are ignored.
    pub fn from_raw_hist(raw: &RawHist, resolution: usize) -> Histogram {
        let mut histogram = Histogram::new(resolution);
        for (&location, &weight) in raw.locations.iter().zip(&raw.weights) {
            histogram.insert(location, weight);
        }
        histogram
    }

    /// Serialize `Histogram` into bytes. The resolution is not part of the encoding.
    pub fn serialize(&self) -> Vec<u8> {
        encoding::encode(&self.to_raw_hist())
    }

    /// Deserialize bytes produced by `serialize` into `Histogram` of given resolution
    pub fn deserialize(bytes: &[u8], resolution: usize) -> Result<Histogram, Error> {
        let raw = encoding::decode(bytes)?;
        Ok(Self::from_raw_hist(&raw, resolution))
    }

    /// Deserialize as much of `bytes` as possible.
    ///
    /// Returns the histogram built from every bin decoded before a failure, along with
    /// the failure. The histogram can only be trusted when no error is returned.
    pub fn deserialize_partial(bytes: &[u8], resolution: usize) -> (Histogram, Option<Error>) {
        let (raw, result) = encoding::decode_partial(bytes);
        (Self::from_raw_hist(&raw, resolution), result.err())
    }

    /// Return memory size of `Histogram`
    pub fn size_of(&self) -> usize {
        size_of::<Self>() + self.registers.heap_size()
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLUTION)
    }
}

impl PartialEq for Histogram {
    /// Compare histograms bin by bin, regardless of their representation
    fn eq(&self, rhs: &Self) -> bool {
        self.resolution == rhs.resolution
            && self.len() == rhs.len()
            && self
                .iter()
                .all(|(key, weight)| rhs.registers.get(&key) == Some(weight))
    }
}

impl Debug for Histogram {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ resolution: {}, representation: {}, bins: {}, total: {} }}",
            self.resolution,
            self.registers.name(),
            self.len(),
            self.total()
        )
    }
}
