//! ## Array representation
//! Stores up to `MAX_CAPACITY` bins of a small histogram.
//!
//! Bins are kept in insertion order as `(key, weight)` pairs and found by linear search.
//! A new histogram starts with an empty array, which owns no heap memory until the first
//! insert.

use std::mem::size_of;

use crate::projection::Key;
use crate::representation::RepresentationTrait;

/// Maximum number of bins stored in array representation
pub(crate) const MAX_CAPACITY: usize = 16;

/// Array representation container
#[derive(Clone, Debug, Default)]
pub(crate) struct Array {
    bins: Vec<(Key, f64)>,
}

impl Array {
    /// Return bins stored within `Array` representation
    #[inline]
    pub(crate) fn bins(&self) -> &[(Key, f64)] {
        &self.bins
    }

    #[inline]
    fn position(&self, key: &Key) -> Option<usize> {
        self.bins.iter().position(|(k, _)| k == key)
    }
}

impl RepresentationTrait for Array {
    #[inline]
    fn get(&self, key: &Key) -> Option<f64> {
        self.position(key).map(|idx| self.bins[idx].1)
    }

    /// Insert weight into `Array` representation.
    /// Returns false when `key` is new and the array is already full.
    #[inline]
    fn try_insert(&mut self, key: Key, weight: f64) -> bool {
        if let Some(idx) = self.position(&key) {
            self.bins[idx].1 += weight;
            return true;
        }

        if self.bins.len() < MAX_CAPACITY {
            self.bins.push((key, weight));
            return true;
        }

        false
    }

    #[inline]
    fn len(&self) -> usize {
        self.bins.len()
    }

    #[inline]
    fn heap_size(&self) -> usize {
        self.bins.capacity() * size_of::<(Key, f64)>()
    }
}
