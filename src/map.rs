//! ## Map representation
//! Stores any number of bins once a histogram outgrows the array representation.
//! Keys are hashed with `WyHash`.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use std::mem::size_of;

use wyhash::WyHash;

use crate::projection::Key;
use crate::representation::RepresentationTrait;

pub(crate) type Bins = HashMap<Key, f64, BuildHasherDefault<WyHash>>;

/// Map representation container
#[derive(Clone, Debug, Default)]
pub(crate) struct Map {
    bins: Bins,
}

impl Map {
    /// Return bins stored within `Map` representation
    #[inline]
    pub(crate) fn bins(&self) -> &Bins {
        &self.bins
    }
}

impl From<&[(Key, f64)]> for Map {
    /// Create new instance of `Map` from the bins of a full array
    fn from(items: &[(Key, f64)]) -> Self {
        let mut bins = Bins::with_capacity_and_hasher(items.len() * 2, Default::default());
        bins.extend(items.iter().copied());
        Self { bins }
    }
}

impl RepresentationTrait for Map {
    #[inline]
    fn get(&self, key: &Key) -> Option<f64> {
        self.bins.get(key).copied()
    }

    /// Insert weight into `Map` representation, which always has room for it.
    #[inline]
    fn try_insert(&mut self, key: Key, weight: f64) -> bool {
        match self.bins.entry(key) {
            Entry::Occupied(mut entry) => *entry.get_mut() += weight,
            Entry::Vacant(entry) => {
                entry.insert(weight);
            }
        }
        true
    }

    #[inline]
    fn len(&self) -> usize {
        self.bins.len()
    }

    /// Approximate heap footprint: one slot plus one control byte per bucket
    #[inline]
    fn heap_size(&self) -> usize {
        self.bins.capacity() * (size_of::<(Key, f64)>() + 1)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::projection::project;

    #[test]
    fn test_from_array_bins() {
        let items: Vec<(Key, f64)> = (0..4).map(|i| (project(1, i as f64), 0.5)).collect();
        let mut map = Map::from(items.as_slice());
        assert_eq!(map.len(), 4);
        assert!(map.heap_size() > 0);

        assert!(map.try_insert(project(1, 2.0), 1.0));
        assert!(map.try_insert(project(1, 7.0), -1.0));
        assert_eq!(map.get(&project(1, 2.0)), Some(1.5));
        assert_eq!(map.get(&project(1, 7.0)), Some(-1.0));
        assert_eq!(map.get(&project(1, 8.0)), None);
        assert_eq!(map.bins().len(), 5);
    }
}
