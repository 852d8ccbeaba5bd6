use std::collections::hash_map;
use std::slice;

use enum_dispatch::enum_dispatch;

use crate::array::Array;
use crate::map::Map;
use crate::projection::Key;

/// Representation types of histogram registers
#[derive(Clone, Debug)]
#[enum_dispatch]
pub(crate) enum Representation {
    Array(Array),
    Map(Map),
}

/// Representation trait which must be implemented by all representations.
#[enum_dispatch(Representation)]
pub(crate) trait RepresentationTrait {
    /// Return weight accumulated under `key`, if the bin exists
    fn get(&self, key: &Key) -> Option<f64>;
    /// Add `weight` to the bin under `key`, creating the bin if needed.
    /// Returns false if the bin is new and the representation has no room for it.
    fn try_insert(&mut self, key: Key, weight: f64) -> bool;
    /// Return number of bins
    fn len(&self) -> usize;
    /// Return number of heap bytes held by the representation
    fn heap_size(&self) -> usize;
}

impl Default for Representation {
    /// Start with an empty array, which does not allocate
    #[inline]
    fn default() -> Self {
        Representation::Array(Array::default())
    }
}

impl Representation {
    /// Add `weight` to the bin under `key`, upgrading a full array to a map.
    #[inline]
    pub(crate) fn insert(&mut self, key: Key, weight: f64) {
        if self.try_insert(key, weight) {
            return;
        }

        let mut map = match self {
            Representation::Array(arr) => Map::from(arr.bins()),
            Representation::Map(_) => return,
        };
        map.try_insert(key, weight);
        *self = map.into();
    }

    /// Iterate over `(key, weight)` pairs in unspecified order
    #[inline]
    pub(crate) fn iter(&self) -> Iter<'_> {
        match self {
            Representation::Array(arr) => Iter::Array(arr.bins().iter()),
            Representation::Map(map) => Iter::Map(map.bins().iter()),
        }
    }

    /// Return name of the representation type
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Representation::Array(_) => "Array",
            Representation::Map(_) => "Map",
        }
    }
}

/// Iterator over the bins of any representation
pub(crate) enum Iter<'a> {
    Array(slice::Iter<'a, (Key, f64)>),
    Map(hash_map::Iter<'a, Key, f64>),
}

impl Iterator for Iter<'_> {
    type Item = (Key, f64);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Iter::Array(it) => it.next().copied(),
            Iter::Map(it) => it.next().map(|(&key, &weight)| (key, weight)),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Iter::Array(it) => it.size_hint(),
            Iter::Map(it) => it.size_hint(),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::array::MAX_CAPACITY;
    use crate::projection::project;
    use test_case::test_case;

    #[test_case(0 => "Array")]
    #[test_case(1 => "Array")]
    #[test_case(MAX_CAPACITY => "Array")]
    #[test_case(MAX_CAPACITY + 1 => "Map")]
    #[test_case(1000 => "Map")]
    fn test_upgrade(n: usize) -> &'static str {
        let mut registers = Representation::default();
        for i in 0..n {
            registers.insert(project(3, i as f64), 1.0);
        }
        assert_eq!(registers.len(), n);
        assert_eq!(registers.iter().count(), n);
        for i in 0..n {
            assert_eq!(registers.get(&project(3, i as f64)), Some(1.0));
        }
        registers.name()
    }

    #[test]
    fn test_upgrade_keeps_weights() {
        let mut registers = Representation::default();
        for i in 0..MAX_CAPACITY {
            registers.insert(project(2, i as f64), i as f64);
        }
        registers.insert(project(2, 5.0), 0.5);
        registers.insert(project(2, 99.0), 7.0);
        assert_eq!(registers.name(), "Map");
        assert_eq!(registers.get(&project(2, 5.0)), Some(5.5));
        assert_eq!(registers.get(&project(2, 99.0)), Some(7.0));
        assert_eq!(registers.get(&project(2, 0.0)), Some(0.0));
    }
}
