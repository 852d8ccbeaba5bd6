//! # Serde module for Histogram
//!
//! This module provides serde-based (serialization and deserialization) features for
//! `Histogram`. It uses `serde`'s custom serialization and deserialization mechanisms.
//!
//! `Histogram` is serialized through its interchange form, as a tuple of
//! `(resolution, locations, weights)`. Deserialization rebuilds the histogram by
//! re-inserting every location at the recorded resolution, rejecting tuples whose
//! two sequences differ in length.
//!
//! Refer to the serde documentation for more details on custom serialization and deserialization:
//! - [Serialization](https://serde.rs/impl-serialize.html)
//! - [Deserialization](https://serde.rs/impl-deserialize.html)
use serde::de::Error;
use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize};

use crate::histogram::{Histogram, RawHist};

impl Serialize for Histogram {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let raw = self.to_raw_hist();

        let mut tup = serializer.serialize_tuple(3)?;
        tup.serialize_element(&self.resolution())?;
        tup.serialize_element(&raw.locations)?;
        tup.serialize_element(&raw.weights)?;
        tup.end()
    }
}

impl<'de> Deserialize<'de> for Histogram {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (resolution, locations, weights): (usize, Vec<f64>, Vec<f64>) =
            Deserialize::deserialize(deserializer)?;
        if locations.len() != weights.len() {
            return Err(Error::custom(format!(
                "{} locations but {} weights",
                locations.len(),
                weights.len()
            )));
        }
        Ok(Histogram::from_raw_hist(
            &RawHist { locations, weights },
            resolution,
        ))
    }
}
