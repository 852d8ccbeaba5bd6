//! Binary record format of a histogram.
//!
//! The record holds the interchange form ([`RawHist`]) of a histogram, not its bins:
//! - byte 0        - format version (currently `1`)
//! - next 1..10    - number of pairs `N` as unsigned LEB128 varint
//! - next N * 16   - `N` pairs of location and weight, both `f64` little-endian
//!
//! Resolution is not recorded, the decoding side supplies its own.

use log::debug;

use crate::histogram::RawHist;
use crate::Error;

/// Version byte leading every record
pub(crate) const FORMAT_VERSION: u8 = 1;
/// Encoded length of a single (location, weight) pair
const PAIR_LEN: usize = 16;
/// Maximum encoded length of a `u64` varint
const MAX_VAR_LEN_64: usize = 10;

/// Encode interchange form into a binary record
pub(crate) fn encode(raw: &RawHist) -> Vec<u8> {
    let len = raw.locations.len().min(raw.weights.len());
    let mut out = Vec::with_capacity(1 + MAX_VAR_LEN_64 + len * PAIR_LEN);
    out.push(FORMAT_VERSION);
    encode_var_u64(&mut out, len as u64);
    for (location, weight) in raw.locations.iter().zip(&raw.weights) {
        write_f64_le(&mut out, *location);
        write_f64_le(&mut out, *weight);
    }
    out
}

/// Decode a binary record into interchange form
pub(crate) fn decode(input: &[u8]) -> Result<RawHist, Error> {
    let (raw, result) = decode_partial(input);
    result.map(|()| raw)
}

/// Decode a binary record, keeping every pair read before a failure
pub(crate) fn decode_partial(mut input: &[u8]) -> (RawHist, Result<(), Error>) {
    let mut raw = RawHist::default();
    let result = decode_into(&mut input, &mut raw);
    if let Err(err) = &result {
        debug!(
            "histogram record decode failed after {} pairs: {err}",
            raw.locations.len()
        );
    }
    (raw, result)
}

fn decode_into(input: &mut &[u8], raw: &mut RawHist) -> Result<(), Error> {
    let version = read_byte(input)?;
    if version != FORMAT_VERSION {
        return Err(Error::UnsupportedVersion(version));
    }

    let len = decode_var_u64(input)?;
    // the declared length is not trusted for allocation
    let capacity = usize::try_from(len)
        .unwrap_or(usize::MAX)
        .min(input.len() / PAIR_LEN);
    raw.locations.reserve(capacity);
    raw.weights.reserve(capacity);

    for _ in 0..len {
        let location = read_f64_le(input)?;
        let weight = read_f64_le(input)?;
        raw.locations.push(location);
        raw.weights.push(weight);
    }

    if !input.is_empty() {
        return Err(Error::TrailingBytes(input.len()));
    }
    Ok(())
}

fn encode_var_u64(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

fn decode_var_u64(input: &mut &[u8]) -> Result<u64, Error> {
    let mut value: u64 = 0;
    let mut shift: u32 = 0;
    loop {
        let next = read_byte(input)?;
        let bits = u64::from(next & 0x7F);
        if shift > 63 || (shift == 63 && bits > 1) {
            return Err(Error::VarIntOverflow);
        }
        value |= bits << shift;
        if next < 0x80 {
            return Ok(value);
        }
        shift += 7;
    }
}

fn read_byte(input: &mut &[u8]) -> Result<u8, Error> {
    match input.split_first() {
        Some((&byte, rest)) => {
            *input = rest;
            Ok(byte)
        }
        None => Err(Error::UnexpectedEof),
    }
}

fn write_f64_le(out: &mut Vec<u8>, value: f64) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn read_f64_le(input: &mut &[u8]) -> Result<f64, Error> {
    if input.len() < 8 {
        return Err(Error::UnexpectedEof);
    }
    let (bytes, rest) = input.split_at(8);
    *input = rest;
    let mut arr = [0u8; 8];
    arr.copy_from_slice(bytes);
    Ok(f64::from_le_bytes(arr))
}
