//! ## Projection
//! Maps a real value onto the bin it is accumulated in.
//!
//! A value is rounded to `resolution + 1` significant decimal digits in scientific
//! notation, so every order of magnitude holds at most `9 * 10^resolution` bins per sign.
//! All values rounding to the same significand and exponent share a bin.
//!
//! Bins are identified by [`Key`], an integer encoding of:
//! - the sign of the value (negative zero is its own bin)
//! - the resolution the key was projected at
//! - the rounded significand as an integer of `resolution + 1` digits
//! - the decimal exponent
//!
//! Non-finite values get sentinel keys: every NaN shares one bin, and each infinity
//! has its own.
//!
//! The text form of a key is the fixed `d.ddde±XX` notation with at least two exponent
//! digits, e.g. `1.23e+02` for 123.3 at resolution 2, and `NaN`, `+Inf`, `-Inf` for the
//! sentinels. Two keys are equal exactly when their text forms are.

use std::fmt::{self, Display, Formatter, Write};
use std::str::FromStr;

use log::debug;

use crate::Error;

/// Highest resolution whose significand is kept as an integer. 17 significant digits
/// tell every `f64` apart, so higher resolutions bucket exactly like this one.
pub const MAX_EXACT_RESOLUTION: usize = 16;

/// Length of the stack buffer used when formatting or parsing a finite key.
const BUF_LEN: usize = 48;

/// Canonical identifier of a histogram bin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Key(Repr);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Repr {
    Finite {
        negative: bool,
        precision: u16,
        digits: u64,
        exponent: i16,
    },
    Infinite {
        negative: bool,
    },
    NaN,
}

/// Project `value` onto its bin key at `resolution` significant fractional digits.
#[inline]
pub fn project(resolution: usize, value: f64) -> Key {
    if value.is_nan() {
        return Key(Repr::NaN);
    }
    if value.is_infinite() {
        return Key(Repr::Infinite {
            negative: value < 0.0,
        });
    }

    let Some((digits, exponent)) = round_significand(exact_precision(resolution), value.abs())
    else {
        debug!("failed to round {value:e} at resolution {resolution}");
        return Key(Repr::NaN);
    };

    Key(Repr::Finite {
        negative: value.is_sign_negative(),
        precision: u16::try_from(resolution).unwrap_or(u16::MAX),
        digits,
        exponent,
    })
}

impl Key {
    /// Return the value the key stands for, i.e. the center of its bin.
    ///
    /// Projecting the returned value at the key's resolution yields the key again.
    /// Returns `None` if the key can not be decoded back into a value, which happens
    /// when a value close to `f64::MAX` rounds up past the largest finite `f64`
    /// (e.g. `2e+308` at resolution 0).
    #[inline]
    pub fn value(&self) -> Option<f64> {
        let value = self.saturating_value()?;
        match self.0 {
            Repr::Finite { .. } if !value.is_finite() => None,
            _ => Some(value),
        }
    }

    /// Like [`Key::value`], but a finite key beyond the range of `f64` decodes to the
    /// infinity of its sign.
    #[inline]
    pub(crate) fn saturating_value(&self) -> Option<f64> {
        match self.0 {
            Repr::NaN => Some(f64::NAN),
            Repr::Infinite { negative: false } => Some(f64::INFINITY),
            Repr::Infinite { negative: true } => Some(f64::NEG_INFINITY),
            Repr::Finite {
                negative,
                precision,
                digits,
                exponent,
            } => {
                let scale = i32::from(exponent) - exact_precision(usize::from(precision)) as i32;
                let mut buf = StackBuf::new();
                let sign = if negative { "-" } else { "" };
                write!(buf, "{sign}{digits}e{scale}").ok()?;
                buf.as_str().parse().ok()
            }
        }
    }

    /// Return whether the key is the bin shared by all NaN values.
    #[inline]
    pub fn is_nan(&self) -> bool {
        matches!(self.0, Repr::NaN)
    }

    /// Significand digits and exponent used by the text form.
    fn text_parts(&self, precision: usize, digits: u64, exponent: i16) -> Option<(String, i16)> {
        if precision <= MAX_EXACT_RESOLUTION {
            return Some((format!("{:0width$}", digits, width = precision + 1), exponent));
        }
        // digits past the 17th come from the exact binary expansion
        let magnitude = self.value()?.abs();
        let text = format!("{:.*e}", precision, magnitude);
        let (mantissa, exponent) = text.split_once('e')?;
        Some((mantissa.replace('.', ""), exponent.parse().ok()?))
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Repr::NaN => f.write_str("NaN"),
            Repr::Infinite { negative: false } => f.write_str("+Inf"),
            Repr::Infinite { negative: true } => f.write_str("-Inf"),
            Repr::Finite {
                negative,
                precision,
                digits,
                exponent,
            } => {
                let (significand, exponent) = self
                    .text_parts(usize::from(precision), digits, exponent)
                    .ok_or(fmt::Error)?;
                if negative {
                    f.write_char('-')?;
                }
                let (lead, fraction) = significand.split_at(1);
                f.write_str(lead)?;
                if !fraction.is_empty() {
                    f.write_char('.')?;
                    f.write_str(fraction)?;
                }
                let sign = if exponent < 0 { '-' } else { '+' };
                write!(f, "e{sign}{:02}", exponent.unsigned_abs())
            }
        }
    }
}

impl FromStr for Key {
    type Err = Error;

    /// Parse the text form of a key. Only canonical text is accepted: parsing must
    /// reproduce the exact input when the key is displayed again.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidKey(s.to_string());
        let resolution = s
            .split_once('e')
            .and_then(|(mantissa, _)| mantissa.split_once('.'))
            .map_or(0, |(_, fraction)| fraction.len());
        let value: f64 = match s {
            "NaN" => f64::NAN,
            "+Inf" => f64::INFINITY,
            "-Inf" => f64::NEG_INFINITY,
            _ => s.parse().map_err(|_| invalid())?,
        };

        let key = project(resolution, value);
        if key.to_string() != s {
            return Err(invalid());
        }
        Ok(key)
    }
}

#[inline]
fn exact_precision(resolution: usize) -> usize {
    resolution.min(MAX_EXACT_RESOLUTION)
}

/// Round a non-negative finite `magnitude` to `precision + 1` significant digits and
/// return the digits as an integer along with the decimal exponent.
#[inline]
fn round_significand(precision: usize, magnitude: f64) -> Option<(u64, i16)> {
    let mut buf = StackBuf::new();
    write!(buf, "{:.*e}", precision, magnitude).ok()?;
    let (mantissa, exponent) = buf.as_str().split_once('e')?;

    let mut digits: u64 = 0;
    for b in mantissa.bytes().filter(|&b| b != b'.') {
        if !b.is_ascii_digit() {
            return None;
        }
        digits = digits.checked_mul(10)?.checked_add(u64::from(b - b'0'))?;
    }
    Some((digits, exponent.parse().ok()?))
}

/// Fixed-capacity formatting target, so that projecting a value does not allocate.
struct StackBuf {
    buf: [u8; BUF_LEN],
    len: usize,
}

impl StackBuf {
    #[inline]
    fn new() -> Self {
        Self {
            buf: [0; BUF_LEN],
            len: 0,
        }
    }

    #[inline]
    fn as_str(&self) -> &str {
        // only whole `str`s are ever written into the buffer
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }
}

impl Write for StackBuf {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        if end > BUF_LEN {
            return Err(fmt::Error);
        }
        self.buf[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}
