/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Core types for the fixgate protocol bridge.
//!
//! This module provides fundamental types used throughout the bridge:
//! - [`SeqNum`]: Session-protocol sequence number
//! - [`SessionId`]: Logical session identifier
//! - [`Symbol`] / [`OrderId`]: Bounded identifier strings
//! - [`Side`]: Semantic order side
//! - [`Price`]: Scaled-integer price in ticks
//! - [`Timestamp`]: Frame arrival timestamp

use arrayvec::ArrayString;
use chrono::{DateTime, Utc};
use num_derive::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length for session identifiers in bytes.
pub const SESSION_ID_MAX_LEN: usize = 32;

/// Maximum length for order identifiers and symbols in bytes.
///
/// Sized to hold the widest identifier either wire format carries (the
/// 14-byte binary order token with headroom for text-side ClOrdIDs).
pub const IDENT_MAX_LEN: usize = 16;

/// Session-protocol message sequence number.
///
/// Sequence numbers are unsigned 64-bit integers that identify messages
/// within a logical session. They start at 1 and increment for each message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct SeqNum(u64);

impl SeqNum {
    /// Creates a new sequence number.
    ///
    /// # Arguments
    /// * `value` - The sequence number value (>= 1 for valid messages)
    #[inline]
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw sequence number value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the next sequence number.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Checks if this sequence number is valid (>= 1).
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 >= 1
    }
}

impl Default for SeqNum {
    fn default() -> Self {
        Self(1)
    }
}

impl From<u64> for SeqNum {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<SeqNum> for u64 {
    fn from(seq: SeqNum) -> Self {
        seq.0
    }
}

impl fmt::Display for SeqNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a logical session.
///
/// Sessions are created and destroyed by external lifecycle signals; the
/// bridge keys its sequence state on this identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct SessionId(ArrayString<SESSION_ID_MAX_LEN>);

impl SessionId {
    /// Creates a new session identifier from a string slice.
    ///
    /// # Returns
    /// `Some(SessionId)` if the string fits within the maximum length,
    /// `None` otherwise.
    #[must_use]
    pub fn new(s: &str) -> Option<Self> {
        ArrayString::from(s).ok().map(Self)
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = arrayvec::CapacityError<()>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArrayString::try_from(s)
            .map(Self)
            .map_err(|_| arrayvec::CapacityError::new(()))
    }
}

/// Bounded identifier string used for symbols and order identifiers.
///
/// Values never exceed [`IDENT_MAX_LEN`] bytes; per-field wire widths are
/// narrower and enforced by the codecs and the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Ident(ArrayString<IDENT_MAX_LEN>);

/// Instrument symbol.
pub type Symbol = Ident;

/// Client order identifier / exchange order token.
pub type OrderId = Ident;

impl Ident {
    /// Creates a new identifier from a string slice.
    ///
    /// # Returns
    /// `Some(Ident)` if the string fits within [`IDENT_MAX_LEN`], `None`
    /// otherwise.
    #[must_use]
    pub fn new(s: &str) -> Option<Self> {
        ArrayString::from(s).ok().map(Self)
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the length of the identifier in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the identifier is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for Ident {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Ident {
    type Err = arrayvec::CapacityError<()>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArrayString::try_from(s)
            .map(Self)
            .map_err(|_| arrayvec::CapacityError::new(()))
    }
}

/// Semantic order side.
///
/// Wire codes differ between the two protocols (`'1'`/`'2'` on the text
/// side, `'B'`/`'S'` on the binary side); messages carry the wire code and
/// the translator maps between them. This enum exists for callers that
/// want the semantic reading of a code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive, ToPrimitive,
)]
#[repr(u8)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order.
    Buy = 1,
    /// Sell order.
    Sell = 2,
}

impl Side {
    /// Interprets a text-protocol side code.
    #[must_use]
    pub const fn from_session_code(code: u8) -> Option<Self> {
        match code {
            b'1' => Some(Self::Buy),
            b'2' => Some(Self::Sell),
            _ => None,
        }
    }

    /// Interprets a binary-protocol side code.
    #[must_use]
    pub const fn from_exchange_code(code: u8) -> Option<Self> {
        match code {
            b'B' => Some(Self::Buy),
            b'S' => Some(Self::Sell),
            _ => None,
        }
    }

    /// Returns true if this is a buy order.
    #[must_use]
    pub const fn is_buy(self) -> bool {
        matches!(self, Self::Buy)
    }

    /// Returns true if this is a sell order.
    #[must_use]
    pub const fn is_sell(self) -> bool {
        matches!(self, Self::Sell)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "Buy"),
            Self::Sell => write!(f, "Sell"),
        }
    }
}

/// Price as an integer number of ticks at a declared scale.
///
/// A price of 150.00 at scale 100 is `raw = 15000`. Prices never pass
/// through floating point; rescaling between schemas uses exact integer
/// arithmetic and fails rather than rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price {
    /// Number of ticks.
    raw: i64,
    /// Ticks per display unit (e.g. 100 for two decimal places).
    scale: u32,
}

impl Price {
    /// Creates a price from a raw tick count and scale.
    ///
    /// # Arguments
    /// * `raw` - Number of ticks
    /// * `scale` - Ticks per display unit (must be a power of ten, > 0)
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: i64, scale: u32) -> Self {
        Self { raw, scale }
    }

    /// Returns the raw tick count.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.raw
    }

    /// Returns the scale (ticks per display unit).
    #[inline]
    #[must_use]
    pub const fn scale(self) -> u32 {
        self.scale
    }

    /// Rescales this price to a different tick size using exact integer
    /// arithmetic.
    ///
    /// # Returns
    /// `Some(price)` at the target scale, or `None` if the value is not
    /// representable exactly (never rounds) or the multiplication overflows.
    #[must_use]
    pub const fn rescale(self, target_scale: u32) -> Option<Self> {
        if self.scale == target_scale {
            return Some(self);
        }
        if target_scale > self.scale {
            let factor = (target_scale / self.scale) as i64;
            if target_scale % self.scale != 0 {
                return None;
            }
            match self.raw.checked_mul(factor) {
                Some(raw) => Some(Self {
                    raw,
                    scale: target_scale,
                }),
                None => None,
            }
        } else {
            if self.scale % target_scale != 0 {
                return None;
            }
            let factor = (self.scale / target_scale) as i64;
            if self.raw % factor != 0 {
                return None;
            }
            Some(Self {
                raw: self.raw / factor,
                scale: target_scale,
            })
        }
    }

    /// Parses a decimal display string (e.g. `"150.00"`) into a price at
    /// the given scale, using integer arithmetic only.
    ///
    /// The fractional part must not carry more precision than the scale
    /// allows; fewer digits are zero-extended.
    ///
    /// # Returns
    /// `Some(price)` on success, `None` for malformed or over-precise input.
    #[must_use]
    pub fn parse_display(s: &str, scale: u32) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.is_empty() {
            return None;
        }
        let (negative, rest) = match bytes[0] {
            b'-' => (true, &bytes[1..]),
            _ => (false, bytes),
        };
        if rest.is_empty() {
            return None;
        }

        let frac_digits = decimal_digits(scale)?;
        let mut int_part: i64 = 0;
        let mut frac_part: i64 = 0;
        let mut seen_dot = false;
        let mut frac_len: u32 = 0;
        let mut int_len: u32 = 0;

        for &b in rest {
            match b {
                b'.' if !seen_dot => seen_dot = true,
                b'0'..=b'9' => {
                    let digit = (b - b'0') as i64;
                    if seen_dot {
                        if frac_len >= frac_digits {
                            // More precision than the scale can hold.
                            return None;
                        }
                        frac_part = frac_part * 10 + digit;
                        frac_len += 1;
                    } else {
                        int_part = int_part.checked_mul(10)?.checked_add(digit)?;
                        int_len += 1;
                    }
                }
                _ => return None,
            }
        }
        if int_len == 0 || (seen_dot && frac_len == 0) {
            return None;
        }

        // Zero-extend a short fractional part to the full scale.
        let mut i = frac_len;
        while i < frac_digits {
            frac_part *= 10;
            i += 1;
        }

        let raw = int_part
            .checked_mul(scale as i64)?
            .checked_add(frac_part)?;
        Some(Self {
            raw: if negative { -raw } else { raw },
            scale,
        })
    }

    /// Formats this price as a decimal display string with the full
    /// fractional precision of its scale (e.g. `"150.00"` at scale 100).
    #[must_use]
    pub fn format_display(self) -> String {
        let frac_digits = decimal_digits(self.scale).unwrap_or(0) as usize;
        if frac_digits == 0 {
            return self.raw.to_string();
        }
        let scale = self.scale as i64;
        let sign = if self.raw < 0 { "-" } else { "" };
        let abs = self.raw.unsigned_abs();
        let int_part = abs / scale as u64;
        let frac_part = abs % scale as u64;
        format!("{sign}{int_part}.{frac_part:0frac_digits$}")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_display())
    }
}

/// Returns the number of decimal digits a power-of-ten scale carries,
/// or `None` for a scale that is not a power of ten.
const fn decimal_digits(scale: u32) -> Option<u32> {
    let mut s = scale;
    let mut digits = 0;
    if s == 0 {
        return None;
    }
    while s > 1 {
        if s % 10 != 0 {
            return None;
        }
        s /= 10;
        digits += 1;
    }
    Some(digits)
}

/// Frame arrival timestamp with nanosecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Nanoseconds since Unix epoch (1970-01-01 00:00:00 UTC).
    nanos_since_epoch: u64,
}

impl Timestamp {
    /// Creates a timestamp from nanoseconds since Unix epoch.
    #[inline]
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self {
            nanos_since_epoch: nanos,
        }
    }

    /// Returns the current UTC timestamp.
    #[inline]
    #[must_use]
    pub fn now() -> Self {
        let dt = Utc::now();
        Self {
            nanos_since_epoch: dt.timestamp_nanos_opt().unwrap_or(0) as u64,
        }
    }

    /// Returns nanoseconds since Unix epoch.
    #[inline]
    #[must_use]
    pub const fn as_nanos(self) -> u64 {
        self.nanos_since_epoch
    }

    /// Returns milliseconds since Unix epoch.
    #[inline]
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.nanos_since_epoch / 1_000_000
    }

    /// Converts to a chrono `DateTime<Utc>`.
    #[must_use]
    pub fn to_datetime(self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.nanos_since_epoch as i64)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            nanos_since_epoch: dt.timestamp_nanos_opt().unwrap_or(0) as u64,
        }
    }
}
