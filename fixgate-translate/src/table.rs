/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Declarative translation table.
//!
//! Every cross-schema correspondence is data, not code: enumerated code
//! pairs and the two price scales are declared here and looked up by the
//! translator. Scales are never inferred from values.

use smallvec::SmallVec;

/// Code and scale correspondences between the session and exchange schemas.
#[derive(Debug, Clone)]
pub struct TranslationTable {
    /// (session code, exchange code) pairs for the side field.
    side_pairs: SmallVec<[(u8, u8); 4]>,
    /// Price scale on the session side.
    session_price_scale: u32,
    /// Price scale on the exchange side.
    exchange_price_scale: u32,
}

impl TranslationTable {
    /// Creates a table with the given price scales and no code pairs.
    #[must_use]
    pub fn new(session_price_scale: u32, exchange_price_scale: u32) -> Self {
        Self {
            side_pairs: SmallVec::new(),
            session_price_scale,
            exchange_price_scale,
        }
    }

    /// Adds one side-code correspondence.
    #[must_use]
    pub fn with_side_pair(mut self, session: u8, exchange: u8) -> Self {
        self.side_pairs.push((session, exchange));
        self
    }

    /// The standard dialect pair: 2-decimal session prices, 4-decimal
    /// exchange prices, FIX-style sides mapped to exchange letters.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(
            fixgate_schema::SESSION_PRICE_SCALE,
            fixgate_schema::EXCHANGE_PRICE_SCALE,
        )
        .with_side_pair(b'1', b'B')
        .with_side_pair(b'2', b'S')
    }

    /// Maps a session side code to its exchange counterpart.
    #[must_use]
    pub fn side_to_exchange(&self, session: u8) -> Option<u8> {
        self.side_pairs
            .iter()
            .find(|&&(s, _)| s == session)
            .map(|&(_, x)| x)
    }

    /// Maps an exchange side code to its session counterpart.
    #[must_use]
    pub fn side_to_session(&self, exchange: u8) -> Option<u8> {
        self.side_pairs
            .iter()
            .find(|&&(_, x)| x == exchange)
            .map(|&(s, _)| s)
    }

    /// Price scale on the session side.
    #[inline]
    #[must_use]
    pub const fn session_price_scale(&self) -> u32 {
        self.session_price_scale
    }

    /// Price scale on the exchange side.
    #[inline]
    #[must_use]
    pub const fn exchange_price_scale(&self) -> u32 {
        self.exchange_price_scale
    }
}

impl Default for TranslationTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_side_pairs() {
        let table = TranslationTable::standard();
        assert_eq!(table.side_to_exchange(b'1'), Some(b'B'));
        assert_eq!(table.side_to_exchange(b'2'), Some(b'S'));
        assert_eq!(table.side_to_session(b'B'), Some(b'1'));
        assert_eq!(table.side_to_session(b'S'), Some(b'2'));
        assert_eq!(table.side_to_exchange(b'3'), None);
        assert_eq!(table.side_to_session(b'X'), None);
    }

    #[test]
    fn test_standard_scales() {
        let table = TranslationTable::standard();
        assert_eq!(table.session_price_scale(), 100);
        assert_eq!(table.exchange_price_scale(), 10_000);
    }
}
