/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Session-protocol checksum.
//!
//! The trailing checksum field carries the modulo-256 sum of every byte of
//! the frame up to and excluding the checksum field itself (separators
//! included), formatted as a fixed-width 3-digit decimal.

/// Width of the formatted checksum value in bytes.
pub const CHECKSUM_WIDTH: usize = 3;

/// Calculates the modulo-256 checksum of the given bytes.
///
/// # Arguments
/// * `data` - Frame bytes up to and excluding the checksum field
#[inline]
#[must_use]
pub fn calculate_checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Formats a checksum value as a 3-digit zero-padded decimal.
///
/// # Arguments
/// * `checksum` - The checksum value (0-255)
#[inline]
#[must_use]
pub fn format_checksum(checksum: u8) -> [u8; CHECKSUM_WIDTH] {
    [
        b'0' + checksum / 100,
        b'0' + (checksum / 10) % 10,
        b'0' + checksum % 10,
    ]
}

/// Parses a fixed-width 3-digit checksum value.
///
/// # Returns
/// `Some(checksum)` for exactly three ASCII digits in range, `None`
/// otherwise.
#[inline]
#[must_use]
pub fn parse_checksum(bytes: &[u8]) -> Option<u8> {
    let [d0, d1, d2]: [u8; CHECKSUM_WIDTH] = bytes.try_into().ok()?;
    if !(d0.is_ascii_digit() && d1.is_ascii_digit() && d2.is_ascii_digit()) {
        return None;
    }
    let value = u16::from(d0 - b'0') * 100 + u16::from(d1 - b'0') * 10 + u16::from(d2 - b'0');
    u8::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_checksum() {
        assert_eq!(calculate_checksum(b""), 0);
        let expected = ((b'A' as u32 + b'B' as u32 + b'C' as u32) % 256) as u8;
        assert_eq!(calculate_checksum(b"ABC"), expected);
    }

    #[test]
    fn test_calculate_checksum_wraps() {
        let data = vec![255u8; 1000];
        assert_eq!(calculate_checksum(&data), ((255u32 * 1000) % 256) as u8);
    }

    #[test]
    fn test_format_checksum() {
        assert_eq!(format_checksum(0), *b"000");
        assert_eq!(format_checksum(42), *b"042");
        assert_eq!(format_checksum(255), *b"255");
    }

    #[test]
    fn test_parse_checksum() {
        assert_eq!(parse_checksum(b"000"), Some(0));
        assert_eq!(parse_checksum(b"042"), Some(42));
        assert_eq!(parse_checksum(b"255"), Some(255));
    }

    #[test]
    fn test_parse_checksum_invalid() {
        assert_eq!(parse_checksum(b""), None);
        assert_eq!(parse_checksum(b"42"), None);
        assert_eq!(parse_checksum(b"0420"), None);
        assert_eq!(parse_checksum(b"abc"), None);
        // 300 does not fit a u8.
        assert_eq!(parse_checksum(b"300"), None);
    }

    #[test]
    fn test_format_parse_roundtrip() {
        for i in 0..=255u8 {
            assert_eq!(parse_checksum(&format_checksum(i)), Some(i));
        }
    }
}
