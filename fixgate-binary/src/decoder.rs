/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema-driven fixed-layout decoder.
//!
//! Binary frames carry no length or checksum field: the first byte selects
//! the message spec and the spec alone dictates the frame width and every
//! field's offset. A frame narrower than its spec is truncated; a wider
//! one is a length mismatch. Frames are width-exact by contract.

use fixgate_core::error::DecodeError;
use fixgate_core::message::{FieldMap, FieldValue, SemanticMessage};
use fixgate_core::types::{Ident, Price};
use fixgate_schema::SchemaRegistry;
use fixgate_schema::spec::{FieldSpec, SemanticType};

/// Pad byte for fixed-width text fields.
pub const TEXT_PAD: u8 = b' ';

/// Schema-driven decoder for the binary exchange protocol.
#[derive(Debug)]
pub struct Decoder<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> Decoder<'r> {
    /// Creates a decoder over the given schema registry.
    #[must_use]
    pub const fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Decodes one complete frame into a semantic message.
    ///
    /// Binary frames never carry a sequence number, so the decoded message
    /// has none assigned.
    ///
    /// # Errors
    /// Returns `UnknownMessageType` for an unregistered type byte,
    /// `Truncated` or `LengthMismatch` when the frame width disagrees with
    /// the spec, or `InvalidFieldValue` for an unconvertible field.
    pub fn decode(&self, input: &[u8]) -> Result<SemanticMessage, DecodeError> {
        let &type_byte = input.first().ok_or(DecodeError::Truncated {
            needed: 1,
            available: 0,
        })?;
        let spec = self
            .registry
            .by_type_byte(type_byte)
            .ok_or(DecodeError::UnknownMessageType(type_byte))?;

        if input.len() < spec.wire_size {
            return Err(DecodeError::Truncated {
                needed: spec.wire_size,
                available: input.len(),
            });
        }
        if input.len() > spec.wire_size {
            return Err(DecodeError::LengthMismatch {
                declared: spec.wire_size,
                actual: input.len(),
            });
        }

        let mut fields = FieldMap::new();
        for field_spec in spec.fields() {
            let Some((offset, width)) = field_spec.fixed() else {
                continue;
            };
            let raw = &input[offset..offset + width];
            fields.insert(field_spec.name, convert_value(field_spec, raw)?);
        }

        SemanticMessage::from_fields(spec.kind, &fields)
    }
}

/// Converts one fixed-width slice to its semantic type.
fn convert_value(spec: &FieldSpec, raw: &[u8]) -> Result<FieldValue, DecodeError> {
    match spec.semantic {
        SemanticType::UInt => read_uint(spec, raw).map(FieldValue::UInt),
        SemanticType::Price { scale } => {
            let ticks = read_uint(spec, raw)?;
            let ticks = i64::try_from(ticks).map_err(|_| invalid(spec, "price out of range"))?;
            Ok(FieldValue::Price(Price::from_raw(ticks, scale)))
        }
        SemanticType::Text => {
            let trimmed = trim_padding(raw);
            let text = std::str::from_utf8(trimmed)
                .map_err(|_| DecodeError::InvalidUtf8(spec.name.to_string()))?;
            Ident::new(text)
                .map(FieldValue::Text)
                .ok_or_else(|| invalid(spec, "exceeds identifier capacity"))
        }
        SemanticType::Code => match raw {
            [code] => Ok(FieldValue::Code(*code)),
            _ => Err(invalid(spec, "expected single-byte code")),
        },
    }
}

/// Reads a big-endian unsigned integer of 1, 2, 4, or 8 bytes.
fn read_uint(spec: &FieldSpec, raw: &[u8]) -> Result<u64, DecodeError> {
    match raw.len() {
        1 => Ok(u64::from(raw[0])),
        2 => Ok(u64::from(u16::from_be_bytes([raw[0], raw[1]]))),
        4 => Ok(u64::from(u32::from_be_bytes([
            raw[0], raw[1], raw[2], raw[3],
        ]))),
        8 => Ok(u64::from_be_bytes([
            raw[0], raw[1], raw[2], raw[3], raw[4], raw[5], raw[6], raw[7],
        ])),
        _ => Err(invalid(spec, "unsupported integer width")),
    }
}

/// Strips trailing pad bytes from a fixed-width text field.
#[must_use]
pub fn trim_padding(raw: &[u8]) -> &[u8] {
    let end = raw
        .iter()
        .rposition(|&b| b != TEXT_PAD)
        .map_or(0, |pos| pos + 1);
    &raw[..end]
}

fn invalid(spec: &FieldSpec, reason: &str) -> DecodeError {
    DecodeError::InvalidFieldValue {
        field: spec.name,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixgate_core::message::{MessageBody, MsgKind};
    use fixgate_schema::EXCHANGE_PRICE_SCALE;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::standard()
    }

    /// Hand-built 32-byte order entry: ORD1, buy, 100 shares, AAPL,
    /// 150.00 at scale 10000.
    fn order_entry_frame() -> Vec<u8> {
        let mut frame = vec![0u8; 32];
        frame[0] = b'O';
        frame[1..15].copy_from_slice(b"ORD1          ");
        frame[15] = b'B';
        frame[16..20].copy_from_slice(&100u32.to_be_bytes());
        frame[20..28].copy_from_slice(b"AAPL    ");
        frame[28..32].copy_from_slice(&1_500_000u32.to_be_bytes());
        frame
    }

    #[test]
    fn test_decode_order_entry() {
        let registry = registry();
        let decoder = Decoder::new(&registry);
        let msg = decoder.decode(&order_entry_frame()).unwrap();

        assert_eq!(msg.kind(), MsgKind::NewOrder);
        assert_eq!(msg.seq(), None);
        match msg.body() {
            MessageBody::NewOrder(o) => {
                assert_eq!(o.client_order_id.as_str(), "ORD1");
                assert_eq!(o.side, b'B');
                assert_eq!(o.quantity, 100);
                assert_eq!(o.symbol.as_str(), "AAPL");
                assert_eq!(o.price.raw(), 1_500_000);
                assert_eq!(o.price.scale(), EXCHANGE_PRICE_SCALE);
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn test_decode_execution() {
        let registry = registry();
        let decoder = Decoder::new(&registry);
        let mut frame = vec![0u8; 31];
        frame[0] = b'E';
        frame[1..15].copy_from_slice(b"ORD1          ");
        frame[15..19].copy_from_slice(&40u32.to_be_bytes());
        frame[19..23].copy_from_slice(&1_499_500u32.to_be_bytes());
        frame[23..31].copy_from_slice(&777_001u64.to_be_bytes());

        let msg = decoder.decode(&frame).unwrap();
        match msg.body() {
            MessageBody::Execution(e) => {
                assert_eq!(e.client_order_id.as_str(), "ORD1");
                assert_eq!(e.exec_quantity, 40);
                assert_eq!(e.exec_price.raw(), 1_499_500);
                assert_eq!(e.match_number, 777_001);
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_byte() {
        let registry = registry();
        let decoder = Decoder::new(&registry);
        assert_eq!(
            decoder.decode(&[b'Z'; 32]).unwrap_err(),
            DecodeError::UnknownMessageType(b'Z')
        );
    }

    #[test]
    fn test_empty_input() {
        let registry = registry();
        let decoder = Decoder::new(&registry);
        assert!(matches!(
            decoder.decode(&[]).unwrap_err(),
            DecodeError::Truncated {
                needed: 1,
                available: 0
            }
        ));
    }

    #[test]
    fn test_truncated_frame() {
        let registry = registry();
        let decoder = Decoder::new(&registry);
        let frame = order_entry_frame();
        assert_eq!(
            decoder.decode(&frame[..31]).unwrap_err(),
            DecodeError::Truncated {
                needed: 32,
                available: 31
            }
        );
    }

    #[test]
    fn test_oversized_frame() {
        let registry = registry();
        let decoder = Decoder::new(&registry);
        let mut frame = order_entry_frame();
        frame.push(0);
        assert_eq!(
            decoder.decode(&frame).unwrap_err(),
            DecodeError::LengthMismatch {
                declared: 32,
                actual: 33
            }
        );
    }

    #[test]
    fn test_trim_padding() {
        assert_eq!(trim_padding(b"AAPL    "), b"AAPL");
        assert_eq!(trim_padding(b"        "), b"");
        assert_eq!(trim_padding(b"FULLNAME"), b"FULLNAME");
        // Interior pad bytes are value bytes; only the tail is padding.
        assert_eq!(trim_padding(b"A B     "), b"A B");
    }
}
