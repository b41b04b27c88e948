/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema-driven tag=value encoder.
//!
//! The body is rendered first so the body-length field can carry the exact
//! byte count, then the frame header is prepended and the checksum field
//! appended over everything before it. Field order follows the message
//! spec's canonical order, with the message type always leading the body.

use crate::checksum::{calculate_checksum, format_checksum};
use crate::decoder::SOH;
use bytes::{BufMut, Bytes, BytesMut};
use fixgate_core::error::{BridgeError, EncodeError};
use fixgate_core::message::{FieldValue, SemanticMessage, WireFormat};
use fixgate_schema::spec::{Discriminator, FieldSpec, SemanticType};
use fixgate_schema::{SchemaRegistry, tags};

/// Schema-driven encoder for the text session protocol.
#[derive(Debug)]
pub struct Encoder<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> Encoder<'r> {
    /// Creates an encoder over the given schema registry.
    #[must_use]
    pub const fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Encodes a semantic message into one complete frame.
    ///
    /// # Errors
    /// Returns `SchemaError::NotFound` if the registry has no text spec for
    /// the message kind, or `EncodeError` if a required field is absent or
    /// a value violates its spec.
    pub fn encode(&self, msg: &SemanticMessage) -> Result<Bytes, BridgeError> {
        let spec = self.registry.get(WireFormat::TagValue, msg.kind())?;
        let Discriminator::MsgType(msg_type) = &spec.discriminator else {
            return Err(EncodeError::InvalidFieldValue {
                field: fixgate_core::message::FieldName::SeqNum,
                reason: "text spec carries a binary discriminator".to_string(),
            }
            .into());
        };

        let mut body = BytesMut::with_capacity(128);
        put_tag(&mut body, tags::MSG_TYPE);
        body.put_slice(msg_type.as_bytes());
        body.put_u8(SOH);

        for field_spec in spec.fields() {
            let Some(tag) = field_spec.tag() else {
                continue;
            };
            match msg.get(field_spec.name) {
                Some(value) => {
                    put_tag(&mut body, tag);
                    put_value(&mut body, field_spec, &value)?;
                    body.put_u8(SOH);
                }
                None if field_spec.required => {
                    return Err(EncodeError::MissingRequiredField {
                        field: field_spec.name,
                    }
                    .into());
                }
                None => {}
            }
        }

        let mut frame = BytesMut::with_capacity(body.len() + 32);
        put_tag(&mut frame, tags::BEGIN_STRING);
        frame.put_slice(self.registry.begin_string().as_bytes());
        frame.put_u8(SOH);
        put_tag(&mut frame, tags::BODY_LENGTH);
        put_uint(&mut frame, body.len() as u64);
        frame.put_u8(SOH);
        frame.put_slice(&body);

        let checksum = calculate_checksum(&frame);
        put_tag(&mut frame, tags::CHECKSUM);
        frame.put_slice(&format_checksum(checksum));
        frame.put_u8(SOH);

        Ok(frame.freeze())
    }
}

/// Writes `tag=`.
fn put_tag(out: &mut BytesMut, tag: u32) {
    let mut buf = itoa::Buffer::new();
    out.put_slice(buf.format(tag).as_bytes());
    out.put_u8(b'=');
}

/// Writes an unsigned integer in decimal.
fn put_uint(out: &mut BytesMut, value: u64) {
    let mut buf = itoa::Buffer::new();
    out.put_slice(buf.format(value).as_bytes());
}

/// Writes one field value per its spec's semantic type.
fn put_value(
    out: &mut BytesMut,
    spec: &FieldSpec,
    value: &FieldValue,
) -> Result<(), EncodeError> {
    match (spec.semantic, value) {
        (SemanticType::UInt, FieldValue::UInt(v)) => {
            put_uint(out, *v);
            Ok(())
        }
        (SemanticType::Price { scale }, FieldValue::Price(price)) => {
            if price.scale() != scale {
                return Err(EncodeError::InvalidFieldValue {
                    field: spec.name,
                    reason: format!(
                        "price scale {} does not match dialect scale {scale}",
                        price.scale()
                    ),
                });
            }
            out.put_slice(price.format_display().as_bytes());
            Ok(())
        }
        (SemanticType::Text, FieldValue::Text(text)) => {
            if let Some(max) = spec.max_len
                && text.as_str().len() > max
            {
                return Err(EncodeError::FieldTooLong {
                    field: spec.name,
                    length: text.as_str().len(),
                    max_length: max,
                });
            }
            out.put_slice(text.as_str().as_bytes());
            Ok(())
        }
        (SemanticType::Code, FieldValue::Code(code)) => {
            out.put_u8(*code);
            Ok(())
        }
        (_, _) => Err(EncodeError::InvalidFieldValue {
            field: spec.name,
            reason: "value type does not match field semantic".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Decoder;
    use fixgate_core::message::{MessageBody, NewOrder, OrderReject};
    use fixgate_core::types::{Ident, Price, SeqNum};
    use fixgate_schema::SESSION_PRICE_SCALE;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::standard()
    }

    fn new_order_with(symbol: &str, price: Price) -> SemanticMessage {
        let mut msg = SemanticMessage::new(MessageBody::NewOrder(NewOrder {
            client_order_id: Ident::new("ORD1").unwrap(),
            side: b'1',
            quantity: 100,
            symbol: Ident::new(symbol).unwrap(),
            price,
        }));
        msg.set_seq(SeqNum::new(5));
        msg
    }

    fn new_order() -> SemanticMessage {
        new_order_with("AAPL", Price::from_raw(15000, SESSION_PRICE_SCALE))
    }

    #[test]
    fn test_encode_new_order_layout() {
        let registry = registry();
        let encoder = Encoder::new(&registry);
        let frame = encoder.encode(&new_order()).unwrap();

        let text = String::from_utf8(frame.to_vec()).unwrap();
        let fields: Vec<&str> = text.split('\x01').collect();
        assert_eq!(fields[0], "8=FIXG.1");
        assert!(fields[1].starts_with("9="));
        assert_eq!(fields[2], "35=D");
        assert_eq!(fields[3], "34=5");
        assert_eq!(fields[4], "11=ORD1");
        assert_eq!(fields[5], "54=1");
        assert_eq!(fields[6], "38=100");
        assert_eq!(fields[7], "55=AAPL");
        assert_eq!(fields[8], "44=150.00");
        assert!(fields[9].starts_with("10="));
        assert_eq!(fields[9].len(), 6);
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let registry = registry();
        let encoder = Encoder::new(&registry);
        let decoder = Decoder::new(&registry);

        let msg = new_order();
        let frame = encoder.encode(&msg).unwrap();
        let decoded = decoder.decode(&frame).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_encode_without_seq_is_incomplete() {
        let registry = registry();
        let encoder = Encoder::new(&registry);
        let mut msg = new_order();
        msg.clear_seq();
        // Every text message carries tag 34; an unassigned sequence number
        // is a caller bug, not an optional field.
        let err = encoder.encode(&msg).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Encode(EncodeError::MissingRequiredField {
                field: fixgate_core::message::FieldName::SeqNum
            })
        ));
    }

    #[test]
    fn test_encode_reject_reason_as_decimal() {
        let registry = registry();
        let encoder = Encoder::new(&registry);
        let mut msg = SemanticMessage::new(MessageBody::Reject(OrderReject {
            client_order_id: Ident::new("ORD9").unwrap(),
            reason: 12,
        }));
        msg.set_seq(SeqNum::new(1));
        let frame = encoder.encode(&msg).unwrap();
        let text = String::from_utf8(frame.to_vec()).unwrap();
        assert!(text.contains("35=3\x01"));
        assert!(text.contains("103=12\x01"));
    }

    #[test]
    fn test_encode_price_scale_mismatch() {
        let registry = registry();
        let encoder = Encoder::new(&registry);
        let msg = new_order_with("AAPL", Price::from_raw(1_500_000, 10_000));
        assert!(matches!(
            encoder.encode(&msg),
            Err(BridgeError::Encode(EncodeError::InvalidFieldValue { .. }))
        ));
    }

    #[test]
    fn test_encode_symbol_too_long() {
        let registry = registry();
        let encoder = Encoder::new(&registry);
        let msg = new_order_with("LONGNAME9", Price::from_raw(15000, SESSION_PRICE_SCALE));
        let err = encoder.encode(&msg).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Encode(EncodeError::FieldTooLong {
                length: 9,
                max_length: 8,
                ..
            })
        ));
    }

    #[test]
    fn test_body_length_matches_declared() {
        let registry = registry();
        let encoder = Encoder::new(&registry);
        let frame = encoder.encode(&new_order()).unwrap();
        let text = String::from_utf8(frame.to_vec()).unwrap();

        let declared: usize = text
            .split('\x01')
            .nth(1)
            .and_then(|f| f.strip_prefix("9="))
            .unwrap()
            .parse()
            .unwrap();
        let body_start = text.find("35=").unwrap();
        let checksum_start = text.rfind("10=").unwrap();
        assert_eq!(checksum_start - body_start, declared);
    }
}
