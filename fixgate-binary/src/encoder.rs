/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema-driven fixed-layout encoder.
//!
//! The frame buffer is allocated at the spec's exact wire width and every
//! field is written at its declared offset. Text fields are right-padded
//! with spaces; integers are big-endian at the field's declared width.

use crate::decoder::TEXT_PAD;
use bytes::Bytes;
use fixgate_core::error::{BridgeError, EncodeError};
use fixgate_core::message::{FieldValue, SemanticMessage, WireFormat};
use fixgate_schema::SchemaRegistry;
use fixgate_schema::spec::{Discriminator, FieldSpec, SemanticType};

/// Schema-driven encoder for the binary exchange protocol.
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

    /// Encodes a semantic message into one width-exact frame.
    ///
    /// Any sequence number on the message is dropped: the binary schema has
    /// no field for it.
    ///
    /// # Errors
    /// Returns `SchemaError::NotFound` if the registry has no binary spec
    /// for the message kind, or `EncodeError` if a value is absent, too
    /// long, or unrepresentable at its field's width.
    pub fn encode(&self, msg: &SemanticMessage) -> Result<Bytes, BridgeError> {
        let spec = self.registry.get(WireFormat::FixedBinary, msg.kind())?;
        let mut frame = vec![0u8; spec.wire_size];
        if let Discriminator::TypeByte(type_byte) = spec.discriminator {
            frame[0] = type_byte;
        }

        for field_spec in spec.fields() {
            let Some((offset, width)) = field_spec.fixed() else {
                continue;
            };
            let value = match msg.get(field_spec.name) {
                Some(value) => value,
                None if field_spec.required => {
                    return Err(EncodeError::MissingRequiredField {
                        field: field_spec.name,
                    }
                    .into());
                }
                // Absent optional fields stay at their pad value.
                None => {
                    if field_spec.semantic == SemanticType::Text {
                        frame[offset..offset + width].fill(TEXT_PAD);
                    }
                    continue;
                }
            };
            write_value(&mut frame[offset..offset + width], field_spec, &value)?;
        }

        Ok(Bytes::from(frame))
    }
}

/// Writes one field value into its fixed-width slot.
fn write_value(slot: &mut [u8], spec: &FieldSpec, value: &FieldValue) -> Result<(), EncodeError> {
    match (spec.semantic, value) {
        (SemanticType::UInt, FieldValue::UInt(v)) => write_uint(slot, spec, *v),
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
            let ticks = u64::try_from(price.raw()).map_err(|_| EncodeError::InvalidFieldValue {
                field: spec.name,
                reason: "negative price".to_string(),
            })?;
            write_uint(slot, spec, ticks)
        }
        (SemanticType::Text, FieldValue::Text(text)) => {
            let bytes = text.as_str().as_bytes();
            if bytes.len() > slot.len() {
                return Err(EncodeError::FieldTooLong {
                    field: spec.name,
                    length: bytes.len(),
                    max_length: slot.len(),
                });
            }
            slot[..bytes.len()].copy_from_slice(bytes);
            slot[bytes.len()..].fill(TEXT_PAD);
            Ok(())
        }
        (SemanticType::Code, FieldValue::Code(code)) => {
            slot[0] = *code;
            Ok(())
        }
        (_, _) => Err(EncodeError::InvalidFieldValue {
            field: spec.name,
            reason: "value type does not match field semantic".to_string(),
        }),
    }
}

/// Writes a big-endian unsigned integer at the slot's width, rejecting
/// values the width cannot hold.
fn write_uint(slot: &mut [u8], spec: &FieldSpec, value: u64) -> Result<(), EncodeError> {
    let fits = match slot.len() {
        1 => value <= u64::from(u8::MAX),
        2 => value <= u64::from(u16::MAX),
        4 => value <= u64::from(u32::MAX),
        8 => true,
        _ => false,
    };
    if !fits {
        return Err(EncodeError::InvalidFieldValue {
            field: spec.name,
            reason: format!("{value} does not fit in {} bytes", slot.len()),
        });
    }
    let be = value.to_be_bytes();
    slot.copy_from_slice(&be[8 - slot.len()..]);
    Ok(())
}
