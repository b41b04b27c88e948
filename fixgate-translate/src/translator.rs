/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Pure cross-schema message translation.
//!
//! Translation rewrites a semantic message for the other schema: side codes
//! swap through the table, prices rescale exactly between the two declared
//! scales, and the result is checked field by field against the target
//! spec's widths. No frame bytes are touched here; codecs own the wire.

use crate::table::TranslationTable;
use fixgate_core::error::{BridgeError, TranslateError};
use fixgate_core::message::{
    Execution, FieldName, FieldValue, MessageBody, NewOrder, SemanticMessage, WireFormat,
};
use fixgate_core::types::Price;
use fixgate_schema::SchemaRegistry;

/// Which schema the translated message targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Session text message becoming a binary exchange message.
    ToExchange,
    /// Binary exchange message becoming a session text message.
    ToClient,
}

impl Direction {
    /// The wire format the translated message must satisfy.
    #[must_use]
    pub const fn target_format(self) -> WireFormat {
        match self {
            Self::ToExchange => WireFormat::FixedBinary,
            Self::ToClient => WireFormat::TagValue,
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::ToExchange => Self::ToClient,
            Self::ToClient => Self::ToExchange,
        }
    }
}

/// Table-driven translator between the two schemas.
#[derive(Debug)]
pub struct Translator<'r> {
    registry: &'r SchemaRegistry,
    table: TranslationTable,
}

impl<'r> Translator<'r> {
    /// Creates a translator over the given registry and table.
    #[must_use]
    pub const fn new(registry: &'r SchemaRegistry, table: TranslationTable) -> Self {
        Self { registry, table }
    }

    /// Translates a message for the target schema of `direction`.
    ///
    /// The sequence number is carried through untouched; assigning and
    /// stripping it is the bridge's job, not the translator's.
    ///
    /// # Errors
    /// Returns `TranslateError` when a code has no table entry, a price
    /// does not rescale exactly, or a value violates the target spec;
    /// `SchemaError::NotFound` if the target schema lacks the message kind.
    pub fn translate(
        &self,
        msg: &SemanticMessage,
        direction: Direction,
    ) -> Result<SemanticMessage, BridgeError> {
        let body = match msg.body() {
            MessageBody::NewOrder(order) => MessageBody::NewOrder(NewOrder {
                side: self.map_side(order.side, direction)?,
                price: self.rescale(order.price, direction)?,
                ..*order
            }),
            MessageBody::Cancel(cancel) => MessageBody::Cancel(*cancel),
            MessageBody::Execution(exec) => MessageBody::Execution(Execution {
                exec_price: self.rescale(exec.exec_price, direction)?,
                ..*exec
            }),
            MessageBody::Reject(reject) => MessageBody::Reject(*reject),
        };

        let mut out = SemanticMessage::new(body);
        if let Some(seq) = msg.seq() {
            out.set_seq(seq);
        }
        self.check_target_widths(&out, direction)?;
        Ok(out)
    }

    /// Maps a side code through the table for the given direction.
    fn map_side(&self, code: u8, direction: Direction) -> Result<u8, TranslateError> {
        let mapped = match direction {
            Direction::ToExchange => self.table.side_to_exchange(code),
            Direction::ToClient => self.table.side_to_session(code),
        };
        mapped.ok_or(TranslateError::UnsupportedEnumValue {
            field: FieldName::Side,
            code,
        })
    }

    /// Rescales a price exactly to the target schema's declared scale.
    fn rescale(&self, price: Price, direction: Direction) -> Result<Price, TranslateError> {
        let target_scale = match direction {
            Direction::ToExchange => self.table.exchange_price_scale(),
            Direction::ToClient => self.table.session_price_scale(),
        };
        price
            .rescale(target_scale)
            .ok_or(TranslateError::PriceNotRepresentable {
                raw: price.raw(),
                source_scale: price.scale(),
                target_scale,
            })
    }

    /// Checks the translated message against the target spec's required
    /// fields and value widths.
    fn check_target_widths(
        &self,
        msg: &SemanticMessage,
        direction: Direction,
    ) -> Result<(), BridgeError> {
        let spec = self.registry.get(direction.target_format(), msg.kind())?;
        for field_spec in spec.fields() {
            // The bridge stamps the outbound sequence number after
            // translation, so its absence here is not an error.
            if field_spec.name == FieldName::SeqNum {
                continue;
            }
            let value = msg.get(field_spec.name);
            match value {
                None if field_spec.required => {
                    return Err(TranslateError::MissingField {
                        field: field_spec.name,
                    }
                    .into());
                }
                Some(FieldValue::Text(text)) => {
                    if let Some(max) = field_spec.value_width()
                        && text.as_str().len() > max
                    {
                        return Err(TranslateError::FieldTooLong {
                            field: field_spec.name,
                            length: text.as_str().len(),
                            max_length: max,
                        }
                        .into());
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}
