/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema registry: process-wide immutable lookup of message specs.
//!
//! A [`SchemaRegistry`] is built once at startup from a [`SchemaDef`] — a
//! serde-friendly declarative description — and is read-only afterwards, so
//! codecs can share it across sessions without locking. Lookup is O(1) by
//! (format, kind) and by wire discriminator.

use crate::spec::{Discriminator, FieldSpec, MessageSpec, SemanticType, WireLocation};
use fixgate_core::error::SchemaError;
use fixgate_core::message::{FieldName, MsgKind, WireFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Begin-string of the configured text dialect.
pub const BEGIN_STRING: &str = "FIXG.1";

/// Price scale of the text session protocol (two decimal places).
pub const SESSION_PRICE_SCALE: u32 = 100;

/// Price scale of the binary exchange protocol (1/10000 ticks).
pub const EXCHANGE_PRICE_SCALE: u32 = 10_000;

/// Tag numbers owned by the text framing layer.
pub mod tags {
    /// BeginString.
    pub const BEGIN_STRING: u32 = 8;
    /// BodyLength.
    pub const BODY_LENGTH: u32 = 9;
    /// CheckSum.
    pub const CHECKSUM: u32 = 10;
    /// MsgType (discriminator).
    pub const MSG_TYPE: u32 = 35;
    /// MsgSeqNum.
    pub const MSG_SEQ_NUM: u32 = 34;
    /// ClOrdID.
    pub const CL_ORD_ID: u32 = 11;
    /// ExecID (match number).
    pub const EXEC_ID: u32 = 17;
    /// LastPx.
    pub const LAST_PX: u32 = 31;
    /// LastShares.
    pub const LAST_SHARES: u32 = 32;
    /// OrderQty.
    pub const ORDER_QTY: u32 = 38;
    /// Price.
    pub const PRICE: u32 = 44;
    /// Side.
    pub const SIDE: u32 = 54;
    /// Symbol.
    pub const SYMBOL: u32 = 55;
    /// OrdRejReason.
    pub const ORD_REJ_REASON: u32 = 103;
}

/// Declarative schema description, loadable from an external source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDef {
    /// Begin-string of the text dialect.
    pub begin_string: String,
    /// Every supported message spec, both formats.
    pub messages: Vec<MessageSpec>,
}

/// Immutable registry of message specs, keyed by (format, kind) and by
/// wire discriminator.
#[derive(Debug)]
pub struct SchemaRegistry {
    begin_string: String,
    specs: Vec<MessageSpec>,
    by_key: HashMap<(WireFormat, MsgKind), usize>,
    by_msg_type: HashMap<String, usize>,
    by_type_byte: HashMap<u8, usize>,
}

impl SchemaRegistry {
    /// Builds a registry from a declarative definition.
    ///
    /// # Errors
    /// Returns `SchemaError::DuplicateDiscriminator` if two specs in the
    /// same format collide. Construction errors are fatal at startup and
    /// never reach the per-message path.
    pub fn from_def(def: SchemaDef) -> Result<Self, SchemaError> {
        let mut registry = Self {
            begin_string: def.begin_string,
            specs: Vec::with_capacity(def.messages.len()),
            by_key: HashMap::new(),
            by_msg_type: HashMap::new(),
            by_type_byte: HashMap::new(),
        };
        for spec in def.messages {
            registry.add_message(spec)?;
        }
        Ok(registry)
    }

    fn add_message(&mut self, spec: MessageSpec) -> Result<(), SchemaError> {
        let index = self.specs.len();
        match &spec.discriminator {
            Discriminator::MsgType(value) => {
                if self.by_msg_type.insert(value.clone(), index).is_some() {
                    return Err(SchemaError::DuplicateDiscriminator {
                        format: spec.format,
                        discriminator: value.clone(),
                    });
                }
            }
            Discriminator::TypeByte(byte) => {
                if self.by_type_byte.insert(*byte, index).is_some() {
                    return Err(SchemaError::DuplicateDiscriminator {
                        format: spec.format,
                        discriminator: spec.discriminator.to_string(),
                    });
                }
            }
        }
        self.by_key.insert((spec.format, spec.kind), index);
        self.specs.push(spec);
        Ok(())
    }

    /// Returns the begin-string of the text dialect.
    #[inline]
    #[must_use]
    pub fn begin_string(&self) -> &str {
        &self.begin_string
    }

    /// Looks up the spec for a (format, kind) pair.
    ///
    /// # Errors
    /// Returns `SchemaError::NotFound` if no spec is registered. This is
    /// always fatal-to-the-message, never fatal-to-the-process.
    pub fn get(&self, format: WireFormat, kind: MsgKind) -> Result<&MessageSpec, SchemaError> {
        self.by_key
            .get(&(format, kind))
            .map(|&i| &self.specs[i])
            .ok_or(SchemaError::NotFound { format, kind })
    }

    /// Looks up a text spec by its message-type discriminator value.
    #[must_use]
    pub fn by_msg_type(&self, msg_type: &str) -> Option<&MessageSpec> {
        self.by_msg_type.get(msg_type).map(|&i| &self.specs[i])
    }

    /// Looks up a binary spec by its type byte.
    #[must_use]
    pub fn by_type_byte(&self, type_byte: u8) -> Option<&MessageSpec> {
        self.by_type_byte.get(&type_byte).map(|&i| &self.specs[i])
    }

    /// Returns an iterator over all registered specs.
    pub fn specs(&self) -> impl Iterator<Item = &MessageSpec> {
        self.specs.iter()
    }

    /// Builds the registry for the single configured dialect.
    ///
    /// Text side: FIX-style order entry (`D`/`F`/`8`/`3`). Binary side:
    /// fixed-layout big-endian order entry (`'O'`/`'X'`/`'E'`/`'J'`).
    ///
    /// # Panics
    /// Never panics: the built-in dialect has unique discriminators.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_def(standard_def()).expect("built-in dialect is internally consistent")
    }
}

/// Returns the declarative definition of the built-in dialect.
#[must_use]
pub fn standard_def() -> SchemaDef {
    use FieldName as F;
    use SemanticType::{Code, Text, UInt};

    let tag = |t: u32| WireLocation::Tag { tag: t };
    let at = |offset: usize, width: usize| WireLocation::Fixed { offset, width };
    let price_s = SemanticType::Price {
        scale: SESSION_PRICE_SCALE,
    };
    let price_x = SemanticType::Price {
        scale: EXCHANGE_PRICE_SCALE,
    };

    SchemaDef {
        begin_string: BEGIN_STRING.to_string(),
        messages: vec![
            // --- Text session protocol ---
            MessageSpec::tag_value(
                MsgKind::NewOrder,
                "D",
                vec![
                    FieldSpec::required(F::SeqNum, UInt, tag(tags::MSG_SEQ_NUM)),
                    FieldSpec::required(F::ClOrdId, Text, tag(tags::CL_ORD_ID)).with_max_len(14),
                    FieldSpec::required(F::Side, Code, tag(tags::SIDE)),
                    FieldSpec::required(F::Quantity, UInt, tag(tags::ORDER_QTY)),
                    FieldSpec::required(F::Symbol, Text, tag(tags::SYMBOL)).with_max_len(8),
                    FieldSpec::required(F::Price, price_s, tag(tags::PRICE)),
                ],
            ),
            MessageSpec::tag_value(
                MsgKind::Cancel,
                "F",
                vec![
                    FieldSpec::required(F::SeqNum, UInt, tag(tags::MSG_SEQ_NUM)),
                    FieldSpec::required(F::ClOrdId, Text, tag(tags::CL_ORD_ID)).with_max_len(14),
                    FieldSpec::required(F::Quantity, UInt, tag(tags::ORDER_QTY)),
                    FieldSpec::optional(F::Symbol, Text, tag(tags::SYMBOL)).with_max_len(8),
                ],
            ),
            MessageSpec::tag_value(
                MsgKind::ExecutionReport,
                "8",
                vec![
                    FieldSpec::required(F::SeqNum, UInt, tag(tags::MSG_SEQ_NUM)),
                    FieldSpec::required(F::ClOrdId, Text, tag(tags::CL_ORD_ID)).with_max_len(14),
                    FieldSpec::required(F::MatchNumber, UInt, tag(tags::EXEC_ID)),
                    FieldSpec::required(F::ExecQuantity, UInt, tag(tags::LAST_SHARES)),
                    FieldSpec::required(F::ExecPrice, price_s, tag(tags::LAST_PX)),
                ],
            ),
            MessageSpec::tag_value(
                MsgKind::Reject,
                "3",
                vec![
                    FieldSpec::required(F::SeqNum, UInt, tag(tags::MSG_SEQ_NUM)),
                    FieldSpec::required(F::ClOrdId, Text, tag(tags::CL_ORD_ID)).with_max_len(14),
                    FieldSpec::required(F::RejectReason, UInt, tag(tags::ORD_REJ_REASON)),
                ],
            ),
            // --- Binary exchange protocol ---
            MessageSpec::fixed_binary(
                MsgKind::NewOrder,
                b'O',
                vec![
                    FieldSpec::required(F::ClOrdId, Text, at(1, 14)),
                    FieldSpec::required(F::Side, Code, at(15, 1)),
                    FieldSpec::required(F::Quantity, UInt, at(16, 4)),
                    FieldSpec::required(F::Symbol, Text, at(20, 8)),
                    FieldSpec::required(F::Price, price_x, at(28, 4)),
                ],
            ),
            MessageSpec::fixed_binary(
                MsgKind::Cancel,
                b'X',
                vec![
                    FieldSpec::required(F::ClOrdId, Text, at(1, 14)),
                    FieldSpec::required(F::Quantity, UInt, at(15, 4)),
                ],
            ),
            MessageSpec::fixed_binary(
                MsgKind::ExecutionReport,
                b'E',
                vec![
                    FieldSpec::required(F::ClOrdId, Text, at(1, 14)),
                    FieldSpec::required(F::ExecQuantity, UInt, at(15, 4)),
                    FieldSpec::required(F::ExecPrice, price_x, at(19, 4)),
                    FieldSpec::required(F::MatchNumber, UInt, at(23, 8)),
                ],
            ),
            MessageSpec::fixed_binary(
                MsgKind::Reject,
                b'J',
                vec![
                    FieldSpec::required(F::ClOrdId, Text, at(1, 14)),
                    FieldSpec::required(F::RejectReason, UInt, at(15, 1)),
                ],
            ),
        ],
    }
}
