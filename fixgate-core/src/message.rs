/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Message model for the fixgate protocol bridge.
//!
//! This module provides:
//! - [`RawFrame`]: Immutable byte sequence as received from the transport
//! - [`MsgKind`]: The supported logical message kinds
//! - [`FieldName`] / [`FieldValue`] / [`FieldMap`]: Schema-facing field model
//! - [`SemanticMessage`]: Wire-agnostic tagged-variant record, one typed
//!   struct per message kind so required fields hold by construction
//!
//! Codecs decode a frame into a [`FieldMap`] under the control of a message
//! spec and then seal it into a [`SemanticMessage`]; encoding walks the spec
//! in canonical order and reads fields back by name.

use crate::error::DecodeError;
use crate::types::{OrderId, Price, SeqNum, Symbol, Timestamp};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// The two wire representations the bridge translates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireFormat {
    /// Text tag=value session protocol (client-facing).
    TagValue,
    /// Fixed-layout big-endian exchange protocol (exchange-facing).
    FixedBinary,
}

/// Logical message kinds the bridge supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MsgKind {
    /// Order entry.
    NewOrder,
    /// Order cancel request.
    Cancel,
    /// Execution / fill report.
    ExecutionReport,
    /// Order rejection.
    Reject,
}

impl MsgKind {
    /// Returns the canonical name of this message kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewOrder => "NewOrder",
            Self::Cancel => "Cancel",
            Self::ExecutionReport => "ExecutionReport",
            Self::Reject => "Reject",
        }
    }
}

impl fmt::Display for MsgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic field names shared by both wire schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldName {
    /// Session-protocol message sequence number.
    SeqNum,
    /// Client order identifier / exchange order token.
    ClOrdId,
    /// Order side code (wire-format-native).
    Side,
    /// Order quantity in shares.
    Quantity,
    /// Instrument symbol.
    Symbol,
    /// Limit price.
    Price,
    /// Exchange match number of a fill.
    MatchNumber,
    /// Executed quantity of a fill.
    ExecQuantity,
    /// Execution price of a fill.
    ExecPrice,
    /// Numeric rejection reason code.
    RejectReason,
}

impl FieldName {
    /// Returns the canonical name of this field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SeqNum => "SeqNum",
            Self::ClOrdId => "ClOrdId",
            Self::Side => "Side",
            Self::Quantity => "Quantity",
            Self::Symbol => "Symbol",
            Self::Price => "Price",
            Self::MatchNumber => "MatchNumber",
            Self::ExecQuantity => "ExecQuantity",
            Self::ExecPrice => "ExecPrice",
            Self::RejectReason => "RejectReason",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    /// Unsigned integer value.
    UInt(u64),
    /// Scaled-integer price.
    Price(Price),
    /// Bounded text value.
    Text(crate::types::Ident),
    /// Single-byte enumerated code, wire-format-native.
    Code(u8),
}

impl FieldValue {
    /// Returns the value as a u64, if it is a UInt variant.
    #[must_use]
    pub const fn as_uint(&self) -> Option<u64> {
        match self {
            Self::UInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a price, if it is a Price variant.
    #[must_use]
    pub const fn as_price(&self) -> Option<Price> {
        match self {
            Self::Price(p) => Some(*p),
            _ => None,
        }
    }

    /// Returns the value as text, if it is a Text variant.
    #[must_use]
    pub const fn as_text(&self) -> Option<crate::types::Ident> {
        match self {
            Self::Text(t) => Some(*t),
            _ => None,
        }
    }

    /// Returns the value as an enumerated code, if it is a Code variant.
    #[must_use]
    pub const fn as_code(&self) -> Option<u8> {
        match self {
            Self::Code(c) => Some(*c),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UInt(v) => write!(f, "{v}"),
            Self::Price(p) => write!(f, "{p}"),
            Self::Text(t) => write!(f, "{t}"),
            Self::Code(c) => write!(f, "{}", *c as char),
        }
    }
}

/// Ordered collection of decoded fields, keyed by semantic name.
///
/// Small enough for every supported message kind to stay inline.
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    fields: SmallVec<[(FieldName, FieldValue); 8]>,
}

impl FieldMap {
    /// Creates an empty field map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, replacing any previous value for the same name.
    pub fn insert(&mut self, name: FieldName, value: FieldValue) {
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    /// Gets a field by name.
    #[must_use]
    pub fn get(&self, name: FieldName) -> Option<FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    /// Returns true if the map contains the given field.
    #[must_use]
    pub fn contains(&self, name: FieldName) -> bool {
        self.fields.iter().any(|(n, _)| *n == name)
    }

    /// Returns an iterator over the fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, FieldValue)> + '_ {
        self.fields.iter().copied()
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn require(&self, name: FieldName) -> Result<FieldValue, DecodeError> {
        self.get(name)
            .ok_or(DecodeError::MissingRequiredField { field: name })
    }

    fn require_uint(&self, name: FieldName) -> Result<u64, DecodeError> {
        self.require(name)?
            .as_uint()
            .ok_or_else(|| type_error(name, "unsigned integer"))
    }

    fn require_text(&self, name: FieldName) -> Result<crate::types::Ident, DecodeError> {
        self.require(name)?
            .as_text()
            .ok_or_else(|| type_error(name, "text"))
    }

    fn require_price(&self, name: FieldName) -> Result<Price, DecodeError> {
        self.require(name)?
            .as_price()
            .ok_or_else(|| type_error(name, "price"))
    }

    fn require_code(&self, name: FieldName) -> Result<u8, DecodeError> {
        self.require(name)?
            .as_code()
            .ok_or_else(|| type_error(name, "code"))
    }
}

fn type_error(field: FieldName, expected: &str) -> DecodeError {
    DecodeError::InvalidFieldValue {
        field,
        reason: format!("expected {expected} value"),
    }
}

/// An immutable frame as received from the transport collaborator.
///
/// Owned transiently by the decode call and discarded once decoding
/// succeeds or fails.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Frame payload.
    payload: Bytes,
    /// Arrival timestamp.
    received_at: Timestamp,
}

impl RawFrame {
    /// Creates a frame from a payload, stamped with the current time.
    #[must_use]
    pub fn new(payload: Bytes) -> Self {
        Self {
            payload,
            received_at: Timestamp::now(),
        }
    }

    /// Creates a frame with an explicit arrival timestamp.
    #[must_use]
    pub const fn with_timestamp(payload: Bytes, received_at: Timestamp) -> Self {
        Self {
            payload,
            received_at,
        }
    }

    /// Returns the frame payload.
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Returns the arrival timestamp.
    #[inline]
    #[must_use]
    pub const fn received_at(&self) -> Timestamp {
        self.received_at
    }

    /// Returns the frame length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Returns true if the frame is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

impl From<Bytes> for RawFrame {
    fn from(payload: Bytes) -> Self {
        Self::new(payload)
    }
}

impl From<&[u8]> for RawFrame {
    fn from(payload: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(payload))
    }
}

impl From<Vec<u8>> for RawFrame {
    fn from(payload: Vec<u8>) -> Self {
        Self::new(Bytes::from(payload))
    }
}

/// Order entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrder {
    /// Client order identifier.
    pub client_order_id: OrderId,
    /// Side code, native to the schema the message was decoded under.
    pub side: u8,
    /// Order quantity in shares.
    pub quantity: u32,
    /// Instrument symbol.
    pub symbol: Symbol,
    /// Limit price in ticks at the schema's scale.
    pub price: Price,
}

/// Order cancel request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelOrder {
    /// Client order identifier of the order to cancel.
    pub client_order_id: OrderId,
    /// Quantity to cancel.
    pub quantity: u32,
    /// Instrument symbol; carried by the text schema only.
    pub symbol: Option<Symbol>,
}

/// Execution / fill report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Execution {
    /// Client order identifier of the filled order.
    pub client_order_id: OrderId,
    /// Exchange match number.
    pub match_number: u64,
    /// Executed quantity.
    pub exec_quantity: u32,
    /// Execution price in ticks at the schema's scale.
    pub exec_price: Price,
}

/// Order rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderReject {
    /// Client order identifier of the rejected order.
    pub client_order_id: OrderId,
    /// Numeric rejection reason code.
    pub reason: u8,
}

/// Kind-specific message payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageBody {
    /// Order entry.
    NewOrder(NewOrder),
    /// Order cancel request.
    Cancel(CancelOrder),
    /// Execution / fill report.
    Execution(Execution),
    /// Order rejection.
    Reject(OrderReject),
}

/// Wire-agnostic typed message record.
///
/// The session sequence number lives outside the body: it exists only in
/// the text schema and is stripped or stamped by the bridge, never by the
/// translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemanticMessage {
    seq: Option<SeqNum>,
    body: MessageBody,
}

impl SemanticMessage {
    /// Creates a message from a body, with no sequence number assigned.
    #[must_use]
    pub const fn new(body: MessageBody) -> Self {
        Self { seq: None, body }
    }

    /// Returns the message kind.
    #[must_use]
    pub const fn kind(&self) -> MsgKind {
        match self.body {
            MessageBody::NewOrder(_) => MsgKind::NewOrder,
            MessageBody::Cancel(_) => MsgKind::Cancel,
            MessageBody::Execution(_) => MsgKind::ExecutionReport,
            MessageBody::Reject(_) => MsgKind::Reject,
        }
    }

    /// Returns the message body.
    #[inline]
    #[must_use]
    pub const fn body(&self) -> &MessageBody {
        &self.body
    }

    /// Returns the session sequence number, if one is assigned.
    #[inline]
    #[must_use]
    pub const fn seq(&self) -> Option<SeqNum> {
        self.seq
    }

    /// Assigns the session sequence number.
    pub fn set_seq(&mut self, seq: SeqNum) {
        self.seq = Some(seq);
    }

    /// Clears the session sequence number.
    pub fn clear_seq(&mut self) {
        self.seq = None;
    }

    /// Returns the client order identifier carried by every message kind.
    #[must_use]
    pub const fn client_order_id(&self) -> OrderId {
        match &self.body {
            MessageBody::NewOrder(m) => m.client_order_id,
            MessageBody::Cancel(m) => m.client_order_id,
            MessageBody::Execution(m) => m.client_order_id,
            MessageBody::Reject(m) => m.client_order_id,
        }
    }

    /// Seals a decoded field map into a typed message of the given kind.
    ///
    /// Required fields are checked here, so a constructed message always
    /// satisfies its kind's invariants.
    ///
    /// # Errors
    /// Returns `DecodeError::MissingRequiredField` for an absent required
    /// field, or `DecodeError::InvalidFieldValue` for a type mismatch.
    pub fn from_fields(kind: MsgKind, fields: &FieldMap) -> Result<Self, DecodeError> {
        let body = match kind {
            MsgKind::NewOrder => MessageBody::NewOrder(NewOrder {
                client_order_id: fields.require_text(FieldName::ClOrdId)?,
                side: fields.require_code(FieldName::Side)?,
                quantity: uint_as_u32(fields.require_uint(FieldName::Quantity)?, FieldName::Quantity)?,
                symbol: fields.require_text(FieldName::Symbol)?,
                price: fields.require_price(FieldName::Price)?,
            }),
            MsgKind::Cancel => MessageBody::Cancel(CancelOrder {
                client_order_id: fields.require_text(FieldName::ClOrdId)?,
                quantity: uint_as_u32(fields.require_uint(FieldName::Quantity)?, FieldName::Quantity)?,
                symbol: fields.get(FieldName::Symbol).and_then(|v| v.as_text()),
            }),
            MsgKind::ExecutionReport => MessageBody::Execution(Execution {
                client_order_id: fields.require_text(FieldName::ClOrdId)?,
                match_number: fields.require_uint(FieldName::MatchNumber)?,
                exec_quantity: uint_as_u32(
                    fields.require_uint(FieldName::ExecQuantity)?,
                    FieldName::ExecQuantity,
                )?,
                exec_price: fields.require_price(FieldName::ExecPrice)?,
            }),
            MsgKind::Reject => MessageBody::Reject(OrderReject {
                client_order_id: fields.require_text(FieldName::ClOrdId)?,
                reason: uint_as_u8(
                    fields.require_uint(FieldName::RejectReason)?,
                    FieldName::RejectReason,
                )?,
            }),
        };

        let mut msg = Self::new(body);
        if let Some(seq) = fields.get(FieldName::SeqNum).and_then(|v| v.as_uint()) {
            msg.set_seq(SeqNum::new(seq));
        }
        Ok(msg)
    }

    /// Reads a field back by semantic name, for spec-driven encoding.
    ///
    /// Returns `None` for fields the message kind does not carry, including
    /// an unassigned sequence number.
    #[must_use]
    pub fn get(&self, name: FieldName) -> Option<FieldValue> {
        if name == FieldName::SeqNum {
            return self.seq.map(|s| FieldValue::UInt(s.value()));
        }
        match &self.body {
            MessageBody::NewOrder(m) => match name {
                FieldName::ClOrdId => Some(FieldValue::Text(m.client_order_id)),
                FieldName::Side => Some(FieldValue::Code(m.side)),
                FieldName::Quantity => Some(FieldValue::UInt(u64::from(m.quantity))),
                FieldName::Symbol => Some(FieldValue::Text(m.symbol)),
                FieldName::Price => Some(FieldValue::Price(m.price)),
                _ => None,
            },
            MessageBody::Cancel(m) => match name {
                FieldName::ClOrdId => Some(FieldValue::Text(m.client_order_id)),
                FieldName::Quantity => Some(FieldValue::UInt(u64::from(m.quantity))),
                FieldName::Symbol => m.symbol.map(FieldValue::Text),
                _ => None,
            },
            MessageBody::Execution(m) => match name {
                FieldName::ClOrdId => Some(FieldValue::Text(m.client_order_id)),
                FieldName::MatchNumber => Some(FieldValue::UInt(m.match_number)),
                FieldName::ExecQuantity => Some(FieldValue::UInt(u64::from(m.exec_quantity))),
                FieldName::ExecPrice => Some(FieldValue::Price(m.exec_price)),
                _ => None,
            },
            MessageBody::Reject(m) => match name {
                FieldName::ClOrdId => Some(FieldValue::Text(m.client_order_id)),
                FieldName::RejectReason => Some(FieldValue::UInt(u64::from(m.reason))),
                _ => None,
            },
        }
    }
}

fn uint_as_u32(value: u64, field: FieldName) -> Result<u32, DecodeError> {
    u32::try_from(value).map_err(|_| DecodeError::InvalidFieldValue {
        field,
        reason: format!("{value} exceeds 32-bit width"),
    })
}

fn uint_as_u8(value: u64, field: FieldName) -> Result<u8, DecodeError> {
    u8::try_from(value).map_err(|_| DecodeError::InvalidFieldValue {
        field,
        reason: format!("{value} exceeds 8-bit width"),
    })
}
