/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Error types for the fixgate protocol bridge.
//!
//! This module provides a unified error hierarchy using `thiserror` for typed,
//! domain-specific errors across all fixgate operations, plus [`RejectKind`],
//! the closed set of message-scoped rejection reasons the bridge reports to
//! its caller.

use crate::message::{FieldName, MsgKind, WireFormat};
use thiserror::Error;

/// Result type alias using [`BridgeError`] as the error type.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Top-level error type for all fixgate operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Error during frame decoding.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Error during frame encoding.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Error during field translation between schemas.
    #[error("translate error: {0}")]
    Translate(#[from] TranslateError),

    /// Error in session sequencing.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Error in schema lookup.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl BridgeError {
    /// Maps this error to the reject kind reported to the caller.
    #[must_use]
    pub fn kind(&self) -> RejectKind {
        match self {
            Self::Decode(e) => e.kind(),
            Self::Encode(e) => e.kind(),
            Self::Translate(e) => e.kind(),
            Self::Session(e) => e.kind(),
            Self::Schema(e) => e.kind(),
        }
    }
}

/// Closed set of message-scoped rejection reasons.
///
/// Every error in the bridge collapses to exactly one of these kinds; the
/// session continues processing subsequent messages after any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectKind {
    /// Frame violates the wire grammar (separators, checksum, duplicates).
    MalformedFrame,
    /// Declared body length does not match the emitted byte count.
    LengthMismatch,
    /// Frame is shorter than the fixed width its kind declares.
    TruncatedFrame,
    /// Discriminator byte matches no known message layout.
    UnknownMessageType,
    /// A field required by the message kind is absent.
    IncompleteMessage,
    /// A value exceeds the fixed width of its target field.
    FieldTooLong,
    /// An enumerated code has no mapping in the target schema.
    UnsupportedEnumValue,
    /// No message spec registered for the requested (format, kind) pair.
    SchemaNotFound,
    /// Inbound sequence number at or below the last one processed.
    DuplicateSequence,
}

impl RejectKind {
    /// Returns the canonical name of this reject kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedFrame => "MalformedFrame",
            Self::LengthMismatch => "LengthMismatch",
            Self::TruncatedFrame => "TruncatedFrame",
            Self::UnknownMessageType => "UnknownMessageType",
            Self::IncompleteMessage => "IncompleteMessage",
            Self::FieldTooLong => "FieldTooLong",
            Self::UnsupportedEnumValue => "UnsupportedEnumValue",
            Self::SchemaNotFound => "SchemaNotFound",
            Self::DuplicateSequence => "DuplicateSequence",
        }
    }
}

impl std::fmt::Display for RejectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that occur during frame decoding, for either wire format.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Frame violates the tag=value grammar.
    #[error("malformed frame: {reason}")]
    Malformed {
        /// Description of the grammar violation.
        reason: String,
    },

    /// Begin-string field does not match the configured dialect.
    #[error("begin string mismatch: expected {expected}, found {found}")]
    BeginStringMismatch {
        /// Begin string of the configured dialect.
        expected: String,
        /// Begin string found in the frame.
        found: String,
    },

    /// Checksum mismatch between calculated and declared values.
    #[error("checksum mismatch: calculated {calculated}, declared {declared}")]
    ChecksumMismatch {
        /// Calculated checksum value.
        calculated: u8,
        /// Declared checksum value in the frame.
        declared: u8,
    },

    /// Declared body length does not match the actual body byte count.
    #[error("length mismatch: declared {declared}, actual {actual}")]
    LengthMismatch {
        /// Declared body length.
        declared: usize,
        /// Actual byte count between length field and checksum field.
        actual: usize,
    },

    /// Frame shorter than the fixed width its message kind declares.
    #[error("truncated frame: need {needed} bytes, have {available}")]
    Truncated {
        /// Bytes the message layout requires.
        needed: usize,
        /// Bytes present in the frame.
        available: usize,
    },

    /// Discriminator byte matches no registered binary layout.
    #[error("unknown message type: 0x{0:02x}")]
    UnknownMessageType(u8),

    /// A tag appears more than once where the spec forbids repetition.
    #[error("duplicated tag: {tag}")]
    DuplicatedTag {
        /// The repeated tag number.
        tag: u32,
    },

    /// A field required by the message kind is absent.
    #[error("missing required field: {field}")]
    MissingRequiredField {
        /// The missing field.
        field: FieldName,
    },

    /// A field value cannot be converted to its semantic type.
    #[error("invalid value for {field}: {reason}")]
    InvalidFieldValue {
        /// The offending field.
        field: FieldName,
        /// Description of why the value is invalid.
        reason: String,
    },

    /// A field value exceeds the maximum length its spec declares.
    #[error("value too long: {field} is {length} bytes, max {max_length}")]
    ValueTooLong {
        /// The offending field.
        field: FieldName,
        /// Actual length of the value in bytes.
        length: usize,
        /// Maximum length the spec allows.
        max_length: usize,
    },

    /// Invalid UTF-8 in a text field.
    #[error("invalid utf-8 in field: {0}")]
    InvalidUtf8(String),
}

impl DecodeError {
    /// Maps this error to its reject kind.
    #[must_use]
    pub const fn kind(&self) -> RejectKind {
        match self {
            Self::Malformed { .. }
            | Self::BeginStringMismatch { .. }
            | Self::ChecksumMismatch { .. }
            | Self::DuplicatedTag { .. }
            | Self::InvalidFieldValue { .. }
            | Self::InvalidUtf8(_) => RejectKind::MalformedFrame,
            Self::LengthMismatch { .. } => RejectKind::LengthMismatch,
            Self::Truncated { .. } => RejectKind::TruncatedFrame,
            Self::UnknownMessageType(_) => RejectKind::UnknownMessageType,
            Self::MissingRequiredField { .. } => RejectKind::IncompleteMessage,
            Self::ValueTooLong { .. } => RejectKind::FieldTooLong,
        }
    }
}

/// Errors that occur during frame encoding.
///
/// These are programming-contract violations rather than recoverable wire
/// errors: a [`SemanticMessage`](crate::message::SemanticMessage) handed to
/// an encoder is expected to satisfy its spec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A field required by the message spec is absent from the message.
    #[error("incomplete message: missing required field {field}")]
    MissingRequiredField {
        /// The missing field.
        field: FieldName,
    },

    /// A value exceeds the declared fixed width of its wire field.
    #[error("field too long: {field} is {length} bytes, max {max_length}")]
    FieldTooLong {
        /// The offending field.
        field: FieldName,
        /// Actual length of the value in bytes.
        length: usize,
        /// Maximum width the wire field allows.
        max_length: usize,
    },

    /// A value cannot be represented in its wire encoding.
    #[error("invalid value for {field}: {reason}")]
    InvalidFieldValue {
        /// The offending field.
        field: FieldName,
        /// Description of why the value cannot be encoded.
        reason: String,
    },
}

impl EncodeError {
    /// Maps this error to its reject kind.
    #[must_use]
    pub const fn kind(&self) -> RejectKind {
        match self {
            Self::MissingRequiredField { .. } => RejectKind::IncompleteMessage,
            Self::FieldTooLong { .. } => RejectKind::FieldTooLong,
            Self::InvalidFieldValue { .. } => RejectKind::MalformedFrame,
        }
    }
}

/// Errors that occur while translating a message between schemas.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// An enumerated code has no entry in the translation table.
    #[error("unsupported enum value for {field}: 0x{code:02x}")]
    UnsupportedEnumValue {
        /// The enumerated field.
        field: FieldName,
        /// The code with no mapping.
        code: u8,
    },

    /// A source value is wider than the target field's fixed width.
    #[error("field too long: {field} is {length} bytes, target width {max_length}")]
    FieldTooLong {
        /// The offending field.
        field: FieldName,
        /// Length of the source value in bytes.
        length: usize,
        /// Fixed width of the target field.
        max_length: usize,
    },

    /// A field required by the target schema is absent from the source.
    #[error("incomplete message: target requires {field}")]
    MissingField {
        /// The field the target schema requires.
        field: FieldName,
    },

    /// A price cannot be represented exactly at the target scale.
    #[error("price {raw} at scale {source_scale} not representable at scale {target_scale}")]
    PriceNotRepresentable {
        /// Source price in ticks.
        raw: i64,
        /// Source scale factor.
        source_scale: u32,
        /// Target scale factor.
        target_scale: u32,
    },
}

impl TranslateError {
    /// Maps this error to its reject kind.
    #[must_use]
    pub const fn kind(&self) -> RejectKind {
        match self {
            Self::UnsupportedEnumValue { .. } => RejectKind::UnsupportedEnumValue,
            Self::FieldTooLong { .. } => RejectKind::FieldTooLong,
            Self::MissingField { .. } => RejectKind::IncompleteMessage,
            Self::PriceNotRepresentable { .. } => RejectKind::MalformedFrame,
        }
    }
}

/// Errors in session sequencing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Inbound sequence number at or below the last one processed.
    #[error("duplicate sequence: expected > {last_seen}, received {received}")]
    DuplicateSequence {
        /// Last inbound sequence number processed for the session.
        last_seen: u64,
        /// Received sequence number.
        received: u64,
    },
}

impl SessionError {
    /// Maps this error to its reject kind.
    #[must_use]
    pub const fn kind(&self) -> RejectKind {
        match self {
            Self::DuplicateSequence { .. } => RejectKind::DuplicateSequence,
        }
    }
}

/// Errors in schema registry lookup and construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// No message spec registered for the requested (format, kind) pair.
    #[error("no spec for {kind:?} in {format:?} schema")]
    NotFound {
        /// The wire format of the lookup.
        format: WireFormat,
        /// The message kind of the lookup.
        kind: MsgKind,
    },

    /// Two specs in the same format declare the same discriminator.
    #[error("duplicate discriminator in {format:?} schema: {discriminator}")]
    DuplicateDiscriminator {
        /// The wire format being populated.
        format: WireFormat,
        /// Display form of the colliding discriminator.
        discriminator: String,
    },
}

impl SchemaError {
    /// Maps this error to its reject kind.
    #[must_use]
    pub const fn kind(&self) -> RejectKind {
        match self {
            // Registry construction errors are fatal at startup and never
            // reach the per-message path; lookups map to SchemaNotFound.
            Self::NotFound { .. } | Self::DuplicateDiscriminator { .. } => {
                RejectKind::SchemaNotFound
            }
        }
    }
}
