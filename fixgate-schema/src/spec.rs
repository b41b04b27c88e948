/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema definitions shared by both wire codecs.
//!
//! This module defines the structures that describe every supported logical
//! message for both wire formats:
//! - [`FieldSpec`]: One field — semantic type, wire location, width, required
//! - [`MessageSpec`]: Ordered field set for one (format, kind) pair plus its
//!   wire discriminator
//! - [`Discriminator`]: Tag-35 value (text) or type byte (binary)
//!
//! Specs are plain serde-derived data: the registry treats them as a
//! declarative source and never mutates them after startup.

use fixgate_core::message::{FieldName, MsgKind, WireFormat};
use serde::{Deserialize, Serialize};

/// Semantic type of a field, independent of wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SemanticType {
    /// Unsigned integer.
    UInt,
    /// Price in integer ticks at the given scale.
    Price {
        /// Ticks per display unit.
        scale: u32,
    },
    /// Bounded text.
    Text,
    /// Single-byte enumerated code.
    Code,
}

/// Where a field lives on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireLocation {
    /// Text format: a `tag=value` pair.
    Tag {
        /// Tag number.
        tag: u32,
    },
    /// Binary format: fixed byte offset and width within the frame.
    Fixed {
        /// Byte offset from the start of the frame.
        offset: usize,
        /// Field width in bytes.
        width: usize,
    },
}

/// Wire discriminator selecting a message spec.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Discriminator {
    /// Text format: value of the message-type tag.
    MsgType(String),
    /// Binary format: first byte of the frame.
    TypeByte(u8),
}

impl std::fmt::Display for Discriminator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MsgType(s) => write!(f, "{s}"),
            Self::TypeByte(b) => write!(f, "0x{b:02x}"),
        }
    }
}

/// Static schema entry for one field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Semantic field name.
    pub name: FieldName,
    /// Semantic type.
    pub semantic: SemanticType,
    /// Wire location.
    pub location: WireLocation,
    /// Whether the field must be present.
    pub required: bool,
    /// Maximum value length in bytes for text fields. For binary fields
    /// the fixed width bounds the value; this caps text-format fields.
    pub max_len: Option<usize>,
}

impl FieldSpec {
    /// Creates a required field spec.
    #[must_use]
    pub const fn required(name: FieldName, semantic: SemanticType, location: WireLocation) -> Self {
        Self {
            name,
            semantic,
            location,
            required: true,
            max_len: None,
        }
    }

    /// Creates an optional field spec.
    #[must_use]
    pub const fn optional(name: FieldName, semantic: SemanticType, location: WireLocation) -> Self {
        Self {
            name,
            semantic,
            location,
            required: false,
            max_len: None,
        }
    }

    /// Sets the maximum text length.
    #[must_use]
    pub const fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    /// Returns the tag number for a text-format field.
    #[must_use]
    pub const fn tag(&self) -> Option<u32> {
        match self.location {
            WireLocation::Tag { tag } => Some(tag),
            WireLocation::Fixed { .. } => None,
        }
    }

    /// Returns the (offset, width) for a binary-format field.
    #[must_use]
    pub const fn fixed(&self) -> Option<(usize, usize)> {
        match self.location {
            WireLocation::Fixed { offset, width } => Some((offset, width)),
            WireLocation::Tag { .. } => None,
        }
    }

    /// Returns the maximum byte width a value of this field may occupy:
    /// the fixed wire width for binary fields, `max_len` for text fields.
    #[must_use]
    pub fn value_width(&self) -> Option<usize> {
        match self.location {
            WireLocation::Fixed { width, .. } => Some(width),
            WireLocation::Tag { .. } => self.max_len,
        }
    }
}

/// Ordered set of field specs for one message kind in one wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSpec {
    /// Logical message kind.
    pub kind: MsgKind,
    /// Wire format this spec describes.
    pub format: WireFormat,
    /// Wire discriminator.
    pub discriminator: Discriminator,
    /// Fields in canonical wire order. Framing fields (begin string, body
    /// length, message type, checksum) are implicit and owned by the codec.
    pub fields: Vec<FieldSpec>,
    /// Total frame width in bytes for binary specs; 0 for text specs.
    pub wire_size: usize,
}

impl MessageSpec {
    /// Creates a text-format message spec.
    #[must_use]
    pub fn tag_value(kind: MsgKind, msg_type: &str, fields: Vec<FieldSpec>) -> Self {
        Self {
            kind,
            format: WireFormat::TagValue,
            discriminator: Discriminator::MsgType(msg_type.to_string()),
            fields,
            wire_size: 0,
        }
    }

    /// Creates a binary-format message spec.
    ///
    /// The frame width is derived from the field layout: one discriminator
    /// byte plus the end of the furthest field.
    #[must_use]
    pub fn fixed_binary(kind: MsgKind, type_byte: u8, fields: Vec<FieldSpec>) -> Self {
        let wire_size = fields
            .iter()
            .filter_map(FieldSpec::fixed)
            .map(|(offset, width)| offset + width)
            .max()
            .unwrap_or(0)
            .max(1);
        Self {
            kind,
            format: WireFormat::FixedBinary,
            discriminator: Discriminator::TypeByte(type_byte),
            fields,
            wire_size,
        }
    }

    /// Gets a field spec by semantic name.
    #[must_use]
    pub fn field(&self, name: FieldName) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Gets a text-format field spec by tag number.
    #[must_use]
    pub fn field_by_tag(&self, tag: u32) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.tag() == Some(tag))
    }

    /// Returns an iterator over the fields in canonical wire order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    /// Returns an iterator over the required fields.
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }
}
