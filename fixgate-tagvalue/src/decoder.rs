/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema-driven tag=value decoder.
//!
//! Decoding is two-pass: the frame is first split into ordered `tag=value`
//! pairs and checked against the framing contract (begin string, body
//! length, trailing checksum), then the discriminator tag selects a message
//! spec and each pair is converted to its semantic type under that spec's
//! control. Field values reference the input buffer until they are sealed
//! into a [`SemanticMessage`].

use crate::checksum::{CHECKSUM_WIDTH, calculate_checksum, parse_checksum};
use fixgate_core::error::DecodeError;
use fixgate_core::message::{FieldMap, FieldValue, SemanticMessage};
use fixgate_core::types::Ident;
use fixgate_schema::spec::{FieldSpec, SemanticType};
use fixgate_schema::{SchemaRegistry, tags};
use memchr::memchr;
use smallvec::SmallVec;

/// SOH (Start of Header) field separator.
pub const SOH: u8 = 0x01;

/// Delimiter between tag and value.
pub const EQUALS: u8 = b'=';

/// Wire length of the trailing checksum field (`10=XXX` + SOH).
const CHECKSUM_FIELD_LEN: usize = 3 + CHECKSUM_WIDTH + 1;

/// Schema-driven decoder for the text session protocol.
///
/// Stateless apart from its registry reference; safe to share across
/// sessions and invoke concurrently on independent inputs.
#[derive(Debug)]
pub struct Decoder<'r> {
    registry: &'r SchemaRegistry,
    validate_checksum: bool,
}

impl<'r> Decoder<'r> {
    /// Creates a decoder over the given schema registry.
    #[must_use]
    pub const fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            registry,
            validate_checksum: true,
        }
    }

    /// Sets whether to validate the trailing checksum.
    #[must_use]
    pub const fn with_checksum_validation(mut self, validate: bool) -> Self {
        self.validate_checksum = validate;
        self
    }

    /// Decodes one complete frame into a semantic message.
    ///
    /// # Errors
    /// Returns `DecodeError` for any framing or field violation; the error
    /// maps to `MalformedFrame`, `LengthMismatch`, or `IncompleteMessage`
    /// reject kinds depending on what failed.
    pub fn decode(&self, input: &[u8]) -> Result<SemanticMessage, DecodeError> {
        let mut cursor = FieldCursor::new(input);

        // Framing pass: begin string, body length.
        let begin = cursor
            .next_field()?
            .ok_or_else(|| malformed("empty frame"))?;
        if begin.tag != tags::BEGIN_STRING {
            return Err(malformed("frame does not start with begin string"));
        }
        if begin.value != self.registry.begin_string().as_bytes() {
            return Err(DecodeError::BeginStringMismatch {
                expected: self.registry.begin_string().to_string(),
                found: String::from_utf8_lossy(begin.value).into_owned(),
            });
        }

        let length = cursor
            .next_field()?
            .ok_or_else(|| malformed("missing body length field"))?;
        if length.tag != tags::BODY_LENGTH {
            return Err(malformed("missing body length field"));
        }
        let declared = parse_uint(length.value)
            .and_then(|v| usize::try_from(v).ok())
            .ok_or_else(|| malformed("invalid body length value"))?;
        let body_start = cursor.offset();

        // Collect body fields up to the checksum field.
        let mut body: SmallVec<[(u32, &[u8]); 12]> = SmallVec::new();
        let checksum_start;
        let declared_checksum;
        loop {
            let field = cursor
                .next_field()?
                .ok_or_else(|| malformed("missing checksum field"))?;
            if field.tag == tags::CHECKSUM {
                checksum_start = field.start;
                declared_checksum = parse_checksum(field.value)
                    .ok_or_else(|| malformed("invalid checksum format"))?;
                break;
            }
            if body.iter().any(|(tag, _)| *tag == field.tag) {
                return Err(DecodeError::DuplicatedTag { tag: field.tag });
            }
            body.push((field.tag, field.value));
        }
        if !cursor.is_empty() {
            return Err(malformed("bytes after checksum field"));
        }

        let actual = checksum_start - body_start;
        if actual != declared {
            return Err(DecodeError::LengthMismatch { declared, actual });
        }

        if self.validate_checksum {
            let calculated = calculate_checksum(&input[..checksum_start]);
            if calculated != declared_checksum {
                return Err(DecodeError::ChecksumMismatch {
                    calculated,
                    declared: declared_checksum,
                });
            }
        }

        // Dispatch pass: discriminator selects the spec, then every pair is
        // converted under the spec's control. Tags the spec does not name
        // are ignored.
        let msg_type = body
            .iter()
            .find(|(tag, _)| *tag == tags::MSG_TYPE)
            .map(|(_, value)| *value)
            .ok_or_else(|| malformed("missing message type field"))?;
        let msg_type = std::str::from_utf8(msg_type)
            .map_err(|_| malformed("message type is not valid utf-8"))?;
        let spec = self
            .registry
            .by_msg_type(msg_type)
            .ok_or_else(|| malformed(&format!("unrecognized message type '{msg_type}'")))?;

        let mut fields = FieldMap::new();
        for (tag, value) in &body {
            if *tag == tags::MSG_TYPE {
                continue;
            }
            if let Some(field_spec) = spec.field_by_tag(*tag) {
                fields.insert(field_spec.name, convert_value(field_spec, value)?);
            }
        }

        // Required-ness comes from the spec, not the message kind: the
        // sequence number lives outside the typed body, so the kind alone
        // cannot enforce it.
        for field_spec in spec.fields() {
            if field_spec.required && !fields.contains(field_spec.name) {
                return Err(DecodeError::MissingRequiredField {
                    field: field_spec.name,
                });
            }
        }

        SemanticMessage::from_fields(spec.kind, &fields)
    }
}

/// Returns the total length of the first complete frame at the start of
/// `input`, or `None` if the buffer does not yet hold one.
///
/// The boundary is the end of the checksum field located after the declared
/// body length, per the session protocol's framing contract. Malformed
/// prefixes also return `None`; the caller surfaces the error by decoding.
#[must_use]
pub fn frame_length(input: &[u8]) -> Option<usize> {
    let mut cursor = FieldCursor::new(input);
    let begin = cursor.next_field().ok()??;
    if begin.tag != tags::BEGIN_STRING {
        return None;
    }
    let length = cursor.next_field().ok()??;
    if length.tag != tags::BODY_LENGTH {
        return None;
    }
    let declared = parse_uint(length.value).and_then(|v| usize::try_from(v).ok())?;
    let end = cursor.offset().checked_add(declared)?.checked_add(CHECKSUM_FIELD_LEN)?;
    (input.len() >= end).then_some(end)
}

/// Converts one wire value to its semantic type under a field spec.
fn convert_value(spec: &FieldSpec, value: &[u8]) -> Result<FieldValue, DecodeError> {
    match spec.semantic {
        SemanticType::UInt => parse_uint(value)
            .map(FieldValue::UInt)
            .ok_or_else(|| invalid(spec, "not an unsigned integer")),
        SemanticType::Price { scale } => {
            let text = std::str::from_utf8(value)
                .map_err(|_| DecodeError::InvalidUtf8(spec.name.to_string()))?;
            fixgate_core::types::Price::parse_display(text, scale)
                .map(FieldValue::Price)
                .ok_or_else(|| invalid(spec, "not a decimal price at the dialect scale"))
        }
        SemanticType::Text => {
            let text = std::str::from_utf8(value)
                .map_err(|_| DecodeError::InvalidUtf8(spec.name.to_string()))?;
            if let Some(max) = spec.max_len
                && text.len() > max
            {
                return Err(DecodeError::ValueTooLong {
                    field: spec.name,
                    length: text.len(),
                    max_length: max,
                });
            }
            Ident::new(text).map(FieldValue::Text).ok_or_else(|| {
                DecodeError::ValueTooLong {
                    field: spec.name,
                    length: text.len(),
                    max_length: fixgate_core::types::IDENT_MAX_LEN,
                }
            })
        }
        SemanticType::Code => match value {
            [code] => Ok(FieldValue::Code(*code)),
            _ => Err(invalid(spec, "expected single-byte code")),
        },
    }
}

fn malformed(reason: &str) -> DecodeError {
    DecodeError::Malformed {
        reason: reason.to_string(),
    }
}

fn invalid(spec: &FieldSpec, reason: &str) -> DecodeError {
    DecodeError::InvalidFieldValue {
        field: spec.name,
        reason: reason.to_string(),
    }
}

/// One raw `tag=value` pair, referencing the input buffer.
#[derive(Debug, Clone, Copy)]
struct RawField<'a> {
    tag: u32,
    value: &'a [u8],
    /// Byte offset of the pair's first tag digit within the frame.
    start: usize,
}

/// Cursor splitting a frame into ordered `tag=value` pairs.
#[derive(Debug)]
struct FieldCursor<'a> {
    input: &'a [u8],
    offset: usize,
}

impl<'a> FieldCursor<'a> {
    const fn new(input: &'a [u8]) -> Self {
        Self { input, offset: 0 }
    }

    const fn offset(&self) -> usize {
        self.offset
    }

    fn is_empty(&self) -> bool {
        self.offset >= self.input.len()
    }

    /// Parses the next pair, or `Ok(None)` at end of input.
    ///
    /// # Errors
    /// Returns `Malformed` for a pair without `=`, an unparseable tag, or
    /// a pair without a trailing separator.
    fn next_field(&mut self) -> Result<Option<RawField<'a>>, DecodeError> {
        if self.is_empty() {
            return Ok(None);
        }
        let start = self.offset;
        let remaining = &self.input[start..];

        let eq_pos =
            memchr(EQUALS, remaining).ok_or_else(|| malformed("field missing '=' delimiter"))?;
        let tag = parse_tag(&remaining[..eq_pos]).ok_or_else(|| malformed("invalid tag number"))?;

        let value_start = eq_pos + 1;
        let soh_pos = memchr(SOH, &remaining[value_start..])
            .ok_or_else(|| malformed("field missing separator"))?;
        let value = &remaining[value_start..value_start + soh_pos];

        self.offset = start + value_start + soh_pos + 1;
        Ok(Some(RawField { tag, value, start }))
    }
}

/// Parses a tag number from ASCII digits.
#[inline]
fn parse_tag(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() || bytes.len() > 10 {
        return None;
    }
    let mut result: u32 = 0;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return None;
        }
        result = result.checked_mul(10)?.checked_add(u32::from(b - b'0'))?;
    }
    Some(result)
}

/// Parses an unsigned integer value from ASCII digits.
#[inline]
fn parse_uint(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() || bytes.len() > 20 {
        return None;
    }
    let mut result: u64 = 0;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return None;
        }
        result = result.checked_mul(10)?.checked_add(u64::from(b - b'0'))?;
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::format_checksum;
    use fixgate_core::message::{FieldName, MessageBody, MsgKind};
    use fixgate_core::types::SeqNum;
    use fixgate_schema::BEGIN_STRING;

    /// Builds a framed message around the given body, computing the body
    /// length and checksum the way the encoder would.
    fn frame(body: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"8=");
        out.extend_from_slice(BEGIN_STRING.as_bytes());
        out.push(SOH);
        out.extend_from_slice(b"9=");
        out.extend_from_slice(body.len().to_string().as_bytes());
        out.push(SOH);
        out.extend_from_slice(body);
        let checksum = calculate_checksum(&out);
        out.extend_from_slice(b"10=");
        out.extend_from_slice(&format_checksum(checksum));
        out.push(SOH);
        out
    }

    fn new_order_body() -> Vec<u8> {
        b"35=D\x0134=5\x0111=ORD1\x0154=1\x0138=100\x0155=AAPL\x0144=150.00\x01".to_vec()
    }

    fn registry() -> SchemaRegistry {
        SchemaRegistry::standard()
    }

    #[test]
    fn test_decode_new_order() {
        let registry = registry();
        let decoder = Decoder::new(&registry);
        let msg = decoder.decode(&frame(&new_order_body())).unwrap();

        assert_eq!(msg.kind(), MsgKind::NewOrder);
        assert_eq!(msg.seq(), Some(SeqNum::new(5)));
        match msg.body() {
            MessageBody::NewOrder(o) => {
                assert_eq!(o.client_order_id.as_str(), "ORD1");
                assert_eq!(o.side, b'1');
                assert_eq!(o.quantity, 100);
                assert_eq!(o.symbol.as_str(), "AAPL");
                assert_eq!(o.price.raw(), 15000);
                assert_eq!(o.price.scale(), 100);
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn test_decode_ignores_unknown_tags() {
        let registry = registry();
        let decoder = Decoder::new(&registry);
        let body =
            b"35=D\x0134=5\x0111=ORD1\x0154=1\x0138=100\x0155=AAPL\x0144=150.00\x0158=ignored\x01";
        let msg = decoder.decode(&frame(body)).unwrap();
        assert_eq!(msg.kind(), MsgKind::NewOrder);
    }

    #[test]
    fn test_checksum_mismatch() {
        let registry = registry();
        let decoder = Decoder::new(&registry);
        let mut framed = frame(&new_order_body());
        // Corrupt one body byte without touching the checksum field.
        let idx = framed.len() - 10;
        framed[idx] ^= 0x01;
        assert!(matches!(
            decoder.decode(&framed),
            Err(DecodeError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_every_corrupted_byte_fails() {
        let registry = registry();
        let decoder = Decoder::new(&registry);
        let framed = frame(&new_order_body());
        let checksum_start = framed.len() - CHECKSUM_FIELD_LEN;
        for idx in 0..checksum_start {
            let mut corrupted = framed.clone();
            corrupted[idx] ^= 0x01;
            assert!(
                decoder.decode(&corrupted).is_err(),
                "byte {idx} corruption went undetected"
            );
        }
    }

    #[test]
    fn test_checksum_validation_can_be_disabled() {
        let registry = registry();
        let decoder = Decoder::new(&registry).with_checksum_validation(false);
        let mut framed = frame(&new_order_body());
        let len = framed.len();
        // Change the last checksum digit to a wrong but in-range value.
        framed[len - 2] = if framed[len - 2] == b'0' { b'1' } else { b'0' };
        assert!(decoder.decode(&framed).is_ok());
    }

    #[test]
    fn test_length_mismatch() {
        let registry = registry();
        let decoder = Decoder::new(&registry);
        let body = new_order_body();
        // Declare one byte fewer than the body actually holds.
        let mut out = Vec::new();
        out.extend_from_slice(b"8=");
        out.extend_from_slice(BEGIN_STRING.as_bytes());
        out.push(SOH);
        out.extend_from_slice(b"9=");
        out.extend_from_slice((body.len() - 1).to_string().as_bytes());
        out.push(SOH);
        out.extend_from_slice(&body);
        let checksum = calculate_checksum(&out);
        out.extend_from_slice(b"10=");
        out.extend_from_slice(&format_checksum(checksum));
        out.push(SOH);

        assert!(matches!(
            decoder.decode(&out),
            Err(DecodeError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_begin_string_mismatch() {
        let registry = registry();
        let decoder = Decoder::new(&registry);
        let framed = frame(&new_order_body());
        let mut wrong = framed.clone();
        wrong[2] = b'X';
        let err = decoder.decode(&wrong).unwrap_err();
        // Either the begin-string check or the checksum catches it first;
        // the begin string is checked before the checksum.
        assert!(matches!(err, DecodeError::BeginStringMismatch { .. }));
    }

    #[test]
    fn test_missing_discriminator() {
        let registry = registry();
        let decoder = Decoder::new(&registry);
        let body = b"34=5\x0111=ORD1\x01";
        let err = decoder.decode(&frame(body)).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { .. }));
    }

    #[test]
    fn test_unrecognized_discriminator() {
        let registry = registry();
        let decoder = Decoder::new(&registry);
        let body = b"35=Q\x0134=5\x01";
        let err = decoder.decode(&frame(body)).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { .. }));
    }

    #[test]
    fn test_duplicated_tag() {
        let registry = registry();
        let decoder = Decoder::new(&registry);
        let body = b"35=D\x0134=5\x0134=6\x0111=ORD1\x0154=1\x0138=100\x0155=AAPL\x0144=150.00\x01";
        assert_eq!(
            decoder.decode(&frame(body)).unwrap_err(),
            DecodeError::DuplicatedTag { tag: 34 }
        );
    }

    #[test]
    fn test_missing_required_field() {
        let registry = registry();
        let decoder = Decoder::new(&registry);
        let body = b"35=D\x0134=5\x0111=ORD1\x0154=1\x0138=100\x0155=AAPL\x01";
        assert_eq!(
            decoder.decode(&frame(body)).unwrap_err(),
            DecodeError::MissingRequiredField {
                field: FieldName::Price
            }
        );
    }

    #[test]
    fn test_missing_seq_num_rejected() {
        let registry = registry();
        let decoder = Decoder::new(&registry);
        // A frame that never carried tag 34 must not decode; a message
        // without a sequence number would bypass the duplicate check.
        let body = b"35=D\x0111=ORD1\x0154=1\x0138=100\x0155=AAPL\x0144=150.00\x01";
        assert_eq!(
            decoder.decode(&frame(body)).unwrap_err(),
            DecodeError::MissingRequiredField {
                field: FieldName::SeqNum
            }
        );
    }

    #[test]
    fn test_symbol_exceeds_max_length() {
        let registry = registry();
        let decoder = Decoder::new(&registry);
        let body = b"35=D\x0134=5\x0111=ORD1\x0154=1\x0138=100\x0155=LONGNAME9\x0144=150.00\x01";
        assert_eq!(
            decoder.decode(&frame(body)).unwrap_err(),
            DecodeError::ValueTooLong {
                field: FieldName::Symbol,
                length: 9,
                max_length: 8
            }
        );
    }

    #[test]
    fn test_field_without_equals() {
        let registry = registry();
        let decoder = Decoder::new(&registry);
        let body = b"35=D\x01garbage\x01";
        assert!(matches!(
            decoder.decode(&frame(body)).unwrap_err(),
            DecodeError::Malformed { .. }
        ));
    }

    #[test]
    fn test_missing_trailing_separator() {
        let registry = registry();
        let decoder = Decoder::new(&registry);
        let mut framed = frame(&new_order_body());
        framed.pop();
        assert!(matches!(
            decoder.decode(&framed).unwrap_err(),
            DecodeError::Malformed { .. }
        ));
    }

    #[test]
    fn test_frame_length() {
        let framed = frame(&new_order_body());
        assert_eq!(frame_length(&framed), Some(framed.len()));

        // Incomplete buffer: boundary not yet determinable.
        assert_eq!(frame_length(&framed[..framed.len() - 1]), None);
        assert_eq!(frame_length(b"8=FIXG.1\x01"), None);
        assert_eq!(frame_length(b""), None);

        // Two frames back to back: boundary of the first.
        let mut two = framed.clone();
        two.extend_from_slice(&framed);
        assert_eq!(frame_length(&two), Some(framed.len()));
    }

    #[test]
    fn test_parse_tag() {
        assert_eq!(parse_tag(b"8"), Some(8));
        assert_eq!(parse_tag(b"35"), Some(35));
        assert_eq!(parse_tag(b""), None);
        assert_eq!(parse_tag(b"12a"), None);
    }

    #[test]
    fn test_parse_uint() {
        assert_eq!(parse_uint(b"0"), Some(0));
        assert_eq!(parse_uint(b"18446744073709551615"), Some(u64::MAX));
        assert_eq!(parse_uint(b""), None);
        assert_eq!(parse_uint(b"1x"), None);
    }
}
