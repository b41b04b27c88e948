/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Bridge pipeline.
//!
//! One inbound frame flows through four stages: decode, sequence check,
//! translate, encode. Any failure collapses into a [`RejectRecord`] scoped
//! to that single message; the session itself keeps running. Rejects on
//! the client-to-exchange path can additionally produce an outbound text
//! reject frame when the offending order identifier is known.

use crate::config::BridgeConfig;
use bytes::Bytes;
use fixgate_core::error::{BridgeError, DecodeError, RejectKind, SessionError};
use fixgate_core::message::{MessageBody, OrderReject, RawFrame, SemanticMessage};
use fixgate_core::types::{OrderId, SeqNum, SessionId};
use fixgate_schema::SchemaRegistry;
use fixgate_session::{SeqCheck, SessionSequencer};
use fixgate_translate::{Direction, TranslationTable, Translator};
use tracing::{debug, warn};

/// Pipeline stage at which a message was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Wire decoding of the inbound frame.
    Decode,
    /// Inbound sequence number check.
    Sequence,
    /// Cross-schema field translation.
    Translate,
    /// Wire encoding of the outbound frame.
    Encode,
}

/// Reject reason codes carried in outbound reject frames.
const fn reason_code(kind: RejectKind) -> u8 {
    match kind {
        RejectKind::MalformedFrame => 1,
        RejectKind::LengthMismatch => 2,
        RejectKind::TruncatedFrame => 3,
        RejectKind::UnknownMessageType => 4,
        RejectKind::IncompleteMessage => 5,
        RejectKind::FieldTooLong => 6,
        RejectKind::UnsupportedEnumValue => 7,
        RejectKind::SchemaNotFound => 8,
        RejectKind::DuplicateSequence => 9,
    }
}

/// An inbound sequence gap observed while accepting a message.
///
/// The message itself is processed normally; the caller owns whatever
/// gap-fill recovery the session requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceGap {
    /// The number the watermark expected next.
    pub expected: u64,
    /// The number actually received.
    pub received: u64,
}

/// Record of a rejected message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectRecord {
    /// Stage that rejected the message.
    pub stage: Stage,
    /// Rejection reason kind.
    pub kind: RejectKind,
    /// Order identifier, when decoding got far enough to recover it.
    pub client_order_id: Option<OrderId>,
    /// Human-readable description of the failure.
    pub detail: String,
    /// Encoded text reject frame, when one could be built.
    pub frame: Option<Bytes>,
}

/// Outcome of processing one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeOutcome {
    /// The translated frame, ready for the other side.
    Forwarded {
        /// Encoded outbound frame.
        frame: Bytes,
        /// Outbound sequence number stamped on the frame, for frames
        /// whose wire format carries one.
        seq: Option<SeqNum>,
        /// Inbound sequence gap the message arrived across, if any.
        gap: Option<SequenceGap>,
    },
    /// The message was dropped; the record says why.
    Rejected(RejectRecord),
}

impl BridgeOutcome {
    /// Returns true if the message was forwarded.
    #[must_use]
    pub const fn is_forwarded(&self) -> bool {
        matches!(self, Self::Forwarded { .. })
    }
}

/// Stateless-per-message protocol bridge.
///
/// Owns the schema registry, the translation table, and the per-session
/// sequence state. Frame transport is the caller's concern; the bridge
/// maps one complete inbound frame to one outcome.
#[derive(Debug)]
pub struct Bridge {
    registry: SchemaRegistry,
    table: TranslationTable,
    config: BridgeConfig,
    sequencer: SessionSequencer,
}

impl Bridge {
    /// Creates a bridge over the given registry with the standard
    /// translation table.
    #[must_use]
    pub fn new(registry: SchemaRegistry, config: BridgeConfig) -> Self {
        Self {
            registry,
            table: TranslationTable::standard(),
            config,
            sequencer: SessionSequencer::new(),
        }
    }

    /// Replaces the translation table.
    #[must_use]
    pub fn with_table(mut self, table: TranslationTable) -> Self {
        self.table = table;
        self
    }

    /// Returns the session sequencer, for lifecycle signals.
    #[must_use]
    pub const fn sequencer(&self) -> &SessionSequencer {
        &self.sequencer
    }

    /// Returns the schema registry.
    #[must_use]
    pub const fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Processes one text frame from a client session into a binary
    /// exchange frame.
    ///
    /// Duplicate sequence numbers are rejected. A gap is logged, the
    /// message is processed normally, and the verdict is carried on the
    /// forwarded outcome so the caller can drive its own recovery.
    pub fn client_to_exchange(
        &self,
        session: &SessionId,
        frame: impl Into<RawFrame>,
    ) -> BridgeOutcome {
        let frame = frame.into();
        if let Err(err) = self.check_frame_size(&frame) {
            return self.reject(session, Stage::Decode, None, err);
        }

        let decoder = fixgate_tagvalue::Decoder::new(&self.registry)
            .with_checksum_validation(self.config.validate_checksum);
        let msg = match decoder.decode(frame.payload()) {
            Ok(msg) => msg,
            Err(err) => return self.reject(session, Stage::Decode, None, err.into()),
        };
        let client_order_id = Some(msg.client_order_id());

        let mut gap = None;
        if let Some(seq) = msg.seq() {
            match self.sequencer.check_inbound(session, seq) {
                SeqCheck::Duplicate {
                    last_seen,
                    received,
                } => {
                    let err = SessionError::DuplicateSequence {
                        last_seen,
                        received,
                    };
                    return self.reject(session, Stage::Sequence, client_order_id, err.into());
                }
                SeqCheck::Gap { expected, received } => {
                    gap = Some(SequenceGap { expected, received });
                }
                SeqCheck::InOrder => {}
            }
        }

        let translator = Translator::new(&self.registry, self.table.clone());
        let translated = match translator.translate(&msg, Direction::ToExchange) {
            Ok(translated) => translated,
            Err(err) => return self.reject(session, Stage::Translate, client_order_id, err),
        };

        match fixgate_binary::Encoder::new(&self.registry).encode(&translated) {
            Ok(out) => {
                debug!(
                    session = %session,
                    kind = ?msg.kind(),
                    bytes = out.len(),
                    "forwarded to exchange"
                );
                BridgeOutcome::Forwarded {
                    frame: out,
                    seq: None,
                    gap,
                }
            }
            Err(err) => self.reject(session, Stage::Encode, client_order_id, err),
        }
    }

    /// Processes one binary frame from the exchange into a text frame for
    /// the client session, stamping the next outbound sequence number.
    pub fn exchange_to_client(
        &self,
        session: &SessionId,
        frame: impl Into<RawFrame>,
    ) -> BridgeOutcome {
        let frame = frame.into();
        if let Err(err) = self.check_frame_size(&frame) {
            return self.reject(session, Stage::Decode, None, err);
        }

        let msg = match fixgate_binary::Decoder::new(&self.registry).decode(frame.payload()) {
            Ok(msg) => msg,
            Err(err) => return self.reject(session, Stage::Decode, None, err.into()),
        };
        let client_order_id = Some(msg.client_order_id());

        let translator = Translator::new(&self.registry, self.table.clone());
        let mut translated = match translator.translate(&msg, Direction::ToClient) {
            Ok(translated) => translated,
            Err(err) => return self.reject(session, Stage::Translate, client_order_id, err),
        };

        let seq = self.sequencer.next_outbound(session);
        translated.set_seq(seq);

        match fixgate_tagvalue::Encoder::new(&self.registry).encode(&translated) {
            Ok(out) => {
                debug!(
                    session = %session,
                    kind = ?msg.kind(),
                    seq = seq.value(),
                    bytes = out.len(),
                    "forwarded to client"
                );
                BridgeOutcome::Forwarded {
                    frame: out,
                    seq: Some(seq),
                    gap: None,
                }
            }
            Err(err) => self.reject(session, Stage::Encode, client_order_id, err),
        }
    }

    /// Rejects frames larger than the configured limit before decoding.
    fn check_frame_size(&self, frame: &RawFrame) -> Result<(), BridgeError> {
        if frame.len() > self.config.max_frame_size {
            return Err(DecodeError::Malformed {
                reason: format!(
                    "frame of {} bytes exceeds limit of {}",
                    frame.len(),
                    self.config.max_frame_size
                ),
            }
            .into());
        }
        Ok(())
    }

    /// Builds the reject outcome for a failed message.
    fn reject(
        &self,
        session: &SessionId,
        stage: Stage,
        client_order_id: Option<OrderId>,
        err: BridgeError,
    ) -> BridgeOutcome {
        let kind = err.kind();
        warn!(
            session = %session,
            stage = ?stage,
            kind = %kind,
            "message rejected: {err}"
        );
        let frame = if self.config.emit_reject_frames {
            client_order_id.and_then(|id| self.build_reject_frame(session, id, kind))
        } else {
            None
        };
        BridgeOutcome::Rejected(RejectRecord {
            stage,
            kind,
            client_order_id,
            detail: err.to_string(),
            frame,
        })
    }

    /// Encodes an outbound text reject frame carrying the reason code for
    /// `kind`. Returns `None` if encoding fails; the record still reports
    /// the rejection either way.
    fn build_reject_frame(
        &self,
        session: &SessionId,
        client_order_id: OrderId,
        kind: RejectKind,
    ) -> Option<Bytes> {
        let mut msg = SemanticMessage::new(MessageBody::Reject(OrderReject {
            client_order_id,
            reason: reason_code(kind),
        }));
        msg.set_seq(self.sequencer.next_outbound(session));
        fixgate_tagvalue::Encoder::new(&self.registry)
            .encode(&msg)
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixgate_schema::BEGIN_STRING;
    use fixgate_tagvalue::{SOH, calculate_checksum, format_checksum};

    fn bridge() -> Bridge {
        Bridge::new(SchemaRegistry::standard(), BridgeConfig::default())
    }

    fn session(name: &str) -> SessionId {
        SessionId::new(name).unwrap()
    }

    /// Frames a text body with computed length and checksum.
    fn text_frame(body: &[u8]) -> Vec<u8> {
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

    fn new_order_frame(seq: u64) -> Vec<u8> {
        text_frame(
            format!("35=D\x0134={seq}\x0111=ORD1\x0154=1\x0138=100\x0155=AAPL\x0144=150.00\x01")
                .as_bytes(),
        )
    }

    fn execution_frame() -> Vec<u8> {
        let mut frame = vec![0u8; 31];
        frame[0] = b'E';
        frame[1..15].copy_from_slice(b"ORD1          ");
        frame[15..19].copy_from_slice(&40u32.to_be_bytes());
        frame[19..23].copy_from_slice(&1_499_500u32.to_be_bytes());
        frame[23..31].copy_from_slice(&777_001u64.to_be_bytes());
        frame
    }

    #[test]
    fn test_order_reaches_exchange_as_exact_bytes() {
        let bridge = bridge();
        let outcome = bridge.client_to_exchange(&session("A"), new_order_frame(1));

        let BridgeOutcome::Forwarded { frame, seq, gap } = outcome else {
            panic!("unexpected outcome: {outcome:?}");
        };
        assert_eq!(seq, None);
        assert_eq!(gap, None);
        assert_eq!(frame.len(), 32);
        assert_eq!(frame[0], b'O');
        assert_eq!(&frame[1..15], b"ORD1          ");
        assert_eq!(frame[15], b'B');
        assert_eq!(&frame[16..20], &100u32.to_be_bytes());
        assert_eq!(&frame[20..28], b"AAPL    ");
        // 150.00 at two decimals becomes 1_500_000 at four.
        assert_eq!(&frame[28..32], &1_500_000u32.to_be_bytes());
    }

    #[test]
    fn test_execution_reaches_client_with_stamped_seq() {
        let bridge = bridge();
        let sess = session("A");

        let BridgeOutcome::Forwarded { frame, seq, .. } =
            bridge.exchange_to_client(&sess, execution_frame())
        else {
            panic!("execution not forwarded");
        };
        assert_eq!(seq, Some(SeqNum::new(1)));
        let text = String::from_utf8(frame.to_vec()).unwrap();
        assert!(text.contains("35=8\x01"));
        assert!(text.contains("34=1\x01"));
        assert!(text.contains("11=ORD1\x01"));
        assert!(text.contains("32=40\x01"));
        assert!(text.contains("31=149.95\x01"));
        assert!(text.contains("17=777001\x01"));

        // Next outbound frame gets the next number.
        let BridgeOutcome::Forwarded { seq, .. } =
            bridge.exchange_to_client(&sess, execution_frame())
        else {
            panic!("execution not forwarded");
        };
        assert_eq!(seq, Some(SeqNum::new(2)));
    }

    #[test]
    fn test_corrupted_checksum_rejected() {
        let bridge = bridge();
        let mut frame = new_order_frame(1);
        let idx = frame.len() - 10;
        frame[idx] ^= 0x01;

        let BridgeOutcome::Rejected(record) = bridge.client_to_exchange(&session("A"), frame)
        else {
            panic!("corrupt frame forwarded");
        };
        assert_eq!(record.stage, Stage::Decode);
        assert_eq!(record.kind, RejectKind::MalformedFrame);
        assert_eq!(record.client_order_id, None);
        assert_eq!(record.frame, None);
    }

    #[test]
    fn test_duplicate_sequence_rejected_with_reject_frame() {
        let bridge = bridge();
        let sess = session("A");

        for seq in 1..=5 {
            assert!(bridge.client_to_exchange(&sess, new_order_frame(seq)).is_forwarded());
        }
        let BridgeOutcome::Rejected(record) = bridge.client_to_exchange(&sess, new_order_frame(5))
        else {
            panic!("duplicate forwarded");
        };
        assert_eq!(record.stage, Stage::Sequence);
        assert_eq!(record.kind, RejectKind::DuplicateSequence);
        assert_eq!(record.client_order_id.unwrap().as_str(), "ORD1");

        let reject = record.frame.expect("reject frame");
        let text = String::from_utf8(reject.to_vec()).unwrap();
        assert!(text.contains("35=3\x01"));
        assert!(text.contains("11=ORD1\x01"));
        assert!(text.contains("103=9\x01"));
    }

    #[test]
    fn test_gap_is_forwarded_and_reported() {
        let bridge = bridge();
        let sess = session("A");

        for seq in 1..=5 {
            assert!(bridge.client_to_exchange(&sess, new_order_frame(seq)).is_forwarded());
        }
        let BridgeOutcome::Forwarded { gap, .. } =
            bridge.client_to_exchange(&sess, new_order_frame(7))
        else {
            panic!("gap frame not forwarded");
        };
        assert_eq!(
            gap,
            Some(SequenceGap {
                expected: 6,
                received: 7
            })
        );
        // The skipped number is now a duplicate.
        assert!(!bridge.client_to_exchange(&sess, new_order_frame(6)).is_forwarded());
    }

    #[test]
    fn test_frame_without_seq_num_rejected() {
        let bridge = bridge();
        let sess = session("A");
        let frame = text_frame(b"35=D\x0111=ORD1\x0154=1\x0138=100\x0155=AAPL\x0144=150.00\x01");

        // A frame carrying no tag 34 must never slip past the duplicate
        // check by decoding without a sequence number.
        let BridgeOutcome::Rejected(record) = bridge.client_to_exchange(&sess, frame.clone())
        else {
            panic!("frame without sequence number forwarded");
        };
        assert_eq!(record.stage, Stage::Decode);
        assert_eq!(record.kind, RejectKind::IncompleteMessage);

        // Resubmitting the identical frame fails the same way.
        assert!(!bridge.client_to_exchange(&sess, frame).is_forwarded());
    }

    #[test]
    fn test_symbol_too_long_rejected() {
        let bridge = bridge();
        let frame = text_frame(
            b"35=D\x0134=1\x0111=ORD1\x0154=1\x0138=100\x0155=LONGNAME9\x0144=150.00\x01",
        );
        let BridgeOutcome::Rejected(record) = bridge.client_to_exchange(&session("A"), frame)
        else {
            panic!("oversized symbol forwarded");
        };
        // The text schema already bounds the symbol at eight bytes, so the
        // oversize value never reaches translation, let alone the wire.
        assert_eq!(record.stage, Stage::Decode);
        assert_eq!(record.kind, RejectKind::FieldTooLong);
    }

    #[test]
    fn test_unsupported_side_rejected() {
        let bridge = bridge();
        let frame =
            text_frame(b"35=D\x0134=1\x0111=ORD1\x0154=9\x0138=100\x0155=AAPL\x0144=150.00\x01");
        let BridgeOutcome::Rejected(record) = bridge.client_to_exchange(&session("A"), frame)
        else {
            panic!("unsupported side forwarded");
        };
        assert_eq!(record.stage, Stage::Translate);
        assert_eq!(record.kind, RejectKind::UnsupportedEnumValue);
        assert!(record.frame.is_some());
    }

    #[test]
    fn test_unknown_binary_type_rejected() {
        let bridge = bridge();
        let BridgeOutcome::Rejected(record) =
            bridge.exchange_to_client(&session("A"), vec![b'Z'; 16])
        else {
            panic!("unknown type byte forwarded");
        };
        assert_eq!(record.kind, RejectKind::UnknownMessageType);
    }

    #[test]
    fn test_truncated_binary_rejected() {
        let bridge = bridge();
        let frame = execution_frame();
        let BridgeOutcome::Rejected(record) =
            bridge.exchange_to_client(&session("A"), &frame[..20])
        else {
            panic!("truncated frame forwarded");
        };
        assert_eq!(record.kind, RejectKind::TruncatedFrame);
    }

    #[test]
    fn test_oversized_frame_rejected() {
        let bridge = Bridge::new(
            SchemaRegistry::standard(),
            BridgeConfig::new().with_max_frame_size(16),
        );
        let BridgeOutcome::Rejected(record) =
            bridge.client_to_exchange(&session("A"), new_order_frame(1))
        else {
            panic!("oversized frame forwarded");
        };
        assert_eq!(record.kind, RejectKind::MalformedFrame);
    }

    #[test]
    fn test_cancel_round_trip_to_exchange() {
        let bridge = bridge();
        let frame = text_frame(b"35=F\x0134=1\x0111=ORD1\x0138=100\x01");
        let BridgeOutcome::Forwarded { frame, .. } =
            bridge.client_to_exchange(&session("A"), frame)
        else {
            panic!("cancel not forwarded");
        };
        assert_eq!(frame.len(), 19);
        assert_eq!(frame[0], b'X');
        assert_eq!(&frame[1..15], b"ORD1          ");
        assert_eq!(&frame[15..19], &100u32.to_be_bytes());
    }

    #[test]
    fn test_sessions_sequence_independently() {
        let bridge = bridge();
        assert!(bridge.client_to_exchange(&session("A"), new_order_frame(1)).is_forwarded());
        // Same number on another session is not a duplicate.
        assert!(bridge.client_to_exchange(&session("B"), new_order_frame(1)).is_forwarded());
    }

    #[test]
    fn test_session_restart_resets_watermark() {
        let bridge = bridge();
        let sess = session("A");
        assert!(bridge.client_to_exchange(&sess, new_order_frame(3)).is_forwarded());
        assert!(!bridge.client_to_exchange(&sess, new_order_frame(3)).is_forwarded());

        bridge.sequencer().session_start(&sess);
        assert!(bridge.client_to_exchange(&sess, new_order_frame(3)).is_forwarded());
    }

    #[test]
    fn test_reject_frames_can_be_disabled() {
        let bridge = Bridge::new(
            SchemaRegistry::standard(),
            BridgeConfig::new().with_reject_frames(false),
        );
        let sess = session("A");
        assert!(bridge.client_to_exchange(&sess, new_order_frame(1)).is_forwarded());
        let BridgeOutcome::Rejected(record) = bridge.client_to_exchange(&sess, new_order_frame(1))
        else {
            panic!("duplicate forwarded");
        };
        assert_eq!(record.frame, None);
    }
}
