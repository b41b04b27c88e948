/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # fixgate
//!
//! A bidirectional bridge between a text order-entry protocol and a
//! fixed-layout binary exchange protocol.
//!
//! Clients speak SOH-delimited `tag=value` frames with checksum and
//! body-length framing; the exchange speaks width-exact binary frames
//! dispatched on a single type byte. fixgate decodes either side into a
//! shared semantic message, translates codes and price scales through a
//! declarative table, tracks per-session sequence numbers, and re-encodes
//! for the other side. A malformed or untranslatable message is rejected
//! with a precise reason; the session keeps running.
//!
//! ## Quick Start
//!
//! ```rust
//! use fixgate::prelude::*;
//!
//! let bridge = Bridge::new(SchemaRegistry::standard(), BridgeConfig::default());
//! let session = SessionId::new("CLIENT1").unwrap();
//!
//! let frame = b"8=FIXG.1\x019=48\x0135=D\x0134=1\x0111=ORD1\x0154=1\x0138=100\x0155=AAPL\x0144=150.00\x0110=254\x01";
//! match bridge.client_to_exchange(&session, &frame[..]) {
//!     BridgeOutcome::Forwarded { frame, .. } => assert_eq!(frame[0], b'O'),
//!     BridgeOutcome::Rejected(record) => panic!("rejected: {}", record.detail),
//! }
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: Semantic messages, domain types, and error definitions
//! - [`schema`]: Declarative message schemas for both wire formats
//! - [`tagvalue`]: Text session protocol codec
//! - [`binary`]: Fixed-layout exchange protocol codec
//! - [`translate`]: Table-driven cross-schema translation
//! - [`session`]: Per-session sequence tracking
//! - [`bridge`]: The pipeline facade

pub mod core {
    //! Semantic messages, domain types, and error definitions.
    pub use fixgate_core::*;
}

pub mod schema {
    //! Declarative message schemas for both wire formats.
    pub use fixgate_schema::*;
}

pub mod tagvalue {
    //! Text session protocol codec.
    pub use fixgate_tagvalue::*;
}

pub mod binary {
    //! Fixed-layout exchange protocol codec.
    pub use fixgate_binary::*;
}

pub mod translate {
    //! Table-driven cross-schema translation.
    pub use fixgate_translate::*;
}

pub mod session {
    //! Per-session sequence tracking.
    pub use fixgate_session::*;
}

pub mod bridge {
    //! The pipeline facade.
    pub use fixgate_bridge::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types
    pub use fixgate_core::{
        BridgeError, DecodeError, EncodeError, FieldName, FieldValue, Ident, MessageBody, MsgKind,
        OrderId, Price, RawFrame, RejectKind, Result, SemanticMessage, SeqNum, SessionError,
        SessionId, Side, Symbol, Timestamp, TranslateError, WireFormat,
    };

    // Schemas
    pub use fixgate_schema::{
        BEGIN_STRING, Discriminator, FieldSpec, MessageSpec, SchemaRegistry, SemanticType,
        WireLocation,
    };

    // Codecs
    pub use fixgate_tagvalue::{calculate_checksum, frame_length};

    // Translation
    pub use fixgate_translate::{Direction, TranslationTable, Translator};

    // Session
    pub use fixgate_session::{SeqCheck, SequenceState, SessionSequencer};

    // Bridge
    pub use fixgate_bridge::{Bridge, BridgeConfig, BridgeOutcome, RejectRecord, SequenceGap, Stage};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_imports() {
        let _seq = SeqNum::new(1);
        let _side = Side::Buy;
        let registry = SchemaRegistry::standard();
        assert_eq!(registry.begin_string(), BEGIN_STRING);
    }

    #[test]
    fn test_bridge_from_prelude() {
        let bridge = Bridge::new(SchemaRegistry::standard(), BridgeConfig::default());
        let session = SessionId::new("CLIENT1").unwrap();
        let outcome = bridge.exchange_to_client(&session, Vec::new());
        assert!(!outcome.is_forwarded());
    }
}
