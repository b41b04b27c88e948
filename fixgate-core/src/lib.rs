/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # fixgate Core
//!
//! Core types, traits, and error definitions for the fixgate protocol bridge.
//!
//! This crate provides the fundamental building blocks used across all
//! fixgate crates:
//! - **Error types**: Unified error handling with `thiserror`, and the closed
//!   set of message-scoped [`RejectKind`]s the bridge reports
//! - **Message model**: `RawFrame`, `SemanticMessage`, `FieldName`/`FieldValue`
//! - **Core types**: `SeqNum`, `SessionId`, `Symbol`, `Side`, `Price`,
//!   `Timestamp`
//!
//! ## Scaled-Integer Prices
//!
//! Prices are integer tick counts at a declared scale everywhere in the
//! bridge; no floating-point representation exists at any codec or
//! translation boundary, so round-trips are exact by construction.

pub mod error;
pub mod message;
pub mod types;

pub use error::{
    BridgeError, DecodeError, EncodeError, RejectKind, Result, SchemaError, SessionError,
    TranslateError,
};
pub use message::{
    CancelOrder, Execution, FieldMap, FieldName, FieldValue, MessageBody, MsgKind, NewOrder,
    OrderReject, RawFrame, SemanticMessage, WireFormat,
};
pub use types::{Ident, OrderId, Price, SeqNum, SessionId, Side, Symbol, Timestamp};
