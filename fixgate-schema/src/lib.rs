/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # fixgate Schema
//!
//! Declarative message schemas shared by both fixgate wire codecs.
//!
//! This crate is the single source of truth for every supported logical
//! message in both wire formats:
//! - **Field specs**: tag number and text width for the session protocol,
//!   byte offset and width for the exchange protocol
//! - **Message specs**: canonical field order plus wire discriminator
//! - **Registry**: immutable O(1) lookup by (format, kind) and by
//!   discriminator, built once at startup and never mutated
//!
//! Codecs only look specs up; they never define wire layouts themselves.

pub mod registry;
pub mod spec;

pub use registry::{
    BEGIN_STRING, EXCHANGE_PRICE_SCALE, SESSION_PRICE_SCALE, SchemaDef, SchemaRegistry,
    standard_def, tags,
};
pub use spec::{Discriminator, FieldSpec, MessageSpec, SemanticType, WireLocation};
