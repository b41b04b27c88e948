/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # fixgate TagValue
//!
//! Codec for the text session protocol: SOH-delimited `tag=value` frames
//! with begin-string, body-length, and checksum framing.
//!
//! Both directions are schema-driven. The decoder validates framing first
//! (begin string, declared body length, trailing modulo-256 checksum) and
//! only then dispatches on the message-type tag to convert fields; the
//! encoder renders fields in the spec's canonical order and derives body
//! length and checksum from the rendered bytes. Neither side hard-codes a
//! message layout.
//!
//! [`frame_length`] locates frame boundaries in a streaming buffer without
//! paying for a full decode.

pub mod checksum;
pub mod decoder;
pub mod encoder;

pub use checksum::{CHECKSUM_WIDTH, calculate_checksum, format_checksum, parse_checksum};
pub use decoder::{Decoder, EQUALS, SOH, frame_length};
pub use encoder::Encoder;
