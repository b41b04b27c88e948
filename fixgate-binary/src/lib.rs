/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # fixgate Binary
//!
//! Codec for the binary exchange protocol: fixed-layout frames with a
//! single type byte, big-endian integers, and space-padded text fields.
//!
//! There is no framing metadata on this wire. The type byte selects a
//! message spec from the registry and that spec alone fixes the frame
//! width and every field offset; a frame whose width disagrees with its
//! spec is rejected before any field is read.

pub mod decoder;
pub mod encoder;

pub use decoder::{Decoder, TEXT_PAD, trim_padding};
pub use encoder::Encoder;
