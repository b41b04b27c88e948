/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # fixgate Session
//!
//! Per-session sequence tracking for the bridge.
//!
//! The text side of the bridge numbers its messages; the binary side does
//! not. This crate owns that asymmetry: a highest-seen watermark per
//! session rejects inbound duplicates, an atomic counter allocates
//! outbound numbers, and a thread-safe map keys both on the session
//! identifier with implicit creation on first use.

pub mod sequence;
pub mod sequencer;

pub use sequence::{SeqCheck, SequenceState};
pub use sequencer::SessionSequencer;
