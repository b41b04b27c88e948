/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # fixgate Bridge
//!
//! The pipeline joining both codecs, the translator, and the sequencer.
//!
//! A [`Bridge`] maps one complete inbound frame to one outcome: the
//! translated frame for the other side, or a [`RejectRecord`] naming the
//! stage, the reject kind, and the order identifier when it is known.
//! Rejections are message-scoped; the session keeps processing.

pub mod bridge;
pub mod config;

pub use bridge::{Bridge, BridgeOutcome, RejectRecord, SequenceGap, Stage};
pub use config::BridgeConfig;
