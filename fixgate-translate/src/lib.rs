/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # fixgate Translate
//!
//! Pure field-level translation between the session and exchange schemas.
//!
//! The translator never sees wire bytes. It maps enumerated codes through a
//! declarative [`TranslationTable`], rescales prices exactly between the
//! two declared scales, and validates the result against the target
//! schema's field widths. Fields only one schema carries are dropped or
//! left for the bridge to supply.

pub mod table;
pub mod translator;

pub use table::TranslationTable;
pub use translator::{Direction, Translator};
