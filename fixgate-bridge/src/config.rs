/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Bridge configuration.
//!
//! This module provides configuration options for the protocol bridge.

/// Configuration for the protocol bridge.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Whether to validate incoming text-frame checksums.
    pub validate_checksum: bool,
    /// Maximum accepted inbound frame size in bytes.
    pub max_frame_size: usize,
    /// Whether to build an outbound reject frame for rejected client
    /// messages whose order identifier survived decoding.
    pub emit_reject_frames: bool,
}

impl BridgeConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            validate_checksum: true,
            max_frame_size: 4096,
            emit_reject_frames: true,
        }
    }

    /// Sets whether to validate incoming text-frame checksums.
    #[must_use]
    pub const fn with_checksum_validation(mut self, validate: bool) -> Self {
        self.validate_checksum = validate;
        self
    }

    /// Sets the maximum accepted inbound frame size.
    #[must_use]
    pub const fn with_max_frame_size(mut self, size: usize) -> Self {
        self.max_frame_size = size;
        self
    }

    /// Sets whether to build outbound reject frames.
    #[must_use]
    pub const fn with_reject_frames(mut self, emit: bool) -> Self {
        self.emit_reject_frames = emit;
        self
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}
