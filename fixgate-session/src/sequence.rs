/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Sequence number tracking.
//!
//! This module provides atomic sequence tracking for bridge sessions:
//! monotonic duplicate detection on the inbound text side and outbound
//! number allocation for generated text frames. A gap is observable but
//! not fatal; the tracker jumps forward so later messages are judged
//! against the highest number seen.

use fixgate_core::types::SeqNum;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic sequence state for one session.
///
/// Inbound tracking is highest-seen rather than next-expected: any number
/// at or below the watermark is a duplicate, anything above is accepted
/// and becomes the new watermark.
#[derive(Debug)]
pub struct SequenceState {
    /// Highest inbound sequence number accepted. Zero before any message.
    last_seen: AtomicU64,
    /// Next outbound sequence number to allocate.
    next_outbound: AtomicU64,
}

impl SequenceState {
    /// Creates fresh state: nothing seen inbound, outbound starting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_seen: AtomicU64::new(0),
            next_outbound: AtomicU64::new(1),
        }
    }

    /// Creates state with specified starting values.
    ///
    /// # Arguments
    /// * `last_seen` - Highest inbound sequence number already processed
    /// * `next_outbound` - First outbound sequence number to allocate
    #[must_use]
    pub fn with_initial(last_seen: u64, next_outbound: u64) -> Self {
        Self {
            last_seen: AtomicU64::new(last_seen),
            next_outbound: AtomicU64::new(next_outbound),
        }
    }

    /// Returns the highest inbound sequence number accepted so far.
    #[inline]
    #[must_use]
    pub fn last_seen(&self) -> u64 {
        self.last_seen.load(Ordering::SeqCst)
    }

    /// Returns the next outbound sequence number without allocating it.
    #[inline]
    #[must_use]
    pub fn next_outbound_peek(&self) -> SeqNum {
        SeqNum::new(self.next_outbound.load(Ordering::SeqCst))
    }

    /// Allocates and returns the next outbound sequence number.
    #[inline]
    pub fn allocate_outbound(&self) -> SeqNum {
        SeqNum::new(self.next_outbound.fetch_add(1, Ordering::SeqCst))
    }

    /// Judges an inbound sequence number against the watermark and, when
    /// accepted, advances the watermark to it.
    #[must_use]
    pub fn check_inbound(&self, received: u64) -> SeqCheck {
        let mut last = self.last_seen.load(Ordering::SeqCst);
        loop {
            if received <= last {
                return SeqCheck::Duplicate {
                    last_seen: last,
                    received,
                };
            }
            match self.last_seen.compare_exchange(
                last,
                received,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => {
                    return if received == last + 1 {
                        SeqCheck::InOrder
                    } else {
                        SeqCheck::Gap {
                            expected: last + 1,
                            received,
                        }
                    };
                }
                Err(actual) => last = actual,
            }
        }
    }

    /// Resets both counters to their fresh-session values.
    #[inline]
    pub fn reset(&self) {
        self.last_seen.store(0, Ordering::SeqCst);
        self.next_outbound.store(1, Ordering::SeqCst);
    }
}

impl Default for SequenceState {
    fn default() -> Self {
        Self::new()
    }
}

/// Verdict on an inbound sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqCheck {
    /// Exactly one past the watermark.
    InOrder,
    /// At or below the watermark; the message must not be processed again.
    Duplicate {
        /// Highest sequence number already accepted.
        last_seen: u64,
        /// Received sequence number.
        received: u64,
    },
    /// Above the watermark by more than one. Accepted; the skipped numbers
    /// will read as duplicates if they ever arrive.
    Gap {
        /// The number that would have been in order.
        expected: u64,
        /// Received sequence number.
        received: u64,
    },
}

impl SeqCheck {
    /// Returns true if the message was accepted.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        !matches!(self, Self::Duplicate { .. })
    }

    /// Returns true for a gap verdict.
    #[must_use]
    pub const fn is_gap(&self) -> bool {
        matches!(self, Self::Gap { .. })
    }

    /// Returns true for a duplicate verdict.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}
