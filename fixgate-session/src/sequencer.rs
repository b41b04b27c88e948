/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Multi-session sequence coordination.
//!
//! One [`SessionSequencer`] serves every session crossing the bridge. A
//! session's state is created implicitly on first use, so a well-formed
//! message on a previously unseen session simply starts its tracking at
//! zero rather than failing.

use crate::sequence::{SeqCheck, SequenceState};
use fixgate_core::types::{SeqNum, SessionId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Thread-safe registry of per-session sequence state.
#[derive(Debug, Default)]
pub struct SessionSequencer {
    sessions: RwLock<HashMap<SessionId, Arc<SequenceState>>>,
}

impl SessionSequencer {
    /// Creates an empty sequencer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session with fresh sequence state, replacing any existing
    /// state for the same identifier.
    pub fn session_start(&self, session: &SessionId) {
        info!(session = %session, "session start");
        self.sessions
            .write()
            .insert(session.clone(), Arc::new(SequenceState::new()));
    }

    /// Ends a session, dropping its sequence state.
    pub fn session_end(&self, session: &SessionId) {
        info!(session = %session, "session end");
        self.sessions.write().remove(session);
    }

    /// Returns the session's state, creating fresh state on first use.
    #[must_use]
    pub fn state(&self, session: &SessionId) -> Arc<SequenceState> {
        if let Some(state) = self.sessions.read().get(session) {
            return Arc::clone(state);
        }
        Arc::clone(
            self.sessions
                .write()
                .entry(session.clone())
                .or_insert_with(|| Arc::new(SequenceState::new())),
        )
    }

    /// Judges an inbound sequence number for the session.
    ///
    /// Gaps are logged and accepted; duplicates are logged and left to the
    /// caller to reject. The verdict carries the numbers either way.
    #[must_use]
    pub fn check_inbound(&self, session: &SessionId, received: SeqNum) -> SeqCheck {
        let verdict = self.state(session).check_inbound(received.value());
        match verdict {
            SeqCheck::Gap { expected, received } => {
                warn!(
                    session = %session,
                    expected,
                    received,
                    "sequence gap, continuing"
                );
            }
            SeqCheck::Duplicate {
                last_seen,
                received,
            } => {
                debug!(
                    session = %session,
                    last_seen,
                    received,
                    "duplicate sequence number"
                );
            }
            SeqCheck::InOrder => {}
        }
        verdict
    }

    /// Allocates the next outbound sequence number for the session.
    #[must_use]
    pub fn next_outbound(&self, session: &SessionId) -> SeqNum {
        self.state(session).allocate_outbound()
    }

    /// Resets a session's counters without dropping its state.
    pub fn reset(&self, session: &SessionId) {
        info!(session = %session, "sequence reset");
        self.state(session).reset();
    }

    /// Number of sessions currently tracked.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(name: &str) -> SessionId {
        SessionId::new(name).unwrap()
    }

    #[test]
    fn test_implicit_session_creation() {
        let sequencer = SessionSequencer::new();
        assert_eq!(sequencer.session_count(), 0);

        assert!(sequencer.check_inbound(&session("A"), SeqNum::new(1)).is_accepted());
        assert_eq!(sequencer.session_count(), 1);
    }

    #[test]
    fn test_sessions_are_independent() {
        let sequencer = SessionSequencer::new();
        let a = session("A");
        let b = session("B");

        assert!(sequencer.check_inbound(&a, SeqNum::new(1)).is_accepted());
        assert!(sequencer.check_inbound(&a, SeqNum::new(2)).is_accepted());
        // Session B has its own watermark; 1 is not a duplicate there.
        assert!(sequencer.check_inbound(&b, SeqNum::new(1)).is_accepted());
        assert!(sequencer.check_inbound(&a, SeqNum::new(2)).is_duplicate());
    }

    #[test]
    fn test_outbound_allocation() {
        let sequencer = SessionSequencer::new();
        let a = session("A");
        assert_eq!(sequencer.next_outbound(&a).value(), 1);
        assert_eq!(sequencer.next_outbound(&a).value(), 2);
        assert_eq!(sequencer.next_outbound(&session("B")).value(), 1);
    }

    #[test]
    fn test_session_start_replaces_state() {
        let sequencer = SessionSequencer::new();
        let a = session("A");
        assert!(sequencer.check_inbound(&a, SeqNum::new(5)).is_accepted());

        sequencer.session_start(&a);
        assert!(sequencer.check_inbound(&a, SeqNum::new(1)).is_accepted());
    }

    #[test]
    fn test_session_end_drops_state() {
        let sequencer = SessionSequencer::new();
        let a = session("A");
        let _ = sequencer.next_outbound(&a);
        assert_eq!(sequencer.session_count(), 1);

        sequencer.session_end(&a);
        assert_eq!(sequencer.session_count(), 0);
    }

    #[test]
    fn test_reset_keeps_session() {
        let sequencer = SessionSequencer::new();
        let a = session("A");
        assert!(sequencer.check_inbound(&a, SeqNum::new(9)).is_accepted());

        sequencer.reset(&a);
        assert_eq!(sequencer.session_count(), 1);
        assert!(sequencer.check_inbound(&a, SeqNum::new(1)).is_accepted());
    }
}
