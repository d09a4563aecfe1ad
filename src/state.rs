//! Shared application state for request handlers.

use std::sync::Arc;

use crate::session::Session;

/// Shared application state, cloneable across handlers.
///
/// The session is fully set up before the listener starts and is never mutated
/// afterwards, so handlers read it without locking.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Session>,
}

impl AppState {
    /// Creates a new application state around a set-up session.
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(session),
        }
    }
}
