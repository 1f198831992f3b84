//! Client session
//!
//! The session is the single source of truth for credentials. The pipeline
//! reads it when building each attempt, so a token rotation is visible to the
//! very next request. Reads take a short `parking_lot` read lock and clone
//! the value out; no guard ever escapes this module.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub organization: Option<String>,
    pub auto_refresh: bool,
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("organization", &self.organization)
            .field("auto_refresh", &self.auto_refresh)
            .finish()
    }
}

/// Cheap-clone handle to shared session state.
#[derive(Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<SessionState>>,
    recoveries: Arc<AtomicUsize>,
}

/// Marks the session as recovering from a 401 until dropped.
#[must_use = "recovery ends when the guard is dropped"]
pub struct RecoveryGuard {
    recoveries: Arc<AtomicUsize>,
}

impl Drop for RecoveryGuard {
    fn drop(&mut self) {
        self.recoveries.fetch_sub(1, Ordering::AcqRel);
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Session").field(&*self.inner.read()).finish()
    }
}

impl Session {
    pub fn new(state: SessionState) -> Self {
        Self { inner: Arc::new(RwLock::new(state)), recoveries: Arc::default() }
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.read().token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.inner.read().refresh_token.clone()
    }

    pub fn organization(&self) -> Option<String> {
        self.inner.read().organization.clone()
    }

    pub fn auto_refresh(&self) -> bool {
        self.inner.read().auto_refresh
    }

    pub fn has_token(&self) -> bool {
        self.inner.read().token.is_some()
    }

    pub fn set_token(&self, token: Option<String>) {
        self.inner.write().token = token;
    }

    /// Replace the access token, and the refresh token when one is given.
    pub fn set_tokens(&self, token: String, refresh_token: Option<String>) {
        let mut state = self.inner.write();
        state.token = Some(token);
        if refresh_token.is_some() {
            state.refresh_token = refresh_token;
        }
    }

    pub fn set_refresh_token(&self, refresh_token: Option<String>) {
        self.inner.write().refresh_token = refresh_token;
    }

    pub fn set_organization(&self, organization: Option<String>) {
        self.inner.write().organization = organization;
    }

    pub fn set_auto_refresh(&self, enabled: bool) {
        self.inner.write().auto_refresh = enabled;
    }

    /// Flag a token recovery in progress, whoever performs it.
    pub fn begin_recovery(&self) -> RecoveryGuard {
        self.recoveries.fetch_add(1, Ordering::AcqRel);
        RecoveryGuard { recoveries: Arc::clone(&self.recoveries) }
    }

    pub fn is_recovering(&self) -> bool {
        self.recoveries.load(Ordering::Acquire) > 0
    }

    /// Drop both tokens.
    pub fn clear_tokens(&self) {
        let mut state = self.inner.write();
        state.token = None;
        state.refresh_token = None;
    }
}
