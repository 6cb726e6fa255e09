//! Authentication collaborator.

use std::fmt;
use std::sync::RwLock;

/// Supplies authentication state and the bearer credential used during the
/// connection handshake.
///
/// The connection manager never dials while [`is_authenticated`] reports
/// `false`; establishing a connection without a credential is meaningless.
///
/// [`is_authenticated`]: AuthProvider::is_authenticated
pub trait AuthProvider: Send + Sync + fmt::Debug {
    /// Whether a usable session currently exists.
    fn is_authenticated(&self) -> bool;

    /// The current bearer token, if any.
    fn bearer_token(&self) -> Option<String>;
}

/// An [`AuthProvider`] backed by a swappable in-memory token.
///
/// Suitable for hosts that manage session state elsewhere and push the
/// token in on login/logout, and for tests.
#[derive(Debug, Default)]
pub struct StaticTokenProvider {
    token: RwLock<Option<String>>,
}

impl StaticTokenProvider {
    /// Create a provider holding the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    /// Create a provider with no credential (unauthenticated).
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    /// Replace the stored token.
    pub fn set_token(&self, token: impl Into<String>) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(token.into());
    }

    /// Drop the stored token (logout).
    pub fn clear(&self) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }
}

impl AuthProvider for StaticTokenProvider {
    fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    fn bearer_token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
