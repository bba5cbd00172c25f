//! Authentication session.
//!
//! The token lives in a single slot written by the login flow. Presence of a
//! non-empty token is the whole check: no expiry, refresh or signature
//! validation happens here.

use crate::store::slot::{SlotError, SlotStore};

/// Slot holding the session token.
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    token: Option<String>,
}

impl AuthSession {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// Read the current session from its slot.
    pub fn load(store: &dyn SlotStore) -> Result<Self, SlotError> {
        Ok(Self {
            token: store.get(TOKEN_KEY)?,
        })
    }

    /// Persist `token` as the current session.
    pub fn login(store: &dyn SlotStore, token: &str) -> Result<Self, SlotError> {
        store.set(TOKEN_KEY, token)?;
        tracing::info!("Session token stored");
        Ok(Self::with_token(token))
    }

    /// Clear the stored session.
    pub fn logout(store: &dyn SlotStore) -> Result<Self, SlotError> {
        store.remove(TOKEN_KEY)?;
        tracing::info!("Session token cleared");
        Ok(Self::anonymous())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}
