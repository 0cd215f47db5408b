// ABOUTME: Explicit client-side session context with defined read/write/clear operations
// ABOUTME: Replaces ambient global session state; guest identity never touches the server
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Explicit session context
//!
//! Session state is an object the caller owns and passes to client
//! operations. A guest session carries a placeholder token that the
//! call-or-fallback policy treats as "no server", so guests run entirely
//! against the local cache.

use crate::models::UserSummary;
use serde::{Deserialize, Serialize};

/// Placeholder token marking a client-only guest session
pub const GUEST_TOKEN: &str = "guest";

/// Client-side session state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionContext {
    token: Option<String>,
    user: Option<UserSummary>,
}

impl SessionContext {
    /// An empty, signed-out session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A guest pseudo-identity with no server record
    #[must_use]
    pub fn guest() -> Self {
        Self {
            token: Some(GUEST_TOKEN.to_owned()),
            user: None,
        }
    }

    /// Store a real session after login or registration
    pub fn write(&mut self, token: String, user: UserSummary) {
        self.token = Some(token);
        self.user = Some(user);
    }

    /// The stored token, placeholder or real
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// A token usable against the server, if one is present
    ///
    /// Guest placeholder tokens are not real; they never leave the client.
    #[must_use]
    pub fn real_token(&self) -> Option<&str> {
        match self.token.as_deref() {
            Some(GUEST_TOKEN) | None => None,
            Some(token) => Some(token),
        }
    }

    /// The signed-in user, if known
    #[must_use]
    pub fn user(&self) -> Option<&UserSummary> {
        self.user.as_ref()
    }

    /// Whether this is a guest session
    #[must_use]
    pub fn is_guest(&self) -> bool {
        self.token.as_deref() == Some(GUEST_TOKEN)
    }

    /// Sign out: drop token and user identity
    pub fn clear(&mut self) {
        self.token = None;
        self.user = None;
    }
}
