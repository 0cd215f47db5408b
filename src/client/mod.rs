// ABOUTME: Typed API client with offline fallback for the FitBurn backend
// ABOUTME: Bundles session context, fallback cache, and the call-or-fallback policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # FitBurn client
//!
//! A typed client for the FitBurn API that degrades gracefully when the
//! backend is unreachable. Session state lives in an explicit
//! [`SessionContext`] passed around by the caller; there is no ambient
//! global. Every server-backed read/write goes through one
//! call-server-or-fallback policy ([`sync::call_or_fallback`]) parameterized
//! by the operation and a named cache slot, so the degrade-to-local behavior
//! is defined exactly once.
//!
//! The cache mirrors the last known server state and is never the source of
//! truth while a server is reachable.

/// Named-slot fallback cache persisted locally
pub mod cache;

/// Explicit session context (token + user identity)
pub mod session;

/// The call-server-or-fallback policy and the typed API client
pub mod sync;

pub use cache::{FallbackCache, Slot};
pub use session::SessionContext;
pub use sync::{call_or_fallback, ApiClient, SyncClient, Synced, ValueSource};
