// ABOUTME: Common data structures shared across the FitBurn API
// ABOUTME: Re-exports the user record and profile response types
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common data structures

/// User record and profile types
pub mod user;

pub use user::{User, UserProfile, UserSummary};
