// ABOUTME: Middleware module for request processing
// ABOUTME: Re-exports the bearer-token authentication gate
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request middleware

/// Bearer-token authentication gate
pub mod auth;

pub use auth::AuthMiddleware;
