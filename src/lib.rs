// ABOUTME: Main library entry point for the FitBurn fitness tracking API
// ABOUTME: Provides REST endpoints for auth, profiles, calorie tracking, and mock exercise analysis
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # FitBurn
//!
//! A fitness-tracking backend: users authenticate (password or Google),
//! maintain a profile with a basal metabolic rate, upload exercise media to a
//! mock analysis endpoint, and accumulate a per-user running calorie total.
//!
//! ## Architecture
//!
//! - **Models**: User record and profile response types
//! - **Database**: `SQLite` storage with atomic calorie accumulation
//! - **Auth**: JWT session tokens and bcrypt credential verification
//! - **Routes**: axum routers per domain (auth, profile, calories, analysis)
//! - **Client**: typed API client with an offline fallback cache
//!
//! The exercise analysis endpoint is an explicit integration stub: it returns
//! randomized results of a fixed shape and makes no guarantee beyond that
//! shape. Do not infer calibration from its output.

/// Authentication and session token management
pub mod auth;

/// Typed API client with session context and offline fallback cache
pub mod client;

/// Configuration management
pub mod config;

/// User storage and calorie accumulation
pub mod database;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Structured logging configuration
pub mod logging;

/// Request authentication middleware
pub mod middleware;

/// Common data structures
pub mod models;

/// Shared server state
pub mod resources;

/// HTTP routes organized by domain
pub mod routes;

/// Router assembly and serve loop
pub mod server;
