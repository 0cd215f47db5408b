// ABOUTME: Route module organization for FitBurn HTTP endpoints
// ABOUTME: Provides route definitions organized by domain
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route modules organized by domain. Each module contains route definitions
//! and thin handler functions that delegate to service code.

/// Mock exercise analysis routes
pub mod analysis;
/// Authentication routes (register, login, Google OAuth)
pub mod auth;
/// Calorie accumulator routes
pub mod calories;
/// Health check routes
pub mod health;
/// Profile read/update, BMR, and avatar routes
pub mod profile;

pub use analysis::AnalysisRoutes;
pub use auth::{AuthRoutes, AuthService, LoginRequest, LoginResponse, RegisterRequest};
pub use calories::CaloriesRoutes;
pub use health::HealthRoutes;
pub use profile::ProfileRoutes;
