// ABOUTME: User models for the FitBurn authentication and profile system
// ABOUTME: User record, profile response subset, and token-response summary definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a user record
///
/// Users are created on signup or on first Google login and are never deleted
/// by any exposed operation. The running calorie total lives on the record so
/// the accumulator can increment it atomically at the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// User email address (unique)
    pub email: String,
    /// Hashed password; `None` for users created via Google login
    pub password_hash: Option<String>,
    /// Google account id if the user authenticated via Google (unique, sparse)
    pub google_id: Option<String>,
    /// Public path of the uploaded avatar, if any
    pub profile_pic: Option<String>,
    /// Organization the user belongs to
    pub organization: Option<String>,
    /// Age in years
    pub age: Option<i64>,
    /// Weight in kg
    pub weight: Option<f64>,
    /// Height in cm
    pub height: Option<f64>,
    /// Basal metabolic rate in kcal/day, computed client-side
    pub bmr: i64,
    /// Running calorie-burn total
    pub total_calories: i64,
    /// When the user account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with the given email and password hash
    #[must_use]
    pub fn new(name: String, email: String, password_hash: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            google_id: None,
            profile_pic: None,
            organization: None,
            age: None,
            weight: None,
            height: None,
            bmr: 0,
            total_calories: 0,
            created_at: Utc::now(),
        }
    }

    /// Create a new user from a Google identity (no password credential)
    #[must_use]
    pub fn from_google(google_id: String, name: String, email: String) -> Self {
        let mut user = Self::new(name, email, None);
        user.google_id = Some(google_id);
        user
    }

    /// The allow-listed profile view of this record
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            name: self.name.clone(),
            email: self.email.clone(),
            organization: self.organization.clone(),
            age: self.age,
            weight: self.weight,
            height: self.height,
            profile_pic: self.profile_pic.clone(),
            bmr: self.bmr,
        }
    }

    /// The short summary embedded in login/OAuth responses
    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            profile_pic: self.profile_pic.clone(),
        }
    }
}

/// Allow-listed profile field subset returned to clients
///
/// Never includes the password hash or external-identity id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub organization: Option<String>,
    pub age: Option<i64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    #[serde(rename = "profilePic")]
    pub profile_pic: Option<String>,
    pub bmr: i64,
}

/// Short user summary embedded in authentication responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(rename = "profilePic")]
    pub profile_pic: Option<String>,
}
