// ABOUTME: Call-server-or-fallback policy and the typed HTTP client
// ABOUTME: Defines the degrade-to-local behavior once for every server-backed operation
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Client state sync
//!
//! [`call_or_fallback`] is the single policy governing offline degradation:
//! with a real session token the server call runs and its result is mirrored
//! into the named cache slot; on any failure, or without a real token, a
//! fallback closure computes the local result from the cached slot value and
//! the slot is updated to match. The cache therefore always holds the last
//! known state but is never authoritative while the server answers.

use crate::client::cache::{FallbackCache, Slot};
use crate::client::session::SessionContext;
use crate::database::ProfileUpdate;
use crate::models::UserProfile;
use crate::routes::analysis::AnalysisResult;
use crate::routes::auth::LoginResponse;
use crate::routes::calories::TotalCaloriesResponse;
use crate::routes::profile::{AvatarResponse, BmrResponse};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;

/// Where a synced value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// The server answered; the cache was updated to match
    Server,
    /// The server was skipped or failed; the value is local
    Local,
}

/// A value together with its provenance
#[derive(Debug, Clone)]
pub struct Synced<T> {
    pub value: T,
    pub source: ValueSource,
}

/// Run a server call if a real token is present, falling back to the local
/// cache slot otherwise
///
/// `fallback` receives the cached slot value (if any) and produces the local
/// result. Both paths write the result back to the slot, keeping the cache
/// eventually consistent with the last known state.
///
/// # Errors
///
/// Returns an error only if the cache itself cannot be written.
pub async fn call_or_fallback<T, F, Fut, G>(
    session: &SessionContext,
    cache: &mut FallbackCache,
    slot: Slot,
    call: F,
    fallback: G,
) -> Result<Synced<T>>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<T>>,
    G: FnOnce(Option<T>) -> T,
{
    if let Some(token) = session.real_token() {
        match call(token.to_owned()).await {
            Ok(value) => {
                cache.set(slot, &value)?;
                return Ok(Synced {
                    value,
                    source: ValueSource::Server,
                });
            }
            Err(e) => {
                tracing::warn!(slot = slot.key(), "server call failed, using local fallback: {e}");
            }
        }
    }

    let value = fallback(cache.get(slot));
    cache.set(slot, &value)?;
    Ok(Synced {
        value,
        source: ValueSource::Local,
    })
}

/// Thin typed HTTP client for the FitBurn API
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the given base URL (no trailing slash)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// POST /api/auth/register
    ///
    /// # Errors
    /// Returns an error on network failure or a non-success status.
    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<LoginResponse> {
        let response = self
            .http
            .post(self.url("/api/auth/register"))
            .json(&serde_json::json!({ "email": email, "password": password, "name": name }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("Failed to decode register response")?;
        Ok(response)
    }

    /// POST /api/auth/login
    ///
    /// # Errors
    /// Returns an error on network failure or a non-success status.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("Failed to decode login response")?;
        Ok(response)
    }

    /// GET /api/profile
    ///
    /// # Errors
    /// Returns an error on network failure or a non-success status.
    pub async fn get_profile(&self, token: &str) -> Result<UserProfile> {
        let profile = self
            .http
            .get(self.url("/api/profile"))
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("Failed to decode profile response")?;
        Ok(profile)
    }

    /// PUT /api/profile
    ///
    /// # Errors
    /// Returns an error on network failure or a non-success status.
    pub async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<UserProfile> {
        // Serialize only the fields present so the server's allow-list sees a
        // genuinely partial payload
        let mut body = serde_json::Map::new();
        if let Some(v) = &update.name {
            body.insert("name".into(), serde_json::json!(v));
        }
        if let Some(v) = &update.organization {
            body.insert("organization".into(), serde_json::json!(v));
        }
        if let Some(v) = update.age {
            body.insert("age".into(), serde_json::json!(v));
        }
        if let Some(v) = update.weight {
            body.insert("weight".into(), serde_json::json!(v));
        }
        if let Some(v) = update.height {
            body.insert("height".into(), serde_json::json!(v));
        }
        if let Some(v) = &update.profile_pic {
            body.insert("profilePic".into(), serde_json::json!(v));
        }

        let profile = self
            .http
            .put(self.url("/api/profile"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("Failed to decode profile response")?;
        Ok(profile)
    }

    /// PUT /api/profile/bmr
    ///
    /// # Errors
    /// Returns an error on network failure or a non-success status.
    pub async fn update_bmr(&self, token: &str, bmr: i64) -> Result<i64> {
        let response: BmrResponse = self
            .http
            .put(self.url("/api/profile/bmr"))
            .bearer_auth(token)
            .json(&serde_json::json!({ "bmr": bmr }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("Failed to decode bmr response")?;
        Ok(response.bmr)
    }

    /// POST /api/profile/avatar (multipart field `avatar`)
    ///
    /// # Errors
    /// Returns an error on network failure or a non-success status.
    pub async fn upload_avatar(
        &self,
        token: &str,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<AvatarResponse> {
        let part = reqwest::multipart::Part::bytes(data).file_name(file_name.to_owned());
        let form = reqwest::multipart::Form::new().part("avatar", part);

        let response = self
            .http
            .post(self.url("/api/profile/avatar"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("Failed to decode avatar response")?;
        Ok(response)
    }

    /// POST /api/calories - returns the new running total
    ///
    /// # Errors
    /// Returns an error on network failure or a non-success status.
    pub async fn add_calories(&self, token: &str, exercise: &str, calories: i64) -> Result<i64> {
        let response: TotalCaloriesResponse = self
            .http
            .post(self.url("/api/calories"))
            .bearer_auth(token)
            .json(&serde_json::json!({ "exercise": exercise, "calories": calories }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("Failed to decode calories response")?;
        Ok(response.total_calories)
    }

    /// GET /api/calories/total
    ///
    /// # Errors
    /// Returns an error on network failure or a non-success status.
    pub async fn total_calories(&self, token: &str) -> Result<i64> {
        let response: TotalCaloriesResponse = self
            .http
            .get(self.url("/api/calories/total"))
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("Failed to decode calories response")?;
        Ok(response.total_calories)
    }

    /// POST /api/exercise-ai/analyze (multipart `file` + `exercise`)
    ///
    /// # Errors
    /// Returns an error on network failure or a non-success status.
    pub async fn analyze(
        &self,
        token: &str,
        exercise: &str,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<AnalysisResult> {
        let part = reqwest::multipart::Part::bytes(data).file_name(file_name.to_owned());
        let form = reqwest::multipart::Form::new()
            .text("exercise", exercise.to_owned())
            .part("file", part);

        let result = self
            .http
            .post(self.url("/api/exercise-ai/analyze"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("Failed to decode analysis response")?;
        Ok(result)
    }
}

/// High-level client combining the API, a session, and the fallback cache
pub struct SyncClient {
    api: ApiClient,
    cache: FallbackCache,
}

impl SyncClient {
    /// Create a sync client over an API endpoint and a cache
    #[must_use]
    pub fn new(api: ApiClient, cache: FallbackCache) -> Self {
        Self { api, cache }
    }

    /// The placeholder profile shown to guests with an empty cache
    fn guest_profile() -> UserProfile {
        UserProfile {
            name: "Guest".into(),
            email: "guest@local".into(),
            organization: None,
            age: None,
            weight: None,
            height: None,
            profile_pic: None,
            bmr: 0,
        }
    }

    /// Log in against the server and store the session
    ///
    /// # Errors
    /// Returns an error if the server rejects the credentials or is
    /// unreachable; login never falls back to the cache.
    pub async fn login(
        &mut self,
        session: &mut SessionContext,
        email: &str,
        password: &str,
    ) -> Result<()> {
        let response = self.api.login(email, password).await?;
        self.cache.set(Slot::CurrentUser, &response.user)?;
        session.write(response.token, response.user);
        Ok(())
    }

    /// Read the profile, server first
    ///
    /// # Errors
    /// Returns an error only if the cache cannot be written.
    pub async fn profile(&mut self, session: &SessionContext) -> Result<Synced<UserProfile>> {
        let api = self.api.clone();
        call_or_fallback(
            session,
            &mut self.cache,
            Slot::CurrentUser,
            |token| async move { api.get_profile(&token).await },
            |cached| cached.unwrap_or_else(Self::guest_profile),
        )
        .await
    }

    /// Apply a partial profile update, server first
    ///
    /// # Errors
    /// Returns an error only if the cache cannot be written.
    pub async fn update_profile(
        &mut self,
        session: &SessionContext,
        update: ProfileUpdate,
    ) -> Result<Synced<UserProfile>> {
        let api = self.api.clone();
        let local_update = update.clone();
        call_or_fallback(
            session,
            &mut self.cache,
            Slot::CurrentUser,
            |token| async move { api.update_profile(&token, &update).await },
            |cached| {
                let mut profile = cached.unwrap_or_else(Self::guest_profile);
                if let Some(v) = local_update.name {
                    profile.name = v;
                }
                if let Some(v) = local_update.organization {
                    profile.organization = Some(v);
                }
                if let Some(v) = local_update.age {
                    profile.age = Some(v);
                }
                if let Some(v) = local_update.weight {
                    profile.weight = Some(v);
                }
                if let Some(v) = local_update.height {
                    profile.height = Some(v);
                }
                if let Some(v) = local_update.profile_pic {
                    profile.profile_pic = Some(v);
                }
                profile
            },
        )
        .await
    }

    /// Overwrite the BMR, server first, keeping the cached profile in step
    ///
    /// # Errors
    /// Returns an error only if the cache cannot be written.
    pub async fn set_bmr(&mut self, session: &SessionContext, bmr: i64) -> Result<Synced<UserProfile>> {
        let api = self.api.clone();
        call_or_fallback(
            session,
            &mut self.cache,
            Slot::CurrentUser,
            |token| async move {
                api.update_bmr(&token, bmr).await?;
                api.get_profile(&token).await
            },
            |cached| {
                let mut profile = cached.unwrap_or_else(Self::guest_profile);
                profile.bmr = bmr;
                profile
            },
        )
        .await
    }

    /// Record burned calories, server first; offline the local total grows
    ///
    /// # Errors
    /// Returns an error only if the cache cannot be written.
    pub async fn add_calories(
        &mut self,
        session: &SessionContext,
        exercise: &str,
        calories: i64,
    ) -> Result<Synced<i64>> {
        let api = self.api.clone();
        let exercise = exercise.to_owned();
        call_or_fallback(
            session,
            &mut self.cache,
            Slot::TotalCalories,
            |token| async move { api.add_calories(&token, &exercise, calories).await },
            |cached| cached.unwrap_or(0) + calories,
        )
        .await
    }

    /// Read the running calorie total, server first
    ///
    /// # Errors
    /// Returns an error only if the cache cannot be written.
    pub async fn total_calories(&mut self, session: &SessionContext) -> Result<Synced<i64>> {
        let api = self.api.clone();
        call_or_fallback(
            session,
            &mut self.cache,
            Slot::TotalCalories,
            |token| async move { api.total_calories(&token).await },
            |cached| cached.unwrap_or(0),
        )
        .await
    }

    /// Free-text notes, a purely local slot
    #[must_use]
    pub fn notes(&self) -> Option<String> {
        self.cache.get(Slot::Notes)
    }

    /// Store free-text notes locally
    ///
    /// # Errors
    /// Returns an error if the cache cannot be written.
    pub fn set_notes(&mut self, notes: &str) -> Result<()> {
        self.cache.set(Slot::Notes, &notes)
    }

    /// Dark-mode preference, a purely local slot
    #[must_use]
    pub fn dark_mode(&self) -> bool {
        self.cache.get(Slot::DarkMode).unwrap_or(false)
    }

    /// Store the dark-mode preference locally
    ///
    /// # Errors
    /// Returns an error if the cache cannot be written.
    pub fn set_dark_mode(&mut self, enabled: bool) -> Result<()> {
        self.cache.set(Slot::DarkMode, &enabled)
    }

    /// Access the underlying typed API client
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_cache() -> (tempfile::TempDir, FallbackCache) {
        let dir = tempdir().unwrap();
        let cache = FallbackCache::open(dir.path().join("cache.json")).unwrap();
        (dir, cache)
    }

    fn real_session() -> SessionContext {
        let mut session = SessionContext::new();
        session.write(
            "jwt".into(),
            crate::models::UserSummary {
                id: uuid::Uuid::new_v4(),
                name: "Alice".into(),
                email: "a@x.com".into(),
                profile_pic: None,
            },
        );
        session
    }

    #[tokio::test]
    async fn test_server_success_mirrors_into_cache() {
        let (_dir, mut cache) = open_cache();
        let session = real_session();

        let synced = call_or_fallback(
            &session,
            &mut cache,
            Slot::TotalCalories,
            |_token| async move { Ok::<_, anyhow::Error>(75_i64) },
            |_cached| unreachable!("fallback must not run on server success"),
        )
        .await
        .unwrap();

        assert_eq!(synced.value, 75);
        assert_eq!(synced.source, ValueSource::Server);
        assert_eq!(cache.get::<i64>(Slot::TotalCalories), Some(75));
    }

    #[tokio::test]
    async fn test_server_failure_falls_back_to_cache() {
        let (_dir, mut cache) = open_cache();
        cache.set(Slot::TotalCalories, &120_i64).unwrap();
        let session = real_session();

        let synced = call_or_fallback(
            &session,
            &mut cache,
            Slot::TotalCalories,
            |_token| async move { anyhow::bail!("connection refused") },
            |cached: Option<i64>| cached.unwrap_or(0),
        )
        .await
        .unwrap();

        assert_eq!(synced.value, 120);
        assert_eq!(synced.source, ValueSource::Local);
    }

    #[tokio::test]
    async fn test_guest_never_calls_server() {
        let (_dir, mut cache) = open_cache();
        let session = SessionContext::guest();

        let synced = call_or_fallback(
            &session,
            &mut cache,
            Slot::TotalCalories,
            |_token| async move { unreachable!("guest sessions must not reach the server") },
            |cached: Option<i64>| cached.unwrap_or(0) + 50,
        )
        .await
        .unwrap();

        assert_eq!(synced.value, 50);
        assert_eq!(synced.source, ValueSource::Local);
        // Accumulates locally across calls
        let again = call_or_fallback(
            &session,
            &mut cache,
            Slot::TotalCalories,
            |_token| async move { unreachable!() },
            |cached: Option<i64>| cached.unwrap_or(0) + 50,
        )
        .await
        .unwrap();
        assert_eq!(again.value, 100);
    }

    #[tokio::test]
    async fn test_sync_client_offline_profile_updates() {
        let (_dir, cache) = open_cache();
        let mut client = SyncClient::new(ApiClient::new("http://127.0.0.1:0"), cache);
        let session = SessionContext::guest();

        let update = ProfileUpdate {
            name: Some("Casey".into()),
            weight: Some(70.0),
            ..ProfileUpdate::default()
        };
        let synced = client.update_profile(&session, update).await.unwrap();
        assert_eq!(synced.source, ValueSource::Local);
        assert_eq!(synced.value.name, "Casey");

        let profile = client.profile(&session).await.unwrap();
        assert_eq!(profile.value.name, "Casey");
        assert_eq!(profile.value.weight, Some(70.0));

        let after_bmr = client.set_bmr(&session, 1650).await.unwrap();
        assert_eq!(after_bmr.value.bmr, 1650);
    }

    #[tokio::test]
    async fn test_local_slots() {
        let (_dir, cache) = open_cache();
        let mut client = SyncClient::new(ApiClient::new("http://127.0.0.1:0"), cache);

        assert!(!client.dark_mode());
        client.set_dark_mode(true).unwrap();
        assert!(client.dark_mode());

        assert_eq!(client.notes(), None);
        client.set_notes("stretch more").unwrap();
        assert_eq!(client.notes(), Some("stretch more".into()));
    }
}
