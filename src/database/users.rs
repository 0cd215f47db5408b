// ABOUTME: User management database operations
// ABOUTME: Handles user records, profile updates, and the atomic calorie accumulator
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::Database;
use crate::models::User;
use anyhow::{anyhow, Result};
use sqlx::Row;
use uuid::Uuid;

/// Partial profile update. Only the fields present are written; everything
/// else on the record is left untouched (allow-list, not deny-list).
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub organization: Option<String>,
    pub age: Option<i64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    #[serde(rename = "profilePic")]
    pub profile_pic: Option<String>,
}

impl ProfileUpdate {
    /// Whether the update carries any field at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.organization.is_none()
            && self.age.is_none()
            && self.weight.is_none()
            && self.height.is_none()
            && self.profile_pic.is_none()
    }
}

impl Database {
    /// Create the users table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub(super) async fn migrate_users(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT,
                google_id TEXT UNIQUE,
                profile_pic TEXT,
                organization TEXT,
                age INTEGER,
                weight REAL,
                height REAL,
                bmr INTEGER NOT NULL DEFAULT 0,
                total_calories INTEGER NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already in use or the insert fails.
    pub async fn create_user(&self, user: &User) -> Result<Uuid> {
        if self.get_user_by_email(&user.email).await?.is_some() {
            return Err(anyhow!("Email already in use by another user"));
        }

        sqlx::query(
            r"
            INSERT INTO users (
                id, name, email, password_hash, google_id, profile_pic,
                organization, age, weight, height, bmr, total_calories, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.google_id)
        .bind(&user.profile_pic)
        .bind(&user.organization)
        .bind(user.age)
        .bind(user.weight)
        .bind(user.height)
        .bind(user.bmr)
        .bind(user.total_calories)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(user.id)
    }

    /// Get a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        self.get_user_impl("id", &user_id.to_string()).await
    }

    /// Get a user by email
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_impl("email", email).await
    }

    /// Get a user by Google account id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_google_id(&self, google_id: &str) -> Result<Option<User>> {
        self.get_user_impl("google_id", google_id).await
    }

    /// Get a user by email, returning an error if not found
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the user is not found.
    pub async fn get_user_by_email_required(&self, email: &str) -> Result<User> {
        self.get_user_by_email(email)
            .await?
            .ok_or_else(|| anyhow!("User not found with email: {email}"))
    }

    async fn get_user_impl(&self, field: &str, value: &str) -> Result<Option<User>> {
        let query = format!(
            r"
            SELECT id, name, email, password_hash, google_id, profile_pic,
                   organization, age, weight, height, bmr, total_calories, created_at
            FROM users WHERE {field} = $1
            "
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| Self::row_to_user(&row)).transpose()
    }

    /// Convert a database row to a User struct
    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
        let id: String = row.get("id");
        Ok(User {
            id: Uuid::parse_str(&id)?,
            name: row.get("name"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            google_id: row.get("google_id"),
            profile_pic: row.get("profile_pic"),
            organization: row.get("organization"),
            age: row.get("age"),
            weight: row.get("weight"),
            height: row.get("height"),
            bmr: row.get("bmr"),
            total_calories: row.get("total_calories"),
            created_at: row.get("created_at"),
        })
    }

    /// Apply a partial profile update and return the fresh record
    ///
    /// Fields absent from the update are never touched, so concurrent writers
    /// of independent fields stay last-writer-wins per field.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the user does not exist.
    pub async fn update_profile(&self, user_id: Uuid, update: &ProfileUpdate) -> Result<User> {
        if !update.is_empty() {
            sqlx::query(
                r"
                UPDATE users SET
                    name = COALESCE($2, name),
                    organization = COALESCE($3, organization),
                    age = COALESCE($4, age),
                    weight = COALESCE($5, weight),
                    height = COALESCE($6, height),
                    profile_pic = COALESCE($7, profile_pic)
                WHERE id = $1
                ",
            )
            .bind(user_id.to_string())
            .bind(&update.name)
            .bind(&update.organization)
            .bind(update.age)
            .bind(update.weight)
            .bind(update.height)
            .bind(&update.profile_pic)
            .execute(&self.pool)
            .await?;
        }

        self.get_user(user_id)
            .await?
            .ok_or_else(|| anyhow!("User not found: {user_id}"))
    }

    /// Overwrite the user's BMR and return the stored value
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the user does not exist.
    pub async fn update_bmr(&self, user_id: Uuid, bmr: i64) -> Result<i64> {
        let stored: Option<i64> =
            sqlx::query_scalar("UPDATE users SET bmr = $1 WHERE id = $2 RETURNING bmr")
                .bind(bmr)
                .bind(user_id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        stored.ok_or_else(|| anyhow!("User not found: {user_id}"))
    }

    /// Write the avatar reference onto the user record
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the user does not exist.
    pub async fn update_profile_pic(&self, user_id: Uuid, public_path: &str) -> Result<User> {
        let updated = sqlx::query("UPDATE users SET profile_pic = $1 WHERE id = $2")
            .bind(public_path)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(anyhow!("User not found: {user_id}"));
        }

        self.get_user(user_id)
            .await?
            .ok_or_else(|| anyhow!("User not found: {user_id}"))
    }

    /// Atomically add `amount` to the running total and return the new total
    ///
    /// The increment is a single read-modify-write statement at the storage
    /// layer, so concurrent increments for the same user never lose updates.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the user does not exist.
    pub async fn increment_calories(&self, user_id: Uuid, amount: i64) -> Result<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            "UPDATE users SET total_calories = total_calories + $1 WHERE id = $2 RETURNING total_calories",
        )
        .bind(amount)
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        total.ok_or_else(|| anyhow!("User not found: {user_id}"))
    }

    /// Read the current running calorie total
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the user does not exist.
    pub async fn get_total_calories(&self, user_id: Uuid) -> Result<i64> {
        let total: Option<i64> =
            sqlx::query_scalar("SELECT total_calories FROM users WHERE id = $1")
                .bind(user_id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        total.ok_or_else(|| anyhow!("User not found: {user_id}"))
    }

    /// Get total user count
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_count(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
