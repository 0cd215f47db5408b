// ABOUTME: Local fallback cache with a fixed set of named slots
// ABOUTME: Mirrors last known server state as JSON on disk for offline degradation
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named-slot fallback cache
//!
//! Four fixed slots mirror server-backed state: the current user blob, the
//! running calorie total, free-text notes, and the dark-mode flag. The cache
//! is written on every successful server call and read only when a call
//! fails or no real session token is present.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The fixed set of named cache slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Slot {
    /// Last known user record blob
    CurrentUser,
    /// Last known running calorie total
    TotalCalories,
    /// Free-text notes kept locally
    Notes,
    /// Dark-mode preference flag
    DarkMode,
}

impl Slot {
    /// Stable key used in the persisted file
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::CurrentUser => "user",
            Self::TotalCalories => "totalCalories",
            Self::Notes => "notes",
            Self::DarkMode => "darkMode",
        }
    }
}

/// JSON-file-backed key/value cache
pub struct FallbackCache {
    path: PathBuf,
    slots: BTreeMap<String, Value>,
}

impl FallbackCache {
    /// Open (or create) a cache at the given path
    ///
    /// # Errors
    ///
    /// Returns an error if an existing cache file cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let slots = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read cache file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Corrupt cache file {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, slots })
    }

    /// Open the cache at the default per-user location
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open_default() -> Result<Self> {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fitburn");
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache dir {}", dir.display()))?;
        Self::open(dir.join("cache.json"))
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a slot, if present and decodable
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, slot: Slot) -> Option<T> {
        self.slots
            .get(slot.key())
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Write a slot and persist the cache
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn set<T: Serialize>(&mut self, slot: Slot, value: &T) -> Result<()> {
        self.slots
            .insert(slot.key().to_owned(), serde_json::to_value(value)?);
        self.persist()
    }

    /// Remove a slot and persist the cache
    ///
    /// # Errors
    ///
    /// Returns an error if the file write fails.
    pub fn remove(&mut self, slot: Slot) -> Result<()> {
        self.slots.remove(slot.key());
        self.persist()
    }

    /// Drop all slots and persist the empty cache
    ///
    /// # Errors
    ///
    /// Returns an error if the file write fails.
    pub fn clear(&mut self) -> Result<()> {
        self.slots.clear();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let raw = serde_json::to_string_pretty(&self.slots)?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write cache file {}", self.path.display()))
    }
}
