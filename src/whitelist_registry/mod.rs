//! WhitelistRegistry - Package Plate Entitlements
//!
//! ## Responsibilities
//!
//! - Authoritative set of plates entitled to package treatment
//! - Operator add/remove, engine read-only lookup
//!
//! The engine reads the registry once at entry time and stores the result on
//! the occupancy record, so mid-stay whitelist changes never affect a parked
//! vehicle's billing.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// A whitelisted plate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhitelistEntry {
    pub plate: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// WhitelistRegistry instance
pub struct WhitelistRegistry {
    /// Insertion order; list() reverses for newest-first
    entries: RwLock<Vec<WhitelistEntry>>,
}

impl WhitelistRegistry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// True iff the plate is currently whitelisted. No side effects.
    pub async fn is_whitelisted(&self, plate: &str) -> bool {
        let entries = self.entries.read().await;
        entries.iter().any(|e| e.plate == plate)
    }

    /// Register a plate. Duplicate plates fail without mutating anything.
    pub async fn add(&self, plate: &str, notes: &str) -> Result<WhitelistEntry> {
        let mut entries = self.entries.write().await;
        if entries.iter().any(|e| e.plate == plate) {
            return Err(Error::Duplicate(format!(
                "plate {} is already whitelisted",
                plate
            )));
        }
        let entry = WhitelistEntry {
            plate: plate.to_string(),
            notes: notes.to_string(),
            created_at: Utc::now(),
        };
        entries.push(entry.clone());
        tracing::info!(plate = %plate, "Plate whitelisted");
        Ok(entry)
    }

    /// Remove a plate. Idempotent: removing an unknown plate is not an error.
    pub async fn remove(&self, plate: &str) {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| e.plate != plate);
        if entries.len() < before {
            tracing::info!(plate = %plate, "Plate removed from whitelist");
        }
    }

    /// All entries, newest-first
    pub async fn list(&self) -> Vec<WhitelistEntry> {
        let entries = self.entries.read().await;
        entries.iter().rev().cloned().collect()
    }

    pub async fn count(&self) -> usize {
        let entries = self.entries.read().await;
        entries.len()
    }
}

impl Default for WhitelistRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_and_lookup() {
        let registry = WhitelistRegistry::new();
        assert!(!registry.is_whitelisted("VIP-001").await);

        registry.add("VIP-001", "monthly package").await.unwrap();
        assert!(registry.is_whitelisted("VIP-001").await);
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_add_rejected() {
        let registry = WhitelistRegistry::new();
        registry.add("VIP-001", "first").await.unwrap();

        let err = registry.add("VIP-001", "second").await.unwrap_err();
        assert!(matches!(err, Error::Duplicate(_)));

        // Failed insert leaves the original entry untouched
        let entries = registry.list().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].notes, "first");
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let registry = WhitelistRegistry::new();
        registry.add("VIP-001", "").await.unwrap();

        registry.remove("VIP-001").await;
        assert!(!registry.is_whitelisted("VIP-001").await);

        // Second removal is a no-op, not an error
        registry.remove("VIP-001").await;
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let registry = WhitelistRegistry::new();
        registry.add("VIP-001", "").await.unwrap();
        registry.add("VIP-002", "").await.unwrap();

        let entries = registry.list().await;
        assert_eq!(entries[0].plate, "VIP-002");
        assert_eq!(entries[1].plate, "VIP-001");
    }
}
