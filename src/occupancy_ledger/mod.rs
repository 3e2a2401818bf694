//! OccupancyLedger - Who Parks Where, Since When
//!
//! ## Responsibilities
//!
//! - One record per visit: opened on entry, closed once on exit
//! - Enforce at most one active record per plate
//! - Retain closed records as history
//!
//! Like the inventory, the ledger carries no lock of its own; the
//! AllocationEngine mutates it under the lot mutex.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single visit. `exited_at = None` means the vehicle is parked now.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupancyRecord {
    pub plate: String,
    /// Whitelist membership snapshotted at entry; exit billing never
    /// re-queries the registry.
    pub has_package: bool,
    pub space_code: String,
    pub entered_at: DateTime<Utc>,
    pub exited_at: Option<DateTime<Utc>>,
}

impl OccupancyRecord {
    pub fn is_active(&self) -> bool {
        self.exited_at.is_none()
    }
}

/// OccupancyLedger instance
pub struct OccupancyLedger {
    /// All visits in entry order, closed records included
    records: Vec<OccupancyRecord>,
}

impl OccupancyLedger {
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Open a record for a plate. Fails if the plate is already parked.
    pub fn open(
        &mut self,
        plate: &str,
        has_package: bool,
        space_code: &str,
        entered_at: DateTime<Utc>,
    ) -> Result<()> {
        if self.active(plate).is_some() {
            return Err(Error::AlreadyParked(format!(
                "plate {} already has an active record",
                plate
            )));
        }
        self.records.push(OccupancyRecord {
            plate: plate.to_string(),
            has_package,
            space_code: space_code.to_string(),
            entered_at,
            exited_at: None,
        });
        Ok(())
    }

    /// Close the active record for a plate and return the closed copy.
    pub fn close(&mut self, plate: &str, exited_at: DateTime<Utc>) -> Result<OccupancyRecord> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.plate == plate && r.is_active())
            .ok_or_else(|| {
                Error::NotParked(format!("plate {} has no active record", plate))
            })?;
        record.exited_at = Some(exited_at);
        Ok(record.clone())
    }

    /// Active record for a plate, if any
    pub fn active(&self, plate: &str) -> Option<&OccupancyRecord> {
        self.records.iter().find(|r| r.plate == plate && r.is_active())
    }

    /// All currently-parked records, in entry order
    pub fn active_records(&self) -> Vec<&OccupancyRecord> {
        self.records.iter().filter(|r| r.is_active()).collect()
    }

    pub fn active_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_active()).count()
    }
}

impl Default for OccupancyLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close_cycle() {
        let mut ledger = OccupancyLedger::new();
        let t0 = Utc::now();

        ledger.open("ABC-123", false, "A-001", t0).unwrap();
        assert_eq!(ledger.active_count(), 1);
        assert_eq!(ledger.active("ABC-123").unwrap().space_code, "A-001");

        let closed = ledger.close("ABC-123", t0).unwrap();
        assert_eq!(closed.exited_at, Some(t0));
        assert_eq!(ledger.active_count(), 0);
        assert!(ledger.active("ABC-123").is_none());
    }

    #[test]
    fn test_double_entry_rejected() {
        let mut ledger = OccupancyLedger::new();
        let t0 = Utc::now();

        ledger.open("ABC-123", false, "A-001", t0).unwrap();
        let err = ledger.open("ABC-123", true, "A-002", t0).unwrap_err();
        assert!(matches!(err, Error::AlreadyParked(_)));

        // Failed open leaves a single active record
        assert_eq!(ledger.active_count(), 1);
    }

    #[test]
    fn test_close_without_entry() {
        let mut ledger = OccupancyLedger::new();
        let err = ledger.close("GHOST-1", Utc::now()).unwrap_err();
        assert!(matches!(err, Error::NotParked(_)));
    }

    #[test]
    fn test_reentry_after_exit() {
        let mut ledger = OccupancyLedger::new();
        let t0 = Utc::now();

        ledger.open("ABC-123", false, "A-001", t0).unwrap();
        ledger.close("ABC-123", t0).unwrap();

        // Same plate can come back; history keeps both visits
        ledger.open("ABC-123", true, "P-001", t0).unwrap();
        assert_eq!(ledger.active_count(), 1);
        assert!(ledger.active("ABC-123").unwrap().has_package);
    }

    #[test]
    fn test_has_package_snapshot() {
        let mut ledger = OccupancyLedger::new();
        let t0 = Utc::now();

        ledger.open("VIP-001", true, "P-001", t0).unwrap();
        let closed = ledger.close("VIP-001", t0).unwrap();
        assert!(closed.has_package);
    }
}
