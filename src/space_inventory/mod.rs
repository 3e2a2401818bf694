//! SpaceInventory - Fixed Parking Space Pool
//!
//! ## Responsibilities
//!
//! - Hold the fixed set of spaces created at bootstrap
//! - Availability search with package-type preference
//! - Occupied/available transitions driven by the engine
//! - Manual reservation toggle (operator path)
//!
//! The inventory is a plain struct with no lock of its own; the
//! AllocationEngine owns it behind the lot mutex so that the
//! search-then-mark sequence is never interleaved.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Space type, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceType {
    Normal,
    Package,
}

/// Space status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceStatus {
    Available,
    Occupied,
    Reserved,
}

/// A single parking space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Space {
    /// Stable code, e.g. "A-001"
    pub code: String,
    pub space_type: SpaceType,
    pub status: SpaceStatus,
}

/// Aggregate space counts for the summary view
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpaceCounts {
    pub total: usize,
    pub available: usize,
    pub occupied: usize,
    pub reserved: usize,
}

/// SpaceInventory instance
pub struct SpaceInventory {
    /// Sorted by code; find_available relies on this ordering
    spaces: Vec<Space>,
}

impl SpaceInventory {
    /// Create an inventory from an explicit pool (sorted by code)
    pub fn new(mut spaces: Vec<Space>) -> Self {
        spaces.sort_by(|a, b| a.code.cmp(&b.code));
        Self { spaces }
    }

    /// Seed the fixed pool: "A-001".. normal spaces, "P-001".. package spaces
    pub fn seed(normal: usize, package: usize) -> Self {
        let mut spaces = Vec::with_capacity(normal + package);
        for i in 1..=normal {
            spaces.push(Space {
                code: format!("A-{:03}", i),
                space_type: SpaceType::Normal,
                status: SpaceStatus::Available,
            });
        }
        for i in 1..=package {
            spaces.push(Space {
                code: format!("P-{:03}", i),
                space_type: SpaceType::Package,
                status: SpaceStatus::Available,
            });
        }
        Self::new(spaces)
    }

    /// Find an available space.
    ///
    /// With `prefer_package`, package-type spaces are searched first and the
    /// search falls back to any available space when none qualify. Selection
    /// is always lowest-code-first so allocation is deterministic.
    pub fn find_available(&self, prefer_package: bool) -> Option<&Space> {
        if prefer_package {
            let hit = self
                .spaces
                .iter()
                .find(|s| s.status == SpaceStatus::Available && s.space_type == SpaceType::Package);
            if hit.is_some() {
                return hit;
            }
        }
        self.spaces
            .iter()
            .find(|s| s.status == SpaceStatus::Available)
    }

    fn get_mut(&mut self, code: &str) -> Result<&mut Space> {
        self.spaces
            .iter_mut()
            .find(|s| s.code == code)
            .ok_or_else(|| Error::NotFound(format!("space {} not found", code)))
    }

    /// Transition a space to occupied. Only valid from available; anything
    /// else is an invariant breach surfaced to the caller.
    pub fn mark_occupied(&mut self, code: &str) -> Result<()> {
        let space = self.get_mut(code)?;
        if space.status != SpaceStatus::Available {
            return Err(Error::Internal(format!(
                "space {} cannot be occupied from {:?}",
                code, space.status
            )));
        }
        space.status = SpaceStatus::Occupied;
        Ok(())
    }

    /// Transition a space back to available. Only valid from occupied.
    pub fn mark_available(&mut self, code: &str) -> Result<()> {
        let space = self.get_mut(code)?;
        if space.status != SpaceStatus::Occupied {
            return Err(Error::Internal(format!(
                "space {} cannot be released from {:?}",
                code, space.status
            )));
        }
        space.status = SpaceStatus::Available;
        Ok(())
    }

    /// Operator reservation toggle. Occupied spaces are off limits to this
    /// path; only the entry/exit flow may change their status.
    pub fn set_reservation(&mut self, code: &str, target: SpaceStatus) -> Result<()> {
        if target == SpaceStatus::Occupied {
            return Err(Error::Validation(
                "reservation toggle only accepts available or reserved".to_string(),
            ));
        }
        let space = self.get_mut(code)?;
        if space.status == SpaceStatus::Occupied {
            return Err(Error::InvalidTransition(format!(
                "space {} is occupied and cannot be toggled",
                code
            )));
        }
        space.status = target;
        Ok(())
    }

    /// Full space list, sorted by code
    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    pub fn get(&self, code: &str) -> Option<&Space> {
        self.spaces.iter().find(|s| s.code == code)
    }

    pub fn counts(&self) -> SpaceCounts {
        let mut counts = SpaceCounts {
            total: self.spaces.len(),
            available: 0,
            occupied: 0,
            reserved: 0,
        };
        for space in &self.spaces {
            match space.status {
                SpaceStatus::Available => counts.available += 1,
                SpaceStatus::Occupied => counts.occupied += 1,
                SpaceStatus::Reserved => counts.reserved += 1,
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_pool() {
        let inventory = SpaceInventory::seed(40, 10);
        let counts = inventory.counts();
        assert_eq!(counts.total, 50);
        assert_eq!(counts.available, 50);
        assert_eq!(inventory.get("A-001").unwrap().space_type, SpaceType::Normal);
        assert_eq!(inventory.get("P-010").unwrap().space_type, SpaceType::Package);
    }

    #[test]
    fn test_package_preference() {
        let inventory = SpaceInventory::seed(2, 1);

        // Package preference picks P-001 even though A-001 sorts lower
        let space = inventory.find_available(true).unwrap();
        assert_eq!(space.code, "P-001");

        // No preference picks the lowest code
        let space = inventory.find_available(false).unwrap();
        assert_eq!(space.code, "A-001");
    }

    #[test]
    fn test_package_fallback_to_normal() {
        let mut inventory = SpaceInventory::seed(2, 1);
        inventory.mark_occupied("P-001").unwrap();

        let space = inventory.find_available(true).unwrap();
        assert_eq!(space.code, "A-001");
    }

    #[test]
    fn test_none_when_full() {
        let mut inventory = SpaceInventory::seed(1, 0);
        inventory.mark_occupied("A-001").unwrap();
        assert!(inventory.find_available(false).is_none());
        assert!(inventory.find_available(true).is_none());
    }

    #[test]
    fn test_transition_preconditions() {
        let mut inventory = SpaceInventory::seed(1, 0);

        // Releasing an available space is a breach
        assert!(matches!(
            inventory.mark_available("A-001"),
            Err(Error::Internal(_))
        ));

        inventory.mark_occupied("A-001").unwrap();

        // Double-occupying is a breach
        assert!(matches!(
            inventory.mark_occupied("A-001"),
            Err(Error::Internal(_))
        ));

        inventory.mark_available("A-001").unwrap();
        assert_eq!(inventory.get("A-001").unwrap().status, SpaceStatus::Available);
    }

    #[test]
    fn test_unknown_space() {
        let mut inventory = SpaceInventory::seed(1, 0);
        assert!(matches!(
            inventory.mark_occupied("Z-999"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_reservation_toggle() {
        let mut inventory = SpaceInventory::seed(2, 0);

        inventory.set_reservation("A-001", SpaceStatus::Reserved).unwrap();
        assert_eq!(inventory.get("A-001").unwrap().status, SpaceStatus::Reserved);

        // Reserved spaces are skipped by allocation
        assert_eq!(inventory.find_available(false).unwrap().code, "A-002");

        inventory.set_reservation("A-001", SpaceStatus::Available).unwrap();
        assert_eq!(inventory.get("A-001").unwrap().status, SpaceStatus::Available);
    }

    #[test]
    fn test_reservation_rejected_on_occupied() {
        let mut inventory = SpaceInventory::seed(1, 0);
        inventory.mark_occupied("A-001").unwrap();

        assert!(matches!(
            inventory.set_reservation("A-001", SpaceStatus::Reserved),
            Err(Error::InvalidTransition(_))
        ));
        assert!(matches!(
            inventory.set_reservation("A-001", SpaceStatus::Available),
            Err(Error::InvalidTransition(_))
        ));
        assert_eq!(inventory.get("A-001").unwrap().status, SpaceStatus::Occupied);
    }

    #[test]
    fn test_reservation_rejects_occupied_target() {
        let mut inventory = SpaceInventory::seed(1, 0);
        assert!(matches!(
            inventory.set_reservation("A-001", SpaceStatus::Occupied),
            Err(Error::Validation(_))
        ));
    }
}
