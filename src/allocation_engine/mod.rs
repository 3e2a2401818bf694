//! AllocationEngine - Entry/Exit State Machine and Billing
//!
//! ## Responsibilities
//!
//! - Entry: whitelist snapshot -> space selection -> ledger open -> occupy
//! - Exit: ledger close -> duration -> half-day fee -> space release
//! - Manual reservation toggle (operator path, same lock)
//! - Read views for the presentation layer
//!
//! ## Design
//!
//! - Single-writer: one mutex over inventory + ledger serializes every
//!   read-decide-write sequence, so two concurrent entries can never select
//!   the same space
//! - Package flag is captured at entry and billed from the record at exit
//! - Fee: ceil(duration / 12h) half-days, 20 units each, waived for package

use crate::error::{Error, Result};
use crate::event_log_service::{EventLogService, LogAction};
use crate::occupancy_ledger::OccupancyLedger;
use crate::space_inventory::{Space, SpaceCounts, SpaceInventory, SpaceStatus, SpaceType};
use crate::whitelist_registry::WhitelistRegistry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Fee per half-day unit, currency-agnostic
pub const UNIT_RATE: i64 = 20;

/// Billing quantum: 12 hours in milliseconds
pub const HALF_DAY_MS: i64 = 12 * 60 * 60 * 1000;

/// Entry result returned to the gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryReceipt {
    pub plate: String,
    pub space_code: String,
    pub has_package: bool,
    pub entered_at: DateTime<Utc>,
}

/// Exit result returned to the gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitReceipt {
    pub plate: String,
    pub space_code: String,
    pub amount: i64,
    pub half_days: i64,
    pub has_package: bool,
    pub entered_at: DateTime<Utc>,
    pub exited_at: DateTime<Utc>,
}

/// A parked vehicle joined with its space, for the list view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveVehicle {
    pub plate: String,
    pub space_code: String,
    pub space_type: SpaceType,
    pub has_package: bool,
    pub entered_at: DateTime<Utc>,
}

/// Aggregate counts for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotSummary {
    pub spaces: SpaceCounts,
    pub parked_vehicles: usize,
    pub whitelist_plates: usize,
    pub total_revenue: i64,
}

/// Shared mutable lot state. Inventory and ledger live under one mutex so
/// the engine's multi-step transitions are atomic against each other.
struct LotState {
    inventory: SpaceInventory,
    ledger: OccupancyLedger,
}

/// AllocationEngine instance
pub struct AllocationEngine {
    lot: Mutex<LotState>,
    whitelist: Arc<WhitelistRegistry>,
    event_log: Arc<EventLogService>,
}

impl AllocationEngine {
    pub fn new(
        inventory: SpaceInventory,
        whitelist: Arc<WhitelistRegistry>,
        event_log: Arc<EventLogService>,
    ) -> Self {
        Self {
            lot: Mutex::new(LotState {
                inventory,
                ledger: OccupancyLedger::new(),
            }),
            whitelist,
            event_log,
        }
    }

    /// Vehicle entry at the current time
    pub async fn entry(&self, plate: &str) -> Result<EntryReceipt> {
        self.entry_at(plate, Utc::now()).await
    }

    /// Vehicle entry at an explicit timestamp
    pub async fn entry_at(&self, plate: &str, now: DateTime<Utc>) -> Result<EntryReceipt> {
        let plate = validate_plate(plate)?;

        // Whitelist snapshot; stored on the record so mid-stay changes
        // never affect this visit's billing
        let has_package = self.whitelist.is_whitelisted(plate).await;

        let mut lot = self.lot.lock().await;

        let space_code = match lot.inventory.find_available(has_package) {
            Some(space) => space.code.clone(),
            None => {
                tracing::warn!(plate = %plate, has_package, "Entry rejected: lot full");
                return Err(Error::LotFull(
                    "no parking space available".to_string(),
                ));
            }
        };

        // Open before occupying: an AlreadyParked failure here aborts with
        // the inventory untouched
        lot.ledger.open(plate, has_package, &space_code, now)?;
        lot.inventory.mark_occupied(&space_code)?;

        self.event_log
            .append(plate, LogAction::Entry, now, 0, 0)
            .await;

        tracing::info!(
            plate = %plate,
            space_code = %space_code,
            has_package,
            "Vehicle entered"
        );

        Ok(EntryReceipt {
            plate: plate.to_string(),
            space_code,
            has_package,
            entered_at: now,
        })
    }

    /// Vehicle exit at the current time
    pub async fn exit(&self, plate: &str) -> Result<ExitReceipt> {
        self.exit_at(plate, Utc::now()).await
    }

    /// Vehicle exit at an explicit timestamp
    pub async fn exit_at(&self, plate: &str, now: DateTime<Utc>) -> Result<ExitReceipt> {
        let plate = validate_plate(plate)?;

        let mut lot = self.lot.lock().await;

        let record = lot
            .ledger
            .active(plate)
            .cloned()
            .ok_or_else(|| Error::NotParked(format!("plate {} is not parked", plate)))?;

        let duration_ms = (now - record.entered_at).num_milliseconds();
        let half_days = billable_half_days(duration_ms);
        let amount = if record.has_package {
            0
        } else {
            half_days * UNIT_RATE
        };

        // Release first, close second: both mutations happen only after the
        // record lookup succeeded, and release is the only step that can
        // still fail
        lot.inventory.mark_available(&record.space_code)?;
        lot.ledger.close(plate, now)?;

        self.event_log
            .append(plate, LogAction::Exit, now, amount, half_days)
            .await;

        tracing::info!(
            plate = %plate,
            space_code = %record.space_code,
            amount,
            half_days,
            has_package = record.has_package,
            "Vehicle exited"
        );

        Ok(ExitReceipt {
            plate: plate.to_string(),
            space_code: record.space_code,
            amount,
            half_days,
            has_package: record.has_package,
            entered_at: record.entered_at,
            exited_at: now,
        })
    }

    /// Operator reservation toggle. Shares the lot lock with entry/exit so a
    /// space cannot be reserved while it is being assigned.
    pub async fn set_reservation(&self, space_code: &str, target: SpaceStatus) -> Result<()> {
        let mut lot = self.lot.lock().await;
        lot.inventory.set_reservation(space_code, target)?;
        tracing::info!(space_code = %space_code, ?target, "Reservation toggled");
        Ok(())
    }

    /// Full space list, sorted by code
    pub async fn spaces(&self) -> Vec<Space> {
        let lot = self.lot.lock().await;
        lot.inventory.spaces().to_vec()
    }

    /// Currently-parked vehicles joined with their space
    pub async fn active_vehicles(&self) -> Vec<ActiveVehicle> {
        let lot = self.lot.lock().await;
        lot.ledger
            .active_records()
            .into_iter()
            .map(|r| ActiveVehicle {
                plate: r.plate.clone(),
                space_code: r.space_code.clone(),
                space_type: lot
                    .inventory
                    .get(&r.space_code)
                    .map(|s| s.space_type)
                    .unwrap_or(SpaceType::Normal),
                has_package: r.has_package,
                entered_at: r.entered_at,
            })
            .collect()
    }

    /// Aggregate counts and revenue for the dashboard
    pub async fn summary(&self) -> LotSummary {
        let (counts, parked) = {
            let lot = self.lot.lock().await;
            (lot.inventory.counts(), lot.ledger.active_count())
        };
        LotSummary {
            spaces: counts,
            parked_vehicles: parked,
            whitelist_plates: self.whitelist.count().await,
            total_revenue: self.event_log.total_revenue().await,
        }
    }
}

/// Billable half-days for a wall-clock duration. Any positive duration bills
/// at least one unit; durations <= 0 (clock adjustment during the stay) bill
/// zero rather than going negative.
fn billable_half_days(duration_ms: i64) -> i64 {
    if duration_ms <= 0 {
        return 0;
    }
    (duration_ms + HALF_DAY_MS - 1) / HALF_DAY_MS
}

fn validate_plate(plate: &str) -> Result<&str> {
    let trimmed = plate.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("plate must not be empty".to_string()));
    }
    Ok(trimmed)
}
