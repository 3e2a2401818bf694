//! Lotserver Library
//!
//! Parking lot control server
//!
//! ## Architecture (6 Components)
//!
//! 1. WhitelistRegistry - Package plate entitlements
//! 2. SpaceInventory - Fixed space pool with allocation search
//! 3. OccupancyLedger - One active record per parked plate
//! 4. AllocationEngine - Entry/exit state machine and billing
//! 5. EventLogService - Append-only entry/exit history
//! 6. WebAPI - REST API endpoints
//!
//! ## Design Principles
//!
//! - Single writer: inventory and ledger mutate only under the engine's
//!   lot mutex, so entry/exit sequences never interleave
//! - Snapshot billing: whitelist membership is captured at entry and
//!   billed from the record at exit
//! - Thin edges: web handlers validate and delegate, nothing more

pub mod allocation_engine;
pub mod error;
pub mod event_log_service;
pub mod models;
pub mod occupancy_ledger;
pub mod space_inventory;
pub mod state;
pub mod web_api;
pub mod whitelist_registry;

pub use error::{Error, Result};
pub use state::AppState;
