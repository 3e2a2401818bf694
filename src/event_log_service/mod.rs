//! EventLogService - Entry/Exit Event Recording
//!
//! ## Responsibilities
//!
//! - Append-only history of entry/exit events with billed amounts
//! - Provide newest-first queries for the activity view
//! - Derive total revenue for the summary view

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogAction {
    Entry,
    Exit,
}

/// One entry/exit event. Amount and half_days are 0 for entries and for
/// package-vehicle exits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingEvent {
    pub event_id: u64,
    pub plate: String,
    pub action: LogAction,
    pub occurred_at: DateTime<Utc>,
    pub amount: i64,
    pub half_days: i64,
}

/// Append-only event store
struct EventLog {
    events: Vec<ParkingEvent>,
    next_id: u64,
}

impl EventLog {
    fn new() -> Self {
        Self {
            events: Vec::new(),
            next_id: 1,
        }
    }

    fn push(&mut self, mut event: ParkingEvent) -> u64 {
        event.event_id = self.next_id;
        self.next_id += 1;
        self.events.push(event);
        self.next_id - 1
    }

    fn recent(&self, limit: usize) -> Vec<ParkingEvent> {
        self.events.iter().rev().take(limit).cloned().collect()
    }

    fn total_revenue(&self) -> i64 {
        self.events.iter().map(|e| e.amount).sum()
    }
}

/// EventLogService instance
pub struct EventLogService {
    log: RwLock<EventLog>,
}

impl EventLogService {
    pub fn new() -> Self {
        Self {
            log: RwLock::new(EventLog::new()),
        }
    }

    /// Append an event and return its assigned id
    pub async fn append(
        &self,
        plate: &str,
        action: LogAction,
        occurred_at: DateTime<Utc>,
        amount: i64,
        half_days: i64,
    ) -> u64 {
        let mut log = self.log.write().await;
        let id = log.push(ParkingEvent {
            event_id: 0,
            plate: plate.to_string(),
            action,
            occurred_at,
            amount,
            half_days,
        });
        tracing::debug!(event_id = id, plate = %plate, ?action, amount, "Event appended");
        id
    }

    /// Latest events, newest-first
    pub async fn recent(&self, limit: usize) -> Vec<ParkingEvent> {
        let log = self.log.read().await;
        log.recent(limit)
    }

    /// Sum of all recorded amounts, recomputed by full scan
    pub async fn total_revenue(&self) -> i64 {
        let log = self.log.read().await;
        log.total_revenue()
    }

    pub async fn count(&self) -> usize {
        let log = self.log.read().await;
        log.events.len()
    }
}

impl Default for EventLogService {
    fn default() -> Self {
        Self::new()
    }
}
