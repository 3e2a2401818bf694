//! Application state
//!
//! Holds all shared components and state

use crate::allocation_engine::AllocationEngine;
use crate::event_log_service::EventLogService;
use crate::whitelist_registry::WhitelistRegistry;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Normal-type spaces seeded at bootstrap
    pub normal_spaces: usize,
    /// Package-type spaces seeded at bootstrap
    pub package_spaces: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            normal_spaces: std::env::var("NORMAL_SPACES")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(40),
            package_spaces: std::env::var("PACKAGE_SPACES")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(10),
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application config
    pub config: AppConfig,
    /// Allocation & billing engine (owns the lot state)
    pub engine: Arc<AllocationEngine>,
    /// Whitelist registry (operator CRUD surface)
    pub whitelist: Arc<WhitelistRegistry>,
    /// Event log (activity view + revenue)
    pub event_log: Arc<EventLogService>,
}
