//! Realtime document store configuration.

use serde::{Deserialize, Serialize};

/// Collection names and snapshot delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Collection holding pending (and accepted-in-place) reservations.
    #[serde(default = "default_pending_collection")]
    pub pending_collection: String,
    /// Collection accepted reservations are copied into.
    #[serde(default = "default_accepted_collection")]
    pub accepted_collection: String,
    /// Broadcast buffer per collection subscription.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer: usize,
    /// Snapshots to wait for an optimistic record's echo before dropping it.
    #[serde(default = "default_max_unechoed_snapshots")]
    pub max_unechoed_snapshots: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            pending_collection: default_pending_collection(),
            accepted_collection: default_accepted_collection(),
            channel_buffer: default_channel_buffer(),
            max_unechoed_snapshots: default_max_unechoed_snapshots(),
        }
    }
}

fn default_pending_collection() -> String {
    "reservas-pendientes".to_string()
}

fn default_accepted_collection() -> String {
    "events".to_string()
}

fn default_channel_buffer() -> usize {
    64
}

fn default_max_unechoed_snapshots() -> u32 {
    3
}
