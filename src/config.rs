//! System configuration parameters
//!
//! All tunable parameters for the CloudLink sync layer. Capacities are
//! fixed at init time; the registries and the command table never grow
//! past them afterwards.

use serde::{Deserialize, Serialize};

use crate::command::MAX_COMMANDS;
use crate::error::{Error, Result};
use crate::state::MAX_ATTRIBUTES;

/// Core sync-layer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    // --- Capacities ---
    /// Maximum number of telemetry attributes
    pub max_telemetry_elements: u8,
    /// Maximum number of metadata attributes
    pub max_metadata_elements: u8,
    /// Maximum number of registered commands
    pub max_commands: u8,

    // --- Timing ---
    /// Application loop tick interval (milliseconds)
    pub loop_tick_interval_ms: u32,
    /// Attribute publish interval (milliseconds)
    pub publish_interval_ms: u32,
    /// Output toggle spacing for blink-style commands (milliseconds)
    pub blink_interval_ms: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            // Capacities
            max_telemetry_elements: 8,
            max_metadata_elements: 8,
            max_commands: 4,

            // Timing
            loop_tick_interval_ms: 200,    // 5 Hz
            publish_interval_ms: 5000,     // 1/5s
            blink_interval_ms: 500,
        }
    }
}

impl SyncConfig {
    /// Range-check the configuration against the compile-time ceilings.
    ///
    /// Called by [`SyncService::new`](crate::app::service::SyncService::new);
    /// a failed check leaves nothing constructed.
    pub fn validate(&self) -> Result<()> {
        if self.max_telemetry_elements as usize > MAX_ATTRIBUTES {
            return Err(Error::Config("max_telemetry_elements above ceiling"));
        }
        if self.max_metadata_elements as usize > MAX_ATTRIBUTES {
            return Err(Error::Config("max_metadata_elements above ceiling"));
        }
        if self.max_commands as usize > MAX_COMMANDS {
            return Err(Error::Config("max_commands above ceiling"));
        }
        if self.loop_tick_interval_ms == 0 || self.publish_interval_ms == 0 {
            return Err(Error::Config("intervals must be non-zero"));
        }
        if self.blink_interval_ms == 0 {
            return Err(Error::Config("blink_interval_ms must be non-zero"));
        }
        Ok(())
    }
}
