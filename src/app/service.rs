//! Sync service — the hexagonal core.
//!
//! [`SyncService`] owns both attribute registries, the change publisher
//! and the periodic-loop state (the next-publish deadline). It exposes a
//! clean, platform-agnostic API; all I/O flows through port traits injected at
//! call sites, making the entire service testable with mock adapters.
//!
//! ```text
//!  ConnectivityPort ──▶ ┌──────────────────────────┐
//!                       │       SyncService        │ ──▶ TransportPort
//!        (clock) now ──▶│ telemetry · metadata ·   │
//!                       │ publisher · deadline     │
//!                       └──────────────────────────┘
//! ```

use log::{info, warn};

use crate::app::ports::{ConnectivityPort, DeviceMode, TransportPort};
use crate::config::SyncConfig;
use crate::error::Result;
use crate::state::publish::ChangePublisher;
use crate::state::registry::{AttributeRegistry, ChangeHook};
use crate::state::value::{Value, ValueType};

/// What one loop tick did. Every gate short-circuits without touching
/// registry state, so calling `tick` again before the deadline is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The device is provisioning or degraded; sync is suspended.
    ModeGated(DeviceMode),
    /// The broker session is down; dirty state is held back.
    LinkDown,
    /// The publish deadline has not passed yet.
    NotDue,
    /// Dirty attributes were flushed.
    Published { records: usize },
}

/// The sync service orchestrates registries, publishing and cadence.
pub struct SyncService {
    telemetry: AttributeRegistry,
    metadata: AttributeRegistry,
    publisher: ChangePublisher,
    publish_interval_ms: u32,
    /// 0 until the first eligible tick, which therefore publishes
    /// immediately and then advances the deadline.
    next_publish_ms: u64,
    tick_count: u64,
}

impl SyncService {
    /// Construct the service from configuration. Fails on out-of-range
    /// capacities or zero intervals, constructing nothing.
    pub fn new(config: &SyncConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            telemetry: AttributeRegistry::new(
                "telemetry",
                config.max_telemetry_elements as usize,
            ),
            metadata: AttributeRegistry::new("metadata", config.max_metadata_elements as usize),
            publisher: ChangePublisher::new(),
            publish_interval_ms: config.publish_interval_ms,
            next_publish_ms: 0,
            tick_count: 0,
        })
    }

    // ── Attribute API ─────────────────────────────────────────

    /// Write a telemetry attribute (implicit first-write registration).
    pub fn update_telemetry(&mut self, key: &str, value: Value, now_ms: u64) -> Result<()> {
        self.telemetry.update(key, value, now_ms).map_err(Into::into)
    }

    /// Write a metadata attribute.
    pub fn update_metadata(&mut self, key: &str, value: Value, now_ms: u64) -> Result<()> {
        self.metadata.update(key, value, now_ms).map_err(Into::into)
    }

    /// Pre-declare a metadata key.
    pub fn register_metadata(&mut self, key: &str, ty: ValueType) -> Result<()> {
        self.metadata.register(key, ty).map_err(Into::into)
    }

    /// Pre-declare a metadata key with a synchronous change hook.
    pub fn register_metadata_observed(
        &mut self,
        key: &str,
        ty: ValueType,
        hook: ChangeHook,
    ) -> Result<()> {
        self.metadata
            .register_observed(key, ty, hook)
            .map_err(Into::into)
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one loop tick: mode gate → connectivity gate → deadline check
    /// → flush both registries → advance the deadline.
    ///
    /// The deadline only advances after a fully successful flush; a
    /// transport failure leaves it in place so the very next tick retries
    /// whatever is still dirty (at-least-once delivery).
    pub fn tick(
        &mut self,
        now_ms: u64,
        conn: &impl ConnectivityPort,
        transport: &mut impl TransportPort,
    ) -> Result<TickOutcome> {
        self.tick_count += 1;

        let mode = conn.mode();
        if mode != DeviceMode::Normal {
            return Ok(TickOutcome::ModeGated(mode));
        }
        if !conn.is_connected() {
            return Ok(TickOutcome::LinkDown);
        }
        if now_ms < self.next_publish_ms {
            return Ok(TickOutcome::NotDue);
        }

        let records = match self.flush_all(conn, transport) {
            Ok(n) => n,
            Err(e) => {
                warn!("flush failed: {e} (retrying next tick)");
                return Err(e);
            }
        };

        self.next_publish_ms = now_ms + u64::from(self.publish_interval_ms);
        if records > 0 {
            info!("published {} attribute update(s)", records);
        }
        Ok(TickOutcome::Published { records })
    }

    /// Flush dirty entries of both registries immediately, bypassing the
    /// deadline (used on reconnect, before sleep, or by tests).
    pub fn flush_all(
        &mut self,
        conn: &impl ConnectivityPort,
        transport: &mut impl TransportPort,
    ) -> Result<usize> {
        let mut records = self.publisher.flush(&mut self.telemetry, conn, transport)?;
        records += self.publisher.flush(&mut self.metadata, conn, transport)?;
        Ok(records)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn telemetry(&self) -> &AttributeRegistry {
        &self.telemetry
    }

    pub fn metadata(&self) -> &AttributeRegistry {
        &self.metadata
    }

    /// Loop ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Attribute updates delivered since startup.
    pub fn published_total(&self) -> u64 {
        self.publisher.published_total()
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
