//! Change publisher — drains dirty attributes through the transport.
//!
//! The publisher performs no internal timing; the application loop owns
//! the cadence and calls [`ChangePublisher::flush`] when the publish
//! deadline passes. Delivery is at-least-once: an entry's dirty flag is
//! cleared only after the transport accepts that record, so a failure
//! mid-batch leaves the failed and remaining records dirty for the next
//! eligible tick.

use log::{debug, warn};
use serde::Serialize;

use crate::app::ports::{ConnectivityPort, TransportPort};
use crate::error::{Error, Result};
use crate::state::registry::AttributeRegistry;
use crate::state::value::Value;

/// One serialized attribute update.
#[derive(Debug, Serialize)]
pub struct UpdateRecord<'a> {
    pub key: &'a str,
    pub value: &'a Value,
    /// Monotonic milliseconds of the update that made the entry dirty.
    pub ts: u64,
}

/// Stateless apart from delivery counters; one instance serves any number
/// of registries.
pub struct ChangePublisher {
    published_total: u64,
}

impl Default for ChangePublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangePublisher {
    pub fn new() -> Self {
        Self { published_total: 0 }
    }

    /// Serialize and hand every dirty entry of `registry` to the
    /// transport, clearing each dirty flag as the transport accepts the
    /// record. Returns the number of records delivered.
    ///
    /// Fails with [`Error::TransportUnavailable`] when the link is down,
    /// touching nothing — the data is not lost, just retried later.
    pub fn flush(
        &mut self,
        registry: &mut AttributeRegistry,
        conn: &impl ConnectivityPort,
        transport: &mut impl TransportPort,
    ) -> Result<usize> {
        if !conn.is_connected() {
            return Err(Error::TransportUnavailable);
        }

        let label = registry.label();
        let mut delivered = 0usize;
        for entry in registry.entries_mut() {
            if !entry.is_dirty() {
                continue;
            }
            let record = UpdateRecord {
                key: entry.key(),
                value: entry.value(),
                ts: entry.last_updated_ms(),
            };
            let frame =
                serde_json::to_vec(&record).map_err(|_| Error::Wire("update record"))?;
            if let Err(e) = transport.publish_update(&frame) {
                warn!("{}: publish of '{}' failed ({}), kept dirty", label, entry.key(), e);
                return Err(Error::Transport(e));
            }
            debug!("{}: published '{}'", label, record.key);
            entry.clear_dirty();
            delivered += 1;
        }

        self.published_total += delivered as u64;
        Ok(delivered)
    }

    /// Records delivered over the lifetime of this publisher.
    pub fn published_total(&self) -> u64 {
        self.published_total
    }
}
