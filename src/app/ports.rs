//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SyncService (domain)
//! ```
//!
//! The transport collaborator owns the connection lifecycle; the core only
//! reads a boolean "connected" signal and a "mode" signal through
//! [`ConnectivityPort`] and never mutates transport state directly.
//! Outbound frames leave through [`TransportPort`]; the single actuator
//! the command examples drive is behind [`OutputPort`].

use crate::error::TransportError;

// ───────────────────────────────────────────────────────────────
// Device mode
// ───────────────────────────────────────────────────────────────

/// Coarse platform mode gating the periodic loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceMode {
    /// Fully provisioned and operating.
    #[default]
    Normal,
    /// Credential / endpoint provisioning in progress.
    Provisioning,
    /// Platform-level fault; sync activity suspended.
    Degraded,
}

// ───────────────────────────────────────────────────────────────
// Connectivity port (platform → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the link and mode gates.
pub trait ConnectivityPort {
    /// Whether the broker session is currently established.
    fn is_connected(&self) -> bool;

    /// Current coarse device mode.
    fn mode(&self) -> DeviceMode;
}

// ───────────────────────────────────────────────────────────────
// Transport port (domain → broker)
// ───────────────────────────────────────────────────────────────

/// Write-side port: serialized frames leave the core through this trait.
/// Implementations own topics, sessions and retries; the core treats a
/// returned error as "this frame did not go out".
pub trait TransportPort {
    /// Forward one serialized attribute update.
    fn publish_update(&mut self, frame: &[u8]) -> Result<(), TransportError>;

    /// Forward one serialized command status result.
    fn send_status(&mut self, frame: &[u8]) -> Result<(), TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Output port (domain → actuator)
// ───────────────────────────────────────────────────────────────

/// Binary actuator (LED, relay) driven by blink-style commands.
pub trait OutputPort {
    fn set_output(&mut self, on: bool);
}
