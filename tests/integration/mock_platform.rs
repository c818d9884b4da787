//! Mock platform adapters for integration tests.
//!
//! Records every outbound frame and output write so tests can assert on
//! the full history without a broker or GPIO registers.

use cloudlink::TransportError;
use cloudlink::app::ports::{ConnectivityPort, DeviceMode, OutputPort, TransportPort};

// ── Connectivity ─────────────────────────────────────────────

pub struct MockLink {
    pub connected: bool,
    pub mode: DeviceMode,
}

#[allow(dead_code)]
impl MockLink {
    pub fn up() -> Self {
        Self {
            connected: true,
            mode: DeviceMode::Normal,
        }
    }

    pub fn down() -> Self {
        Self {
            connected: false,
            mode: DeviceMode::Normal,
        }
    }
}

impl ConnectivityPort for MockLink {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn mode(&self) -> DeviceMode {
        self.mode
    }
}

// ── Transport ────────────────────────────────────────────────

/// Records frames as UTF-8 strings; can inject per-channel failures.
#[derive(Default)]
pub struct MockBroker {
    pub updates: Vec<String>,
    pub statuses: Vec<String>,
    pub fail_updates: bool,
    pub fail_statuses: bool,
}

#[allow(dead_code)]
impl MockBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_status(&self) -> Option<&str> {
        self.statuses.last().map(String::as_str)
    }
}

impl TransportPort for MockBroker {
    fn publish_update(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        if self.fail_updates {
            return Err(TransportError::PublishFailed);
        }
        self.updates.push(String::from_utf8(frame.to_vec()).unwrap());
        Ok(())
    }

    fn send_status(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        if self.fail_statuses {
            return Err(TransportError::PublishFailed);
        }
        self.statuses.push(String::from_utf8(frame.to_vec()).unwrap());
        Ok(())
    }
}

// ── Output ───────────────────────────────────────────────────

/// Binary output that stamps each write with a caller-set clock.
#[derive(Default)]
pub struct MockOutput {
    pub now_ms: u64,
    pub writes: Vec<(u64, bool)>,
}

#[allow(dead_code)]
impl MockOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> bool {
        self.writes.last().map(|(_, on)| *on).unwrap_or(false)
    }
}

impl OutputPort for MockOutput {
    fn set_output(&mut self, on: bool) {
        let at = self.now_ms;
        self.writes.push((at, on));
    }
}
