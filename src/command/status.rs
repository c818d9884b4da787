//! Status results — the outbound half of the command protocol.
//!
//! Each dispatched (or unrecognized) command is acknowledged by exactly
//! one [`StatusResult`], correlated to the originating envelope by id.
//! Sending is best-effort: a transport failure is surfaced to the caller
//! and the command is never re-dispatched to produce a second ack.

use log::debug;
use serde::Serialize;

use crate::app::ports::TransportPort;
use crate::error::{Error, Result};

/// Maximum byte length of a status message.
pub const MAX_STATUS_MSG_LEN: usize = 64;

// Broker status codes, HTTP-flavored like the cloud side expects.
pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_UNKNOWN_COMMAND: u16 = 404;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

// ───────────────────────────────────────────────────────────────
// Handler outcome
// ───────────────────────────────────────────────────────────────

/// What a command handler reports back. A failing handler returns a
/// non-success code here instead of panicking — the dispatcher performs
/// no implicit error translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStatus {
    pub code: u16,
    pub message: heapless::String<MAX_STATUS_MSG_LEN>,
}

impl CommandStatus {
    /// 200 / "Ok".
    pub fn ok() -> Self {
        Self::new(STATUS_OK, "Ok")
    }

    /// Arbitrary code with a message; overlong messages are cut at the
    /// bound rather than rejected (an ack must always be expressible).
    pub fn new(code: u16, message: &str) -> Self {
        let mut bounded = heapless::String::new();
        for ch in message.chars() {
            if bounded.push(ch).is_err() {
                break;
            }
        }
        Self {
            code,
            message: bounded,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Wire type + reporter
// ───────────────────────────────────────────────────────────────

/// Serialized acknowledgement, one per invocation.
#[derive(Debug, Serialize)]
pub struct StatusResult<'a> {
    pub name: &'a str,
    pub id: &'a str,
    pub payload: &'a str,
    pub code: u16,
    pub message: &'a str,
}

/// Serializes status results and forwards them through the transport.
pub struct StatusReporter {
    sent_total: u64,
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusReporter {
    pub fn new() -> Self {
        Self { sent_total: 0 }
    }

    /// Serialize and send one acknowledgement. On transport failure the
    /// error is surfaced to the caller; this layer never retries — retry
    /// policy, if any, belongs to the transport.
    pub fn send(
        &mut self,
        transport: &mut impl TransportPort,
        name: &str,
        id: &str,
        payload: &str,
        code: u16,
        message: &str,
    ) -> Result<()> {
        let result = StatusResult {
            name,
            id,
            payload,
            code,
            message,
        };
        let frame = serde_json::to_vec(&result).map_err(|_| Error::Wire("status result"))?;
        transport.send_status(&frame)?;
        self.sent_total += 1;
        debug!("status {} for '{}' (id {})", code, name, id);
        Ok(())
    }

    /// Acknowledgements delivered over the lifetime of this reporter.
    pub fn sent_total(&self) -> u64 {
        self.sent_total
    }
}
