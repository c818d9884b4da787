//! Blink command pattern.
//!
//! The cloud sends a count; the device answers by toggling its output
//! that many times. The inbound count is doubled so every blink consists
//! of an ON and an OFF phase, which also pins the terminal level to OFF.
//! Counts 0 and 1 are not blinks at all — they write the level directly.
//!
//! Toggle spacing is driven by the application loop clock, so the struct
//! carries its own deadline instead of a process-wide global.

use log::info;

use crate::app::ports::OutputPort;

/// Loop-owned state for one blinkable output.
#[derive(Debug)]
pub struct Blinker {
    /// Toggles still owed. Even = next write is OFF-phase.
    remaining: u32,
    next_toggle_ms: u64,
    interval_ms: u32,
}

impl Blinker {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            remaining: 0,
            next_toggle_ms: 0,
            interval_ms,
        }
    }

    /// Apply an inbound count: `0` forces the output LOW, `1` forces it
    /// HIGH, anything larger schedules `2 * count` toggles. A new command
    /// replaces whatever blink sequence was still running.
    pub fn command(&mut self, count: u32, out: &mut impl OutputPort) {
        match count {
            0 | 1 => {
                out.set_output(count == 1);
                self.remaining = 0;
            }
            n => {
                self.remaining = n * 2;
                self.next_toggle_ms = 0;
                info!("blink x{} scheduled ({} toggles)", n, self.remaining);
            }
        }
    }

    /// Advance the blink sequence. Safe to call every loop tick; does
    /// nothing until the toggle deadline passes.
    pub fn tick(&mut self, now_ms: u64, out: &mut impl OutputPort) {
        if self.remaining > 0 && now_ms >= self.next_toggle_ms {
            self.remaining -= 1;
            self.next_toggle_ms = now_ms + u64::from(self.interval_ms);
            out.set_output(self.remaining & 1 == 1);
        }
    }

    /// Whether a blink sequence is still running.
    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    /// Toggles still owed.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

/// Parse a decimal count from an opaque command payload; anything
/// unparsable reads as 0 (forcing the output LOW).
pub fn parse_count(payload: &str) -> u32 {
    payload.trim().parse().unwrap_or(0)
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
