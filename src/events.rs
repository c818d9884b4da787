//! Connectivity and loop event notifications.
//!
//! Events are produced by:
//! - Transport callbacks (Wi-Fi up/down, broker session up/down)
//! - Timer callbacks (publish deadline service, blink spacing)
//! - Software (command intake)
//!
//! Events are consumed by the application loop, which processes them one
//! at a time in FIFO order — the tagged-variant replacement for a
//! switch-based connectivity callback.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Wi-Fi cb    │────▶│              │     │              │
//! │ Broker cb   │────▶│  Event Queue │────▶│  App Loop    │
//! │ Timer cb    │────▶│  (lock-free) │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 32;

/// System event types, ordered by rough priority.
/// Lower discriminant = higher priority when multiple events
/// are pending simultaneously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    // ── Connectivity (highest priority — gates publishing) ──
    /// The broker session dropped.
    BrokerDisconnected   = 0,
    /// The network link dropped.
    WifiDisconnected     = 1,
    /// The broker session is established.
    BrokerConnected      = 2,
    /// The network link is up.
    WifiConnected        = 3,

    // ── Communication ───────────────────────────────────────
    /// An inbound command frame arrived from the transport.
    CommandReceived      = 10,

    // ── Loop housekeeping ───────────────────────────────────
    /// Publish deadline service tick.
    PublishTick          = 20,
    /// Blink spacing tick.
    BlinkTick            = 21,
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// Transport/timer callbacks write (produce), the app loop reads
// (consume). Uses atomic head/tail indices. The buffer is intentionally
// kept in a static so foreign-thread callbacks can access it.

static EVENT_HEAD: AtomicU8 = AtomicU8::new(0);
static EVENT_TAIL: AtomicU8 = AtomicU8::new(0);
// SAFETY: EVENT_BUFFER is accessed exclusively through push_event /
// pop_event. Producer (push_event): transport or timer callback context —
// one writer. Consumer (pop_event): app-loop task — one reader. The
// acquire/release pairing on the indices enforces the SPSC discipline.
static mut EVENT_BUFFER: [u8; EVENT_QUEUE_CAP] = [0; EVENT_QUEUE_CAP];

/// Push an event into the queue.
/// Safe to call from callback context (lock-free).
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    let head = EVENT_HEAD.load(Ordering::Relaxed);
    let tail = EVENT_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % EVENT_QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop event.
    }

    // SAFETY: only one producer; the index store below publishes the slot.
    unsafe {
        EVENT_BUFFER[head as usize] = event as u8;
    }

    EVENT_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next event from the queue.
/// Called from the app loop (single consumer).
/// Returns `None` if the queue is empty.
pub fn pop_event() -> Option<Event> {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    let raw = unsafe { EVENT_BUFFER[tail as usize] };
    EVENT_TAIL.store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);

    event_from_u8(raw)
}

/// Drain all pending events into a callback.
/// Processes events in FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

/// Check if the event queue is empty.
pub fn queue_is_empty() -> bool {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);
    tail == head
}

/// Number of pending events.
pub fn queue_len() -> usize {
    let head = EVENT_HEAD.load(Ordering::Relaxed) as usize;
    let tail = EVENT_TAIL.load(Ordering::Relaxed) as usize;
    (head + EVENT_QUEUE_CAP - tail) % EVENT_QUEUE_CAP
}

// ── Internal ──────────────────────────────────────────────────

fn event_from_u8(raw: u8) -> Option<Event> {
    match raw {
        0  => Some(Event::BrokerDisconnected),
        1  => Some(Event::WifiDisconnected),
        2  => Some(Event::BrokerConnected),
        3  => Some(Event::WifiConnected),
        10 => Some(Event::CommandReceived),
        20 => Some(Event::PublishTick),
        21 => Some(Event::BlinkTick),
        _  => None,
    }
}
