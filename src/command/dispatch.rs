//! Command dispatcher — bounded handler table and one-shot dispatch.
//!
//! Dispatch outcome state machine:
//!
//! ```text
//! Received ──▶ Dispatched ──▶ Acked
//!     └──────▶ Unrecognized ─▶ Acked
//! ```
//!
//! Both branches terminate in a single acknowledgement; there is no retry
//! state because each inbound command is a one-shot request. Handlers run
//! synchronously on the caller's context and return a
//! [`CommandStatus`](super::status::CommandStatus) instead of emitting the
//! ack themselves; the dispatcher owns the single send.

use log::{info, warn};

use crate::app::ports::TransportPort;
use crate::command::envelope::{CommandEnvelope, MAX_CMD_NAME_LEN};
use crate::command::status::{CommandStatus, StatusReporter, STATUS_UNKNOWN_COMMAND};
use crate::error::{CommandError, Result};

/// Compile-time ceiling on registered commands.
pub const MAX_COMMANDS: usize = 8;

/// One dispatchable request, borrowed from its envelope.
#[derive(Debug, Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub name: &'a str,
    pub id: &'a str,
    pub payload: &'a str,
}

/// Handler signature. `C` is the application context the handler mutates
/// (actuator state, registries, counters); handlers that fail report a
/// non-success status rather than panicking.
pub type CommandHandler<C> = fn(ctx: &mut C, inv: &CommandInvocation<'_>) -> CommandStatus;

/// Terminal classification of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A handler ran and its status was acknowledged.
    Dispatched,
    /// No handler matched; an unknown-command status was acknowledged.
    Unrecognized,
}

struct CommandSlot<C> {
    name: heapless::String<MAX_CMD_NAME_LEN>,
    handler: CommandHandler<C>,
}

/// Fixed-capacity name → handler table.
pub struct CommandDispatcher<C> {
    table: heapless::Vec<CommandSlot<C>, MAX_COMMANDS>,
    capacity: usize,
    dispatched_total: u64,
    unrecognized_total: u64,
}

impl<C> CommandDispatcher<C> {
    /// Create an empty table holding at most `capacity` handlers.
    /// Capacities above [`MAX_COMMANDS`] are clamped to it.
    pub fn new(capacity: usize) -> Self {
        Self {
            table: heapless::Vec::new(),
            capacity: capacity.min(MAX_COMMANDS),
            dispatched_total: 0,
            unrecognized_total: 0,
        }
    }

    // ── Registration ──────────────────────────────────────────

    /// Register `handler` under `name`. Duplicate names are rejected and
    /// the table is never grown past its configured capacity.
    pub fn register(&mut self, name: &str, handler: CommandHandler<C>) -> Result<()> {
        if self.table.iter().any(|slot| slot.name.as_str() == name) {
            return Err(CommandError::DuplicateName.into());
        }
        if self.table.len() >= self.capacity {
            return Err(CommandError::TableFull.into());
        }
        let mut bounded_name = heapless::String::new();
        bounded_name
            .push_str(name)
            .map_err(|()| crate::Error::from(CommandError::NameTooLong))?;
        info!("command '{}' registered", name);
        self.table
            .push(CommandSlot {
                name: bounded_name,
                handler,
            })
            .map_err(|_| CommandError::TableFull.into())
    }

    // ── Dispatch ──────────────────────────────────────────────

    /// Resolve and run the handler for one inbound envelope, then emit the
    /// single correlated status through `reporter`.
    ///
    /// An unregistered name never invokes any handler; it is acknowledged
    /// with [`STATUS_UNKNOWN_COMMAND`] rather than silently dropped. An
    /// `Err` from this method means the ack send failed — the handler (if
    /// any) has already run and is never re-executed.
    pub fn handle_incoming(
        &mut self,
        ctx: &mut C,
        envelope: &CommandEnvelope,
        reporter: &mut StatusReporter,
        transport: &mut impl TransportPort,
    ) -> Result<DispatchOutcome> {
        let inv = CommandInvocation {
            name: &envelope.name,
            id: &envelope.id,
            payload: &envelope.payload,
        };

        let Some(handler) = self
            .table
            .iter()
            .find(|slot| slot.name == envelope.name)
            .map(|slot| slot.handler)
        else {
            warn!("unknown command '{}' (id {})", inv.name, inv.id);
            self.unrecognized_total += 1;
            reporter.send(
                transport,
                inv.name,
                inv.id,
                inv.payload,
                STATUS_UNKNOWN_COMMAND,
                "unknown command",
            )?;
            return Ok(DispatchOutcome::Unrecognized);
        };

        info!("dispatch '{}' (id {}): {}", inv.name, inv.id, inv.payload);
        let status = handler(ctx, &inv);
        self.dispatched_total += 1;
        reporter.send(
            transport,
            inv.name,
            inv.id,
            inv.payload,
            status.code,
            &status.message,
        )?;
        Ok(DispatchOutcome::Dispatched)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The configured maximum handler count.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.iter().any(|slot| slot.name.as_str() == name)
    }

    /// Commands dispatched to a handler over this dispatcher's lifetime.
    pub fn dispatched_total(&self) -> u64 {
        self.dispatched_total
    }

    /// Inbound commands that matched no handler.
    pub fn unrecognized_total(&self) -> u64 {
        self.unrecognized_total
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
