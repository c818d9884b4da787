//! Unified error types for the CloudLink core.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! application loop's error handling uniform. All variants are `Copy` so
//! they can be cheaply passed across the loop and logged without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the core funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An attribute registry operation failed.
    Registry(RegistryError),
    /// A command registration or dispatch operation failed.
    Command(CommandError),
    /// A flush was attempted while the link is down. Nothing was sent and
    /// no dirty flag was touched; the caller retries on a later tick.
    TransportUnavailable,
    /// The transport accepted an attempt and reported failure.
    Transport(TransportError),
    /// Wire encoding or decoding failed; names the frame kind.
    Wire(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registry(e) => write!(f, "registry: {e}"),
            Self::Command(e) => write!(f, "command: {e}"),
            Self::TransportUnavailable => write!(f, "transport unavailable"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Wire(msg) => write!(f, "wire: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Registry errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// The key is new and the registry already holds its configured maximum.
    CapacityExceeded,
    /// `register` was called for a key that is already present.
    DuplicateKey,
    /// `update` was called with a value type other than the one the key was
    /// registered with.
    TypeMismatch,
    /// The key exceeds the compile-time key length bound.
    KeyTooLong,
    /// A string value exceeds the compile-time text length bound.
    ValueTooLong,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded => write!(f, "capacity exceeded"),
            Self::DuplicateKey => write!(f, "duplicate key"),
            Self::TypeMismatch => write!(f, "type mismatch"),
            Self::KeyTooLong => write!(f, "key too long"),
            Self::ValueTooLong => write!(f, "value too long"),
        }
    }
}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// No handler is registered under the inbound command name.
    UnknownCommand,
    /// `register` was called for a name that is already present.
    DuplicateName,
    /// The handler table already holds its configured maximum.
    TableFull,
    /// The command name exceeds the compile-time name length bound.
    NameTooLong,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand => write!(f, "unknown command"),
            Self::DuplicateName => write!(f, "duplicate name"),
            Self::TableFull => write!(f, "table full"),
            Self::NameTooLong => write!(f, "name too long"),
        }
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Failures reported by `TransportPort` implementations. Retry policy, if
/// any, belongs to the transport layer; the core surfaces these upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The link dropped between the connectivity check and the send.
    NotConnected,
    /// The broker or the underlying client rejected the publish.
    PublishFailed,
    /// The send did not complete in time.
    Timeout,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected"),
            Self::PublishFailed => write!(f, "publish failed"),
            Self::Timeout => write!(f, "timed out"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
