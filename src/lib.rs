//! CloudLink firmware core library.
//!
//! Device-state synchronization and command dispatch for a constrained
//! device reporting to a cloud broker:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  MqttBrokerAdapter        MonotonicClock                       │
//! │  (Connectivity+Transport) (time source)                        │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              SyncService (pure logic)                  │    │
//! │  │  AttributeRegistry ×2 · ChangePublisher · deadlines    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  CommandDispatcher ──▶ handler ──▶ StatusReporter (one ack)    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! behind the `espidf` feature; the core builds and tests on the host.

#![deny(unused_must_use)]

pub mod app;
pub mod command;
pub mod config;
pub mod events;
pub mod state;

mod error;

pub use error::{CommandError, Error, RegistryError, Result, TransportError};

pub mod adapters;
