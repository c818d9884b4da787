//! Device state — bounded attribute registries and change publishing.
//!
//! Two registry instances exist at runtime with separate identity spaces:
//! *telemetry* (ephemeral, frequently updated, implicit first-write
//! registration) and *metadata* (slowly changing, explicitly registered,
//! optionally observed via change hooks). The [`publish`] module drains
//! dirty entries through the transport port.

pub mod publish;
pub mod registry;
pub mod value;

pub use publish::{ChangePublisher, UpdateRecord};
pub use registry::{AttributeRegistry, ChangeHook, MAX_ATTRIBUTES, MAX_KEY_LEN};
pub use value::{MAX_TEXT_LEN, Value, ValueType};
