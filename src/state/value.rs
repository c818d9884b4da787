//! Typed attribute values.
//!
//! The wire format expects a bare JSON scalar per value (`20`, `10.5`,
//! `"ESP32"`), hence the untagged serialization. Text values are bounded
//! so a registry entry never allocates.

use serde::Serialize;

use crate::error::RegistryError;

/// Maximum byte length of a text value.
pub const MAX_TEXT_LEN: usize = 64;

/// Declared type of an attribute, fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Int,
    Float,
    Text,
}

/// A telemetry or metadata value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i32),
    Float(f32),
    Text(heapless::String<MAX_TEXT_LEN>),
}

impl Value {
    /// Build a bounded text value; fails rather than truncating.
    pub fn text(s: &str) -> Result<Self, RegistryError> {
        let mut text = heapless::String::new();
        text.push_str(s).map_err(|()| RegistryError::ValueTooLong)?;
        Ok(Self::Text(text))
    }

    /// The declared type this value belongs to.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Int(_) => ValueType::Int,
            Self::Float(_) => ValueType::Float,
            Self::Text(_) => ValueType::Text,
        }
    }

    /// Placeholder value a pre-declared key holds until its first update.
    pub fn default_for(ty: ValueType) -> Self {
        match ty {
            ValueType::Int => Self::Int(0),
            ValueType::Float => Self::Float(0.0),
            ValueType::Text => Self::Text(heapless::String::new()),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}
