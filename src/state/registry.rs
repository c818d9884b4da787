//! Bounded attribute registry with dirty-tracking.
//!
//! A registry maps a string key to a typed [`Value`] and remembers which
//! entries changed since the last successful publish. Capacity is chosen
//! at init (never above [`MAX_ATTRIBUTES`]) and the table never grows past
//! it; a registration that would overflow fails without mutating state.
//!
//! Keys are immutable once registered — only the value, the dirty flag and
//! the timestamp change afterwards.
//!
//! A registry instance assumes a single cooperative execution context.
//! Concurrent producers must serialize their updates behind a mutex, or
//! the dirty-flag/value pair can tear.

use log::debug;

use crate::error::RegistryError;
use crate::state::value::{Value, ValueType};

/// Compile-time ceiling on entries per registry.
pub const MAX_ATTRIBUTES: usize = 16;

/// Maximum byte length of an attribute key.
pub const MAX_KEY_LEN: usize = 24;

/// Per-key change observer, fired synchronously from `update` when the
/// stored value actually changes. Runs on the caller's execution context,
/// so it must not block — and must not call back into the same registry
/// instance.
pub type ChangeHook = fn(key: &str, value: &Value);

// ───────────────────────────────────────────────────────────────
// Attribute entry
// ───────────────────────────────────────────────────────────────

/// One key/value slot.
#[derive(Debug, Clone)]
pub struct Attribute {
    key: heapless::String<MAX_KEY_LEN>,
    value: Value,
    dirty: bool,
    last_updated_ms: u64,
    hook: Option<ChangeHook>,
}

impl Attribute {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Monotonic timestamp of the last `update`; 0 for a pre-declared key
    /// that has never been written.
    pub fn last_updated_ms(&self) -> u64 {
        self.last_updated_ms
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

// ───────────────────────────────────────────────────────────────
// Registry
// ───────────────────────────────────────────────────────────────

/// Fixed-capacity key/value table with dirty-tracking.
pub struct AttributeRegistry {
    /// Label for log lines ("telemetry" / "metadata").
    label: &'static str,
    entries: heapless::Vec<Attribute, MAX_ATTRIBUTES>,
    capacity: usize,
}

impl AttributeRegistry {
    /// Create an empty registry holding at most `capacity` entries.
    /// Capacities above [`MAX_ATTRIBUTES`] are clamped to it; callers that
    /// need a hard failure range-check their config first.
    pub fn new(label: &'static str, capacity: usize) -> Self {
        Self {
            label,
            entries: heapless::Vec::new(),
            capacity: capacity.min(MAX_ATTRIBUTES),
        }
    }

    // ── Registration ──────────────────────────────────────────

    /// Pre-declare `key` with the given type. The entry holds the type's
    /// placeholder value and is not dirty until the first `update`.
    pub fn register(&mut self, key: &str, ty: ValueType) -> Result<(), RegistryError> {
        self.register_inner(key, ty, None)
    }

    /// Pre-declare `key` and attach a change hook. The hook fires on every
    /// later `update` that changes the stored value — never on
    /// registration, never on an update that rewrites the same value.
    pub fn register_observed(
        &mut self,
        key: &str,
        ty: ValueType,
        hook: ChangeHook,
    ) -> Result<(), RegistryError> {
        self.register_inner(key, ty, Some(hook))
    }

    fn register_inner(
        &mut self,
        key: &str,
        ty: ValueType,
        hook: Option<ChangeHook>,
    ) -> Result<(), RegistryError> {
        if self.find(key).is_some() {
            return Err(RegistryError::DuplicateKey);
        }
        self.new_slot(key, Value::default_for(ty), false, 0, hook)?;
        debug!("{}: registered '{}' ({:?})", self.label, key, ty);
        Ok(())
    }

    // ── Update ────────────────────────────────────────────────

    /// Write `value` under `key`, stamping it with `now_ms` and marking it
    /// dirty. An unknown key is registered implicitly (first-write); a
    /// known key must be updated with its registered type. Fails without
    /// mutating state.
    pub fn update(&mut self, key: &str, value: Value, now_ms: u64) -> Result<(), RegistryError> {
        match self.entries.iter_mut().find(|e| e.key.as_str() == key) {
            Some(entry) => {
                if entry.value.value_type() != value.value_type() {
                    return Err(RegistryError::TypeMismatch);
                }
                let changed = entry.value != value;
                entry.value = value;
                entry.dirty = true;
                entry.last_updated_ms = now_ms;
                if changed {
                    if let Some(hook) = entry.hook {
                        hook(&entry.key, &entry.value);
                    }
                }
                Ok(())
            }
            None => {
                self.new_slot(key, value, true, now_ms, None)?;
                Ok(())
            }
        }
    }

    fn new_slot(
        &mut self,
        key: &str,
        value: Value,
        dirty: bool,
        now_ms: u64,
        hook: Option<ChangeHook>,
    ) -> Result<(), RegistryError> {
        if self.entries.len() >= self.capacity {
            return Err(RegistryError::CapacityExceeded);
        }
        let mut bounded_key = heapless::String::new();
        bounded_key
            .push_str(key)
            .map_err(|()| RegistryError::KeyTooLong)?;
        let entry = Attribute {
            key: bounded_key,
            value,
            dirty,
            last_updated_ms: now_ms,
            hook,
        };
        self.entries.push(entry).map_err(|_| RegistryError::CapacityExceeded)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.find(key).map(Attribute::value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Number of distinct keys currently registered.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The configured maximum element count.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Entries with unflushed changes.
    pub fn dirty_count(&self) -> usize {
        self.entries.iter().filter(|e| e.dirty).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.entries.iter()
    }

    pub fn iter_dirty(&self) -> impl Iterator<Item = &Attribute> {
        self.entries.iter().filter(|e| e.dirty)
    }

    fn find(&self, key: &str) -> Option<&Attribute> {
        self.entries.iter().find(|e| e.key.as_str() == key)
    }

    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = &mut Attribute> {
        self.entries.iter_mut()
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
