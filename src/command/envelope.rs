//! Inbound command envelope.
//!
//! The broker delivers commands as small JSON objects:
//! `{"id":"42","name":"LED","payload":"3"}`. The id correlates the single
//! outbound status result; the payload is opaque to this layer and
//! interpreted by the handler.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum byte length of a command id.
pub const MAX_CMD_ID_LEN: usize = 32;

/// Maximum byte length of a command name.
pub const MAX_CMD_NAME_LEN: usize = 24;

/// Maximum byte length of a command payload.
pub const MAX_PAYLOAD_LEN: usize = 128;

/// One inbound request, alive for exactly one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub id: heapless::String<MAX_CMD_ID_LEN>,
    pub name: heapless::String<MAX_CMD_NAME_LEN>,
    pub payload: heapless::String<MAX_PAYLOAD_LEN>,
}

impl CommandEnvelope {
    /// Build an envelope from parts, enforcing the field bounds.
    pub fn new(id: &str, name: &str, payload: &str) -> Result<Self> {
        fn bounded<const N: usize>(
            s: &str,
            what: &'static str,
        ) -> Result<heapless::String<N>> {
            let mut out = heapless::String::new();
            out.push_str(s).map_err(|()| Error::Wire(what))?;
            Ok(out)
        }
        Ok(Self {
            id: bounded(id, "command id too long")?,
            name: bounded(name, "command name too long")?,
            payload: bounded(payload, "command payload too long")?,
        })
    }

    /// Parse a raw broker frame. Oversized fields fail the parse — the
    /// bounds above are part of the accepted wire format.
    pub fn from_json(frame: &[u8]) -> Result<Self> {
        serde_json::from_slice(frame).map_err(|_| Error::Wire("malformed command envelope"))
    }
}
