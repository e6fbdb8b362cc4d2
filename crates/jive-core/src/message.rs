//! Message types and JSON serialization.
//!
//! The MCP wire format used throughout this server is JSON-RPC 2.0 only
//! (`spec.md` §6.1), so this module keeps the teacher's zero-copy `Bytes`
//! envelope but drops the MessagePack/CBOR/SIMD-JSON format machinery —
//! there is no remaining caller that needs a non-JSON wire format.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{ContentType, ProtocolVersion, Timestamp};

/// Unique identifier for messages
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageId {
    /// String identifier
    String(String),
    /// Numeric identifier
    Number(i64),
    /// UUID identifier
    Uuid(Uuid),
}

/// Message metadata for tracking and debugging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Message creation timestamp
    pub created_at: Timestamp,

    /// Protocol version used
    pub protocol_version: ProtocolVersion,

    /// Content type of the payload
    pub content_type: ContentType,

    /// Message size in bytes
    pub size: usize,

    /// Correlation ID for request tracing
    pub correlation_id: Option<String>,

    /// Custom headers
    pub headers: HashMap<String, String>,
}

/// Message container with zero-copy JSON support
#[derive(Debug, Clone)]
pub struct Message {
    /// Message identifier
    pub id: MessageId,

    /// Message metadata
    pub metadata: MessageMetadata,

    /// Message payload
    pub payload: MessagePayload,
}

/// Message payload
#[derive(Debug, Clone)]
pub enum MessagePayload {
    /// JSON payload with potential zero-copy
    Json(JsonPayload),

    /// Text payload
    Text(String),

    /// Empty payload
    Empty,
}

/// JSON payload with zero-copy support
#[derive(Debug, Clone)]
pub struct JsonPayload {
    /// Raw JSON bytes (zero-copy when possible)
    pub raw: Bytes,

    /// Parsed JSON value (lazily evaluated)
    pub parsed: Option<Arc<serde_json::Value>>,

    /// Whether the raw bytes are valid JSON
    pub is_valid: bool,
}

impl Message {
    /// Create a new message with JSON payload
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized to JSON.
    pub fn json(id: MessageId, value: impl Serialize) -> Result<Self> {
        let raw = serde_json::to_vec(&value)
            .map(Bytes::from)
            .map_err(|e| Error::serialization(format!("JSON serialization failed: {e}")))?;
        let payload = MessagePayload::Json(JsonPayload {
            raw,
            parsed: Some(Arc::new(serde_json::to_value(value)?)),
            is_valid: true,
        });

        Ok(Self {
            id,
            metadata: MessageMetadata::new(ContentType::Json, payload.size()),
            payload,
        })
    }

    /// Create a new message with text payload
    #[must_use]
    pub fn text(id: MessageId, text: String) -> Self {
        let size = text.len();
        let payload = MessagePayload::Text(text);

        Self {
            id,
            metadata: MessageMetadata::new(ContentType::Text, size),
            payload,
        }
    }

    /// Create an empty message
    #[must_use]
    pub fn empty(id: MessageId) -> Self {
        Self {
            id,
            metadata: MessageMetadata::new(ContentType::Json, 0),
            payload: MessagePayload::Empty,
        }
    }

    /// Get the message size in bytes
    pub const fn size(&self) -> usize {
        self.metadata.size
    }

    /// Check if the message is empty
    pub const fn is_empty(&self) -> bool {
        matches!(self.payload, MessagePayload::Empty)
    }

    /// Serialize the message to JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not JSON-representable.
    pub fn serialize(&self) -> Result<Bytes> {
        match &self.payload {
            MessagePayload::Json(json_payload) => Ok(json_payload.raw.clone()),
            MessagePayload::Text(text) => Ok(Bytes::from(text.clone())),
            MessagePayload::Empty => Ok(Bytes::from_static(b"{}")),
        }
    }

    /// Deserialize a message from raw JSON bytes.
    #[must_use]
    pub fn deserialize(bytes: Bytes) -> Self {
        let is_valid = serde_json::from_slice::<serde_json::Value>(&bytes).is_ok();

        let payload = MessagePayload::Json(JsonPayload {
            raw: bytes,
            parsed: None, // lazy evaluation
            is_valid,
        });

        Self {
            id: MessageId::Uuid(Uuid::new_v4()),
            metadata: MessageMetadata::new(ContentType::Json, payload.size()),
            payload,
        }
    }

    /// Parse the JSON payload into structured data
    pub fn parse_json<T>(&self) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        match &self.payload {
            MessagePayload::Json(json_payload) => json_payload.parsed.as_ref().map_or_else(
                || {
                    serde_json::from_slice(&json_payload.raw)
                        .map_err(|e| Error::serialization(format!("JSON parsing failed: {e}")))
                },
                |parsed| {
                    serde_json::from_value((**parsed).clone())
                        .map_err(|e| Error::serialization(format!("JSON parsing failed: {e}")))
                },
            ),
            _ => Err(Error::validation("Message payload is not JSON")),
        }
    }
}

impl MessagePayload {
    /// Get the size of the payload in bytes
    pub const fn size(&self) -> usize {
        match self {
            Self::Json(json) => json.raw.len(),
            Self::Text(text) => text.len(),
            Self::Empty => 0,
        }
    }
}

impl MessageMetadata {
    /// Create new message metadata
    #[must_use]
    pub fn new(content_type: ContentType, size: usize) -> Self {
        Self {
            created_at: Timestamp::now(),
            protocol_version: ProtocolVersion::default(),
            content_type,
            size,
            correlation_id: None,
            headers: HashMap::new(),
        }
    }

    /// Add a custom header
    #[must_use]
    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Set correlation ID for tracing
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: String) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Uuid(u) => write!(f, "{u}"),
        }
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for MessageId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<Uuid> for MessageId {
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}
