//! Broker message types.
//!
//! [`Message`] models an in-flight broker message: an opaque byte body, an
//! application header table, and the delivery properties brokers attach to a
//! publication. The publish and consume pipelines own the message; lifecycle
//! observers borrow it mutably during dispatch and may rewrite headers or
//! properties in place (e.g., to stamp tracing metadata before publish).

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A value in a message's application header table.
///
/// Mirrors the scalar types broker header tables carry. `From` conversions
/// keep [`Message::set_header`] call sites terse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    /// Boolean header value.
    Bool(bool),
    /// Signed integer header value.
    Int(i64),
    /// String header value.
    Str(String),
}

impl HeaderValue {
    /// Get the string content, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Bool(_) | Self::Int(_) => None,
        }
    }

    /// Get the integer content, if this is an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Bool(_) | Self::Str(_) => None,
        }
    }

    /// Get the boolean content, if this is a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(_) | Self::Str(_) => None,
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for HeaderValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for HeaderValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Persistence hint attached to a publication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Message may be lost on broker restart.
    #[default]
    Transient,
    /// Message is persisted to disk by the broker.
    Persistent,
}

/// Delivery properties attached to a message.
///
/// A pragmatic subset of the property set AMQP-style brokers support; all
/// fields are optional except the delivery mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageProperties {
    /// MIME content type of the body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Correlation identifier for request/reply flows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Queue to reply to, for request/reply flows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    /// Application-assigned message identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Message priority (0-9 on most brokers).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    /// Persistence hint.
    #[serde(default)]
    pub delivery_mode: DeliveryMode,
}

/// An in-flight broker message.
///
/// # Example
///
/// ```rust,ignore
/// use carrier::message::Message;
///
/// let mut msg = Message::new("example")
///     .with_content_type("text/plain");
/// msg.set_header("x-origin", "billing");
///
/// assert_eq!(msg.body_str(), Some("example"));
/// assert!(msg.header("x-origin").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Raw message body.
    body: Bytes,
    /// Application header table.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    headers: BTreeMap<String, HeaderValue>,
    /// Delivery properties.
    #[serde(default)]
    properties: MessageProperties,
}

impl Message {
    /// Create a message with the given body and default properties.
    #[must_use]
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            headers: BTreeMap::new(),
            properties: MessageProperties::default(),
        }
    }

    /// Create a message whose body is the JSON encoding of `value`, with the
    /// content type set to `application/json`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if `value` fails to
    /// serialize.
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        let body = serde_json::to_vec(value)?;
        Ok(Self::new(body).with_content_type("application/json"))
    }

    /// Deserialize the body as JSON into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if the body is not valid
    /// JSON for `T`.
    pub fn from_json<T: for<'de> Deserialize<'de>>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Set the content type property.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.properties.content_type = Some(content_type.into());
        self
    }

    /// Set the correlation identifier property.
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.properties.correlation_id = Some(correlation_id.into());
        self
    }

    /// Set the reply-to property.
    #[must_use]
    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.properties.reply_to = Some(reply_to.into());
        self
    }

    /// Set the application message identifier property.
    #[must_use]
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.properties.message_id = Some(message_id.into());
        self
    }

    /// Set the priority property.
    #[must_use]
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.properties.priority = Some(priority);
        self
    }

    /// Set the delivery mode property.
    #[must_use]
    pub const fn with_delivery_mode(mut self, mode: DeliveryMode) -> Self {
        self.properties.delivery_mode = mode;
        self
    }

    /// Set a header, replacing any existing value under the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<HeaderValue>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Set a header in builder position.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Get a header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    /// Remove a header, returning its value if present.
    pub fn remove_header(&mut self, name: &str) -> Option<HeaderValue> {
        self.headers.remove(name)
    }

    /// Get the full header table.
    #[must_use]
    pub const fn headers(&self) -> &BTreeMap<String, HeaderValue> {
        &self.headers
    }

    /// Get the raw body bytes.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Get the body as UTF-8 text, if valid.
    #[must_use]
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Replace the body.
    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
    }

    /// Get the delivery properties.
    #[must_use]
    pub const fn properties(&self) -> &MessageProperties {
        &self.properties
    }

    /// Get the delivery properties mutably.
    pub const fn properties_mut(&mut self) -> &mut MessageProperties {
        &mut self.properties
    }
}
