//! Acknowledgment decision types.
//!
//! After a queue handler finishes with a delivery, the consume pipeline
//! settles it with the broker: acknowledge, negative-acknowledge, or reject.
//! [`AckDecision`] captures that settlement as a plain value object so
//! consumed-stage observers can inspect what happened to the message they
//! watched go by. Observers receive it by shared reference and are expected
//! to treat it as read-only; the broker settlement itself is performed by the
//! pipeline, not by this crate.

use serde::{Deserialize, Serialize};

/// How a delivery was settled with the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckMode {
    /// Positive acknowledgment.
    Ack,
    /// Negative acknowledgment.
    Nack,
    /// Rejection of a single delivery.
    Reject,
}

impl AckMode {
    /// Get the string representation of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ack => "ack",
            Self::Nack => "nack",
            Self::Reject => "reject",
        }
    }
}

impl std::fmt::Display for AckMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The settlement decision produced for a consumed delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckDecision {
    /// The settlement mode.
    pub mode: AckMode,
    /// Whether the broker was asked to requeue the delivery.
    pub requeue: bool,
    /// Whether the settlement covered all outstanding deliveries up to this
    /// one (`basic.ack`/`basic.nack` multiple flag).
    pub multiple: bool,
}

impl AckDecision {
    /// A positive acknowledgment of a single delivery.
    #[must_use]
    pub const fn ack() -> Self {
        Self {
            mode: AckMode::Ack,
            requeue: false,
            multiple: false,
        }
    }

    /// A negative acknowledgment.
    #[must_use]
    pub const fn nack(requeue: bool, multiple: bool) -> Self {
        Self {
            mode: AckMode::Nack,
            requeue,
            multiple,
        }
    }

    /// A rejection of a single delivery.
    #[must_use]
    pub const fn reject(requeue: bool) -> Self {
        Self {
            mode: AckMode::Reject,
            requeue,
            multiple: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ack_is_single_and_final() {
        let decision = AckDecision::ack();
        assert_eq!(decision.mode, AckMode::Ack);
        assert!(!decision.requeue);
        assert!(!decision.multiple);
    }

    #[test]
    fn nack_carries_flags() {
        let decision = AckDecision::nack(true, true);
        assert_eq!(decision.mode, AckMode::Nack);
        assert!(decision.requeue);
        assert!(decision.multiple);
    }

    #[test]
    fn reject_never_covers_multiple() {
        let decision = AckDecision::reject(true);
        assert_eq!(decision.mode, AckMode::Reject);
        assert!(decision.requeue);
        assert!(!decision.multiple);
    }

    #[test]
    fn mode_display_matches_wire_names() {
        assert_eq!(AckMode::Ack.to_string(), "ack");
        assert_eq!(AckMode::Nack.to_string(), "nack");
        assert_eq!(AckMode::Reject.to_string(), "reject");
    }
}
