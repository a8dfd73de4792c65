//! Lifecycle stages.

use serde::{Deserialize, Serialize};

/// A point in a message's life at which observers can run.
///
/// Each stage owns an independent, append-only observer list inside
/// [`LifecycleHooks`](super::LifecycleHooks); stages never share or reorder
/// each other's lists, and no ordering exists across stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Immediately before the message is handed to the transport.
    BeforePublish,
    /// Immediately after a successful publish.
    Published,
    /// Immediately before the resolved queue handler is invoked.
    BeforeConsume,
    /// Immediately after the handler has produced an acknowledgment decision.
    Consumed,
}

impl Stage {
    /// All stages, in pipeline order.
    pub const ALL: [Self; 4] = [
        Self::BeforePublish,
        Self::Published,
        Self::BeforeConsume,
        Self::Consumed,
    ];

    /// Get the string representation of the stage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BeforePublish => "before_publish",
            Self::Published => "published",
            Self::BeforeConsume => "before_consume",
            Self::Consumed => "consumed",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_snake_case_names() {
        assert_eq!(Stage::BeforePublish.to_string(), "before_publish");
        assert_eq!(Stage::Consumed.to_string(), "consumed");
    }

    #[test]
    fn serde_matches_as_str() {
        for stage in Stage::ALL {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage.as_str()));
        }
    }
}
