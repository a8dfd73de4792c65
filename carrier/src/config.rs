//! Lifecycle configuration.
//!
//! One knob: `fail_on_error`. When disabled (the default), an observer
//! failure is logged and dispatch continues; when enabled, the failure
//! propagates out of the trigger call and skips the rest of the stage.
//!
//! The flag is stored atomically and read on every observer invocation, so a
//! handle shared via [`Arc`](std::sync::Arc) can be flipped at runtime and
//! the next trigger call observes the new value — the dispatcher never caches
//! it at construction.

use std::sync::atomic::{AtomicBool, Ordering};

/// Environment variable that overrides the default failure policy.
pub const FAIL_ON_ERROR_ENV: &str = "CARRIER_FAIL_ON_ERROR";

/// Runtime configuration for lifecycle dispatch.
#[derive(Debug, Default)]
pub struct LifecycleConfig {
    /// Whether observer failures abort the trigger call.
    fail_on_error: AtomicBool,
}

impl LifecycleConfig {
    /// Create a configuration with the given failure policy.
    #[must_use]
    pub const fn new(fail_on_error: bool) -> Self {
        Self {
            fail_on_error: AtomicBool::new(fail_on_error),
        }
    }

    /// Create a configuration from the environment.
    ///
    /// Reads [`FAIL_ON_ERROR_ENV`]; the values `1`, `true`, `yes`, and `on`
    /// (case-insensitive) enable strict failure propagation. Anything else,
    /// including an unset variable, leaves the default of `false`.
    #[must_use]
    pub fn from_env() -> Self {
        let enabled = std::env::var(FAIL_ON_ERROR_ENV)
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);
        Self::new(enabled)
    }

    /// Whether observer failures currently abort the trigger call.
    #[must_use]
    pub fn fail_on_error(&self) -> bool {
        self.fail_on_error.load(Ordering::Relaxed)
    }

    /// Update the failure policy.
    ///
    /// Takes effect on the next observer invocation; trigger calls already
    /// past a given observer are unaffected.
    pub fn set_fail_on_error(&self, fail_on_error: bool) {
        self.fail_on_error.store(fail_on_error, Ordering::Relaxed);
    }
}
