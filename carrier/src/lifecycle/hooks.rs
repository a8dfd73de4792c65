//! The lifecycle hook registry and dispatch engine.

use std::sync::Arc;

use crate::ack::AckDecision;
use crate::config::LifecycleConfig;
use crate::error::{Error, Result};
use crate::message::Message;

use super::observer::{
    BoxedConsumeObserver, BoxedConsumedObserver, BoxedPublishObserver, ObserverResult,
};
use super::stage::Stage;

/// Registry and dispatcher for message lifecycle observers.
///
/// Holds one ordered, append-only observer list per [`Stage`]. Registration
/// happens during single-threaded setup; the publish and consume pipelines
/// then call the matching trigger at each point in a message's life, and the
/// registered observers run synchronously, sequentially, in registration
/// order, each receiving the live message by mutable reference.
///
/// Observer failures are governed by the shared [`LifecycleConfig`]: absorbed
/// into an error-level log record by default, or propagated verbatim out of
/// the trigger call when `fail_on_error` is enabled. The flag is re-read on
/// every invocation, so flipping it on a shared config handle takes effect
/// without rebuilding the registry.
///
/// # Example
///
/// ```rust,ignore
/// use carrier::lifecycle::LifecycleHooks;
/// use carrier::message::Message;
///
/// let hooks = LifecycleHooks::builder()
///     .before_publish(|msg, exchange, _routing_key| {
///         msg.set_header("x-source", "orders-service");
///         tracing::debug!(exchange, "stamped outgoing message");
///         Ok(())
///     })
///     .build();
///
/// let mut msg = Message::new("example");
/// hooks.trigger_before_publish(&mut msg, "logs", Some("critical"))?;
/// assert!(msg.header("x-source").is_some());
/// ```
pub struct LifecycleHooks {
    /// Shared dispatch configuration, read fresh on every invocation.
    config: Arc<LifecycleConfig>,
    before_publish: Vec<BoxedPublishObserver>,
    published: Vec<BoxedPublishObserver>,
    before_consume: Vec<BoxedConsumeObserver>,
    consumed: Vec<BoxedConsumedObserver>,
}

impl Default for LifecycleHooks {
    fn default() -> Self {
        Self::new(Arc::new(LifecycleConfig::default()))
    }
}

impl LifecycleHooks {
    /// Create an empty registry using the given configuration handle.
    ///
    /// Keep a clone of the [`Arc`] to toggle `fail_on_error` at runtime.
    #[must_use]
    pub const fn new(config: Arc<LifecycleConfig>) -> Self {
        Self {
            config,
            before_publish: Vec::new(),
            published: Vec::new(),
            before_consume: Vec::new(),
            consumed: Vec::new(),
        }
    }

    /// Create a builder for fluent construction.
    #[must_use]
    pub fn builder() -> LifecycleHooksBuilder {
        LifecycleHooksBuilder::new()
    }

    /// Get the configuration handle shared with this registry.
    #[must_use]
    pub const fn config(&self) -> &Arc<LifecycleConfig> {
        &self.config
    }

    /// Register an observer to run immediately before a publish.
    pub fn before_publish<F>(&mut self, observer: F)
    where
        F: Fn(&mut Message, &str, Option<&str>) -> ObserverResult + Send + Sync + 'static,
    {
        self.before_publish.push(Box::new(observer));
    }

    /// Register an observer to run immediately after a successful publish.
    pub fn published<F>(&mut self, observer: F)
    where
        F: Fn(&mut Message, &str, Option<&str>) -> ObserverResult + Send + Sync + 'static,
    {
        self.published.push(Box::new(observer));
    }

    /// Register an observer to run immediately before a queue handler.
    pub fn before_consume<F>(&mut self, observer: F)
    where
        F: Fn(&mut Message, &str, &str) -> ObserverResult + Send + Sync + 'static,
    {
        self.before_consume.push(Box::new(observer));
    }

    /// Register an observer to run after a handler has settled a delivery.
    pub fn consumed<F>(&mut self, observer: F)
    where
        F: Fn(&mut Message, &str, &str, &AckDecision) -> ObserverResult + Send + Sync + 'static,
    {
        self.consumed.push(Box::new(observer));
    }

    /// Run the before-publish observers.
    ///
    /// # Errors
    ///
    /// Returns the first observer error verbatim when `fail_on_error` is
    /// enabled; otherwise always `Ok(())`.
    pub fn trigger_before_publish(
        &self,
        msg: &mut Message,
        exchange_name: &str,
        routing_key: Option<&str>,
    ) -> Result<()> {
        self.dispatch(Stage::BeforePublish, &self.before_publish, |observer| {
            observer(msg, exchange_name, routing_key)
        })
    }

    /// Run the published observers.
    ///
    /// # Errors
    ///
    /// Returns the first observer error verbatim when `fail_on_error` is
    /// enabled; otherwise always `Ok(())`.
    pub fn trigger_published(
        &self,
        msg: &mut Message,
        exchange_name: &str,
        routing_key: Option<&str>,
    ) -> Result<()> {
        self.dispatch(Stage::Published, &self.published, |observer| {
            observer(msg, exchange_name, routing_key)
        })
    }

    /// Run the before-consume observers.
    ///
    /// # Errors
    ///
    /// Returns the first observer error verbatim when `fail_on_error` is
    /// enabled; otherwise always `Ok(())`.
    pub fn trigger_before_consume(
        &self,
        msg: &mut Message,
        queue_name: &str,
        handler_name: &str,
    ) -> Result<()> {
        self.dispatch(Stage::BeforeConsume, &self.before_consume, |observer| {
            observer(msg, queue_name, handler_name)
        })
    }

    /// Run the consumed observers.
    ///
    /// # Errors
    ///
    /// Returns the first observer error verbatim when `fail_on_error` is
    /// enabled; otherwise always `Ok(())`.
    pub fn trigger_consumed(
        &self,
        msg: &mut Message,
        queue_name: &str,
        handler_name: &str,
        decision: &AckDecision,
    ) -> Result<()> {
        self.dispatch(Stage::Consumed, &self.consumed, |observer| {
            observer(msg, queue_name, handler_name, decision)
        })
    }

    /// Get the number of observers registered for a stage.
    #[must_use]
    pub fn observer_count_for(&self, stage: Stage) -> usize {
        match stage {
            Stage::BeforePublish => self.before_publish.len(),
            Stage::Published => self.published.len(),
            Stage::BeforeConsume => self.before_consume.len(),
            Stage::Consumed => self.consumed.len(),
        }
    }

    /// Get the total number of registered observers across all stages.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        Stage::ALL
            .iter()
            .map(|stage| self.observer_count_for(*stage))
            .sum()
    }

    /// Check whether no observers are registered at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observer_count() == 0
    }

    /// Run each observer in order, applying the failure policy per
    /// invocation. The policy flag is read from the shared config on every
    /// failure, never cached.
    fn dispatch<O>(
        &self,
        stage: Stage,
        observers: &[O],
        mut invoke: impl FnMut(&O) -> ObserverResult,
    ) -> Result<()> {
        for observer in observers {
            if let Err(err) = invoke(observer) {
                if self.config.fail_on_error() {
                    return Err(Error::Observer(err));
                }
                tracing::error!(stage = %stage, error = %err, "lifecycle observer failed");
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for LifecycleHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleHooks")
            .field("before_publish", &self.before_publish.len())
            .field("published", &self.published.len())
            .field("before_consume", &self.before_consume.len())
            .field("consumed", &self.consumed.len())
            .field("fail_on_error", &self.config.fail_on_error())
            .finish()
    }
}

/// Builder for constructing a [`LifecycleHooks`] registry with a fluent API.
#[derive(Default)]
pub struct LifecycleHooksBuilder {
    hooks: LifecycleHooks,
}

impl std::fmt::Debug for LifecycleHooksBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleHooksBuilder")
            .field("hooks", &self.hooks)
            .finish()
    }
}

impl LifecycleHooksBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given configuration handle instead of a fresh default.
    #[must_use]
    pub fn config(mut self, config: Arc<LifecycleConfig>) -> Self {
        self.hooks.config = config;
        self
    }

    /// Set the failure policy on the registry's configuration.
    #[must_use]
    pub fn fail_on_error(self, fail_on_error: bool) -> Self {
        self.hooks.config.set_fail_on_error(fail_on_error);
        self
    }

    /// Register a before-publish observer.
    #[must_use]
    pub fn before_publish<F>(mut self, observer: F) -> Self
    where
        F: Fn(&mut Message, &str, Option<&str>) -> ObserverResult + Send + Sync + 'static,
    {
        self.hooks.before_publish(observer);
        self
    }

    /// Register a published observer.
    #[must_use]
    pub fn published<F>(mut self, observer: F) -> Self
    where
        F: Fn(&mut Message, &str, Option<&str>) -> ObserverResult + Send + Sync + 'static,
    {
        self.hooks.published(observer);
        self
    }

    /// Register a before-consume observer.
    #[must_use]
    pub fn before_consume<F>(mut self, observer: F) -> Self
    where
        F: Fn(&mut Message, &str, &str) -> ObserverResult + Send + Sync + 'static,
    {
        self.hooks.before_consume(observer);
        self
    }

    /// Register a consumed observer.
    #[must_use]
    pub fn consumed<F>(mut self, observer: F) -> Self
    where
        F: Fn(&mut Message, &str, &str, &AckDecision) -> ObserverResult + Send + Sync + 'static,
    {
        self.hooks.consumed(observer);
        self
    }

    /// Add debug-level logging observers on every stage (convenience method).
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.before_publish(|msg, exchange, routing_key| {
            tracing::debug!(
                exchange,
                routing_key = ?routing_key,
                bytes = msg.body().len(),
                "publishing message"
            );
            Ok(())
        })
        .published(|_, exchange, routing_key| {
            tracing::debug!(exchange, routing_key = ?routing_key, "message published");
            Ok(())
        })
        .before_consume(|msg, queue, handler| {
            tracing::debug!(queue, handler, bytes = msg.body().len(), "consuming message");
            Ok(())
        })
        .consumed(|_, queue, handler, decision| {
            tracing::debug!(
                queue,
                handler,
                mode = %decision.mode,
                requeue = decision.requeue,
                "delivery settled"
            );
            Ok(())
        })
    }

    /// Build the registry.
    #[must_use]
    pub fn build(self) -> LifecycleHooks {
        self.hooks
    }
}
