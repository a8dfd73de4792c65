//! Message lifecycle hooks.
//!
//! This module lets application code observe a message at four points in its
//! life — before publish, after publish, before consumption, and after
//! consumption — without touching the publish/consume machinery itself:
//!
//! - **Ordered dispatch**: observers run in registration order, per stage.
//! - **In-place mutation**: observers borrow the live message mutably, so a
//!   header attached by one observer is seen by the next and by the pipeline.
//! - **Failure isolation**: an observer error is logged and skipped by
//!   default, or propagated verbatim when `fail_on_error` is enabled.
//!
//! # Example
//!
//! ```rust,ignore
//! use carrier::lifecycle::LifecycleHooks;
//! use carrier::message::Message;
//!
//! let hooks = LifecycleHooks::builder()
//!     .before_publish(|msg, _exchange, _routing_key| {
//!         msg.set_header("x-request-id", "abc-123");
//!         Ok(())
//!     })
//!     .consumed(|_msg, queue, handler, decision| {
//!         tracing::info!(queue, handler, mode = %decision.mode, "delivery settled");
//!         Ok(())
//!     })
//!     .build();
//! ```

mod hooks;
mod observer;
mod stage;

pub use hooks::{LifecycleHooks, LifecycleHooksBuilder};
pub use observer::{
    BoxedConsumeObserver, BoxedConsumedObserver, BoxedPublishObserver, ObserverResult,
};
pub use stage::Stage;
