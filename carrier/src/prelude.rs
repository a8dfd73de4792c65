//! Prelude module for convenient imports.
//!
//! This module re-exports commonly used types for easy access.
//!
//! # Usage
//!
//! ```rust,ignore
//! use carrier::prelude::*;
//! ```

pub use crate::ack::{AckDecision, AckMode};
pub use crate::config::LifecycleConfig;
pub use crate::error::{Error, ObserverError, Result};
pub use crate::lifecycle::{
    BoxedConsumeObserver, BoxedConsumedObserver, BoxedPublishObserver, LifecycleHooks,
    LifecycleHooksBuilder, ObserverResult, Stage,
};
pub use crate::message::{DeliveryMode, HeaderValue, Message, MessageProperties};
