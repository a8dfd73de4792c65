//! Observer types for lifecycle dispatch.
//!
//! Observers are plain closures with a fixed positional signature per stage.
//! They receive the live [`Message`] by mutable reference and may rewrite it;
//! mutations are visible to every observer invoked after them in the same
//! trigger call and to the pipeline once the trigger returns.
//!
//! Observers report failure by returning an [`ObserverError`]; the dispatcher
//! decides whether that absorbs into a log record or aborts the trigger call
//! (see [`LifecycleHooks`](super::LifecycleHooks)).

use crate::ack::AckDecision;
use crate::error::ObserverError;
use crate::message::Message;

/// Result type observers return.
pub type ObserverResult = std::result::Result<(), ObserverError>;

/// A boxed observer for the publish-side stages.
///
/// Arguments: the message, the exchange name, and the optional routing key —
/// exactly as passed to the trigger call.
pub type BoxedPublishObserver =
    Box<dyn Fn(&mut Message, &str, Option<&str>) -> ObserverResult + Send + Sync>;

/// A boxed observer for the before-consume stage.
///
/// Arguments: the message, the queue name, and the name of the handler about
/// to be invoked.
pub type BoxedConsumeObserver =
    Box<dyn Fn(&mut Message, &str, &str) -> ObserverResult + Send + Sync>;

/// A boxed observer for the consumed stage.
///
/// Arguments: the message, the queue name, the handler name, and the
/// acknowledgment decision the handler produced. The decision is shared
/// read-only; settlement already belongs to the pipeline.
pub type BoxedConsumedObserver =
    Box<dyn Fn(&mut Message, &str, &str, &AckDecision) -> ObserverResult + Send + Sync>;
