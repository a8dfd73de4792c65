//! Carrier - lifecycle hooks for message-broker pipelines
//!
//! This crate provides the observer registry and dispatch engine a broker
//! client wires into its publish and consume paths: register closures that
//! run before/after publish and before/after consumption, with ordered
//! dispatch, in-place message mutation, and a configurable failure policy.

pub mod ack;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod message;
pub mod prelude;

pub use error::{Error, ObserverError, Result};
