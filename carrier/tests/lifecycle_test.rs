//! Integration tests for the lifecycle hook dispatcher.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use carrier::prelude::*;
use tracing_subscriber::fmt::MakeWriter;

/// A `MakeWriter` that collects formatted log output into a shared buffer so
/// tests can assert on what the dispatcher logged.
#[derive(Clone, Default)]
struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a capturing subscriber installed and return everything it
/// logged.
fn capture_logs(f: impl FnOnce()) -> String {
    let writer = CaptureWriter::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = writer.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn before_publish_observer_sees_arguments_and_mutates_headers() {
    let exec = Arc::new(AtomicBool::new(false));
    let ran = Arc::clone(&exec);

    let hooks = LifecycleHooks::builder()
        .before_publish(move |msg, exchange_name, routing_key| {
            ran.store(true, Ordering::SeqCst);

            assert_eq!(msg.body_str(), Some("example"));
            assert_eq!(exchange_name, "logs");
            assert_eq!(routing_key, Some("critical"));

            msg.set_header("x-custom-header", "523292956497346007734586");
            Ok(())
        })
        .build();

    let mut msg = Message::new("example");
    hooks
        .trigger_before_publish(&mut msg, "logs", Some("critical"))
        .unwrap();

    assert!(
        exec.load(Ordering::SeqCst),
        "registered observer was not executed"
    );
    assert_eq!(
        msg.header("x-custom-header").and_then(HeaderValue::as_str),
        Some("523292956497346007734586")
    );
}

#[test]
fn published_observer_sees_arguments() {
    let exec = Arc::new(AtomicBool::new(false));
    let ran = Arc::clone(&exec);

    let hooks = LifecycleHooks::builder()
        .published(move |msg, exchange_name, routing_key| {
            ran.store(true, Ordering::SeqCst);
            assert_eq!(msg.body_str(), Some("example"));
            assert_eq!(exchange_name, "logs");
            assert_eq!(routing_key, Some("critical"));
            Ok(())
        })
        .build();

    let mut msg = Message::new("example");
    hooks
        .trigger_published(&mut msg, "logs", Some("critical"))
        .unwrap();

    assert!(exec.load(Ordering::SeqCst));
}

#[test]
fn consumed_observer_receives_the_settlement_unchanged() {
    let exec = Arc::new(AtomicBool::new(false));
    let ran = Arc::clone(&exec);

    let hooks = LifecycleHooks::builder()
        .consumed(move |msg, queue_name, handler_name, decision| {
            ran.store(true, Ordering::SeqCst);
            assert_eq!(msg.body_str(), Some("example"));
            assert_eq!(queue_name, "logs");
            assert_eq!(handler_name, "ProcessLogsHandler");
            assert_eq!(decision.mode, AckMode::Reject);
            assert!(decision.requeue);
            assert!(!decision.multiple);
            Ok(())
        })
        .build();

    let mut msg = Message::new("example");
    hooks
        .trigger_consumed(
            &mut msg,
            "logs",
            "ProcessLogsHandler",
            &AckDecision::reject(true),
        )
        .unwrap();

    assert!(exec.load(Ordering::SeqCst));
}

#[test]
fn strict_mode_aborts_before_consume_and_skips_later_observers() {
    let second_ran = Arc::new(AtomicBool::new(false));
    let ran = Arc::clone(&second_ran);

    let hooks = LifecycleHooks::builder()
        .fail_on_error(true)
        .before_consume(|_, _, _| Err(anyhow::anyhow!("header validation failed").into()))
        .before_consume(move |_, _, _| {
            ran.store(true, Ordering::SeqCst);
            Ok(())
        })
        .build();

    let mut msg = Message::new("example");
    let err = hooks
        .trigger_before_consume(&mut msg, "logs", "ProcessLogsHandler")
        .unwrap_err();

    assert_eq!(err.to_string(), "header validation failed");
    assert!(!second_ran.load(Ordering::SeqCst));
}

#[test]
fn absorbed_failure_is_logged_once_and_dispatch_continues() {
    let after_ran = Arc::new(AtomicBool::new(false));
    let ran = Arc::clone(&after_ran);

    let hooks = LifecycleHooks::builder()
        .published(|_, _, _| Err(anyhow::anyhow!("metrics sink offline").into()))
        .published(move |_, _, _| {
            ran.store(true, Ordering::SeqCst);
            Ok(())
        })
        .build();

    let logs = capture_logs(|| {
        let mut msg = Message::new("example");
        hooks.trigger_published(&mut msg, "logs", None).unwrap();
    });

    assert!(after_ran.load(Ordering::SeqCst));
    assert_eq!(logs.matches("lifecycle observer failed").count(), 1);
    assert!(logs.contains("metrics sink offline"));
    assert!(logs.contains("published"));
}

#[test]
fn empty_stage_trigger_neither_logs_nor_fails() {
    let hooks = LifecycleHooks::default();

    let logs = capture_logs(|| {
        let mut msg = Message::new("example");
        hooks.trigger_before_publish(&mut msg, "logs", None).unwrap();
        hooks.trigger_published(&mut msg, "logs", None).unwrap();
        hooks.trigger_before_consume(&mut msg, "q", "h").unwrap();
        hooks
            .trigger_consumed(&mut msg, "q", "h", &AckDecision::ack())
            .unwrap();
    });

    assert!(logs.is_empty(), "unexpected log output: {logs}");
}

#[test]
fn observers_run_in_registration_order_across_a_full_consume() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let mut hooks = LifecycleHooks::default();

    for i in 0..3 {
        let order = Arc::clone(&order);
        hooks.before_consume(move |_, _, _| {
            order.lock().unwrap().push(format!("before-{i}"));
            Ok(())
        });
    }
    for i in 0..3 {
        let order = Arc::clone(&order);
        hooks.consumed(move |_, _, _, _| {
            order.lock().unwrap().push(format!("after-{i}"));
            Ok(())
        });
    }

    let mut msg = Message::new("example");
    hooks
        .trigger_before_consume(&mut msg, "logs", "ProcessLogsHandler")
        .unwrap();
    hooks
        .trigger_consumed(&mut msg, "logs", "ProcessLogsHandler", &AckDecision::ack())
        .unwrap();

    assert_eq!(
        *order.lock().unwrap(),
        vec![
            "before-0", "before-1", "before-2", "after-0", "after-1", "after-2"
        ]
    );
}

#[test]
fn failure_policy_toggles_between_triggers_without_rebuilding() {
    let config = Arc::new(LifecycleConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let count = Arc::clone(&calls);

    let hooks = LifecycleHooks::builder()
        .config(Arc::clone(&config))
        .before_publish(move |_, _, _| {
            count.fetch_add(1, Ordering::SeqCst);
            Err(anyhow::anyhow!("always failing").into())
        })
        .build();

    let mut msg = Message::new("example");

    // Lenient by default: absorbed.
    assert!(hooks.trigger_before_publish(&mut msg, "logs", None).is_ok());

    config.set_fail_on_error(true);
    assert!(hooks.trigger_before_publish(&mut msg, "logs", None).is_err());

    config.set_fail_on_error(false);
    assert!(hooks.trigger_before_publish(&mut msg, "logs", None).is_ok());

    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn pipeline_style_flow_stamps_and_observes_a_message() {
    // Wire the hooks the way a publish/consume pipeline would.
    let settled = Arc::new(AtomicBool::new(false));
    let seen = Arc::clone(&settled);

    let hooks = LifecycleHooks::builder()
        .before_publish(|msg, _, _| {
            msg.set_header("x-attempt", 1i64);
            Ok(())
        })
        .published(|msg, _, _| {
            assert_eq!(msg.header("x-attempt").and_then(HeaderValue::as_int), Some(1));
            Ok(())
        })
        .before_consume(|msg, _, _| {
            assert_eq!(msg.header("x-attempt").and_then(HeaderValue::as_int), Some(1));
            Ok(())
        })
        .consumed(move |_, _, _, decision| {
            seen.store(decision.mode == AckMode::Ack, Ordering::SeqCst);
            Ok(())
        })
        .build();

    let mut msg = Message::new("example").with_content_type("text/plain");

    hooks
        .trigger_before_publish(&mut msg, "logs", Some("critical"))
        .unwrap();
    hooks
        .trigger_published(&mut msg, "logs", Some("critical"))
        .unwrap();
    hooks
        .trigger_before_consume(&mut msg, "logs", "ProcessLogsHandler")
        .unwrap();
    hooks
        .trigger_consumed(&mut msg, "logs", "ProcessLogsHandler", &AckDecision::ack())
        .unwrap();

    assert!(settled.load(Ordering::SeqCst));
}
