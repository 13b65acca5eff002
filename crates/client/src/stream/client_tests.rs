// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the live stream client.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use holo_core::EventKind;

use super::client::{LiveStream, StreamConfig, StreamState};
use super::transport::StreamTransport;
use super::transport_tests::MockStreamTransport;

fn frame(kind: &str, n: u32) -> String {
    format!(r#"{{"type":"{kind}","payload":{{"n":{n}}}}}"#)
}

/// Poll until the condition holds; panics after ~20 seconds of virtual or
/// real time so a broken loop fails instead of hanging. The budget must
/// exceed the 3 s contract reconnect delay (times several attempts) so the
/// reconnect timer can fire under paused time, where each 10 ms poll is the
/// earliest pending timer and auto-advance moves in 10 ms steps.
async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..2000 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached");
}

#[test]
fn test_ingest_assigns_sequential_ids() {
    let stream = LiveStream::new(StreamConfig::default());

    let a = stream.ingest(&frame("attendance_update", 1)).unwrap();
    let b = stream.ingest(&frame("audit_log", 2)).unwrap();
    assert_eq!(a.id, 1);
    assert_eq!(b.id, 2);
    assert_eq!(stream.latest().unwrap().id, 2);
}

#[test]
fn test_ingest_most_recent_first() {
    let stream = LiveStream::new(StreamConfig::default());

    stream.ingest(&frame("attendance_update", 1));
    stream.ingest(&frame("audit_log", 2));

    let events = stream.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, EventKind::AuditLog);
    assert_eq!(events[1].kind, EventKind::AttendanceUpdate);
}

#[test]
fn test_buffer_never_exceeds_capacity() {
    let stream = LiveStream::new(StreamConfig::default());

    for n in 1..=75 {
        stream.ingest(&frame("attendance_update", n));
    }

    let events = stream.events();
    assert_eq!(events.len(), 50);
    // Most recent at the head, oldest evicted.
    assert_eq!(events[0].id, 75);
    assert_eq!(events[49].id, 26);
}

#[test]
fn test_malformed_message_produces_no_entry() {
    let stream = LiveStream::new(StreamConfig::default());

    stream.ingest(&frame("attendance_update", 1));
    assert!(stream.ingest("{{{ not json").is_none());
    stream.ingest(&frame("audit_log", 2));

    // The garbage neither appears nor disturbs ids of later events.
    let events = stream.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, 2);
    assert_eq!(events[0].kind, EventKind::AuditLog);
}

#[test]
fn test_unknown_kind_is_buffered() {
    let stream = LiveStream::new(StreamConfig::default());

    stream.ingest(&frame("firmware_update", 1));

    let events = stream.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventKind::Other("firmware_update".to_string()));
}

#[test]
fn test_observers_see_each_event_and_can_cancel() {
    let stream = LiveStream::new(StreamConfig::default());
    let seen = Arc::new(AtomicU32::new(0));

    let id = {
        let seen = Arc::clone(&seen);
        stream.observers().register(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
    };

    stream.ingest(&frame("attendance_update", 1));
    assert_eq!(seen.load(Ordering::SeqCst), 1);

    stream.observers().unregister(id);
    stream.ingest(&frame("attendance_update", 2));
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_run_delivers_events() {
    let transport = MockStreamTransport::new();
    transport.queue_text(&frame("attendance_update", 1));
    transport.queue_text(&frame("audit_log", 2));

    let stream = LiveStream::new(StreamConfig::default());
    let task = tokio::spawn(Arc::clone(&stream).run(transport.clone()));

    wait_until(|| stream.events().len() == 2).await;
    assert_eq!(stream.state(), StreamState::Connected);
    assert_eq!(transport.connect_count(), 1);
    assert_eq!(stream.latest().unwrap().kind, EventKind::AuditLog);

    stream.shutdown();
    task.await.unwrap();
    assert_eq!(stream.state(), StreamState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn test_run_survives_malformed_message() {
    let transport = MockStreamTransport::new();
    transport.queue_text(&frame("attendance_update", 1));
    transport.queue_text("definitely not json");
    transport.queue_text(&frame("audit_log", 2));

    let stream = LiveStream::new(StreamConfig::default());
    let task = tokio::spawn(Arc::clone(&stream).run(transport.clone()));

    wait_until(|| stream.events().len() == 2).await;
    // One connection the whole time: the bad message tore nothing down.
    assert_eq!(transport.connect_count(), 1);
    assert_eq!(stream.state(), StreamState::Connected);

    let events = stream.events();
    assert_eq!(events[0].kind, EventKind::AuditLog);
    assert_eq!(events[1].kind, EventKind::AttendanceUpdate);

    stream.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_run_reconnects_after_receive_error() {
    let transport = MockStreamTransport::new();
    transport.queue_text(&frame("attendance_update", 1));
    transport.queue_error("connection reset");
    transport.queue_text(&frame("audit_log", 2));

    let stream = LiveStream::new(StreamConfig::default());
    let task = tokio::spawn(Arc::clone(&stream).run(transport.clone()));

    wait_until(|| stream.events().len() == 2).await;
    // Second event arrived over the second connection, without intervention.
    assert_eq!(transport.connect_count(), 2);
    assert_eq!(stream.state(), StreamState::Connected);

    stream.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_run_reconnects_after_server_close() {
    let transport = MockStreamTransport::new();
    transport.queue_text(&frame("attendance_update", 1));
    transport.queue_close();
    transport.queue_text(&frame("attendance_update", 2));

    let stream = LiveStream::new(StreamConfig::default());
    let task = tokio::spawn(Arc::clone(&stream).run(transport.clone()));

    wait_until(|| stream.events().len() == 2).await;
    assert_eq!(transport.connect_count(), 2);

    stream.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_run_retries_failed_connects() {
    let transport = MockStreamTransport::new();
    transport.set_fail_connects(3);
    transport.queue_text(&frame("attendance_update", 1));

    let stream = LiveStream::new(StreamConfig::default());
    let task = tokio::spawn(Arc::clone(&stream).run(transport.clone()));

    wait_until(|| stream.events().len() == 1).await;
    assert_eq!(transport.connect_count(), 1);
    assert_eq!(stream.state(), StreamState::Connected);

    stream.shutdown();
    task.await.unwrap();
}

#[tokio::test]
async fn test_shutdown_cancels_pending_reconnect() {
    let transport = MockStreamTransport::new();
    transport.queue_text(&frame("attendance_update", 1));
    transport.queue_error("connection reset");

    // Long delay: the loop will sit in the reconnect timer when we shut down.
    let config = StreamConfig {
        reconnect_delay: Duration::from_secs(60),
        ..StreamConfig::default()
    };
    let stream = LiveStream::new(config);
    let task = tokio::spawn(Arc::clone(&stream).run(transport.clone()));

    wait_until(|| stream.state() == StreamState::Disconnected && !stream.events().is_empty())
        .await;
    assert_eq!(transport.connect_count(), 1);

    stream.shutdown();
    // The run loop must end promptly instead of waiting out the 60s timer,
    // and must not connect again.
    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(transport.connect_count(), 1);
    assert_eq!(stream.state(), StreamState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_during_open_connection() {
    let transport = MockStreamTransport::new();
    transport.queue_text(&frame("attendance_update", 1));

    let stream = LiveStream::new(StreamConfig::default());
    let task = tokio::spawn(Arc::clone(&stream).run(transport.clone()));

    wait_until(|| stream.state() == StreamState::Connected).await;

    stream.shutdown();
    task.await.unwrap();
    assert_eq!(stream.state(), StreamState::Disconnected);
    assert!(!transport.is_connected());
}
