//! Shared utilities for integration tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;
use waypoint::navigation::{RouteDefinition, RouterEvent};

/// Ordered log of what callbacks and hooks saw.
#[derive(Clone, Default)]
pub struct Recorder {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }
}

/// A route whose callback records `"<name>:<path>"`.
pub fn recording_route(path: &str, name: &str, recorder: &Recorder) -> RouteDefinition {
    let recorder = recorder.clone();
    let label = name.to_string();
    RouteDefinition::new(path, move |nav| {
        let recorder = recorder.clone();
        let label = label.clone();
        async move {
            recorder.record(format!("{}:{}", label, nav.path));
            Ok(())
        }
    })
    .name(name)
}

/// Receive the next router event, failing the test after a second.
pub async fn next_event(events: &mut broadcast::Receiver<RouterEvent>) -> RouterEvent {
    tokio::time::timeout(Duration::from_secs(1), events.recv())
        .await
        .expect("timed out waiting for router event")
        .expect("event channel closed")
}

/// Skip events until one satisfies `predicate`.
#[allow(dead_code)]
pub async fn wait_for<F>(events: &mut broadcast::Receiver<RouterEvent>, predicate: F) -> RouterEvent
where
    F: Fn(&RouterEvent) -> bool,
{
    loop {
        let event = next_event(events).await;
        if predicate(&event) {
            return event;
        }
    }
}
