//! Keyboard-driven sensor simulation

use crossterm::event::{Event, EventStream as KeyStream, KeyEventKind};
use futures::StreamExt;
use tracing::{debug, warn};

use crate::input::{EventSink, InputSimulator};
use crate::session::Subscription;

/// Read key presses on a background task and forward the simulated sensor
/// events to `sink`. Dropping the returned subscription stops the task.
pub fn spawn_keyboard(mut simulator: InputSimulator, sink: EventSink) -> Subscription {
    let handle = tokio::spawn(async move {
        let mut keys = KeyStream::new();
        while let Some(event) = keys.next().await {
            match event {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    for event in simulator.process_key(key) {
                        if sink.send(event).is_err() {
                            debug!("Session gone, stopping keyboard input");
                            return;
                        }
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    warn!("Keyboard input failed: {}", err);
                    return;
                }
            }
        }
    });

    Subscription::new(move || handle.abort())
}
