//! Async driver for one browsing session.
//!
//! The engine is synchronous and tick-driven. [`SessionDriver`] owns it on a
//! tokio task, feeds it commands from a channel and calls `tick()` on a fixed
//! interval so reveals fire without the caller polling.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::catalog::ActionKind;
use crate::engine::Engine;
use crate::events::Event;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Navigate(String),
    Track { action_id: String, kind: ActionKind },
    Shutdown,
}

pub struct SessionDriver {
    engine: Engine,
    poll_interval: Duration,
}

impl SessionDriver {
    pub fn new(engine: Engine) -> Self {
        let poll_ms = engine.config().reveal.poll_interval_ms.max(1);
        Self {
            engine,
            poll_interval: Duration::from_millis(poll_ms),
        }
    }

    /// Run until `Shutdown` or the command channel closes, then hand the
    /// engine back. Events are dropped once the receiver goes away.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
        events: mpsc::UnboundedSender<Event>,
    ) -> Engine {
        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let emitted = match command {
                        Some(SessionCommand::Navigate(route)) => {
                            self.engine.on_route_changed(&route)
                        }
                        Some(SessionCommand::Track { action_id, kind }) => {
                            vec![self.engine.track_action(&action_id, kind)]
                        }
                        Some(SessionCommand::Shutdown) | None => break,
                    };
                    forward(&events, emitted);
                }
                _ = interval.tick() => {
                    forward(&events, self.engine.tick());
                }
            }
        }

        tracing::debug!(route = ?self.engine.current_route(), "session driver stopped");
        self.engine
    }
}

fn forward(sender: &mpsc::UnboundedSender<Event>, events: Vec<Event>) {
    for event in events {
        if sender.send(event).is_err() {
            break;
        }
    }
}
