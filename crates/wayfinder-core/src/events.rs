use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::catalog::ActionKind;
use crate::suggest::SuggestionKind;

/// Every state change in the engine produces an Event.
/// The presentation layer consumes them; the session driver forwards them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    RouteChanged {
        from: Option<String>,
        to: String,
        at: NaiveDateTime,
    },
    EmergencyModeChanged {
        active: bool,
        at: NaiveDateTime,
    },
    /// Pending reveals of the previous route were dropped.
    RevealsCancelled {
        route: String,
        cancelled: usize,
        cleared: usize,
        at: NaiveDateTime,
    },
    RevealScheduled {
        key: String,
        kind: SuggestionKind,
        delay_ms: u64,
        due_at: NaiveDateTime,
    },
    SuggestionRevealed {
        key: String,
        text: String,
        at: NaiveDateTime,
    },
    ActionTracked {
        action_id: String,
        kind: ActionKind,
        count: u32,
        at: NaiveDateTime,
    },
}

impl Event {
    /// Short machine-readable name, matching the serde tag.
    pub fn name(&self) -> &'static str {
        match self {
            Event::RouteChanged { .. } => "RouteChanged",
            Event::EmergencyModeChanged { .. } => "EmergencyModeChanged",
            Event::RevealsCancelled { .. } => "RevealsCancelled",
            Event::RevealScheduled { .. } => "RevealScheduled",
            Event::SuggestionRevealed { .. } => "SuggestionRevealed",
            Event::ActionTracked { .. } => "ActionTracked",
        }
    }
}
