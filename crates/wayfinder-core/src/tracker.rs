//! Bridge from "the user acted on an action" into behavior history.

use chrono::NaiveDateTime;

use crate::behavior::BehaviorTracker;
use crate::catalog::ActionKind;
use crate::events::Event;

/// Records action invocations.
///
/// How invocations are detected (click handlers, deep links, phone taps)
/// is the caller's business; this is the only path that turns one into a
/// behavior mutation.
#[derive(Debug, Default, Clone)]
pub struct ActionTracker {
    invocations: u64,
}

impl ActionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total invocations recorded this session.
    pub fn invocations(&self) -> u64 {
        self.invocations
    }

    /// Unknown ids are not rejected; they start at a count of one.
    pub fn record_invocation(
        &mut self,
        behavior: &mut BehaviorTracker,
        action_id: &str,
        kind: ActionKind,
        at: NaiveDateTime,
    ) -> Event {
        let count = behavior.record_invocation(action_id, kind);
        self.invocations += 1;
        tracing::debug!(action_id, %kind, count, "action invoked");
        Event::ActionTracked {
            action_id: action_id.to_string(),
            kind,
            count,
            at,
        }
    }
}
