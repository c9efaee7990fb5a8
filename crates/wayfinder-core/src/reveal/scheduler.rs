//! Reveal scheduler implementation.
//!
//! Like a tick-driven timer, the scheduler owns no thread. It stores one
//! wall-clock deadline per suggestion and the caller invokes `poll(now)`
//! periodically to move due suggestions into the visible list.
//!
//! ## State Transitions
//!
//! ```text
//! Pending -> Visible
//! (route change) Pending -> cancelled, Visible -> cleared
//! ```

use chrono::{Duration, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::jitter::{entropy_sampler, Sampler};
use crate::storage::RevealConfig;
use crate::suggest::{Suggestion, SuggestionKind};

/// A scheduled reveal for one suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingReveal {
    pub suggestion: Suggestion,
    /// Position in the ranked list; drives the stagger.
    pub index: usize,
    pub base_delay_ms: u64,
    pub delay_ms: u64,
    pub due_at: NaiveDateTime,
}

/// Result of swapping in a new route's suggestions.
#[derive(Debug, Clone, Default)]
pub struct RouteSchedule {
    /// Pending reveals dropped from the previous route.
    pub cancelled: usize,
    /// Visible suggestions cleared from the previous route.
    pub cleared: usize,
    pub scheduled: Vec<PendingReveal>,
}

pub struct RevealScheduler {
    config: RevealConfig,
    sampler: Sampler,
    route: Option<String>,
    pending: IndexMap<String, PendingReveal>,
    visible: Vec<Suggestion>,
}

impl std::fmt::Debug for RevealScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealScheduler")
            .field("route", &self.route)
            .field("pending", &self.pending.len())
            .field("visible", &self.visible.len())
            .finish()
    }
}

impl RevealScheduler {
    /// Scheduler with OS-seeded jitter.
    pub fn new(config: RevealConfig) -> Self {
        Self::with_sampler(config, entropy_sampler())
    }

    pub fn with_sampler(config: RevealConfig, sampler: Sampler) -> Self {
        Self {
            config,
            sampler,
            route: None,
            pending: IndexMap::new(),
            visible: Vec::new(),
        }
    }

    pub fn set_sampler(&mut self, sampler: Sampler) {
        self.sampler = sampler;
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    pub fn visible(&self) -> &[Suggestion] {
        &self.visible
    }

    pub fn pending(&self) -> impl Iterator<Item = &PendingReveal> {
        self.pending.values()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Earliest outstanding deadline.
    pub fn next_due(&self) -> Option<NaiveDateTime> {
        self.pending.values().map(|p| p.due_at).min()
    }

    /// Delay before the first suggestion of a list may appear.
    ///
    /// Only urgency shortens it; priority tiers never do.
    pub fn base_delay(&mut self, kind: SuggestionKind, emergency: bool) -> u64 {
        if kind == SuggestionKind::UrgentCare || emergency {
            self.config.urgent_delay_ms
        } else {
            (self.sampler)(self.config.base_delay_min_ms..self.config.base_delay_max_ms)
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Drop every pending reveal and clear the visible list.
    pub fn cancel_all(&mut self) -> (usize, usize) {
        let cancelled = self.pending.len();
        let cleared = self.visible.len();
        self.pending.clear();
        self.visible.clear();
        (cancelled, cleared)
    }

    /// Replace the previous route's reveals with `suggestions`.
    pub fn schedule_route(
        &mut self,
        route: &str,
        suggestions: &[Suggestion],
        emergency: bool,
        now: NaiveDateTime,
    ) -> RouteSchedule {
        let (cancelled, cleared) = self.cancel_all();
        self.route = Some(route.to_string());

        let mut scheduled = Vec::with_capacity(suggestions.len());
        for (index, suggestion) in suggestions.iter().enumerate() {
            if self.pending.contains_key(suggestion.key()) {
                continue;
            }
            let base_delay_ms = self.base_delay(suggestion.kind, emergency);
            let stagger_ms = if index == 0 {
                0
            } else {
                (self.sampler)(self.config.stagger_min_ms..self.config.stagger_max_ms)
            };
            let delay_ms = base_delay_ms.saturating_add((index as u64).saturating_mul(stagger_ms));
            let reveal = PendingReveal {
                suggestion: suggestion.clone(),
                index,
                base_delay_ms,
                delay_ms,
                due_at: due_after(now, delay_ms),
            };
            tracing::debug!(
                route,
                key = suggestion.key(),
                index,
                delay_ms,
                "reveal scheduled"
            );
            self.pending.insert(suggestion.key().to_string(), reveal.clone());
            scheduled.push(reveal);
        }

        RouteSchedule {
            cancelled,
            cleared,
            scheduled,
        }
    }

    /// Fire the timer for `key`. Returns the suggestion if it became visible.
    pub fn fire(&mut self, key: &str) -> Option<Suggestion> {
        let reveal = self.pending.shift_remove(key)?;
        if self.visible.iter().any(|s| s.key() == key) {
            return None;
        }
        self.visible.push(reveal.suggestion.clone());
        Some(reveal.suggestion)
    }

    /// Reveal everything due at or before `now`, earliest first.
    pub fn poll(&mut self, now: NaiveDateTime) -> Vec<Suggestion> {
        let mut due: Vec<(NaiveDateTime, String)> = self
            .pending
            .values()
            .filter(|p| p.due_at <= now)
            .map(|p| (p.due_at, p.suggestion.key().to_string()))
            .collect();
        due.sort();

        due.into_iter()
            .filter_map(|(_, key)| self.fire(&key))
            .collect()
    }
}

/// `now + delay_ms`, clamped to the far future instead of wrapping.
fn due_after(now: NaiveDateTime, delay_ms: u64) -> NaiveDateTime {
    i64::try_from(delay_ms)
        .ok()
        .and_then(Duration::try_milliseconds)
        .and_then(|delay| now.checked_add_signed(delay))
        .unwrap_or(NaiveDateTime::MAX)
}
