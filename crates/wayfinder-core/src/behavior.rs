//! Per-session navigation and invocation history.
//!
//! [`BehaviorTracker`] is the only writer of [`BehaviorState`]. Route changes
//! and action invocations mutate it synchronously; every other component
//! reads it through `&BehaviorState`.

use chrono::{Duration, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::ActionKind;
use crate::storage::LimitsConfig;

/// One route change, handed to the navigation sink and then dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationEvent {
    pub session_id: Uuid,
    pub route: String,
    pub previous: Option<String>,
    pub timestamp: NaiveDateTime,
}

/// How often the user has invoked a given action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferredAction {
    pub id: String,
    pub kind: ActionKind,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorState {
    pub session_id: Uuid,
    pub session_start: NaiveDateTime,
    /// Insertion order is first-visit order, which breaks frequency ties.
    pub page_view_counts: IndexMap<String, u32>,
    /// Most recent first, no duplicates.
    pub last_visited_routes: Vec<String>,
    pub frequent_routes: Vec<String>,
    pub preferred_actions: Vec<PreferredAction>,
}

impl BehaviorState {
    fn new(session_start: NaiveDateTime) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            session_start,
            page_view_counts: IndexMap::new(),
            last_visited_routes: Vec::new(),
            frequent_routes: Vec::new(),
            preferred_actions: Vec::new(),
        }
    }

    pub fn visit_count(&self, route: &str) -> u32 {
        self.page_view_counts.get(route).copied().unwrap_or(0)
    }

    pub fn session_age(&self, now: NaiveDateTime) -> Duration {
        now - self.session_start
    }

    pub fn frequent_routes(&self) -> &[String] {
        &self.frequent_routes
    }

    pub fn last_visited_routes(&self) -> &[String] {
        &self.last_visited_routes
    }

    pub fn preferred_actions(&self) -> &[PreferredAction] {
        &self.preferred_actions
    }

    pub fn current_route(&self) -> Option<&str> {
        self.last_visited_routes.first().map(String::as_str)
    }

    pub fn preferred_count(&self, action_id: &str) -> u32 {
        self.preferred_actions
            .iter()
            .find(|p| p.id == action_id)
            .map(|p| p.count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct BehaviorTracker {
    state: BehaviorState,
    history_len: usize,
    frequent_len: usize,
    frequent_threshold: u32,
    preferred_len: usize,
}

impl BehaviorTracker {
    /// Start a session at `session_start` with default limits.
    pub fn new(session_start: NaiveDateTime) -> Self {
        Self::with_limits(session_start, &LimitsConfig::default())
    }

    pub fn with_limits(session_start: NaiveDateTime, limits: &LimitsConfig) -> Self {
        Self {
            state: BehaviorState::new(session_start),
            history_len: limits.history_len,
            frequent_len: limits.frequent_len,
            frequent_threshold: limits.frequent_threshold,
            preferred_len: limits.preferred_len,
        }
    }

    pub fn state(&self) -> &BehaviorState {
        &self.state
    }

    /// Record a visit to `route`.
    pub fn on_route_changed(&mut self, route: &str, now: NaiveDateTime) -> NavigationEvent {
        let previous = self.state.current_route().map(str::to_string);

        *self
            .state
            .page_view_counts
            .entry(route.to_string())
            .or_insert(0) += 1;

        let history = &mut self.state.last_visited_routes;
        history.retain(|r| r != route);
        history.insert(0, route.to_string());
        history.truncate(self.history_len);

        self.refresh_frequent_routes();

        NavigationEvent {
            session_id: self.state.session_id,
            route: route.to_string(),
            previous,
            timestamp: now,
        }
    }

    /// Count one invocation of `action_id`. Returns the new count.
    pub fn record_invocation(&mut self, action_id: &str, kind: ActionKind) -> u32 {
        let actions = &mut self.state.preferred_actions;
        let count = match actions.iter_mut().find(|p| p.id == action_id) {
            Some(entry) => {
                entry.count += 1;
                entry.kind = kind;
                entry.count
            }
            None => {
                actions.push(PreferredAction {
                    id: action_id.to_string(),
                    kind,
                    count: 1,
                });
                1
            }
        };
        actions.sort_by(|a, b| b.count.cmp(&a.count));
        actions.truncate(self.preferred_len);
        count
    }

    fn refresh_frequent_routes(&mut self) {
        let threshold = self.frequent_threshold;
        let mut frequent: Vec<(&String, u32)> = self
            .state
            .page_view_counts
            .iter()
            .map(|(route, count)| (route, *count))
            .filter(|(_, count)| *count > threshold)
            .collect();
        frequent.sort_by(|a, b| b.1.cmp(&a.1));

        self.state.frequent_routes = frequent
            .into_iter()
            .take(self.frequent_len)
            .map(|(route, _)| route.clone())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn history_is_unique_and_most_recent_first() {
        let mut tracker = BehaviorTracker::new(start());
        for route in ["/", "/reports", "/", "/our-doctors"] {
            tracker.on_route_changed(route, start());
        }
        assert_eq!(
            tracker.state().last_visited_routes,
            vec!["/our-doctors", "/", "/reports"]
        );
    }

    #[test]
    fn history_is_capped_at_five() {
        let mut tracker = BehaviorTracker::new(start());
        for route in ["/a", "/b", "/c", "/d", "/e", "/f", "/g"] {
            tracker.on_route_changed(route, start());
        }
        assert_eq!(
            tracker.state().last_visited_routes,
            vec!["/g", "/f", "/e", "/d", "/c"]
        );
    }

    #[test]
    fn navigation_event_links_previous_route() {
        let mut tracker = BehaviorTracker::new(start());
        let first = tracker.on_route_changed("/", start());
        assert_eq!(first.previous, None);
        let second = tracker.on_route_changed("/reports", start());
        assert_eq!(second.previous.as_deref(), Some("/"));
        assert_eq!(second.session_id, tracker.state().session_id);
    }

    #[test]
    fn frequent_routes_need_more_than_two_visits() {
        let mut tracker = BehaviorTracker::new(start());
        tracker.on_route_changed("/reports", start());
        tracker.on_route_changed("/reports", start());
        assert!(tracker.state().frequent_routes.is_empty());

        tracker.on_route_changed("/reports", start());
        assert_eq!(tracker.state().frequent_routes, vec!["/reports"]);
    }

    #[test]
    fn frequent_routes_sorted_by_count_then_first_visit() {
        let mut tracker = BehaviorTracker::new(start());
        for _ in 0..3 {
            tracker.on_route_changed("/a", start());
        }
        for _ in 0..4 {
            tracker.on_route_changed("/b", start());
        }
        for _ in 0..3 {
            tracker.on_route_changed("/c", start());
        }
        assert_eq!(tracker.state().frequent_routes, vec!["/b", "/a", "/c"]);
    }

    #[test]
    fn invocation_twice_yields_single_entry() {
        let mut tracker = BehaviorTracker::new(start());
        assert_eq!(tracker.record_invocation("x", ActionKind::Primary), 1);
        assert_eq!(tracker.record_invocation("x", ActionKind::Primary), 2);

        let prefs = &tracker.state().preferred_actions;
        assert_eq!(prefs.len(), 1);
        assert_eq!(prefs[0].id, "x");
        assert_eq!(prefs[0].count, 2);
    }

    #[test]
    fn preferred_actions_sorted_and_capped() {
        let mut tracker = BehaviorTracker::new(start());
        for i in 0..12 {
            tracker.record_invocation(&format!("action-{i}"), ActionKind::Secondary);
        }
        tracker.record_invocation("action-3", ActionKind::Secondary);

        let prefs = &tracker.state().preferred_actions;
        assert_eq!(prefs.len(), 10);
        assert_eq!(prefs[0].id, "action-3");
        assert_eq!(prefs[0].count, 2);
        // Ties keep insertion order, so the newest single-use entries fall off.
        assert!(prefs.iter().all(|p| p.id != "action-11"));
    }

    #[test]
    fn unseen_route_counts_as_zero() {
        let tracker = BehaviorTracker::new(start());
        assert_eq!(tracker.state().visit_count("/never"), 0);
        assert_eq!(tracker.state().session_age(start()), Duration::zero());
    }
}
