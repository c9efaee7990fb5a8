//! The contextual action engine.
//!
//! [`Engine`] owns the whole per-session state and is the only mutation
//! surface. Each call runs to completion before returning, so a caller never
//! observes a half-applied route change:
//!
//! ```text
//! on_route_changed(route)
//!   -> behavior update -> navigation sink
//!   -> emergency re-check
//!   -> contextual actions
//!   -> suggestions -> cancel previous reveals -> schedule new reveals
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = Engine::new(Config::default(), SystemClock);
//! engine.on_route_changed("/");
//! // In a loop:
//! engine.tick(); // reveals due suggestions, re-checks emergency mode
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::behavior::{BehaviorState, BehaviorTracker};
use crate::catalog::{ActionCandidate, ActionKind, Catalog};
use crate::clock::{duration_secs, Clock, EmergencyAssessment, EmergencyDetector};
use crate::events::Event;
use crate::reveal::{PendingReveal, RevealScheduler, Sampler};
use crate::routes::RouteRegistry;
use crate::storage::{Config, NavigationSink, NullSink};
use crate::suggest::{Suggestion, SuggestionContext, SuggestionGenerator};
use crate::tracker::ActionTracker;

/// Immutable view handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub route: Option<String>,
    pub emergency_mode: bool,
    pub emergency: EmergencyAssessment,
    pub contextual_actions: Vec<ActionCandidate>,
    pub visible_suggestions: Vec<Suggestion>,
    pub pending_reveals: Vec<PendingReveal>,
    pub behavior: BehaviorState,
    pub at: NaiveDateTime,
}

pub struct Engine {
    config: Config,
    registry: RouteRegistry,
    catalog: Catalog,
    generator: SuggestionGenerator,
    detector: EmergencyDetector,
    behavior: BehaviorTracker,
    tracker: ActionTracker,
    scheduler: RevealScheduler,
    clock: Box<dyn Clock>,
    sink: Box<dyn NavigationSink>,
    route: Option<String>,
    actions: Vec<ActionCandidate>,
    emergency: EmergencyAssessment,
    last_emergency_check: Option<NaiveDateTime>,
}

impl Engine {
    /// Start a session now, according to `clock`.
    pub fn new(config: Config, clock: impl Clock + 'static) -> Self {
        let now = clock.now();
        Self {
            registry: RouteRegistry::standard(),
            catalog: Catalog::standard(),
            generator: SuggestionGenerator::new(&config.limits),
            detector: EmergencyDetector::from_config(&config),
            behavior: BehaviorTracker::with_limits(now, &config.limits),
            tracker: ActionTracker::new(),
            scheduler: RevealScheduler::new(config.reveal.clone()),
            clock: Box::new(clock),
            sink: Box::new(NullSink),
            route: None,
            actions: Vec::new(),
            emergency: EmergencyAssessment::default(),
            last_emergency_check: None,
            config,
        }
    }

    pub fn with_sink(mut self, sink: impl NavigationSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn with_sampler(mut self, sampler: Sampler) -> Self {
        self.scheduler.set_sampler(sampler);
        self
    }

    pub fn with_registry(mut self, registry: RouteRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    pub fn current_route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    pub fn contextual_actions(&self) -> &[ActionCandidate] {
        &self.actions
    }

    pub fn emergency_mode(&self) -> bool {
        self.emergency.is_emergency()
    }

    pub fn emergency(&self) -> &EmergencyAssessment {
        &self.emergency
    }

    pub fn visible_suggestions(&self) -> &[Suggestion] {
        self.scheduler.visible()
    }

    pub fn pending_reveals(&self) -> Vec<PendingReveal> {
        self.scheduler.pending().cloned().collect()
    }

    pub fn behavior(&self) -> &BehaviorState {
        self.behavior.state()
    }

    pub fn action_tracker(&self) -> &ActionTracker {
        &self.tracker
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            route: self.route.clone(),
            emergency_mode: self.emergency_mode(),
            emergency: self.emergency.clone(),
            contextual_actions: self.actions.clone(),
            visible_suggestions: self.scheduler.visible().to_vec(),
            pending_reveals: self.pending_reveals(),
            behavior: self.behavior.state().clone(),
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Handle navigation to `route`.
    pub fn on_route_changed(&mut self, route: &str) -> Vec<Event> {
        let now = self.clock.now();
        let mut events = Vec::new();

        let nav = self.behavior.on_route_changed(route, now);
        if let Err(e) = self.sink.record(&nav) {
            tracing::warn!(error = %e, route, "failed to record navigation");
        }
        tracing::info!(from = ?nav.previous, to = route, "route changed");
        events.push(Event::RouteChanged {
            from: nav.previous.clone(),
            to: route.to_string(),
            at: now,
        });
        self.route = Some(route.to_string());

        self.refresh_emergency(now, &mut events);

        self.actions = self.catalog.actions_for(
            route,
            self.behavior.state(),
            &self.registry,
            &self.config.limits,
        );

        let suggestions = self.generator.generate(&SuggestionContext {
            route,
            behavior: self.behavior.state(),
            registry: &self.registry,
            assessment: &self.emergency,
        });

        let schedule =
            self.scheduler
                .schedule_route(route, &suggestions, self.emergency.is_emergency(), now);
        if schedule.cancelled > 0 || schedule.cleared > 0 {
            events.push(Event::RevealsCancelled {
                route: nav.previous.unwrap_or_default(),
                cancelled: schedule.cancelled,
                cleared: schedule.cleared,
                at: now,
            });
        }
        events.extend(schedule.scheduled.into_iter().map(|p| Event::RevealScheduled {
            key: p.suggestion.action,
            kind: p.suggestion.kind,
            delay_ms: p.delay_ms,
            due_at: p.due_at,
        }));

        events
    }

    /// Advance time-driven state: reveal due suggestions and periodically
    /// re-check emergency mode.
    pub fn tick(&mut self) -> Vec<Event> {
        let now = self.clock.now();
        let mut events = Vec::new();

        let interval = duration_secs(self.config.emergency.recheck_interval_secs);
        let recheck_due = self
            .last_emergency_check
            .map_or(true, |last| now - last >= interval);
        if self.route.is_some() && recheck_due {
            self.refresh_emergency(now, &mut events);
        }

        for suggestion in self.scheduler.poll(now) {
            tracing::debug!(key = suggestion.key(), "suggestion revealed");
            events.push(Event::SuggestionRevealed {
                key: suggestion.action,
                text: suggestion.text,
                at: now,
            });
        }
        events
    }

    /// Record that the user invoked an action.
    pub fn track_action(&mut self, action_id: &str, kind: ActionKind) -> Event {
        let now = self.clock.now();
        self.tracker
            .record_invocation(&mut self.behavior, action_id, kind, now)
    }

    fn refresh_emergency(&mut self, now: NaiveDateTime, events: &mut Vec<Event>) {
        let Some(route) = self.route.as_deref() else {
            return;
        };
        let was = self.emergency.is_emergency();
        self.emergency = self
            .detector
            .assess(route, self.behavior.state(), &self.registry, now);
        self.last_emergency_check = Some(now);

        let active = self.emergency.is_emergency();
        if active != was {
            tracing::info!(active, route, reasons = ?self.emergency, "emergency mode changed");
            events.push(Event::EmergencyModeChanged { active, at: now });
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("route", &self.route)
            .field("emergency", &self.emergency)
            .field("actions", &self.actions.len())
            .field("scheduler", &self.scheduler)
            .finish()
    }
}
