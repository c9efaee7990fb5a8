//! Property tests over arbitrary navigation sequences.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use wayfinder_core::reveal::seeded_sampler;
use wayfinder_core::{Config, Engine, ManualClock, Priority, RouteRegistry};

const ROUTES: &[&str] = &[
    "/",
    "/about-us",
    "/services",
    "/health-packages",
    "/our-doctors",
    "/appointment",
    "/reports",
    "/contact-us",
    "/branches",
    "/branches/dhanmondi",
    "/branches/sylhet",
    "/hotlines",
    "/emergency",
    "/not-a-page",
];

fn start(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 6, 10)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn navigation() -> impl Strategy<Value = Vec<(usize, u32)>> {
    prop::collection::vec((0..ROUTES.len(), 0u32..90), 1..40)
}

fn is_sorted_desc(priorities: &[Priority]) -> bool {
    priorities.windows(2).all(|w| w[0] >= w[1])
}

proptest! {
    #[test]
    fn outputs_never_target_current_route(
        steps in navigation(),
        hour in 0u32..24,
        seed in any::<u64>(),
    ) {
        let clock = ManualClock::new(start(hour));
        let mut engine =
            Engine::new(Config::default(), clock.clone()).with_sampler(seeded_sampler(seed));
        let registry = RouteRegistry::standard();

        for (idx, gap_secs) in steps {
            let route = ROUTES[idx];
            engine.on_route_changed(route);
            clock.advance(Duration::seconds(gap_secs as i64));
            engine.tick();

            for action in engine.contextual_actions() {
                prop_assert!(!registry.equivalent(&action.destination, route));
            }
            for pending in engine.pending_reveals() {
                prop_assert!(!registry.equivalent(&pending.suggestion.action, route));
            }
            for visible in engine.visible_suggestions() {
                prop_assert!(!registry.equivalent(&visible.action, route));
            }
        }
    }

    #[test]
    fn lists_respect_caps_and_order(steps in navigation(), hour in 0u32..24) {
        let clock = ManualClock::new(start(hour));
        let mut engine = Engine::new(Config::default(), clock.clone());

        for (idx, gap_secs) in steps {
            engine.on_route_changed(ROUTES[idx]);

            let actions = engine.contextual_actions();
            prop_assert!(actions.len() <= 6);
            let priorities: Vec<Priority> = actions.iter().map(|a| a.priority).collect();
            prop_assert!(is_sorted_desc(&priorities));

            let plan = engine.pending_reveals();
            let high = plan
                .iter()
                .filter(|p| p.suggestion.priority == Priority::High)
                .count();
            let cap = if engine.emergency_mode() || high >= 2 { 3 } else { 2 };
            prop_assert!(plan.len() <= cap);

            clock.advance(Duration::seconds(gap_secs as i64));
        }
    }

    #[test]
    fn behavior_history_stays_bounded(steps in navigation()) {
        let clock = ManualClock::new(start(10));
        let mut engine = Engine::new(Config::default(), clock.clone());
        let mut previous_counts = std::collections::HashMap::new();

        for (idx, _) in steps {
            engine.on_route_changed(ROUTES[idx]);
            let state = engine.behavior();

            prop_assert!(state.last_visited_routes.len() <= 5);
            let mut seen = std::collections::HashSet::new();
            prop_assert!(state.last_visited_routes.iter().all(|r| seen.insert(r.clone())));

            for route in &state.frequent_routes {
                prop_assert!(state.visit_count(route) > 2);
            }
            for (route, count) in &state.page_view_counts {
                let before = previous_counts.insert(route.clone(), *count).unwrap_or(0);
                prop_assert!(*count >= before);
            }
        }
    }
}
