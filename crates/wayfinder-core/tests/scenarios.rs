//! End-to-end navigation scenarios driven through the engine.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use wayfinder_core::reveal::min_sampler;
use wayfinder_core::{
    ActionKind, Config, Engine, Event, ManualClock, RouteRegistry, SuggestionKind,
};

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 2)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn engine_at(start: NaiveDateTime) -> (Engine, ManualClock) {
    let clock = ManualClock::new(start);
    let engine = Engine::new(Config::default(), clock.clone()).with_sampler(min_sampler());
    (engine, clock)
}

fn action_ids(engine: &Engine) -> Vec<String> {
    engine
        .contextual_actions()
        .iter()
        .map(|a| a.id.clone())
        .collect()
}

#[test]
fn test_home_in_business_hours() {
    let (mut engine, _clock) = engine_at(at(10, 0));
    engine.on_route_changed("/");

    let ids = action_ids(&engine);
    let pos = |id: &str| ids.iter().position(|x| x == id).unwrap();
    assert!(pos("download-reports") < pos("book-appointment"));
    assert!(pos("find-doctor") < pos("book-appointment"));
    assert!(engine
        .contextual_actions()
        .iter()
        .all(|a| a.destination != "/"));
    assert!(!engine.emergency_mode());
}

#[test]
fn test_hotlines_at_night_is_urgent() {
    let (mut engine, clock) = engine_at(at(2, 0));
    let events = engine.on_route_changed("/hotlines");

    assert!(engine.emergency_mode());
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::EmergencyModeChanged { active: true, .. })));

    let plan = engine.pending_reveals();
    let urgent = plan
        .iter()
        .find(|p| p.suggestion.kind == SuggestionKind::UrgentCare)
        .expect("urgent suggestion scheduled");
    assert_eq!(urgent.base_delay_ms, 500);
    assert!(plan.len() <= 3);

    clock.advance(Duration::milliseconds(500));
    engine.tick();
    assert_eq!(engine.visible_suggestions().len(), 1);
    assert_eq!(engine.visible_suggestions()[0].kind, SuggestionKind::UrgentCare);
}

#[test]
fn test_frequent_route_surfaces_on_home() {
    let (mut engine, clock) = engine_at(at(10, 0));
    for _ in 0..4 {
        engine.on_route_changed("/our-doctors");
        clock.advance(Duration::seconds(1));
    }
    engine.on_route_changed("/");

    let frequent: Vec<_> = engine
        .contextual_actions()
        .iter()
        .filter(|a| a.kind == ActionKind::Frequent)
        .collect();
    assert_eq!(frequent.len(), 1);
    assert_eq!(frequent[0].destination, "/our-doctors");
}

#[test]
fn test_navigation_cancels_pending_reveals() {
    let (mut engine, clock) = engine_at(at(10, 0));
    engine.on_route_changed("/");
    clock.advance(Duration::seconds(4));
    engine.tick();
    assert_eq!(engine.visible_suggestions().len(), 1);

    let events = engine.on_route_changed("/reports");
    assert!(events.iter().any(|e| matches!(
        e,
        Event::RevealsCancelled {
            cancelled: 1,
            cleared: 1,
            ..
        }
    )));
    assert!(engine.visible_suggestions().is_empty());

    // Nothing from the home page may appear after the switch.
    clock.advance(Duration::minutes(5));
    engine.tick();
    assert!(engine
        .visible_suggestions()
        .iter()
        .all(|s| s.action != "/reports"));
    assert_eq!(engine.visible_suggestions().len(), 2);
}

#[test]
fn test_branch_detail_hides_branch_actions() {
    let (mut engine, _clock) = engine_at(at(11, 0));
    engine.on_route_changed("/branches/gulshan");

    let registry = RouteRegistry::standard();
    assert!(engine
        .contextual_actions()
        .iter()
        .all(|a| !registry.equivalent(&a.destination, "/branches/gulshan")));
}

#[test]
fn test_holiday_triggers_emergency_mode() {
    let christmas = NaiveDate::from_ymd_opt(2026, 12, 25)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let (mut engine, _clock) = engine_at(christmas);
    engine.on_route_changed("/");

    assert!(engine.emergency_mode());
    assert_eq!(engine.emergency().holiday.as_deref(), Some("Christmas Day"));
}

#[test]
fn test_action_preferences_accumulate() {
    let (mut engine, _clock) = engine_at(at(10, 0));
    for _ in 0..3 {
        engine.track_action("book-appointment", ActionKind::Primary);
    }
    engine.track_action("call-hotline", ActionKind::Emergency);

    let preferred = &engine.behavior().preferred_actions;
    assert_eq!(preferred[0].id, "book-appointment");
    assert_eq!(preferred[0].count, 3);
    assert_eq!(preferred[1].id, "call-hotline");
}
