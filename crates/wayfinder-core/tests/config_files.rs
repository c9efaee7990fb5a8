//! Integration tests for configuration files and the navigation file sink.

use chrono::{NaiveDate, NaiveDateTime};
use wayfinder_core::{Config, ConfigError, Engine, JsonFileSink, ManualClock, NavigationEvent};

fn at(h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 2)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[hours]
open_hour = 8
close_hour = 20

[calendar]
holidays = [{ month = 7, day = 4, name = "Clinic Founding Day" }]
"#,
    )
    .unwrap();

    let cfg = Config::load_from(&path).unwrap();
    assert_eq!(cfg.hours.open_hour, 8);
    assert_eq!(cfg.hours.close_hour, 20);
    assert_eq!(cfg.calendar.holidays.len(), 1);
    assert_eq!(cfg.reveal.urgent_delay_ms, 500);
    assert_eq!(cfg.limits.max_actions, 6);
}

#[test]
fn test_custom_hours_drive_the_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut cfg = Config::default();
    cfg.set("hours.close_hour", "20").unwrap();
    cfg.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    let mut engine = Engine::new(loaded, ManualClock::new(at(21)));
    engine.on_route_changed("/");
    assert!(engine.emergency_mode());
    assert!(engine.emergency().after_hours);
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[reveal]\nbase_delay_min_ms = 9000\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));

    std::fs::write(&path, "[hours\nopen_hour = ").unwrap();
    assert!(matches!(
        Config::load_from(&path).unwrap_err(),
        ConfigError::ParseFailed(_)
    ));
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    match Config::load_from(&path) {
        Err(ConfigError::LoadFailed { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected LoadFailed, got {other:?}"),
    }
}

#[test]
fn test_file_sink_keeps_latest_navigation() {
    let dir = tempfile::tempdir().unwrap();
    let sink = JsonFileSink::with_path(dir.path().join(JsonFileSink::FILE_NAME));
    let path = sink.path().to_path_buf();

    let mut engine = Engine::new(Config::default(), ManualClock::new(at(10))).with_sink(sink);
    engine.on_route_changed("/");
    engine.on_route_changed("/reports");

    let content = std::fs::read_to_string(path).unwrap();
    let last: NavigationEvent = serde_json::from_str(&content).unwrap();
    assert_eq!(last.route, "/reports");
    assert_eq!(last.previous.as_deref(), Some("/"));
    assert_eq!(last.session_id, engine.behavior().session_id);
}
