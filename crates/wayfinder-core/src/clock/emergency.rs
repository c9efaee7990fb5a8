//! After-hours, holiday and emergency posture detection.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::behavior::BehaviorState;
use crate::routes::RouteRegistry;
use crate::storage::Config;

/// A year-independent public holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub month: u32,
    pub day: u32,
    #[serde(default)]
    pub name: String,
}

impl Holiday {
    pub fn new(month: u32, day: u32, name: &str) -> Self {
        Self {
            month,
            day,
            name: name.to_string(),
        }
    }

    pub fn matches(&self, at: NaiveDateTime) -> bool {
        at.month() == self.month && at.day() == self.day
    }
}

/// The built-in holiday table.
pub fn default_holidays() -> Vec<Holiday> {
    vec![
        Holiday::new(1, 1, "New Year's Day"),
        Holiday::new(2, 21, "Language Martyrs' Day"),
        Holiday::new(3, 17, "Father of the Nation's Birthday"),
        Holiday::new(3, 26, "Independence Day"),
        Holiday::new(4, 14, "Bengali New Year"),
        Holiday::new(5, 1, "May Day"),
        Holiday::new(8, 15, "National Mourning Day"),
        Holiday::new(12, 16, "Victory Day"),
        Holiday::new(12, 25, "Christmas Day"),
    ]
}

/// Why the engine is (or is not) in emergency mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyAssessment {
    pub after_hours: bool,
    pub holiday: Option<String>,
    pub emergency_route: bool,
    pub rapid_revisits: bool,
}

impl EmergencyAssessment {
    pub fn is_emergency(&self) -> bool {
        self.after_hours || self.holiday.is_some() || self.emergency_route || self.rapid_revisits
    }

    /// True when the clinic is closed, regardless of the route.
    pub fn off_hours(&self) -> bool {
        self.after_hours || self.holiday.is_some()
    }
}

/// Evaluates emergency posture against configurable hours and calendar.
#[derive(Debug, Clone)]
pub struct EmergencyDetector {
    open_hour: u32,
    close_hour: u32,
    holidays: Vec<Holiday>,
    rapid_window: Duration,
    rapid_threshold: u32,
}

impl Default for EmergencyDetector {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl EmergencyDetector {
    pub fn from_config(config: &Config) -> Self {
        Self {
            open_hour: config.hours.open_hour,
            close_hour: config.hours.close_hour,
            holidays: config.calendar.holidays.clone(),
            rapid_window: duration_secs(config.emergency.rapid_revisit_window_secs),
            rapid_threshold: config.emergency.rapid_revisit_threshold,
        }
    }

    /// Outside operating hours. Applies every day of the week.
    pub fn is_after_hours(&self, now: NaiveDateTime) -> bool {
        let hour = now.hour();
        hour < self.open_hour || hour >= self.close_hour
    }

    pub fn holiday(&self, now: NaiveDateTime) -> Option<&Holiday> {
        self.holidays.iter().find(|h| h.matches(now))
    }

    pub fn is_holiday(&self, now: NaiveDateTime) -> bool {
        self.holiday(now).is_some()
    }

    /// Repeated hits on one page early in a session are read as distress.
    pub fn is_rapid_revisit(
        &self,
        route: &str,
        behavior: &BehaviorState,
        now: NaiveDateTime,
    ) -> bool {
        behavior.session_age(now) < self.rapid_window
            && behavior.visit_count(route) > self.rapid_threshold
    }

    pub fn assess(
        &self,
        route: &str,
        behavior: &BehaviorState,
        registry: &RouteRegistry,
        now: NaiveDateTime,
    ) -> EmergencyAssessment {
        EmergencyAssessment {
            after_hours: self.is_after_hours(now),
            holiday: self.holiday(now).map(|h| h.name.clone()),
            emergency_route: registry.is_emergency(route),
            rapid_revisits: self.is_rapid_revisit(route, behavior, now),
        }
    }

    pub fn detect(
        &self,
        route: &str,
        behavior: &BehaviorState,
        registry: &RouteRegistry,
        now: NaiveDateTime,
    ) -> bool {
        self.assess(route, behavior, registry, now).is_emergency()
    }
}

/// Whole seconds as a chrono duration, saturating instead of panicking.
pub(crate) fn duration_secs(secs: u64) -> Duration {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}

/// After-hours check with the default 07:00-23:00 operating window.
pub fn is_after_hours(now: NaiveDateTime) -> bool {
    EmergencyDetector::default().is_after_hours(now)
}

/// Holiday check against the built-in table.
pub fn is_holiday(now: NaiveDateTime) -> bool {
    EmergencyDetector::default().is_holiday(now)
}

/// Emergency check with default rules and the standard route registry.
pub fn detect_emergency(route: &str, behavior: &BehaviorState, now: NaiveDateTime) -> bool {
    EmergencyDetector::default().detect(route, behavior, &RouteRegistry::standard(), now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::BehaviorTracker;
    use chrono::NaiveDate;

    fn at(month: u32, day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, month, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn after_hours_boundaries() {
        assert!(is_after_hours(at(3, 2, 6, 59)));
        assert!(!is_after_hours(at(3, 2, 7, 0)));
        assert!(!is_after_hours(at(3, 2, 22, 59)));
        assert!(is_after_hours(at(3, 2, 23, 0)));
        assert!(is_after_hours(at(3, 2, 0, 0)));
    }

    #[test]
    fn weekends_follow_weekday_hours() {
        // 2026-03-07 is a Saturday.
        assert!(!is_after_hours(at(3, 7, 14, 0)));
    }

    #[test]
    fn holidays_ignore_year() {
        assert!(is_holiday(at(12, 16, 12, 0)));
        let next_year = NaiveDate::from_ymd_opt(2031, 12, 16)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert!(is_holiday(next_year));
        assert!(!is_holiday(at(12, 17, 12, 0)));
    }

    #[test]
    fn late_night_is_always_emergency() {
        let tracker = BehaviorTracker::new(at(3, 2, 23, 0));
        for route in ["/", "/reports", "/unknown"] {
            assert!(detect_emergency(route, tracker.state(), at(3, 2, 23, 30)));
        }
    }

    #[test]
    fn ordinary_afternoon_is_not_emergency() {
        let mut tracker = BehaviorTracker::new(at(3, 2, 13, 50));
        tracker.on_route_changed("/our-doctors", at(3, 2, 13, 55));
        assert!(!detect_emergency("/our-doctors", tracker.state(), at(3, 2, 14, 0)));
    }

    #[test]
    fn emergency_route_triggers_during_the_day() {
        let tracker = BehaviorTracker::new(at(3, 2, 14, 0));
        assert!(detect_emergency("/hotlines", tracker.state(), at(3, 2, 14, 0)));
    }

    #[test]
    fn rapid_revisits_only_count_in_fresh_session() {
        let start = at(3, 2, 14, 0);
        let mut tracker = BehaviorTracker::new(start);
        for _ in 0..4 {
            tracker.on_route_changed("/reports", start);
        }
        let detector = EmergencyDetector::default();
        let registry = RouteRegistry::standard();

        let fresh = start + Duration::seconds(90);
        assert!(detector.detect("/reports", tracker.state(), &registry, fresh));

        let stale = start + Duration::minutes(3);
        assert!(!detector.detect("/reports", tracker.state(), &registry, stale));
    }

    #[test]
    fn three_visits_are_not_rapid() {
        let start = at(3, 2, 14, 0);
        let mut tracker = BehaviorTracker::new(start);
        for _ in 0..3 {
            tracker.on_route_changed("/reports", start);
        }
        assert!(!detect_emergency("/reports", tracker.state(), start));
    }

    #[test]
    fn assessment_names_the_holiday() {
        let tracker = BehaviorTracker::new(at(2, 21, 11, 0));
        let assessment = EmergencyDetector::default().assess(
            "/",
            tracker.state(),
            &RouteRegistry::standard(),
            at(2, 21, 11, 0),
        );
        assert_eq!(assessment.holiday.as_deref(), Some("Language Martyrs' Day"));
        assert!(assessment.off_hours());
        assert!(assessment.is_emergency());
    }
}
