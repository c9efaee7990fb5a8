//! Suggestion types and the built-in candidate tables.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{Priority, EMERGENCY_LINE};

/// What a suggestion is about. `UrgentCare` bypasses the normal reveal delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Booking,
    UrgentCare,
    Reports,
    Doctors,
    Branches,
    Packages,
    Frequent,
    Info,
}

impl SuggestionKind {
    pub fn name(&self) -> &'static str {
        match self {
            SuggestionKind::Booking => "booking",
            SuggestionKind::UrgentCare => "urgent_care",
            SuggestionKind::Reports => "reports",
            SuggestionKind::Doctors => "doctors",
            SuggestionKind::Branches => "branches",
            SuggestionKind::Packages => "packages",
            SuggestionKind::Frequent => "frequent",
            SuggestionKind::Info => "info",
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    /// Destination; also the suggestion's identity within one route.
    pub action: String,
    pub kind: SuggestionKind,
    pub priority: Priority,
}

impl Suggestion {
    pub fn new(text: &str, action: &str, kind: SuggestionKind, priority: Priority) -> Self {
        Self {
            text: text.to_string(),
            action: action.to_string(),
            kind,
            priority,
        }
    }

    pub fn key(&self) -> &str {
        &self.action
    }

    pub(crate) fn often_visited(route: &str, title: &str) -> Self {
        Self::new(
            &format!("You often visit {title}. Pick up where you left off."),
            route,
            SuggestionKind::Frequent,
            Priority::Low,
        )
    }

    pub(crate) fn closed_now() -> Self {
        Self::new(
            "We're closed right now, but our emergency line answers around the clock.",
            EMERGENCY_LINE,
            SuggestionKind::UrgentCare,
            Priority::High,
        )
    }

    pub(crate) fn urgent_help() -> Self {
        Self::new(
            "Need urgent help? Call our emergency line now.",
            EMERGENCY_LINE,
            SuggestionKind::UrgentCare,
            Priority::High,
        )
    }
}

pub(crate) fn route_table() -> Vec<(&'static str, Vec<Suggestion>)> {
    use Priority::*;
    use SuggestionKind::*;

    vec![
        (
            "/",
            vec![
                Suggestion::new(
                    "Need a check-up? Book an appointment in under a minute.",
                    "/appointment",
                    Booking,
                    High,
                ),
                Suggestion::new(
                    "Your test results may be ready. Download your reports online.",
                    "/reports",
                    Reports,
                    Medium,
                ),
            ],
        ),
        (
            "/our-doctors",
            vec![
                Suggestion::new(
                    "Found the right specialist? Book a consultation now.",
                    "/appointment",
                    Booking,
                    High,
                ),
                Suggestion::new(
                    "See which branch is closest to you.",
                    "/branches",
                    Branches,
                    Medium,
                ),
            ],
        ),
        (
            "/reports",
            vec![
                Suggestion::new(
                    "Have questions about your results? Talk to a specialist.",
                    "/our-doctors",
                    Doctors,
                    Medium,
                ),
                Suggestion::new(
                    "Book a follow-up appointment.",
                    "/appointment",
                    Booking,
                    Medium,
                ),
            ],
        ),
        (
            "/appointment",
            vec![Suggestion::new(
                "Not sure whom to see? Browse our doctors first.",
                "/our-doctors",
                Doctors,
                Medium,
            )],
        ),
        (
            "/health-packages",
            vec![
                Suggestion::new(
                    "Book a package at your nearest branch.",
                    "/appointment",
                    Booking,
                    High,
                ),
                Suggestion::new(
                    "Compare our full list of services.",
                    "/services",
                    Packages,
                    Low,
                ),
            ],
        ),
        (
            "/branches",
            vec![Suggestion::new(
                "Book at the branch that suits you.",
                "/appointment",
                Booking,
                Medium,
            )],
        ),
        (
            "/hotlines",
            vec![
                Suggestion::new(
                    "Call our emergency line now. We answer around the clock.",
                    EMERGENCY_LINE,
                    UrgentCare,
                    High,
                ),
                Suggestion::new(
                    "Find the branch with emergency care nearest to you.",
                    "/branches",
                    Branches,
                    High,
                ),
            ],
        ),
    ]
}

pub(crate) fn default_suggestions() -> Vec<Suggestion> {
    vec![
        Suggestion::new(
            "Book an appointment with our specialists.",
            "/appointment",
            SuggestionKind::Booking,
            Priority::Medium,
        ),
        Suggestion::new(
            "Find a branch near you.",
            "/branches",
            SuggestionKind::Branches,
            Priority::Low,
        ),
    ]
}

/// Backfill pool, consumed in order.
pub(crate) fn fallback_suggestions() -> Vec<Suggestion> {
    vec![
        Suggestion::new(
            "Book an appointment in a few clicks.",
            "/appointment",
            SuggestionKind::Booking,
            Priority::Medium,
        ),
        Suggestion::new(
            "Find your nearest branch.",
            "/branches",
            SuggestionKind::Branches,
            Priority::Low,
        ),
        Suggestion::new(
            "Meet our doctors.",
            "/our-doctors",
            SuggestionKind::Doctors,
            Priority::Low,
        ),
    ]
}
