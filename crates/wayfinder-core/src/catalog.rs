//! Static, route-keyed table of contextual actions.
//!
//! ## Ranking
//!
//! ```text
//! route entries ++ default entries      (dedup by id, then by destination)
//!   ++ up to 2 frequent-route entries    (low priority, never the current route)
//!   -> drop anything equivalent to the current route
//!   -> stable sort by priority, high first
//!   -> truncate to 6
//! ```
//!
//! Lookup is exact-match on the route; an unmapped route only gets the
//! default entries.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::behavior::BehaviorState;
use crate::error::CoreError;
use crate::routes::RouteRegistry;
use crate::storage::LimitsConfig;

/// Emergency line dialled from every urgent-care surface.
pub const EMERGENCY_LINE: &str = "tel:10666";
pub const AMBULANCE_LINE: &str = "tel:10999";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn name(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Primary,
    Secondary,
    Emergency,
    Info,
    Frequent,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Primary => "primary",
            ActionKind::Secondary => "secondary",
            ActionKind::Emergency => "emergency",
            ActionKind::Info => "info",
            ActionKind::Frequent => "frequent",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for ActionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" => Ok(ActionKind::Primary),
            "secondary" => Ok(ActionKind::Secondary),
            "emergency" => Ok(ActionKind::Emergency),
            "info" => Ok(ActionKind::Info),
            "frequent" => Ok(ActionKind::Frequent),
            other => Err(CoreError::Custom(format!("unknown action type: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCandidate {
    pub id: String,
    pub label: String,
    pub destination: String,
    pub icon: String,
    pub priority: Priority,
    pub kind: ActionKind,
    /// Leaves the site (phone link or third-party page).
    pub external: bool,
    pub description: String,
}

impl ActionCandidate {
    fn internal(
        id: &str,
        label: &str,
        destination: &str,
        icon: &str,
        priority: Priority,
        kind: ActionKind,
        description: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            destination: destination.to_string(),
            icon: icon.to_string(),
            priority,
            kind,
            external: false,
            description: description.to_string(),
        }
    }

    fn call(id: &str, label: &str, line: &str, description: &str) -> Self {
        Self {
            external: true,
            ..Self::internal(
                id,
                label,
                line,
                "phone",
                Priority::High,
                ActionKind::Emergency,
                description,
            )
        }
    }

    fn frequent(route: &str, title: &str, visits: u32) -> Self {
        Self::internal(
            &format!("frequent:{route}"),
            &format!("Back to {title}"),
            route,
            "history",
            Priority::Low,
            ActionKind::Frequent,
            &format!("You opened this page {visits} times this session"),
        )
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    defaults: Vec<ActionCandidate>,
    routes: IndexMap<String, Vec<ActionCandidate>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    pub fn new(defaults: Vec<ActionCandidate>) -> Self {
        Self {
            defaults,
            routes: IndexMap::new(),
        }
    }

    pub fn insert_route(&mut self, route: &str, actions: Vec<ActionCandidate>) {
        self.routes.insert(route.to_string(), actions);
    }

    pub fn defaults(&self) -> &[ActionCandidate] {
        &self.defaults
    }

    /// Entries keyed by exactly `route`.
    pub fn route_entries(&self, route: &str) -> &[ActionCandidate] {
        self.routes.get(route).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ranked actions for `route` given the session so far.
    pub fn actions_for(
        &self,
        route: &str,
        behavior: &BehaviorState,
        registry: &RouteRegistry,
        limits: &LimitsConfig,
    ) -> Vec<ActionCandidate> {
        let mut ids = HashSet::new();
        let mut destinations = HashSet::new();
        let mut actions: Vec<ActionCandidate> = Vec::new();

        for action in self.route_entries(route).iter().chain(&self.defaults) {
            if ids.contains(&action.id) || destinations.contains(&action.destination) {
                continue;
            }
            ids.insert(action.id.clone());
            destinations.insert(action.destination.clone());
            actions.push(action.clone());
        }

        let frequent = behavior
            .frequent_routes
            .iter()
            .filter(|r| !registry.equivalent(r, route))
            .take(limits.max_frequent_actions)
            .map(|r| ActionCandidate::frequent(r, registry.title(r), behavior.visit_count(r)));
        actions.extend(frequent);

        actions.retain(|a| !registry.equivalent(&a.destination, route));
        actions.sort_by_key(|a| Reverse(a.priority));
        actions.truncate(limits.max_actions);
        actions
    }

    /// The catalog of the public site.
    pub fn standard() -> Self {
        use ActionKind::*;
        use Priority::*;

        let book = ActionCandidate::internal(
            "book-appointment",
            "Book Appointment",
            "/appointment",
            "calendar",
            High,
            Primary,
            "Reserve a slot with a specialist",
        );
        let find_doctor = |priority| {
            ActionCandidate::internal(
                "find-doctor",
                "Find a Doctor",
                "/our-doctors",
                "stethoscope",
                priority,
                Secondary,
                "Browse specialists by department",
            )
        };
        let find_branch = ActionCandidate::internal(
            "find-branch",
            "Find Nearest Branch",
            "/branches",
            "map-pin",
            Medium,
            Secondary,
            "Addresses, hours and directions",
        );
        let hotline = ActionCandidate::call(
            "call-hotline",
            "Call Hotline",
            EMERGENCY_LINE,
            "Round-the-clock help line",
        );

        let mut catalog = Self::new(vec![book, hotline]);

        catalog.insert_route(
            "/",
            vec![
                ActionCandidate::internal(
                    "download-reports",
                    "Download Reports",
                    "/reports",
                    "file-download",
                    High,
                    Primary,
                    "Get your test results online",
                ),
                find_doctor(High),
                find_branch.clone(),
            ],
        );
        catalog.insert_route(
            "/our-doctors",
            vec![
                ActionCandidate::internal(
                    "book-consultation",
                    "Book a Consultation",
                    "/appointment",
                    "calendar",
                    High,
                    Primary,
                    "Pick a doctor and a time",
                ),
                find_branch.clone(),
            ],
        );
        catalog.insert_route(
            "/reports",
            vec![
                ActionCandidate::internal(
                    "consult-doctor",
                    "Consult a Doctor",
                    "/our-doctors",
                    "stethoscope",
                    High,
                    Secondary,
                    "Review your results with a specialist",
                ),
                ActionCandidate::internal(
                    "report-support",
                    "Report Support",
                    "/contact-us",
                    "help-circle",
                    Low,
                    Info,
                    "Trouble finding a report? Contact us",
                ),
            ],
        );
        catalog.insert_route(
            "/appointment",
            vec![
                find_doctor(Medium),
                find_branch.clone(),
                ActionCandidate::internal(
                    "health-packages",
                    "Health Packages",
                    "/health-packages",
                    "package",
                    Low,
                    Info,
                    "Bundled check-ups at a discount",
                ),
            ],
        );
        catalog.insert_route(
            "/branches",
            vec![
                find_doctor(Medium),
                ActionCandidate::internal(
                    "contact-us",
                    "Contact Us",
                    "/contact-us",
                    "mail",
                    Low,
                    Info,
                    "Questions about a branch",
                ),
            ],
        );
        catalog.insert_route(
            "/health-packages",
            vec![
                ActionCandidate::internal(
                    "book-package",
                    "Book a Package",
                    "/appointment",
                    "calendar",
                    High,
                    Primary,
                    "Schedule a package check-up",
                ),
                find_branch.clone(),
            ],
        );
        for route in ["/hotlines", "/emergency"] {
            catalog.insert_route(
                route,
                vec![
                    ActionCandidate::call(
                        "call-emergency",
                        "Call Emergency Line",
                        EMERGENCY_LINE,
                        "Speak to the duty team now",
                    ),
                    ActionCandidate::call(
                        "request-ambulance",
                        "Request Ambulance",
                        AMBULANCE_LINE,
                        "Dispatch an ambulance to your location",
                    ),
                    find_branch.clone(),
                ],
            );
        }
        catalog
    }
}
