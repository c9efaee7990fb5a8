//! Suggestion generator implementation.

use std::cmp::Reverse;
use std::collections::HashSet;

use indexmap::IndexMap;

use super::templates::{default_suggestions, fallback_suggestions, route_table, Suggestion};
use crate::behavior::BehaviorState;
use crate::catalog::Priority;
use crate::clock::EmergencyAssessment;
use crate::routes::RouteRegistry;
use crate::storage::LimitsConfig;

/// Everything the generator reads for one route change.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionContext<'a> {
    pub route: &'a str,
    pub behavior: &'a BehaviorState,
    pub registry: &'a RouteRegistry,
    pub assessment: &'a EmergencyAssessment,
}

impl SuggestionContext<'_> {
    fn is_current(&self, destination: &str) -> bool {
        self.registry.equivalent(destination, self.route)
    }
}

#[derive(Debug, Clone)]
pub struct SuggestionGenerator {
    routes: IndexMap<String, Vec<Suggestion>>,
    defaults: Vec<Suggestion>,
    fallbacks: Vec<Suggestion>,
    max_suggestions: usize,
    max_suggestions_extended: usize,
}

impl Default for SuggestionGenerator {
    fn default() -> Self {
        Self::new(&LimitsConfig::default())
    }
}

impl SuggestionGenerator {
    /// Generator over the built-in tables.
    pub fn new(limits: &LimitsConfig) -> Self {
        Self {
            routes: route_table()
                .into_iter()
                .map(|(route, entries)| (route.to_string(), entries))
                .collect(),
            defaults: default_suggestions(),
            fallbacks: fallback_suggestions(),
            max_suggestions: limits.max_suggestions,
            max_suggestions_extended: limits.max_suggestions_extended,
        }
    }

    /// Replace the entries for one route.
    pub fn insert_route(&mut self, route: &str, entries: Vec<Suggestion>) {
        self.routes.insert(route.to_string(), entries);
    }

    /// Ranked, filtered and capped suggestions for the current route.
    pub fn generate(&self, ctx: &SuggestionContext<'_>) -> Vec<Suggestion> {
        let emergency = ctx.assessment.is_emergency();
        let candidates = self.raw_candidates(ctx);

        let mut seen = HashSet::new();
        let mut kept: Vec<Suggestion> = candidates
            .into_iter()
            .filter(|s| !ctx.is_current(&s.action))
            .filter(|s| seen.insert(s.action.clone()))
            .collect();

        for fallback in &self.fallbacks {
            if kept.len() >= 2 {
                break;
            }
            if ctx.is_current(&fallback.action) || !seen.insert(fallback.action.clone()) {
                continue;
            }
            kept.push(fallback.clone());
        }

        kept.sort_by_key(|s| Reverse(s.priority));

        let high = kept.iter().filter(|s| s.priority == Priority::High).count();
        let cap = if emergency || high >= 2 {
            self.max_suggestions_extended
        } else {
            self.max_suggestions
        };
        kept.truncate(cap);

        tracing::debug!(
            route = ctx.route,
            emergency,
            high,
            count = kept.len(),
            "generated suggestions"
        );
        kept
    }

    fn raw_candidates(&self, ctx: &SuggestionContext<'_>) -> Vec<Suggestion> {
        let mut candidates = self
            .routes
            .get(ctx.route)
            .unwrap_or(&self.defaults)
            .clone();

        if let Some(route) = ctx
            .behavior
            .frequent_routes
            .iter()
            .find(|r| !ctx.is_current(r))
        {
            candidates.push(Suggestion::often_visited(route, ctx.registry.title(route)));
        }

        if ctx.assessment.off_hours() {
            candidates.push(Suggestion::closed_now());
        }
        if ctx.assessment.is_emergency() {
            candidates.push(Suggestion::urgent_help());
        }
        candidates
    }
}
