//! Tagged registry of the site's routes.
//!
//! Route equivalence and emergency designation are both read off the tags
//! here, so adding a branch page or an emergency page is a one-line change.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Path of the branches hub that every branch-detail page collapses onto.
pub const BRANCHES_HUB: &str = "/branches";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteTag {
    /// Interchangeable detail page for a single branch.
    BranchDetail,
    /// Page whose mere presence signals an urgent need.
    Emergency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteInfo {
    pub path: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<RouteTag>,
}

impl RouteInfo {
    pub fn new(path: &str, title: &str, tags: &[RouteTag]) -> Self {
        Self {
            path: path.to_string(),
            title: title.to_string(),
            tags: tags.to_vec(),
        }
    }

    pub fn has_tag(&self, tag: RouteTag) -> bool {
        self.tags.contains(&tag)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: IndexMap<String, RouteInfo>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The routes of the public site.
    pub fn standard() -> Self {
        use RouteTag::*;

        let mut registry = Self::new();
        for info in [
            RouteInfo::new("/", "Home", &[]),
            RouteInfo::new("/about-us", "About Us", &[]),
            RouteInfo::new("/services", "Services", &[]),
            RouteInfo::new("/health-packages", "Health Packages", &[]),
            RouteInfo::new("/our-doctors", "Our Doctors", &[]),
            RouteInfo::new("/appointment", "Book Appointment", &[]),
            RouteInfo::new("/reports", "Download Reports", &[]),
            RouteInfo::new("/contact-us", "Contact Us", &[]),
            RouteInfo::new(BRANCHES_HUB, "Branches", &[]),
            RouteInfo::new("/branches/dhanmondi", "Dhanmondi Branch", &[BranchDetail]),
            RouteInfo::new("/branches/gulshan", "Gulshan Branch", &[BranchDetail]),
            RouteInfo::new("/branches/mirpur", "Mirpur Branch", &[BranchDetail]),
            RouteInfo::new("/branches/uttara", "Uttara Branch", &[BranchDetail]),
            RouteInfo::new("/branches/shantinagar", "Shantinagar Branch", &[BranchDetail]),
            RouteInfo::new("/branches/chattogram", "Chattogram Branch", &[BranchDetail]),
            RouteInfo::new("/branches/sylhet", "Sylhet Branch", &[BranchDetail]),
            RouteInfo::new("/hotlines", "Hotlines", &[Emergency]),
            RouteInfo::new("/emergency", "Emergency Care", &[Emergency]),
        ] {
            registry.register(info);
        }
        registry
    }

    /// Adds or replaces a route.
    pub fn register(&mut self, info: RouteInfo) {
        self.routes.insert(info.path.clone(), info);
    }

    pub fn get(&self, route: &str) -> Option<&RouteInfo> {
        self.routes.get(route)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteInfo> {
        self.routes.values()
    }

    /// Human-readable title, falling back to the raw path.
    pub fn title<'a>(&'a self, route: &'a str) -> &'a str {
        self.get(route).map(|r| r.title.as_str()).unwrap_or(route)
    }

    pub fn is_emergency(&self, route: &str) -> bool {
        self.get(route).is_some_and(|r| r.has_tag(RouteTag::Emergency))
    }

    /// Representative route of the equivalence class `route` belongs to.
    pub fn canonical<'a>(&self, route: &'a str) -> &'a str {
        match self.get(route) {
            Some(info) if info.has_tag(RouteTag::BranchDetail) => BRANCHES_HUB,
            _ => route,
        }
    }

    pub fn equivalent(&self, a: &str, b: &str) -> bool {
        self.canonical(a) == self.canonical(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_details_collapse_onto_hub() {
        let registry = RouteRegistry::standard();
        assert!(registry.equivalent("/branches/gulshan", BRANCHES_HUB));
        assert!(registry.equivalent("/branches/gulshan", "/branches/sylhet"));
        assert!(registry.equivalent(BRANCHES_HUB, BRANCHES_HUB));
    }

    #[test]
    fn unregistered_paths_are_only_equal_to_themselves() {
        let registry = RouteRegistry::standard();
        assert!(!registry.equivalent("/branches/atlantis", BRANCHES_HUB));
        assert!(registry.equivalent("/nowhere", "/nowhere"));
        assert!(!registry.equivalent("/", "/reports"));
    }

    #[test]
    fn emergency_tags() {
        let registry = RouteRegistry::standard();
        assert!(registry.is_emergency("/hotlines"));
        assert!(registry.is_emergency("/emergency"));
        assert!(!registry.is_emergency("/"));
        assert!(!registry.is_emergency("/not-registered"));
    }

    #[test]
    fn title_falls_back_to_path() {
        let registry = RouteRegistry::standard();
        assert_eq!(registry.title("/our-doctors"), "Our Doctors");
        assert_eq!(registry.title("/mystery"), "/mystery");
    }

    #[test]
    fn register_adds_new_branch() {
        let mut registry = RouteRegistry::standard();
        registry.register(RouteInfo::new(
            "/branches/khulna",
            "Khulna Branch",
            &[RouteTag::BranchDetail],
        ));
        assert!(registry.equivalent("/branches/khulna", BRANCHES_HUB));
    }
}
