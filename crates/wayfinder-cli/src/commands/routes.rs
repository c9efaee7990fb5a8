use wayfinder_core::{RouteRegistry, RouteTag};

use super::CommandResult;

pub fn run() -> CommandResult {
    let registry = RouteRegistry::standard();
    for info in registry.iter() {
        let mut tags = Vec::new();
        if info.has_tag(RouteTag::BranchDetail) {
            tags.push("branch");
        }
        if info.has_tag(RouteTag::Emergency) {
            tags.push("emergency");
        }
        println!("{:<24} {:<28} {}", info.path, info.title, tags.join(","));
    }
    Ok(())
}
