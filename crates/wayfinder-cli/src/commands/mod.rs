pub mod config;
pub mod emergency;
pub mod routes;
pub mod session;
pub mod suggest;

use chrono::NaiveDateTime;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Parse `--at` values such as `2026-03-02 02:00`.
pub fn parse_at(value: &str) -> Result<NaiveDateTime, String> {
    ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| format!("invalid time '{value}', expected YYYY-MM-DD HH:MM"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_at_accepts_both_separators() {
        let a = parse_at("2026-03-02 02:00").unwrap();
        let b = parse_at("2026-03-02T02:00:00").unwrap();
        assert_eq!(a, b);
        assert!(parse_at("tomorrow").is_err());
    }
}
