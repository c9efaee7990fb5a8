mod config;
pub mod navigation;

pub use config::{CalendarConfig, Config, EmergencyConfig, HoursConfig, LimitsConfig, RevealConfig};
pub use navigation::{JsonFileSink, MemorySink, NavigationSink, NullSink};

use std::path::PathBuf;

/// Returns `~/.config/wayfinder[-dev]/` based on WAYFINDER_ENV.
///
/// Set WAYFINDER_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("WAYFINDER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("wayfinder-dev")
    } else {
        base_dir.join("wayfinder")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
