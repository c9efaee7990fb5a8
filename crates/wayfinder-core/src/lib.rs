//! # Wayfinder Core Library
//!
//! Contextual next-best-action engine for a diagnostic-center website. Given
//! the page a visitor is on, what they did earlier in the session and the
//! local time, it ranks quick actions, writes short suggestions and reveals
//! them one at a time. Everything is available from the standalone CLI.
//!
//! ## Architecture
//!
//! - **Engine**: A wall-clock-based state machine. The caller reports route
//!   changes and periodically invokes `tick()` so scheduled reveals fire
//! - **Behavior**: Per-session navigation history and action preferences
//! - **Emergency**: Off-hours, holiday, emergency-route and rapid-revisit rules
//! - **Storage**: TOML-based configuration and navigation sinks
//!
//! ## Key Components
//!
//! - [`Engine`]: Core orchestrator and the only mutation surface
//! - [`Catalog`]: Ranked contextual actions per route
//! - [`SuggestionGenerator`]: Route and behavior aware suggestion text
//! - [`RevealScheduler`]: Staggered, cancellable reveal timers
//! - [`Config`]: Application configuration management

pub mod behavior;
pub mod catalog;
pub mod clock;
pub mod engine;
pub mod error;
pub mod events;
pub mod reveal;
pub mod routes;
pub mod session;
pub mod storage;
pub mod suggest;
pub mod tracker;

pub use behavior::{BehaviorState, BehaviorTracker, NavigationEvent, PreferredAction};
pub use catalog::{ActionCandidate, ActionKind, Catalog, Priority};
pub use clock::{
    detect_emergency, is_after_hours, is_holiday, Clock, EmergencyAssessment, EmergencyDetector,
    Holiday, ManualClock, SystemClock, TokioClock,
};
pub use engine::{Engine, EngineSnapshot};
pub use error::{ConfigError, CoreError, Result};
pub use events::Event;
pub use reveal::{PendingReveal, RevealScheduler, RouteSchedule, Sampler};
pub use routes::{RouteInfo, RouteRegistry, RouteTag};
pub use session::{SessionCommand, SessionDriver};
pub use storage::{Config, JsonFileSink, MemorySink, NavigationSink, NullSink};
pub use suggest::{Suggestion, SuggestionContext, SuggestionGenerator, SuggestionKind};
pub use tracker::ActionTracker;
