mod jitter;
mod scheduler;

pub use jitter::{entropy_sampler, min_sampler, seeded_sampler, Sampler};
pub use scheduler::{PendingReveal, RevealScheduler, RouteSchedule};
