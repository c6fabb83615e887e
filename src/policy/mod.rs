mod config;
mod errors;
mod scoring;
mod sources;

pub use config::{ActiveHours, PolicyConfig, Preset, RiskTable, UnparsableAmount};
pub use errors::{ConfigError, ScoringError};
pub use scoring::{Scorer, ScoringPolicy, Signals};
pub use sources::{FixedClock, LocalClock, SeededRandom, ThreadRandom};

/// Source of the uniform draw behind every verdict.
pub trait RandomSource: Send + Sync + 'static {
    /// Returns a draw from `[0, 1)`.
    fn draw(&self) -> f64;
}

/// Source of the wall-clock hour used by time-of-day checks.
pub trait Clock: Send + Sync + 'static {
    /// Returns the local hour of day, `0..=23`.
    fn hour(&self) -> u32;
}
