use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoringError {
    #[error("Scoring error: random draw [{0}] is outside of [0, 1]")]
    InvalidDraw(f64),
    #[error("Scoring error: clock reported invalid hour [{0}]")]
    InvalidHour(u32),
    #[error("Scoring error: scoring task was interrupted | {0}")]
    Interrupted(String)
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("Unknown policy preset [{0}]")]
    UnknownPreset(String)
}
