use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TunerError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("hardware fault: {0}")]
    HardwareFault(String),
    #[error("timeout waiting for analog input")]
    Timeout,
    #[error("value {target} outside range [{start}, {end}]")]
    OutOfRange { target: i64, start: i64, end: i64 },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing analog input")]
    MissingInput,
    #[error("missing value range")]
    MissingRange,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
