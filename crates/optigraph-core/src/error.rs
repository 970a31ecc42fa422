//! Error types for optigraph.
//!
//! Graph operations themselves never fail: adding a duplicate or removing
//! something absent is a silent no-op, and an invisible BFS source is reported
//! as `None`. Errors only come from the configuration surface.

use thiserror::Error;

/// Result type alias for optigraph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring a graph or a workload.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be loaded or extracted.
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Configuration was loaded but holds an unusable value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A textual value did not name a known variant or policy.
    #[error("Unknown {kind} '{value}'")]
    UnknownName {
        /// What was being parsed (e.g. "graph variant").
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
