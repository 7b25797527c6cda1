//! Error types for Almanac

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed ledger data. Fatal to the computation that saw it.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A single budget cannot be evaluated. Recovered per budget.
    #[error("Invalid budget {budget_id}: {reason}")]
    InvalidBudget { budget_id: i64, reason: String },

    /// Not enough usable past occurrences of a holiday. Never leaves the
    /// insight generator.
    #[error("Insufficient history for {holiday}: {usable} usable occurrence(s)")]
    InsufficientHistory { holiday: String, usable: usize },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Stable machine-readable code for API responses
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "invalid_input",
            Error::InvalidBudget { .. } => "invalid_budget",
            Error::InsufficientHistory { .. } => "insufficient_history",
            Error::Config(_) => "config",
            Error::NotFound(_) => "not_found",
            Error::Io(_) => "io",
            Error::Json(_) => "json",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
