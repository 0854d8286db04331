use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightsError {
    // ── Data unavailable ─────────────────────────────
    #[error("Data file not found: {path}")]
    FileNotFound { path: String },

    #[error("Dataset '{source_name}' unavailable: {reason}")]
    DataUnavailable { source_name: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // ── Schema invalid ───────────────────────────────
    #[error("Missing required column(s): {missing:?}. Available columns: {available:?}")]
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("Dataset contains no rows")]
    EmptyDataset,

    #[error("Column '{column}' has no values")]
    EmptyColumn { column: String },

    #[error("Column '{column}' row {row}: '{value}' is not a number")]
    InvalidNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Outcome column '{column}' row {row}: expected 0 or 1, got '{value}'")]
    InvalidOutcome {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Column '{column}' not found")]
    UnknownColumn { column: String },

    #[error("Column '{column}' is not numeric")]
    NotNumeric { column: String },

    #[error("Column '{column}' is not categorical")]
    NotCategorical { column: String },

    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate column '{column}'")]
    DuplicateColumn { column: String },

    // ── Precondition ─────────────────────────────────
    #[error("Agent not initialized: call initialize() before generating insights")]
    NotInitialized,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type InsightsResult<T> = Result<T, InsightsError>;
