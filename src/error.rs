use thiserror::Error;

#[derive(Error, Debug)]
pub enum NmtError {
    // --- Model ---
    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    // --- Batch building ---
    #[error("Empty batch: at least one sequence is required")]
    EmptyBatch,

    // --- Config ---
    #[error("Invalid config: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, NmtError>;
