use thiserror::Error;

/// Input rejected locally, before anything reaches the generation client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please add at least one ingredient!")]
    EmptyPantry,

    #[error("Item name cannot be empty")]
    EmptyItemName,
}

/// Failure of a single request to the generative model.
///
/// Every variant is terminal: there is no retry policy, callers decide whether
/// the failure is surfaced or only logged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Generation failed: {0}")]
    Failed(String),

    #[error("Model declined to generate: {0}")]
    Refused(String),

    #[error("Model returned no usable content")]
    Empty,
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::Transport(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize collection: {0}")]
    Serialize(#[from] serde_json::Error),
}
