use thiserror::Error;

#[derive(Debug, Error)]
pub enum DoorError {
    #[error("warstack not found: {0}")]
    WarstackNotFound(String),

    #[error("hot list is empty - add items first")]
    HotlistEmpty,

    #[error("no suitable door found (try selecting a quadrant-2 item manually)")]
    NoDoorCandidate,

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid step: {0}")]
    InvalidStep(String),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DoorError>;
