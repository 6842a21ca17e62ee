use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("bridge not configured: set DOOR_BRIDGE_URL")]
    NotConfigured,

    #[error("ticktick token missing: set TICKTICK_TOKEN")]
    TokenMissing,

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected upstream response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
