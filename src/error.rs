use thiserror::Error;

pub type ScaleResult<T> = Result<T, ScaleError>;

#[derive(Debug, Error)]
pub enum ScaleError {
    #[error("invalid tick step: {step} (must be >= 1)")]
    InvalidTickStep { step: u32 },

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("invalid options json: {0}")]
    OptionsJson(#[from] serde_json::Error),
}
