use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot score against an empty target word")]
    EmptyTarget,

    #[error("total elapsed time must be positive, got {0}")]
    NonPositiveTime(f64),

    #[error("repetitions per word must be at least 1")]
    InvalidRepetitions,

    #[error("word must not be blank")]
    BlankWord,

    #[error("word index {index} is out of range (1..={len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("input closed while waiting for an answer")]
    InputClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}
