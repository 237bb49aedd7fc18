use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("Invalid topic index")]
    InvalidTopicIndex,

    #[error("no scene matched a stock photo; nothing to assemble")]
    NoUsableScenes,

    #[error("ffmpeg error: {0}")]
    Ffmpeg(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GenerateResult<T> = Result<T, GenerateError>;
