use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("failed to load lexicon from {}", .path.display())]
    LexiconLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed record: {0}")]
    MalformedRecord(String),
    #[error("invalid sentiment value {0:?}")]
    InvalidValue(String),
}
