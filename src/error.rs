// Error types for everything around the typing engine.
//
// The engine itself is total: reducers never fail. Errors only come from
// loading dictionaries, reading or writing the history log and setting up
// logging.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown dictionary '{name}' (available: {available})")]
    UnknownDictionary { name: String, available: String },

    #[error("dictionary '{0}' has no words")]
    EmptyDictionary(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("history log error: {0}")]
    Csv(#[from] csv::Error),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl Error {
    pub fn logging<S: Into<String>>(msg: S) -> Self {
        Self::Logging(msg.into())
    }
}
