use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid fixture file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("unable to access fixture file: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("fixture {0} is defined more than once")]
    DuplicateFixture(String),

    #[error("model {0} is defined more than once")]
    DuplicateModel(String),

    #[error("fixture {0} does not exist")]
    UnknownFixture(String),

    #[error("model {0} does not exist")]
    UnknownModel(String),

    #[error("fixture {id} declares {num_points} points, more than a fixture may hold")]
    TooManyPoints { id: String, num_points: u32 },

    #[error("model {0} contains itself")]
    Cycle(String),
}
