use std::path::PathBuf;

use thiserror::Error;

/// Every way a scrape run can fail, from the network to the filesystem.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The server answered with something other than 200.
    #[error("Failed to retrieve the webpage. Status code: {code}")]
    Status { code: u16, url: String },

    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid article filter {0:?} (expected `tag.class`, e.g. `div.articulo`)")]
    InvalidFilter(String),

    #[error("no elements matched article filter `{filter}`")]
    NoMatches { filter: String },

    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings")]
    Config(#[from] config::ConfigError),
}

impl ScrapeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScrapeError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
