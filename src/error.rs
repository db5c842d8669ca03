use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SetupError>;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{path}: {source}")]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Unknown platform: {name}")]
    UnsupportedPlatform { name: String },

    #[error("Download failed: {url} (HTTP {status})")]
    Download { url: String, status: u16 },

    #[error("Unsupported archive format: {name}")]
    UnsupportedArchive { name: String },

    #[error("Unsupported {kind} compression: {path}")]
    UnsupportedCompression { path: PathBuf, kind: &'static str },

    #[error("Extraction failed: {path}: {message}")]
    Extraction { path: PathBuf, message: String },
}

impl SetupError {
    pub fn unsupported_platform<S: Into<String>>(name: S) -> Self {
        SetupError::UnsupportedPlatform { name: name.into() }
    }

    pub fn file<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        SetupError::File {
            path: path.into(),
            source,
        }
    }

    pub fn extraction<P: Into<PathBuf>, S: ToString>(path: P, message: S) -> Self {
        SetupError::Extraction {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
