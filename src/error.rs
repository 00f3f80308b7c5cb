//! Error handling

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Problems with the service account credential. Fatal at startup.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// Nothing at the configured path
    #[error("credential file not found: {}", .0.display())]
    Missing(PathBuf),
    /// The file exists but could not be read
    #[error("failed to read credential file {}: {source}", path.display())]
    Io {
        /// where we looked
        path: PathBuf,
        /// underlying error
        #[source]
        source: std::io::Error,
    },
    /// The file is not a usable service account
    #[error("invalid credential file {}: {reason}", path.display())]
    Invalid {
        /// where we looked
        path: PathBuf,
        /// what was wrong with it
        reason: String,
    },
}

/// A season id that cannot name a storage folder.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeasonError {
    /// Nothing left after trimming
    #[error("season id must not be empty")]
    Empty,
    /// Path separators or `..` would leave `seasons/{season}/cards`
    #[error("season id {0:?} must not contain path separators or '..'")]
    InvalidPath(String),
}

/// Custom evolution names were rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConceptError {
    /// Evolution seasons need exactly one name per line
    #[error("expected {expected} custom names, got {actual}")]
    CustomNameCount {
        /// names required
        expected: usize,
        /// names supplied
        actual: usize,
    },
}

/// The image generation service did not give us an image.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// Transport level failure, including timeouts
    #[error("image generation request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with a non-success status
    #[error("image generation service returned {status}: {body}")]
    Status {
        /// HTTP status
        status: StatusCode,
        /// response body, for diagnostics
        body: String,
    },
    /// The answer did not contain anything URL-shaped
    #[error("no image URL found in generation response")]
    NoUrl,
}

/// Failures while moving an image into the object store. These never leave
/// [`crate::storage::ArtifactStore::store`], which falls back to the original URL.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Download or upload transport failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// Download or upload answered with a non-success status
    #[error("unexpected status {status} from {url}")]
    Status {
        /// HTTP status
        status: StatusCode,
        /// the URL we talked to
        url: String,
    },
    /// Filesystem backend failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The downloaded bytes are not an image we can handle
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    /// A URL could not be built or parsed
    #[error("invalid url: {0}")]
    Url(String),
    /// Object path would leave the store root
    #[error("object path {0:?} must be relative without '..'")]
    InvalidPath(String),
}

/// Failures reading the interactive menu.
#[derive(Debug, Error)]
pub enum MenuError {
    /// stdin/stdout failure
    #[error("console io failed: {0}")]
    Io(#[from] std::io::Error),
    /// Custom theme was left empty
    #[error("custom theme must not be empty")]
    EmptyTheme,
}

/// Crate level errors for the things that abort a run.
#[derive(Debug, Error)]
pub enum CardgenError {
    /// When DB operations fail
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    /// A concept reached persistence without an image
    #[error("card {0} has no image and cannot be persisted")]
    MissingImage(String),
    /// Writing progress output failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
