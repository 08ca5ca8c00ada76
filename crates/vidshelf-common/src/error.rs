//! Common error types used throughout vidshelf.
//!
//! The variants mirror the failure classes of a catalog scan: unreadable
//! paths, metadata lookups, artwork downloads and catalog persistence.

/// Common error type for vidshelf.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A catalog database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An external metadata lookup failed.
    #[error("Metadata lookup failed: {0}")]
    Lookup(String),

    /// Downloading or storing an image failed.
    #[error("Image download failed: {0}")]
    ImageDownload(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Lookup error.
    pub fn lookup<S: Into<String>>(msg: S) -> Self {
        Self::Lookup(msg.into())
    }

    /// Create a new ImageDownload error.
    pub fn image_download<S: Into<String>>(msg: S) -> Self {
        Self::ImageDownload(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Create a new Io error with the given kind and message.
    pub fn io<S: Into<String>>(kind: std::io::ErrorKind, msg: S) -> Self {
        Self::Io(std::io::Error::new(kind, msg.into()))
    }

    /// Whether this error represents a persistence failure.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
