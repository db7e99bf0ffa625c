use std::fmt;

/// Unified error type for recycler construction and registry operations.
///
/// Failures raised inside user callbacks never pass through this type; they
/// are returned to the caller of `acquire`/`release` as the callback's own
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Recycler could not be built (missing callback, unreservable storage)
    Configuration(String),

    /// Registry name is empty or not an identifier
    InvalidName(String),

    /// Registry name is already taken
    DuplicateName(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            Error::InvalidName(name) => write!(f, "Invalid pool name: {:?}", name),
            Error::DuplicateName(name) => write!(f, "Pool for '{}' already exists", name),
        }
    }
}

impl std::error::Error for Error {}

/// Result type alias for recycler operations
pub type Result<T> = std::result::Result<T, Error>;
