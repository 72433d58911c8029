use thiserror::Error;

/// Errors returned by skip list operations.
///
/// Every error is detected while searching, before the list is modified, so a
/// failed call leaves the list exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipListError {
    #[error("no element with the requested key")]
    KeyNotFound,
    #[error("operation requires a non-empty list")]
    EmptyCollection,
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: isize, len: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("node handle does not refer to a live element")]
    StaleHandle,
}

pub type Result<T> = std::result::Result<T, SkipListError>;
