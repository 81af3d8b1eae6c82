use std::fmt;
use std::io;

/// Crate-wide error type.
///
/// Loading problems and broken caller preconditions are the only two ways
/// the partitioner can fail; neither is retried.
#[derive(Debug)]
pub enum Error {
    /// The dataset source could not be read or parsed.
    DataUnavailable(String),
    /// A caller-supplied precondition was broken, e.g. a sample/label
    /// count mismatch or a shard count that does not divide the set.
    InvariantViolation(String),
}

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DataUnavailable(msg) => write!(f, "dataset unavailable: {}", msg),
            Error::InvariantViolation(msg) => write!(f, "invariant violation: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::DataUnavailable(e.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::DataUnavailable(e.to_string())
    }
}
