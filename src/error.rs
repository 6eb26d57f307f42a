use std::error;
use std::fmt;
use std::result;

/// Outcomes of a structural operation that did not take place.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// The key was absent, or the node lacked the child the rotation needs. The tree was not
    /// modified.
    NotFound,
    /// The rotation ran but the expected parent/child relationship did not change.
    RotationFailed,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotFound => write!(f, "no adjacent node pair to rotate"),
            Error::RotationFailed => write!(f, "rotation did not change the tree shape"),
        }
    }
}

/// Convenience `Result` type for operations that can fail with an [`Error`].
pub type Result<T> = result::Result<T, Error>;
