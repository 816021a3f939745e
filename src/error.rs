pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// A folder or file id did not resolve to an object.
    NotFound(String),
    /// The provider refused access to an object.
    PermissionDenied(String),
    /// A caller supplied an empty or otherwise unusable value.
    ValidationError(String),
    /// Chunk reassembly or deserialization produced garbage. Distinct from an
    /// absent record, which is not an error.
    Corrupt(String),
    /// A provider call exceeded its deadline.
    Timeout(String),
    JsonError(serde_json::Error),
    IoError(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::NotFound(ref msg) => write!(f, "Not found: {msg}"),
            Error::PermissionDenied(ref msg) => write!(f, "Permission denied: {msg}"),
            Error::ValidationError(ref msg) => write!(f, "{msg}"),
            Error::Corrupt(ref msg) => write!(f, "Corrupt record: {msg}"),
            Error::Timeout(ref msg) => write!(f, "Timed out: {msg}"),
            Error::JsonError(ref err) => write!(f, "{err}"),
            Error::IoError(ref err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::JsonError(ref err) => Some(err),
            Error::IoError(ref err) => Some(err),
            _ => None,
        }
    }
}

impl std::convert::From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Error {
        Error::JsonError(error)
    }
}

impl std::convert::From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Error {
        Error::IoError(error)
    }
}
