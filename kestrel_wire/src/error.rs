use std::fmt::Formatter;

/// The default error type for this crate.
#[derive(Debug)]
pub enum WireError {
    /// Hostname resolution failed or produced no usable address
    Resolve(String),
    /// The address text could not be parsed for the requested family
    InvalidAddress(String),
}

impl std::fmt::Display for WireError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WireError::Resolve(err) => write!(f, "resolve failed: {err}"),
            WireError::InvalidAddress(err) => write!(f, "invalid address: {err}"),
        }
    }
}

impl std::error::Error for WireError {}

impl From<std::io::Error> for WireError {
    fn from(err: std::io::Error) -> Self {
        WireError::Resolve(err.to_string())
    }
}

impl From<std::net::AddrParseError> for WireError {
    fn from(err: std::net::AddrParseError) -> Self {
        WireError::InvalidAddress(err.to_string())
    }
}
