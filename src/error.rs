use std::{error, fmt, io};

/// Raised when a read would pull more bytes than the configured ceiling allows.
///
/// The error crosses `std::io::Read` boundaries wrapped into an
/// [`io::Error`] of kind [`io::ErrorKind::Other`]; use
/// [`SizeLimitError::from_io`] to get it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimitError {
    limit: u64,
}

impl SizeLimitError {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    #[inline]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Finds a size limit failure carried by an I/O error, if any.
    pub fn from_io(err: &io::Error) -> Option<&SizeLimitError> {
        err.get_ref()
            .and_then(|inner| inner.downcast_ref::<SizeLimitError>())
    }
}

impl fmt::Display for SizeLimitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "too many bytes read, the maximum limit has been reached: {}",
            self.limit
        )
    }
}

impl error::Error for SizeLimitError {}

impl From<SizeLimitError> for io::Error {
    fn from(err: SizeLimitError) -> Self {
        io::Error::new(io::ErrorKind::Other, err)
    }
}

/// Returns true if the I/O error was caused by an exceeded byte ceiling.
pub fn is_size_limit(err: &io::Error) -> bool {
    SizeLimitError::from_io(err).is_some()
}

/// The requested character encoding label is not known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedEncodingError {
    label: String,
}

impl UnsupportedEncodingError {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_owned(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for UnsupportedEncodingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unsupported encoding '{}'", self.label)
    }
}

impl error::Error for UnsupportedEncodingError {}

pub struct Error {
    message: String,
    source: Option<Box<dyn error::Error>>,
}

impl Error {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// True if this error, or the I/O error behind it, is a size limit failure.
    pub fn is_size_limit(&self) -> bool {
        match &self.source {
            Some(err) => {
                err.is::<SizeLimitError>()
                    || err
                        .downcast_ref::<io::Error>()
                        .map_or(false, |e| is_size_limit(e))
            }
            None => false,
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Unexpected error: {}", self)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(err) => write!(f, "{}: {}", self.message, err),
            None => write!(f, "{}", self.message),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.source {
            Some(ref err) => Some(&**err),
            None => None,
        }
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Self {
            message,
            source: None,
        }
    }
}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }
}

impl<E: error::Error + 'static> From<(String, E)> for Error {
    fn from((message, err): (String, E)) -> Self {
        Self {
            message,
            source: Some(Box::new(err)),
        }
    }
}

impl<E: error::Error + 'static> From<(&str, E)> for Error {
    fn from((message, err): (&str, E)) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        let message = if is_size_limit(&err) {
            "line exceeds the byte ceiling"
        } else {
            "I/O failure"
        };
        (message, err).into()
    }
}

impl From<UnsupportedEncodingError> for Error {
    fn from(err: UnsupportedEncodingError) -> Self {
        ("reader construction failed", err).into()
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        format!("{}", err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
