use std::error;
use std::fmt;

/// Error type for all client operations.
/// Each variant can store a message for logging purposes.
#[derive(Clone, Debug)]
pub enum Error {
    MissingEmailId,
    BadBatchEntry(String),
    BadInput(String),
    InvalidApiKey(String),
    NotFound(String),
    RateLimited(String),
    UrlParseError(String),
    RequestTimeout,
    RequestError(String),
    JsonParseError(String),
    Io(String),
    Internal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::MissingEmailId => f.write_str("email_id cannot be empty"),
            Error::BadBatchEntry(ref msg) => f.write_str(&format!("BadBatchEntry: {}", msg)),
            Error::BadInput(ref msg) => f.write_str(&format!("BadInput: {}", msg)),
            Error::InvalidApiKey(_) => f.write_str("InvalidApiKey"),
            Error::NotFound(ref msg) => f.write_str(&format!("NotFound: {}", msg)),
            Error::RateLimited(_) => f.write_str("RateLimited"),
            Error::UrlParseError(_) => f.write_str("UrlParseError"),
            Error::RequestTimeout => f.write_str("RequestTimeout"),
            Error::RequestError(ref msg) => f.write_str(&format!("RequestError: {}", msg)),
            Error::JsonParseError(ref msg) => f.write_str(&format!("JsonParseError: {}", msg)),
            Error::Io(ref msg) => f.write_str(&format!("Io: {}", msg)),
            Error::Internal(_) => f.write_str("Internal Error"),
        }
    }
}

impl error::Error for Error {}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::UrlParseError(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::RequestTimeout
        } else {
            Self::RequestError(err.to_string())
        }
    }
}

impl From<serde_json::error::Error> for Error {
    fn from(err: serde_json::error::Error) -> Self {
        Self::JsonParseError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
