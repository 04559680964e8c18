use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WebAppError {
    #[error("payload is not valid base64url: {0}")]
    Decode(String),
    #[error("payload could not be parsed: {0}")]
    Parse(String),
    #[error("host capability `{0}` is not available")]
    HostUnavailable(&'static str),
    #[error("{0}")]
    Host(String),
    #[error("{0}")]
    Validation(String),
}

pub type WebAppResult<T> = Result<T, WebAppError>;
