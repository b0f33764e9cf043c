use thiserror::Error;

/// Classification of a failed remote call.
///
/// Every call site maps its failure into exactly one of these kinds; the
/// pipeline driver decides fatal-vs-continue from the stage, and the operator
/// output prints a kind-specific line with the raw body where one was
/// captured.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("could not decode response ({detail}): {body}")]
    Decode { detail: String, body: String },
}

impl CallError {
    pub fn decode(detail: impl Into<String>, body: impl Into<String>) -> Self {
        CallError::Decode {
            detail: detail.into(),
            body: body.into(),
        }
    }

    /// Short tag for log lines and the final operator summary.
    pub fn kind(&self) -> &'static str {
        match self {
            CallError::Connection(_) => "connection",
            CallError::Timeout(_) => "timeout",
            CallError::HttpStatus { .. } => "http-status",
            CallError::Decode { .. } => "decode",
        }
    }
}

pub type CallResult<T> = Result<T, CallError>;
