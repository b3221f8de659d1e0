/// Failures of the page fetch loop. Any of these ends pagination for the run.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Non-2xx response. `body` is best-effort and may be empty.
    #[error("HTTP {status} {status_text}: {body}")]
    Status { status: u16, status_text: String, body: String },

    /// Connection, TLS, or body-read failure before a status could be acted on.
    #[error("transport error: {0}")]
    Transport(String),

    /// 2xx response whose body is not valid JSON.
    #[error("malformed page body: {0}")]
    Decode(String),

    /// Opt-in page cap reached while the server still returned a cursor.
    #[error("page limit of {0} reached before the server stopped returning a cursor")]
    PageLimit(usize),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}
