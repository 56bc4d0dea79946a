use std::fmt;

#[derive(Debug)]
pub enum ClientError {
    /// Non-2xx response. `error` is the server's `{"error": ...}` field, if any.
    Server { status: u16, error: Option<String> },
    Http(reqwest::Error),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl ClientError {
    /// Server-provided error text, or `fallback` when the body had none.
    pub fn server_message(&self, fallback: &str) -> Option<String> {
        match self {
            Self::Server { error, .. } => Some(
                error
                    .as_deref()
                    .filter(|e| !e.is_empty())
                    .unwrap_or(fallback)
                    .to_string(),
            ),
            _ => None,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server { status, error: Some(msg) } => write!(f, "HTTP {status}: {msg}"),
            Self::Server { status, error: None } => write!(f, "HTTP {status}"),
            Self::Http(e) => write!(f, "HTTP error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
