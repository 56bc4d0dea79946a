use serde::{Deserialize, Serialize};

/// Body of `POST /send_message`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendMessageRequest {
    pub message: String,
    pub context: String,
    pub context_name: String,
}

/// Success body of `POST /send_message`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendMessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Failure body shared by every endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// One entry of the `/upload` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileResult {
    /// Name stored on the server, possibly made unique.
    #[serde(default)]
    pub filename: String,
    /// Name the file had on the client.
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub mimetype: String,
    #[serde(default)]
    pub file_url: String,
    #[serde(default)]
    pub file_content: String,
    /// Set instead of content when the server rejected this file.
    #[serde(default)]
    pub error: Option<String>,
}

/// Success body of `POST /upload`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub files: Vec<FileResult>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub has_api_key: bool,
    #[serde(default)]
    pub tesseract_found: bool,
}

impl HealthReport {
    /// One-line summary for the chat log.
    pub fn summary(&self) -> String {
        format!(
            "server: {} │ model: {} │ api key: {} │ ocr: {}",
            if self.status.is_empty() { "?" } else { &self.status },
            self.model.as_deref().unwrap_or("?"),
            if self.has_api_key { "yes" } else { "no" },
            if self.tesseract_found { "yes" } else { "no" },
        )
    }
}
