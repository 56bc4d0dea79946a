use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::ClientError;
use crate::protocol::{
    ErrorBody, HealthReport, SendMessageRequest, SendMessageResponse, UploadResponse,
};

/// HTTP client for the chatbox server.
#[derive(Debug, Clone)]
pub struct ChatboxClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChatboxClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `POST /send_message` with a JSON body.
    pub async fn send_message(
        &self,
        req: &SendMessageRequest,
    ) -> Result<SendMessageResponse, ClientError> {
        info!(
            chars = req.message.chars().count(),
            context_chars = req.context.chars().count(),
            "sending message"
        );
        let resp = self
            .http
            .post(self.endpoint("/send_message"))
            .json(req)
            .send()
            .await?;
        read_json(resp).await
    }

    /// `POST /upload` as one multipart request with a `files` part per path.
    pub async fn upload(&self, files: &[PathBuf]) -> Result<UploadResponse, ClientError> {
        let mut form = Form::new();
        for path in files {
            form = form.part("files", file_part(path).await?);
        }

        info!(count = files.len(), "uploading files");
        let resp = self
            .http
            .post(self.endpoint("/upload"))
            .multipart(form)
            .send()
            .await?;
        read_json(resp).await
    }

    /// `GET /health`. Unlike the chat endpoints, a malformed body is an error here.
    pub async fn health(&self) -> Result<HealthReport, ClientError> {
        let resp = self.http.get(self.endpoint("/health")).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            return Err(server_error(status.as_u16(), &bytes));
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

async fn file_part(path: &Path) -> Result<Part, ClientError> {
    let data = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".into());
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    debug!(file = %name, mime = %mime, bytes = data.len(), "adding upload part");
    Ok(Part::bytes(data).file_name(name).mime_str(mime.essence_str())?)
}

/// Resolve a `file_url` from an upload result against the server base.
pub fn resolve_file_url(base_url: &str, file_url: &str) -> String {
    if file_url.starts_with("http://") || file_url.starts_with("https://") {
        return file_url.to_string();
    }
    if file_url.is_empty() {
        return String::new();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        file_url.trim_start_matches('/')
    )
}

fn server_error(status: u16, body: &[u8]) -> ClientError {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
    ClientError::Server {
        status,
        error: parsed.error,
    }
}

/// Decode a chat endpoint response. Non-2xx becomes `ClientError::Server`;
/// a 2xx body that is not valid JSON decodes as the empty default.
async fn read_json<T: DeserializeOwned + Default>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    if !status.is_success() {
        return Err(server_error(status.as_u16(), &bytes));
    }
    Ok(serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        debug!(error = %e, "response body is not valid JSON, treating as empty");
        T::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(uri: &str) -> ChatboxClient {
        ChatboxClient::new(uri, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_send_message_posts_payload() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/send_message"))
            .and(body_json(serde_json::json!({
                "message": "hi",
                "context": "",
                "context_name": ""
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"message": "hello there"}"#),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let req = SendMessageRequest {
            message: "hi".into(),
            context: String::new(),
            context_name: String::new(),
        };
        let resp = client(&mock_server.uri()).send_message(&req).await.unwrap();
        assert_eq!(resp.message.as_deref(), Some("hello there"));
    }

    #[tokio::test]
    async fn test_send_message_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/send_message"))
            .respond_with(ResponseTemplate::new(500).set_body_string(r#"{"error": "boom"}"#))
            .mount(&mock_server)
            .await;

        let req = SendMessageRequest {
            message: "hi".into(),
            context: String::new(),
            context_name: String::new(),
        };
        let err = client(&mock_server.uri())
            .send_message(&req)
            .await
            .unwrap_err();
        match err {
            ClientError::Server { status, error } => {
                assert_eq!(status, 500);
                assert_eq!(error.as_deref(), Some("boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_error_status_without_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/send_message"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&mock_server)
            .await;

        let req = SendMessageRequest {
            message: "hi".into(),
            context: String::new(),
            context_name: String::new(),
        };
        let err = client(&mock_server.uri())
            .send_message(&req)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Server { status: 502, error: None }));
    }

    #[tokio::test]
    async fn test_success_with_garbage_body_is_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/send_message"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let req = SendMessageRequest {
            message: "hi".into(),
            context: String::new(),
            context_name: String::new(),
        };
        let resp = client(&mock_server.uri()).send_message(&req).await.unwrap();
        assert!(resp.message.is_none());
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_files() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/upload"))
            .and(body_string_contains("name=\"files\"; filename=\"notes.txt\""))
            .and(body_string_contains("hello from disk"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"message": "ok", "files": [{"filename": "notes.txt", "mimetype": "text/plain", "file_url": "/uploads/notes.txt", "file_content": "hello from disk"}]}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "hello from disk").unwrap();

        let resp = client(&mock_server.uri()).upload(&[file]).await.unwrap();
        assert_eq!(resp.files.len(), 1);
        assert_eq!(resp.files[0].file_url, "/uploads/notes.txt");
        assert_eq!(resp.files[0].file_content, "hello from disk");
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_io_error() {
        let mock_server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.pdf");

        let err = client(&mock_server.uri())
            .upload(&[missing])
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
    }

    #[tokio::test]
    async fn test_health_report() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"status": "ok", "model": "m", "has_api_key": false, "tesseract_found": true}"#,
            ))
            .mount(&mock_server)
            .await;

        let report = client(&mock_server.uri()).health().await.unwrap();
        assert_eq!(report.status, "ok");
        assert!(report.tesseract_found);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let c = client("http://127.0.0.1:5000/");
        assert_eq!(c.base_url(), "http://127.0.0.1:5000");
        assert_eq!(c.endpoint("/upload"), "http://127.0.0.1:5000/upload");
    }

    #[test]
    fn test_resolve_file_url() {
        assert_eq!(
            resolve_file_url("http://127.0.0.1:5000/", "/uploads/a.pdf"),
            "http://127.0.0.1:5000/uploads/a.pdf"
        );
        assert_eq!(
            resolve_file_url("http://127.0.0.1:5000", "https://cdn.example.com/a.pdf"),
            "https://cdn.example.com/a.pdf"
        );
        assert_eq!(resolve_file_url("http://127.0.0.1:5000", ""), "");
    }
}
