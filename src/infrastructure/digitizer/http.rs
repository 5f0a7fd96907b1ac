//! HTTP digitization service adapter

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use crate::application::ports::{Digitizer, ProcessingFailure, GENERIC_FAILURE_MESSAGE};
use crate::domain::signature::{ImageData, InkColor};

/// Endpoint path relative to the service base URL
const DIGITIZE_PATH: &str = "/api/digitize";

// Response types for the service

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Digitizer talking to the signature service over HTTP
pub struct HttpDigitizer {
    endpoint: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpDigitizer {
    /// Create a digitizer for the service at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            endpoint: Self::endpoint_for(base_url),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn endpoint_for(base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), DIGITIZE_PATH)
    }

    /// Build the multipart body: `file` (image bytes) and `color`
    fn build_form(image: &ImageData, color: InkColor) -> Result<Form, ProcessingFailure> {
        let file = Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.mime_type())
            .map_err(|e| ProcessingFailure::transport(e.to_string()))?;

        Ok(Form::new()
            .part("file", file)
            .text("color", color.as_str()))
    }

    /// Message from a failure body, or the generic fallback
    fn error_message(body: &[u8]) -> String {
        serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.error)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
    }

    fn transport_failure(&self, e: reqwest::Error) -> ProcessingFailure {
        if e.is_timeout() {
            ProcessingFailure::transport(format!("Request timed out after {:?}", self.timeout))
        } else {
            ProcessingFailure::transport(e.to_string())
        }
    }
}

#[async_trait]
impl Digitizer for HttpDigitizer {
    async fn digitize(
        &self,
        image: &ImageData,
        color: InkColor,
    ) -> Result<Vec<u8>, ProcessingFailure> {
        let form = Self::build_form(image, color)?;
        debug!(
            endpoint = %self.endpoint,
            file = image.file_name(),
            %color,
            "sending digitize request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_failure(e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_failure(e))?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "service rejected image");
            return Err(ProcessingFailure::service(
                status.as_u16(),
                Self::error_message(&body),
            ));
        }

        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn image() -> ImageData {
        ImageData::png(b"fake-image-bytes".to_vec(), "signature.png")
    }

    fn digitizer(server: &MockServer) -> HttpDigitizer {
        HttpDigitizer::new(&server.uri(), Duration::from_secs(5))
    }

    #[test]
    fn endpoint_joins_base_url() {
        assert_eq!(
            HttpDigitizer::endpoint_for("http://127.0.0.1:5000"),
            "http://127.0.0.1:5000/api/digitize"
        );
        assert_eq!(
            HttpDigitizer::endpoint_for("https://sig.example.com/"),
            "https://sig.example.com/api/digitize"
        );
    }

    #[test]
    fn error_message_from_json_body() {
        assert_eq!(
            HttpDigitizer::error_message(br#"{"error":"unsupported format"}"#),
            "unsupported format"
        );
    }

    #[test]
    fn error_message_falls_back_to_generic() {
        assert_eq!(
            HttpDigitizer::error_message(b"<html>Internal Server Error</html>"),
            "Failed to process image"
        );
        assert_eq!(HttpDigitizer::error_message(b"{}"), "Failed to process image");
        assert_eq!(
            HttpDigitizer::error_message(br#"{"error":""}"#),
            "Failed to process image"
        );
    }

    #[tokio::test]
    async fn success_returns_body_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/digitize"))
            .and(body_string_contains("name=\"color\""))
            .and(body_string_contains("blue"))
            .and(body_string_contains("filename=\"signature.png\""))
            .and(body_string_contains("fake-image-bytes"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG_MAGIC.to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let bytes = digitizer(&server)
            .digitize(&image(), InkColor::Blue)
            .await
            .unwrap();
        assert_eq!(bytes, PNG_MAGIC.to_vec());
    }

    #[tokio::test]
    async fn rejection_carries_service_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/digitize"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(serde_json::json!({ "error": "unsupported format" })),
            )
            .mount(&server)
            .await;

        let failure = digitizer(&server)
            .digitize(&image(), InkColor::Black)
            .await
            .unwrap_err();
        assert_eq!(failure.status, Some(422));
        assert_eq!(failure.message, "unsupported format");
    }

    #[tokio::test]
    async fn server_error_without_json_uses_generic_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/digitize"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let failure = digitizer(&server)
            .digitize(&image(), InkColor::Black)
            .await
            .unwrap_err();
        assert_eq!(failure.status, Some(500));
        assert_eq!(failure.to_string(), "Failed to process image");
    }

    #[tokio::test]
    async fn unreachable_service_is_transport_failure() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let failure = HttpDigitizer::new(&uri, Duration::from_secs(5))
            .digitize(&image(), InkColor::Black)
            .await
            .unwrap_err();
        assert_eq!(failure.status, None);
        assert!(!failure.message.is_empty());
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(PNG_MAGIC.to_vec())
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let failure = HttpDigitizer::new(&server.uri(), Duration::from_millis(100))
            .digitize(&image(), InkColor::Black)
            .await
            .unwrap_err();
        assert_eq!(failure.status, None);
        assert!(failure.message.contains("timed out"));
    }
}
