use super::{parse_response, ExtractionService};
use crate::error::{CalcError, Result};
use crate::types::extraction::RawExtraction;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::blocking::Client;
use serde_json::json;
use std::time::Duration;
use tracing::info;

/// Posts the marksheet to a vision endpoint that answers with the raw extraction JSON.
pub struct HttpExtractor {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpExtractor {
    pub fn new(endpoint: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CalcError::ExtractionFailed(format!("http client setup: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key,
        })
    }
}

impl ExtractionService for HttpExtractor {
    fn extract(&self, image: &[u8], instruction: &str) -> Result<RawExtraction> {
        let body = json!({
            "mimeType": sniff_mime(image),
            "data": STANDARD.encode(image),
            "instruction": instruction,
        });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        info!(endpoint = %self.endpoint, bytes = image.len(), "requesting marksheet extraction");
        let response = request
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| CalcError::ExtractionFailed(e.to_string()))?;
        let text = response
            .text()
            .map_err(|e| CalcError::ExtractionFailed(e.to_string()))?;
        parse_response(&text)
    }
}

pub fn sniff_mime(image: &[u8]) -> &'static str {
    if image.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if image.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if image.len() >= 12 && &image[0..4] == b"RIFF" && &image[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniff_mime_recognizes_common_formats() {
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(sniff_mime(b"\x89PNG\r\n\x1a\n"), "image/png");
        assert_eq!(sniff_mime(b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
        assert_eq!(sniff_mime(b"%PDF-1.7"), "application/octet-stream");
    }

    #[test]
    fn unreachable_endpoint_is_a_generic_failure() {
        let extractor = HttpExtractor::new(
            "http://127.0.0.1:9/extract",
            None,
            Duration::from_millis(500),
        )
        .expect("client should build");
        let err = extractor
            .extract(&[0xFF, 0xD8, 0xFF], "extract")
            .expect_err("closed port should fail");
        assert!(matches!(err, CalcError::ExtractionFailed(_)));
    }
}
