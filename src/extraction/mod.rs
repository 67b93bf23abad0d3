pub mod http;
pub mod recorded;

use crate::error::{CalcError, Result};
use crate::types::extraction::RawExtraction;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

pub use http::HttpExtractor;
pub use recorded::RecordedExtractor;

pub const EXTRACTION_INSTRUCTION: &str = "Extract results from this university marksheet. \
Output JSON: {detectedDepartment, detectedSemester, results: [{code, grade}]}.";

/// Image-to-grades service. Implementations make a single attempt; callers own retries.
pub trait ExtractionService: Send + Sync {
    fn extract(&self, image: &[u8], instruction: &str) -> Result<RawExtraction>;
}

/// Runs one extraction and gives up after `timeout`.
///
/// An expired request is abandoned on its worker thread; its outcome is discarded.
pub fn extract_with_timeout(
    service: Arc<dyn ExtractionService>,
    image: Vec<u8>,
    timeout: Duration,
) -> Result<RawExtraction> {
    let (sender, receiver) = mpsc::channel();
    let worker = Arc::clone(&service);
    thread::spawn(move || {
        let outcome = worker.extract(&image, EXTRACTION_INSTRUCTION);
        // the receiver is gone once the caller timed out
        let _ = sender.send(outcome);
    });

    debug!(timeout_secs = timeout.as_secs(), "extraction request sent");
    match receiver.recv_timeout(timeout) {
        Ok(outcome) => outcome,
        Err(RecvTimeoutError::Timeout) => {
            warn!(timeout_secs = timeout.as_secs(), "extraction abandoned after timeout");
            Err(CalcError::ExtractionTimeout(timeout.as_secs()))
        }
        Err(RecvTimeoutError::Disconnected) => Err(CalcError::ExtractionFailed(
            "extraction worker stopped without a result".to_string(),
        )),
    }
}

/// Parses a service response body into the raw wire shape.
pub fn parse_response(body: &str) -> Result<RawExtraction> {
    let trimmed = strip_code_fence(body.trim());
    if trimmed.is_empty() {
        return Err(CalcError::ExtractionFailed(
            "service returned an empty response".to_string(),
        ));
    }
    serde_json::from_str(trimmed)
        .map_err(|e| CalcError::ExtractionFailed(format!("malformed response: {e}")))
}

fn strip_code_fence(body: &str) -> &str {
    let Some(rest) = body.strip_prefix("```") else {
        return body;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
