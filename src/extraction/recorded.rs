use super::{parse_response, ExtractionService};
use crate::error::{CalcError, Result};
use crate::types::extraction::RawExtraction;
use std::path::{Path, PathBuf};
use tracing::info;

/// Replays a saved service response instead of calling out.
pub struct RecordedExtractor {
    path: PathBuf,
}

impl RecordedExtractor {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl ExtractionService for RecordedExtractor {
    fn extract(&self, image: &[u8], _instruction: &str) -> Result<RawExtraction> {
        info!(response = %self.path.display(), bytes = image.len(), "replaying recorded extraction");
        let body = std::fs::read_to_string(&self.path).map_err(|e| {
            CalcError::ExtractionFailed(format!("{}: {}", self.path.display(), e))
        })?;
        parse_response(&body)
    }
}
