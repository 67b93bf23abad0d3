pub mod json;
pub mod md;

use crate::error::CalcError;
use crate::types::record::UserRecord;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

pub fn render(user: &UserRecord, format: OutputFormat) -> Result<String, CalcError> {
    match format {
        OutputFormat::Json => json::to_json(user).map_err(CalcError::Json),
        OutputFormat::Md => Ok(md::to_markdown(user)),
    }
}
