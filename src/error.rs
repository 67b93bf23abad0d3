use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Recognition,
    Timeout,
    Runtime,
}

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("not ready to calculate: {0}")]
    Incomplete(String),

    #[error("unknown subject code: {0}")]
    UnknownSubject(String),

    #[error("periods covered must be between 2 and 10 (got {0})")]
    InvalidPeriodCount(u32),

    #[error("curriculum unavailable for this selection: {0}")]
    CurriculumUnavailable(String),

    #[error("no such period: {0}")]
    NoSuchPeriod(String),

    #[error("nothing recognized on the marksheet; retake the photo with the grade column in focus")]
    NothingRecognized,

    #[error("extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("extraction timed out after {0}s; the result is unknown and nothing was saved")]
    ExtractionTimeout(u64),

    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    #[error("profile store error: {0}")]
    ProfileStore(String),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CalcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Incomplete(_) | Self::UnknownSubject(_) | Self::InvalidPeriodCount(_) => {
                ErrorKind::Validation
            }
            Self::NothingRecognized => ErrorKind::Recognition,
            Self::ExtractionTimeout(_) => ErrorKind::Timeout,
            _ => ErrorKind::Runtime,
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
