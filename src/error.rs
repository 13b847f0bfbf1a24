use thiserror::Error;

/// Errors surfaced by forecast assembly, lookups and the flux model.
///
/// Cell-level parse problems never appear here: an unparseable forecast value
/// is recorded as a missing value instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{source_name} lookup failed: {reason}")]
    LookupFailure { source_name: String, reason: String },

    #[error("Unknown timezone label: {0}")]
    UnknownTimezoneLabel(String),

    #[error("Misaligned series: expected {expected}, found {found}")]
    MisalignedSeries { expected: String, found: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn lookup(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::LookupFailure {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub fn misaligned(expected: impl ToString, found: impl ToString) -> Self {
        Error::MisalignedSeries {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Short identifier for the error class, stable across messages
    pub fn kind(&self) -> &'static str {
        match self {
            Error::LookupFailure { .. } => "LookupFailure",
            Error::UnknownTimezoneLabel(_) => "UnknownTimezoneLabel",
            Error::MisalignedSeries { .. } => "MisalignedSeries",
            Error::InvalidConfig(_) => "InvalidConfig",
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        let source_name = error
            .url()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "http".to_string());
        Error::lookup(source_name, error.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::lookup("json", error.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Error::InvalidConfig(errors.to_string())
    }
}
