use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NseError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Zip archive error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Invalid index: {0}")]
    InvalidIndex(String),

    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("Date format error: {0}")]
    DateFormatError(String),

    #[error("Bhavcopy not available for {0}")]
    BhavcopyNotAvailable(NaiveDate),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, NseError>;

// Allow plain strings as ad-hoc errors
impl From<String> for NseError {
    fn from(s: String) -> Self {
        NseError::Unknown(s)
    }
}

impl From<&str> for NseError {
    fn from(s: &str) -> Self {
        NseError::Unknown(s.to_string())
    }
}
