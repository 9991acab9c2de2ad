use thiserror::Error;

/// Main error type for the court tally crate.
/// Aggregates errors from various sources including standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum CourtTallyError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("{0}")]
    PatternError(#[from] glob::PatternError),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    #[error("{0}")]
    CsvError(#[from] csv::Error),

    #[error("{0}")]
    ImageError(#[from] image::ImageError),

    #[error("{0}")]
    YamlError(#[from] serde_yaml::Error),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    // Ledger module errors
    #[error("{0}")]
    LedgerError(#[from] crate::ledger::LedgerError),

    // Config module errors
    #[error("{0}")]
    ConfigError(#[from] crate::config::ConfigError),
}

pub trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, CourtTallyError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| CourtTallyError::WithContextError(format!("{}: {}", message, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_prefix_wraps_message() {
        let result: Result<(), CourtTallyError> = Err(std::io::Error::other("disk gone").into());
        let error = result.with_prefix("Load sheet").unwrap_err();
        assert_eq!(error.to_string(), "Load sheet: disk gone");
    }

    #[test]
    fn with_prefix_keeps_ok() {
        let result: Result<u8, CourtTallyError> = Ok(7);
        assert_eq!(result.with_prefix("ignored").unwrap(), 7);
    }
}
