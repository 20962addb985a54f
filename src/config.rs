//! Configuration of an extraction run.
//!
//! [`ExtractConfig`] is a plain, serializable struct with builder methods,
//! usable from library code without any CLI framework. The `zimpack` binary
//! builds one from its arguments.
//!
//! # Example
//!
//! ```rust
//! use zimpack::config::ExtractConfig;
//!
//! let config = ExtractConfig::new("wiki_hu.zim", "out")
//!     .with_language("en")
//!     .with_documents_per_file(1000)
//!     .with_filename_digit_width(6);
//!
//! assert!(config.validate().is_ok());
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::batch::{DEFAULT_COMPRESSION_LEVEL, DEFAULT_DOCUMENTS_PER_FILE, DEFAULT_NAME_WIDTH};
use crate::core::filter::{DEFAULT_PROGRESS_INTERVAL, FilterConfig};
use crate::core::language::DisambiguationTable;
use crate::core::models::ARTICLE_NAMESPACE;
use crate::error::{Result, ZimpackError};

/// Language used when none is given.
pub const DEFAULT_LANGUAGE: &str = "hu";

/// Settings for one extraction run.
///
/// Missing fields take their default values when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Path of the ZIM archive to read.
    pub input_path: PathBuf,

    /// Directory receiving the batch files (created if missing).
    pub output_dir: PathBuf,

    /// Two-letter code selecting the disambiguation marker (default: `hu`).
    pub language: String,

    /// Records per batch file (default: 2500).
    pub documents_per_file: usize,

    /// Minimum number of digits in batch file names (default: 4).
    pub filename_digit_width: usize,

    /// Gzip level, 0-9 (default: 6)
    pub compression_level: u32,

    /// Namespace of the records to keep (default: `A`)
    pub article_namespace: char,

    /// Admissions between two progress reports, 0 disables them (default: 1000)
    pub progress_interval: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::new(),
            output_dir: PathBuf::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            documents_per_file: DEFAULT_DOCUMENTS_PER_FILE,
            filename_digit_width: DEFAULT_NAME_WIDTH,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            article_namespace: ARTICLE_NAMESPACE,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl ExtractConfig {
    /// Creates a configuration with default values for everything but the
    /// input and output locations.
    pub fn new(input_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the number of records per batch file.
    #[must_use]
    pub fn with_documents_per_file(mut self, documents: usize) -> Self {
        self.documents_per_file = documents;
        self
    }

    /// Sets the zero-padding width of batch file names.
    #[must_use]
    pub fn with_filename_digit_width(mut self, width: usize) -> Self {
        self.filename_digit_width = width;
        self
    }

    #[must_use]
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }

    #[must_use]
    pub fn with_article_namespace(mut self, namespace: char) -> Self {
        self.article_namespace = namespace;
        self
    }

    /// Sets the progress interval. Zero disables progress reports.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Checks every value that can be checked without touching the
    /// filesystem.
    ///
    /// The language is checked separately by [`filter_config`](Self::filter_config),
    /// since it depends on the disambiguation table in use.
    pub fn validate(&self) -> Result<()> {
        if self.input_path.as_os_str().is_empty() {
            return Err(ZimpackError::invalid_config(
                "input_path",
                "an input file is required",
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ZimpackError::invalid_config(
                "output_dir",
                "an output directory is required",
            ));
        }
        if self.documents_per_file == 0 {
            return Err(ZimpackError::invalid_config(
                "documents_per_file",
                "must be at least 1",
            ));
        }
        if self.filename_digit_width == 0 {
            return Err(ZimpackError::invalid_config(
                "filename_digit_width",
                "must be at least 1",
            ));
        }
        if self.compression_level > 9 {
            return Err(ZimpackError::invalid_config(
                "compression_level",
                format!("{} is not between 0 and 9", self.compression_level),
            ));
        }
        if !self.article_namespace.is_ascii() {
            return Err(ZimpackError::invalid_config(
                "article_namespace",
                format!("'{}' is not a single-byte namespace", self.article_namespace),
            ));
        }
        Ok(())
    }

    /// Resolves the filter rules for this run from `table`.
    ///
    /// # Errors
    ///
    /// Returns [`ZimpackError::UnsupportedLanguage`] if `table` has no marker
    /// for [`language`](Self::language).
    pub fn filter_config(&self, table: &DisambiguationTable) -> Result<FilterConfig> {
        let marker = table.marker(&self.language)?;
        Ok(FilterConfig::new(marker).with_article_namespace(self.article_namespace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractConfig::default();
        assert_eq!(config.language, "hu");
        assert_eq!(config.documents_per_file, 2500);
        assert_eq!(config.filename_digit_width, 4);
        assert_eq!(config.compression_level, 6);
        assert_eq!(config.article_namespace, 'A');
        assert_eq!(config.progress_interval, 1000);
    }

    #[test]
    fn test_builder() {
        let config = ExtractConfig::new("in.zim", "out")
            .with_language("en")
            .with_documents_per_file(10)
            .with_filename_digit_width(2)
            .with_compression_level(9)
            .with_article_namespace('C')
            .with_progress_interval(0);

        assert_eq!(config.input_path, PathBuf::from("in.zim"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.language, "en");
        assert_eq!(config.documents_per_file, 10);
        assert_eq!(config.filename_digit_width, 2);
        assert_eq!(config.compression_level, 9);
        assert_eq!(config.article_namespace, 'C');
        assert_eq!(config.progress_interval, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = ExtractConfig::new("in.zim", "out");

        let cases = [
            (ExtractConfig::default().with_documents_per_file(1), "input_path"),
            (ExtractConfig::new("in.zim", ""), "output_dir"),
            (base.clone().with_documents_per_file(0), "documents_per_file"),
            (base.clone().with_filename_digit_width(0), "filename_digit_width"),
            (base.clone().with_compression_level(10), "compression_level"),
            (base.clone().with_article_namespace('Ő'), "article_namespace"),
        ];
        for (config, expected) in cases {
            match config.validate() {
                Err(ZimpackError::InvalidConfig { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected InvalidConfig for {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_filter_config_resolves_marker() {
        let table = DisambiguationTable::default();
        let filter = ExtractConfig::new("in.zim", "out")
            .with_language("en")
            .filter_config(&table)
            .unwrap();
        assert_eq!(filter.disambiguation_marker, "(disambiguation)");
        assert_eq!(filter.article_namespace, 'A');

        let hu = ExtractConfig::new("in.zim", "out").filter_config(&table).unwrap();
        assert_eq!(hu.disambiguation_marker, "(egyértelműsítő lap)");
    }

    #[test]
    fn test_unknown_language_is_config_error() {
        let err = ExtractConfig::new("in.zim", "out")
            .with_language("de")
            .filter_config(&DisambiguationTable::default())
            .unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("en, hu"));
    }

    #[test]
    fn test_serde_fills_defaults() {
        let config: ExtractConfig =
            serde_json::from_str(r#"{"input_path": "a.zim", "output_dir": "out", "language": "en"}"#)
                .unwrap();
        assert_eq!(config.language, "en");
        assert_eq!(config.documents_per_file, 2500);

        let json = serde_json::to_string(&config).unwrap();
        let back: ExtractConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
