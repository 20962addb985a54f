//! Unified error types for zimpack.
//!
//! This module provides a single [`ZimpackError`] enum that covers every
//! failure of an extraction run: reading the archive, validating the
//! configuration and writing batch files.
//!
//! # Error Taxonomy
//!
//! - **Configuration errors** ([`is_config`](ZimpackError::is_config)) are
//!   detected before any I/O happens.
//! - **Archive errors** come from a malformed or unsupported ZIM file.
//! - **I/O errors** come from the filesystem and are always fatal for a run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for zimpack operations.
///
/// # Example
///
/// ```rust
/// use zimpack::error::Result;
///
/// fn count_admitted() -> Result<usize> {
///     Ok(0)
/// }
/// ```
pub type Result<T> = std::result::Result<T, ZimpackError>;

/// The error type for all zimpack operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ZimpackError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The archive doesn't exist or can't be read
    /// - The output directory can't be created
    /// - A batch file can't be opened, written or flushed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A batch file couldn't be created, written or finished.
    #[error("Failed to write batch file {}: {source}", path.display())]
    BatchFile {
        /// The batch file being written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A batch writer is used again after one of its writes failed.
    #[error("Batch writer can't continue after an earlier write failure")]
    WriterFailed,

    /// The archive doesn't have the expected structure.
    #[error("Invalid archive: {message}")]
    InvalidArchive {
        /// Description of what's wrong
        message: String,
    },

    /// A cluster uses a compression scheme this build can't decode.
    #[error("Unsupported cluster compression {code}")]
    UnsupportedCompression {
        /// The raw compression code from the cluster header
        code: u8,
    },

    /// A record, cluster or blob index points outside the archive.
    #[error("Index {index} out of range (length: {len})")]
    EntryOutOfRange {
        /// The requested index
        index: usize,
        /// The number of available items
        len: usize,
    },

    /// No disambiguation marker is known for the requested language.
    #[error("Language '{code}' is not supported. Choose one of: {supported}")]
    UnsupportedLanguage {
        /// The requested language code
        code: String,
        /// Comma-separated list of supported codes
        supported: String,
    },

    /// A configuration value is missing or out of range.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig {
        /// The offending configuration field
        field: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// A payload is too large for the 32-bit frame length prefix.
    #[error("Payload too large: {size} bytes (maximum: {} bytes)", u32::MAX)]
    PayloadTooLarge {
        /// Actual payload size in bytes
        size: usize,
    },

    /// A batch file ended in the middle of a frame.
    #[error("Truncated frame: expected {expected} bytes, found {actual}")]
    TruncatedFrame {
        /// Bytes announced by the length prefix (or 4 for the prefix itself)
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ZimpackError {
    /// Creates an invalid archive error.
    pub fn invalid_archive(message: impl Into<String>) -> Self {
        ZimpackError::InvalidArchive {
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        ZimpackError::InvalidConfig {
            field,
            message: message.into(),
        }
    }

    /// Creates an out-of-range error.
    pub fn out_of_range(index: usize, len: usize) -> Self {
        ZimpackError::EntryOutOfRange { index, len }
    }

    /// Creates a batch file error.
    pub fn batch_file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ZimpackError::BatchFile {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this is an IO error, with or without a batch file
    /// attached.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            ZimpackError::Io(_) | ZimpackError::BatchFile { .. } | ZimpackError::WriterFailed
        )
    }

    /// Returns `true` if this error was caused by the configuration rather
    /// than by the archive or the filesystem.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ZimpackError::UnsupportedLanguage { .. } | ZimpackError::InvalidConfig { .. }
        )
    }

    /// Returns `true` if the archive itself is malformed or unsupported.
    pub fn is_archive(&self) -> bool {
        matches!(
            self,
            ZimpackError::InvalidArchive { .. }
                | ZimpackError::UnsupportedCompression { .. }
                | ZimpackError::EntryOutOfRange { .. }
        )
    }
}
