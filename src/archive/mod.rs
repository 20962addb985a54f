//! Archive sources.
//!
//! A [`RecordSource`] exposes a finite, forward sequence of [`Record`]s plus
//! on-demand access to each record's raw payload. The pipeline only ever
//! talks to this trait, so the filter and the batch writer stay independent
//! of the container format.
//!
//! | Source | Backing |
//! |--------|---------|
//! | [`MemoryArchive`] | Records held in memory (tests, library use) |
//! | [`ZimArchive`] | A Kiwix `.zim` file on disk |
//!
//! # Example
//!
//! ```rust
//! use zimpack::archive::{MemoryArchive, RecordSource};
//!
//! # fn main() -> zimpack::Result<()> {
//! let mut archive = MemoryArchive::new()
//!     .with_article("Budapest", b"<html>Budapest</html>".to_vec())
//!     .with_redirect("Pest");
//!
//! assert_eq!(archive.len(), 2);
//! let record = archive.record(0)?;
//! assert_eq!(archive.payload(record.index)?, b"<html>Budapest</html>");
//! # Ok(())
//! # }
//! ```

mod memory;
pub mod zim;

pub use memory::MemoryArchive;
pub use zim::{ZimArchive, ZimBuilder};

use crate::core::models::Record;
use crate::error::Result;

/// A finite, index-addressable sequence of archive records.
///
/// Records are read in index order `0..len()`. Payloads are only fetched for
/// records the caller asks for, which keeps dropped records cheap.
pub trait RecordSource {
    /// Returns the human-readable name of this source.
    fn name(&self) -> &'static str;

    /// Returns the number of records in the source.
    fn len(&self) -> usize;

    /// Returns `true` if the source holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the metadata of the record at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ZimpackError::EntryOutOfRange`](crate::ZimpackError::EntryOutOfRange)
    /// for an index past the end, or an archive/I/O error if the record can't
    /// be decoded.
    fn record(&mut self, index: usize) -> Result<Record>;

    /// Reads the raw payload of the record at `index`.
    fn payload(&mut self, index: usize) -> Result<Vec<u8>>;
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn record(&mut self, index: usize) -> Result<Record> {
        (**self).record(index)
    }

    fn payload(&mut self, index: usize) -> Result<Vec<u8>> {
        (**self).payload(index)
    }
}
