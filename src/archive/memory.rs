//! In-memory record source.

use crate::core::models::{ARTICLE_NAMESPACE, Record};
use crate::error::{Result, ZimpackError};

use super::RecordSource;

/// A [`RecordSource`] backed by vectors of records and payloads.
///
/// Records are indexed in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    records: Vec<Record>,
    payloads: Vec<Vec<u8>>,
}

impl MemoryArchive {
    /// Creates an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record with its payload. The record's index is reassigned
    /// to its position in the archive.
    #[must_use]
    pub fn with_record(mut self, mut record: Record, payload: Vec<u8>) -> Self {
        record.index = self.records.len();
        self.records.push(record);
        self.payloads.push(payload);
        self
    }

    /// Appends a regular article.
    #[must_use]
    pub fn with_article(self, title: impl Into<String>, payload: Vec<u8>) -> Self {
        self.with_record(Record::new(0, title), payload)
    }

    /// Appends a redirect article without payload.
    #[must_use]
    pub fn with_redirect(self, title: impl Into<String>) -> Self {
        self.with_record(Record::new(0, title).redirect(), Vec::new())
    }

    /// Appends a deleted article without payload.
    #[must_use]
    pub fn with_deleted(self, title: impl Into<String>) -> Self {
        self.with_record(Record::new(0, title).deleted(), Vec::new())
    }

    /// Appends a record outside the article namespace.
    #[must_use]
    pub fn with_namespaced(
        self,
        namespace: char,
        title: impl Into<String>,
        payload: Vec<u8>,
    ) -> Self {
        debug_assert_ne!(namespace, ARTICLE_NAMESPACE);
        self.with_record(Record::new(0, title).namespace(namespace), payload)
    }
}

impl RecordSource for MemoryArchive {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn record(&mut self, index: usize) -> Result<Record> {
        self.records
            .get(index)
            .cloned()
            .ok_or_else(|| ZimpackError::out_of_range(index, self.records.len()))
    }

    fn payload(&mut self, index: usize) -> Result<Vec<u8>> {
        self.payloads
            .get(index)
            .cloned()
            .ok_or_else(|| ZimpackError::out_of_range(index, self.payloads.len()))
    }
}
