//! Rotating batch writer.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, ZimpackError};

use super::codec::{Codec, GzipCodec};
use super::frame::{frame_len, write_frame};
use super::naming::batch_file_name;

/// Default number of records per batch file.
pub const DEFAULT_DOCUMENTS_PER_FILE: usize = 2500;

/// One batch file produced by a [`BatchWriter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFile {
    /// 1-based index used in the file name.
    pub index: usize,
    pub path: PathBuf,
    /// Number of frames written to the file.
    pub records: usize,
}

/// What a finished [`BatchWriter`] produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Files in the order they were written.
    pub files: Vec<BatchFile>,
}

impl BatchSummary {
    /// Total number of frames over all files.
    pub fn records(&self) -> usize {
        self.files.iter().map(|f| f.records).sum()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Frame counts per file, in file order.
    pub fn records_per_file(&self) -> Vec<usize> {
        self.files.iter().map(|f| f.records).collect()
    }
}

enum WriterState<S> {
    /// No sink is open; the next write opens the next file.
    NeedsRotation,
    Open { sink: S, records: usize },
    /// A frame or file close failed; the sink has been dropped and every
    /// later call fails.
    Failed,
}

/// Frames payloads into numbered, compressed batch files.
///
/// Each file holds at most `capacity` frames. Files are only created when a
/// payload is written to them, so a writer that never sees a payload leaves
/// the output directory untouched.
///
/// Call [`finish`](Self::finish) to flush the last file and learn what was
/// written. If the writer is dropped instead (for example while an error
/// propagates), the open sink is still released and the file stays on disk,
/// readable up to the last complete write.
///
/// # Example
///
/// ```rust
/// use zimpack::core::batch::{BatchWriter, read_batch_file};
///
/// # fn main() -> zimpack::Result<()> {
/// let dir = tempfile::tempdir()?;
/// let mut writer = BatchWriter::new(dir.path(), 2, 4)?;
/// for payload in [&b"a"[..], b"b", b"c"] {
///     writer.write(payload)?;
/// }
/// let summary = writer.finish()?;
///
/// assert_eq!(summary.records_per_file(), vec![2, 1]);
/// assert_eq!(read_batch_file(&summary.files[1].path)?, vec![b"c".to_vec()]);
/// # Ok(())
/// # }
/// ```
pub struct BatchWriter<C: Codec = GzipCodec> {
    output_dir: PathBuf,
    capacity: usize,
    name_width: usize,
    codec: C,
    file_index: usize,
    state: WriterState<C::Sink>,
    files: Vec<BatchFile>,
}

impl BatchWriter<GzipCodec> {
    /// Creates a gzip batch writer with the default compression level.
    pub fn new(output_dir: impl Into<PathBuf>, capacity: usize, name_width: usize) -> Result<Self> {
        Self::with_codec(output_dir, capacity, name_width, GzipCodec::default())
    }
}

impl<C: Codec> BatchWriter<C> {
    /// Creates a batch writer using `codec` for every file.
    ///
    /// The output directory is not created here; it must exist by the time
    /// the first payload is written.
    pub fn with_codec(
        output_dir: impl Into<PathBuf>,
        capacity: usize,
        name_width: usize,
        codec: C,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(ZimpackError::invalid_config(
                "documents_per_file",
                "must be at least 1",
            ));
        }
        if name_width == 0 {
            return Err(ZimpackError::invalid_config(
                "filename_digit_width",
                "must be at least 1",
            ));
        }
        Ok(Self {
            output_dir: output_dir.into(),
            capacity,
            name_width,
            codec,
            file_index: 0,
            state: WriterState::NeedsRotation,
            files: Vec::new(),
        })
    }

    /// Appends one payload as a frame, opening a new file first if needed.
    ///
    /// Oversized payloads are rejected before anything is written.
    pub fn write(&mut self, payload: &[u8]) -> Result<()> {
        frame_len(payload)?;

        let (mut sink, records) = match std::mem::replace(&mut self.state, WriterState::Failed)
        {
            WriterState::Open { sink, records } => (sink, records),
            WriterState::NeedsRotation => match self.open_next() {
                Ok(sink) => (sink, 0),
                Err(err) => {
                    self.state = WriterState::NeedsRotation;
                    return Err(err);
                }
            },
            WriterState::Failed => return Err(ZimpackError::WriterFailed),
        };
        if let Err(err) = write_frame(&mut sink, payload) {
            drop(sink);
            return Err(self.with_current_path(err));
        }
        let records = records + 1;
        self.state = WriterState::Open { sink, records };

        if let Some(file) = self.files.last_mut() {
            file.records = records;
        }
        if records == self.capacity {
            self.close_current()?;
        }
        Ok(())
    }

    /// Flushes and closes the open file, if any.
    pub fn finish(mut self) -> Result<BatchSummary> {
        self.close_current()?;
        tracing::debug!(
            files = self.files.len(),
            codec = self.codec.name(),
            "Batch writer finished"
        );
        Ok(BatchSummary {
            files: std::mem::take(&mut self.files),
        })
    }

    /// `true` when the next write will start a new file.
    pub fn needs_rotation(&self) -> bool {
        matches!(self.state, WriterState::NeedsRotation)
    }

    /// Index of the most recently opened file (0 before the first write).
    pub fn current_file_index(&self) -> usize {
        self.file_index
    }

    /// Frames written to the open file (0 when none is open).
    pub fn records_in_current_file(&self) -> usize {
        match self.state {
            WriterState::NeedsRotation | WriterState::Failed => 0,
            WriterState::Open { records, .. } => records,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Files opened so far, including the one still open.
    pub fn files(&self) -> &[BatchFile] {
        &self.files
    }

    fn open_next(&mut self) -> Result<C::Sink> {
        let index = self.file_index + 1;
        let name = batch_file_name(index, self.name_width, self.codec.extension());
        let path = self.output_dir.join(name);
        let sink = self
            .codec
            .create(&path)
            .map_err(|e| ZimpackError::batch_file(&path, e))?;
        self.file_index = index;
        tracing::debug!(path = %path.display(), "Opened batch file");

        self.files.push(BatchFile {
            index: self.file_index,
            path,
            records: 0,
        });
        Ok(sink)
    }

    fn close_current(&mut self) -> Result<()> {
        let (sink, records) = match std::mem::replace(&mut self.state, WriterState::Failed) {
            WriterState::Open { sink, records } => (sink, records),
            WriterState::NeedsRotation => {
                self.state = WriterState::NeedsRotation;
                return Ok(());
            }
            WriterState::Failed => return Err(ZimpackError::WriterFailed),
        };
        self.codec
            .finish(sink)
            .map_err(|e| self.with_current_path(e.into()))?;
        self.state = WriterState::NeedsRotation;
        if let Some(file) = self.files.last() {
            tracing::debug!(path = %file.path.display(), records, "Closed batch file");
        }
        Ok(())
    }

    /// Attaches the current file path to I/O errors.
    fn with_current_path(&self, err: ZimpackError) -> ZimpackError {
        match (err, self.files.last()) {
            (ZimpackError::Io(source), Some(file)) => ZimpackError::batch_file(&file.path, source),
            (err, _) => err,
        }
    }
}

impl<C: Codec> std::fmt::Debug for BatchWriter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchWriter")
            .field("output_dir", &self.output_dir)
            .field("capacity", &self.capacity)
            .field("name_width", &self.name_width)
            .field("codec", &self.codec.name())
            .field("file_index", &self.file_index)
            .field("records_in_current_file", &self.records_in_current_file())
            .finish()
    }
}
