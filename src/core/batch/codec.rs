//! Compression codecs for batch files.
//!
//! A [`Codec`] turns a file path into a scoped, compressing sink. The batch
//! writer only sees `Write`; the codec decides how bytes land on disk.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Default gzip level (same as `gzip -6`).
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// A streaming compression codec for batch files.
///
/// Sinks must release their resources when dropped, so that a run that
/// unwinds through an error still leaves a readable (possibly short) file.
/// [`finish`](Codec::finish) is the explicit, error-reporting way to close a
/// sink.
pub trait Codec {
    /// The compressing writer produced by [`create`](Codec::create).
    type Sink: Write;

    /// Human-readable name of this codec (for logging).
    fn name(&self) -> &'static str;

    /// File extension appended to batch file names, without the dot.
    fn extension(&self) -> &'static str;

    /// Creates (or truncates) `path` and returns a sink writing to it.
    fn create(&self, path: &Path) -> io::Result<Self::Sink>;

    /// Flushes all pending compressed data and closes the sink.
    fn finish(&self, sink: Self::Sink) -> io::Result<()>;

    /// Opens `path` for reading decompressed bytes.
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>>;
}

/// Gzip codec using flate2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GzipCodec {
    level: u32,
}

impl Default for GzipCodec {
    fn default() -> Self {
        Self {
            level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl GzipCodec {
    /// Creates a codec with the given compression level (0-9).
    pub fn new(level: u32) -> Self {
        Self {
            level: level.min(9),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }
}

impl Codec for GzipCodec {
    type Sink = flate2::write::GzEncoder<BufWriter<File>>;

    fn name(&self) -> &'static str {
        "gzip"
    }

    fn extension(&self) -> &'static str {
        "gz"
    }

    fn create(&self, path: &Path) -> io::Result<Self::Sink> {
        let file = File::create(path)?;
        Ok(flate2::write::GzEncoder::new(
            BufWriter::with_capacity(64 * 1024, file),
            flate2::Compression::new(self.level),
        ))
    }

    fn finish(&self, sink: Self::Sink) -> io::Result<()> {
        let mut inner = sink.finish()?;
        inner.flush()
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        let file = File::open(path)?;
        Ok(Box::new(flate2::read::MultiGzDecoder::new(BufReader::new(
            file,
        ))))
    }
}
