//! Kiwix ZIM archive reader.
//!
//! [`ZimArchive`] walks the URL pointer list of a ZIM file in order and
//! decodes each directory entry into a [`Record`]. The URL and cluster
//! pointer lists are loaded once on open. Blobs are read lazily from their
//! cluster; the most recently used cluster is kept decompressed since
//! consecutive articles usually share it.
//!
//! # Example
//!
//! ```rust,no_run
//! use zimpack::archive::{RecordSource, ZimArchive};
//!
//! # fn main() -> zimpack::Result<()> {
//! let mut archive = ZimArchive::open("wikipedia_hu_all.zim")?;
//! for index in 0..archive.len() {
//!     let record = archive.record(index)?;
//!     println!("{} {}", record.namespace, record.title);
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
mod cluster;
mod dirent;
mod header;

pub use builder::ZimBuilder;
pub use cluster::Compression;
pub use dirent::{Dirent, DirentKind};
pub use header::{HEADER_LEN, Header, MAGIC};

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::core::models::Record;
use crate::error::{Result, ZimpackError};

use super::RecordSource;
use cluster::Cluster;

/// A ZIM archive opened for sequential extraction.
#[derive(Debug)]
pub struct ZimArchive<R = BufReader<File>> {
    reader: R,
    header: Header,
    file_len: u64,
    url_ptrs: Vec<u64>,
    cluster_offsets: Vec<u64>,
    last_dirent: Option<(usize, Dirent)>,
    cache: Option<(u32, Cluster)>,
}

impl ZimArchive<BufReader<File>> {
    /// Opens a ZIM file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ZimpackError::Io`] if the file can't be opened and
    /// [`ZimpackError::InvalidArchive`] if it isn't a supported ZIM file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::with_capacity(64 * 1024, file))
    }
}

impl<R: BufRead + Seek> ZimArchive<R> {
    /// Reads the header and both pointer lists from `reader`.
    pub fn from_reader(mut reader: R) -> Result<Self> {
        let file_len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        let mut buf = [0u8; HEADER_LEN];
        reader.read_exact(&mut buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => ZimpackError::invalid_archive(format!(
                "file of {file_len} bytes is too short for a header"
            )),
            _ => ZimpackError::Io(e),
        })?;
        let header = Header::parse(&buf)?;
        header.check_bounds(file_len)?;

        let mut archive = Self {
            reader,
            header,
            file_len,
            url_ptrs: Vec::new(),
            cluster_offsets: Vec::new(),
            last_dirent: None,
            cache: None,
        };
        archive.url_ptrs =
            archive.read_pointers(header.url_ptr_pos, header.entry_count, "URL pointer list")?;
        archive.cluster_offsets = archive.read_pointers(
            header.cluster_ptr_pos,
            header.cluster_count,
            "cluster pointer list",
        )?;

        tracing::debug!(
            version = %format!("{}.{}", header.major_version, header.minor_version),
            entries = header.entry_count,
            clusters = header.cluster_count,
            "Opened ZIM archive"
        );

        Ok(archive)
    }

    /// The decoded file header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Reads the directory entry with URL index `index`.
    pub fn dirent(&mut self, index: usize) -> Result<Dirent> {
        self.load_dirent(index).cloned()
    }

    fn load_dirent(&mut self, index: usize) -> Result<&Dirent> {
        if !matches!(&self.last_dirent, Some((cached, _)) if *cached == index) {
            let position = *self
                .url_ptrs
                .get(index)
                .ok_or_else(|| ZimpackError::out_of_range(index, self.url_ptrs.len()))?;
            if position >= self.file_len {
                return Err(ZimpackError::invalid_archive(format!(
                    "directory entry {index} points past end of file"
                )));
            }
            self.seek_to(position)?;
            let dirent = Dirent::read(&mut self.reader)?;
            self.last_dirent = Some((index, dirent));
        }
        self.last_dirent
            .as_ref()
            .map(|(_, dirent)| dirent)
            .ok_or_else(|| ZimpackError::invalid_archive("directory entry cache is empty"))
    }

    fn read_pointers(&mut self, position: u64, count: u32, what: &str) -> Result<Vec<u64>> {
        self.seek_to(position)?;
        let mut raw = vec![0u8; count as usize * 8];
        self.reader.read_exact(&mut raw).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => {
                ZimpackError::invalid_archive(format!("{what} is truncated"))
            }
            _ => ZimpackError::Io(e),
        })?;
        Ok(raw
            .chunks_exact(8)
            .map(|chunk| header::le_u64(chunk, 0))
            .collect())
    }

    /// Moves to `position` relative to the current one so a buffered reader
    /// keeps its buffer when the target is already loaded.
    fn seek_to(&mut self, position: u64) -> Result<()> {
        let current = self.reader.stream_position()?;
        let distance = i64::try_from(position.abs_diff(current))
            .map_err(|_| ZimpackError::invalid_archive("seek distance overflows"))?;
        let offset = if position >= current { distance } else { -distance };
        self.reader.seek_relative(offset)?;
        Ok(())
    }

    fn cluster(&mut self, number: u32) -> Result<&Cluster> {
        if !matches!(&self.cache, Some((cached, _)) if *cached == number) {
            let cluster = self.load_cluster(number)?;
            self.cache = Some((number, cluster));
        }
        self.cache
            .as_ref()
            .map(|(_, cluster)| cluster)
            .ok_or_else(|| ZimpackError::invalid_archive("cluster cache is empty"))
    }

    fn load_cluster(&mut self, number: u32) -> Result<Cluster> {
        let n = number as usize;
        let start = *self
            .cluster_offsets
            .get(n)
            .ok_or_else(|| ZimpackError::out_of_range(n, self.cluster_offsets.len()))?;
        let end = match self.cluster_offsets.get(n + 1) {
            Some(&next) => next,
            None if self.header.checksum_pos > start => self.header.checksum_pos,
            None => self.file_len,
        };
        if start >= end || end > self.file_len {
            return Err(ZimpackError::invalid_archive(format!(
                "cluster {number} spans invalid range {start}..{end}"
            )));
        }

        let mut raw = vec![0u8; (end - start) as usize];
        self.seek_to(start)?;
        self.reader.read_exact(&mut raw)?;
        Cluster::parse(&raw)
    }
}

impl<R: BufRead + Seek> RecordSource for ZimArchive<R> {
    fn name(&self) -> &'static str {
        "ZIM"
    }

    fn len(&self) -> usize {
        self.header.entry_count as usize
    }

    fn record(&mut self, index: usize) -> Result<Record> {
        let dirent = self.load_dirent(index)?;
        Ok(Record {
            index,
            title: dirent.display_title().to_string(),
            namespace: char::from(dirent.namespace),
            is_redirect: dirent.is_redirect(),
            is_deleted: dirent.is_deleted(),
        })
    }

    fn payload(&mut self, index: usize) -> Result<Vec<u8>> {
        match self.load_dirent(index)?.kind {
            DirentKind::Content { cluster, blob } => {
                Ok(self.cluster(cluster)?.blob(blob as usize)?.to_vec())
            }
            DirentKind::Redirect { .. } | DirentKind::LinkTarget | DirentKind::Deleted => {
                Ok(Vec::new())
            }
        }
    }
}
