//! Minimal ZIM writer for fixtures and benchmarks.
//!
//! Produces a single-cluster archive with one MIME type (`text/html`).
//! The trailing MD5 checksum is not computed (16 zero bytes are written),
//! which is fine for [`ZimArchive`](super::ZimArchive) since it doesn't
//! verify it, but other ZIM tools may reject such files.

use std::fs;
use std::path::Path;

use crate::error::{Result, ZimpackError};

use super::cluster::{Cluster, Compression};
use super::dirent::{DELETED_MIME, Dirent, DirentKind, REDIRECT_MIME};
use super::header::{HEADER_LEN, Header, NO_PAGE};

const MIME_LIST: &[u8] = b"text/html\0\0";
const CHECKSUM_LEN: usize = 16;

#[derive(Debug, Clone)]
enum EntryKind {
    Content(Vec<u8>),
    Redirect(String),
    Deleted,
}

#[derive(Debug, Clone)]
struct Entry {
    namespace: char,
    url: String,
    title: String,
    kind: EntryKind,
}

/// Builds an in-memory ZIM file.
///
/// Entries are sorted by namespace and URL when the archive is built, the
/// same order [`ZimArchive`](super::ZimArchive) iterates them in.
///
/// # Example
///
/// ```rust
/// use zimpack::archive::{RecordSource, ZimArchive, ZimBuilder};
/// use std::io::Cursor;
///
/// # fn main() -> zimpack::Result<()> {
/// let bytes = ZimBuilder::new()
///     .add_article('A', "Foo", "Foo", b"<p>foo</p>".to_vec())
///     .build()?;
///
/// let mut archive = ZimArchive::from_reader(Cursor::new(bytes))?;
/// assert_eq!(archive.record(0)?.title, "Foo");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ZimBuilder {
    entries: Vec<Entry>,
    compression: Compression,
}

impl ZimBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cluster compression (default: none).
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    #[must_use]
    pub fn add_article(
        mut self,
        namespace: char,
        url: impl Into<String>,
        title: impl Into<String>,
        payload: Vec<u8>,
    ) -> Self {
        self.entries.push(Entry {
            namespace,
            url: url.into(),
            title: title.into(),
            kind: EntryKind::Content(payload),
        });
        self
    }

    /// Adds a redirect to the entry with URL `target` in the same namespace.
    #[must_use]
    pub fn add_redirect(
        mut self,
        namespace: char,
        url: impl Into<String>,
        title: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.entries.push(Entry {
            namespace,
            url: url.into(),
            title: title.into(),
            kind: EntryKind::Redirect(target.into()),
        });
        self
    }

    #[must_use]
    pub fn add_deleted(
        mut self,
        namespace: char,
        url: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        self.entries.push(Entry {
            namespace,
            url: url.into(),
            title: title.into(),
            kind: EntryKind::Deleted,
        });
        self
    }

    /// Number of entries added so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes the archive.
    pub fn build(mut self) -> Result<Vec<u8>> {
        self.entries
            .sort_by(|a, b| (a.namespace, &a.url).cmp(&(b.namespace, &b.url)));

        let entry_count = u32::try_from(self.entries.len())
            .map_err(|_| ZimpackError::invalid_archive("too many entries"))?;

        let mut blobs = Vec::new();
        let mut dirents = Vec::new();
        for entry in &self.entries {
            let namespace = u8::try_from(entry.namespace).map_err(|_| {
                ZimpackError::invalid_archive(format!(
                    "namespace '{}' is not a single byte",
                    entry.namespace
                ))
            })?;
            let (mime_type, kind) = match &entry.kind {
                EntryKind::Content(payload) => {
                    blobs.push(payload.clone());
                    let blob = (blobs.len() - 1) as u32;
                    (0, DirentKind::Content { cluster: 0, blob })
                }
                EntryKind::Redirect(target) => {
                    let target = self.position(entry.namespace, target)?;
                    (REDIRECT_MIME, DirentKind::Redirect { target })
                }
                EntryKind::Deleted => (DELETED_MIME, DirentKind::Deleted),
            };
            dirents.push(Dirent {
                mime_type,
                namespace,
                revision: 0,
                kind,
                url: entry.url.clone(),
                title: entry.title.clone(),
                parameter: Vec::new(),
            });
        }

        let mime_list_pos = HEADER_LEN as u64;
        let url_ptr_pos = mime_list_pos + MIME_LIST.len() as u64;
        let title_ptr_pos = url_ptr_pos + u64::from(entry_count) * 8;
        let cluster_ptr_pos = title_ptr_pos + u64::from(entry_count) * 4;
        let dirents_pos = cluster_ptr_pos + 8;

        let mut dirent_bytes = Vec::new();
        let mut url_ptrs = Vec::with_capacity(dirents.len());
        for dirent in &dirents {
            url_ptrs.push(dirents_pos + dirent_bytes.len() as u64);
            dirent.write(&mut dirent_bytes)?;
        }

        let cluster_pos = dirents_pos + dirent_bytes.len() as u64;
        let cluster = Cluster::encode(&blobs, self.compression)?;
        let checksum_pos = cluster_pos + cluster.len() as u64;

        let mut title_order: Vec<u32> = (0..entry_count).collect();
        title_order.sort_by(|&a, &b| {
            let (a, b) = (&dirents[a as usize], &dirents[b as usize]);
            (a.namespace, a.display_title()).cmp(&(b.namespace, b.display_title()))
        });

        let header = Header {
            major_version: 5,
            minor_version: 0,
            uuid: [0; 16],
            entry_count,
            cluster_count: 1,
            url_ptr_pos,
            title_ptr_pos,
            cluster_ptr_pos,
            mime_list_pos,
            main_page: NO_PAGE,
            layout_page: NO_PAGE,
            checksum_pos,
        };

        let mut out = Vec::with_capacity(checksum_pos as usize + CHECKSUM_LEN);
        out.extend_from_slice(&header.to_bytes());
        out.extend_from_slice(MIME_LIST);
        for ptr in url_ptrs {
            out.extend_from_slice(&ptr.to_le_bytes());
        }
        for index in title_order {
            out.extend_from_slice(&index.to_le_bytes());
        }
        out.extend_from_slice(&cluster_pos.to_le_bytes());
        out.extend_from_slice(&dirent_bytes);
        out.extend_from_slice(&cluster);
        out.extend_from_slice(&[0; CHECKSUM_LEN]);
        Ok(out)
    }

    /// Serializes the archive and writes it to `path`.
    pub fn write_to(self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.build()?;
        fs::write(path, bytes)?;
        Ok(())
    }

    fn position(&self, namespace: char, url: &str) -> Result<u32> {
        self.entries
            .iter()
            .position(|e| e.namespace == namespace && e.url == url)
            .map(|i| i as u32)
            .ok_or_else(|| {
                ZimpackError::invalid_archive(format!(
                    "redirect target {namespace}/{url} does not exist"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_archive_layout() {
        let bytes = ZimBuilder::new().build().unwrap();
        // header + mime list + one cluster pointer + cluster (one offset) + checksum
        assert_eq!(bytes.len(), HEADER_LEN + MIME_LIST.len() + 8 + 5 + CHECKSUM_LEN);
        let mut buf = [0u8; HEADER_LEN];
        buf.copy_from_slice(&bytes[..HEADER_LEN]);
        let header = Header::parse(&buf).unwrap();
        assert_eq!(header.entry_count, 0);
        assert_eq!(header.cluster_count, 1);
    }

    #[test]
    fn test_missing_redirect_target() {
        let err = ZimBuilder::new()
            .add_redirect('A', "Pest", "Pest", "Nowhere")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("A/Nowhere"));
    }

    #[test]
    fn test_non_byte_namespace() {
        assert!(ZimBuilder::new().add_deleted('Ő', "x", "x").build().is_err());
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.zim");
        let builder = ZimBuilder::new().add_article('A', "Foo", "Foo", b"foo".to_vec());
        assert_eq!(builder.len(), 1);
        builder.write_to(&path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > HEADER_LEN as u64);
    }
}
