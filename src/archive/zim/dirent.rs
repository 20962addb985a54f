//! Directory entries.
//!
//! Layout (little-endian):
//!
//! | Field | Size | Notes |
//! |-------|------|-------|
//! | mime type | 2 | `0xFFFF` redirect, `0xFFFE` link target, `0xFFFD` deleted |
//! | parameter length | 1 | |
//! | namespace | 1 | ASCII character |
//! | revision | 4 | |
//! | cluster + blob, or redirect index | 8 / 4 / 0 | depends on mime type |
//! | url | n + 1 | zero-terminated |
//! | title | n + 1 | zero-terminated, empty means "same as url" |
//! | parameter | parameter length | |

use std::io::{self, BufRead, Write};

use crate::error::{Result, ZimpackError};

pub const REDIRECT_MIME: u16 = 0xFFFF;
pub const LINK_TARGET_MIME: u16 = 0xFFFE;
pub const DELETED_MIME: u16 = 0xFFFD;

/// What a directory entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirentKind {
    /// Regular content stored as blob `blob` of cluster `cluster`.
    Content { cluster: u32, blob: u32 },
    /// Redirect to the entry with URL index `target`.
    Redirect { target: u32 },
    LinkTarget,
    Deleted,
}

/// A decoded directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dirent {
    pub mime_type: u16,
    pub namespace: u8,
    pub revision: u32,
    pub kind: DirentKind,
    pub url: String,
    pub title: String,
    pub parameter: Vec<u8>,
}

impl Dirent {
    /// Reads one entry from the current position of `reader`.
    pub fn read<R: BufRead>(reader: &mut R) -> Result<Self> {
        let mut fixed = [0u8; 8];
        read_exact(reader, &mut fixed, "directory entry")?;
        let mime_type = u16::from_le_bytes([fixed[0], fixed[1]]);
        let parameter_len = fixed[2];
        let namespace = fixed[3];
        let revision = u32::from_le_bytes([fixed[4], fixed[5], fixed[6], fixed[7]]);

        let kind = match mime_type {
            REDIRECT_MIME => {
                let mut target = [0u8; 4];
                read_exact(reader, &mut target, "redirect index")?;
                DirentKind::Redirect {
                    target: u32::from_le_bytes(target),
                }
            }
            LINK_TARGET_MIME => DirentKind::LinkTarget,
            DELETED_MIME => DirentKind::Deleted,
            _ => {
                let mut location = [0u8; 8];
                read_exact(reader, &mut location, "blob location")?;
                DirentKind::Content {
                    cluster: u32::from_le_bytes([location[0], location[1], location[2], location[3]]),
                    blob: u32::from_le_bytes([location[4], location[5], location[6], location[7]]),
                }
            }
        };

        let url = read_cstr(reader, "url")?;
        let title = read_cstr(reader, "title")?;
        let mut parameter = vec![0u8; usize::from(parameter_len)];
        read_exact(reader, &mut parameter, "parameter")?;

        Ok(Self {
            mime_type,
            namespace,
            revision,
            kind,
            url,
            title,
            parameter,
        })
    }

    /// Writes the entry in on-disk layout.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let parameter_len = u8::try_from(self.parameter.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "parameter too long"))?;
        writer.write_all(&self.mime_type.to_le_bytes())?;
        writer.write_all(&[parameter_len, self.namespace])?;
        writer.write_all(&self.revision.to_le_bytes())?;
        match self.kind {
            DirentKind::Content { cluster, blob } => {
                writer.write_all(&cluster.to_le_bytes())?;
                writer.write_all(&blob.to_le_bytes())?;
            }
            DirentKind::Redirect { target } => writer.write_all(&target.to_le_bytes())?,
            DirentKind::LinkTarget | DirentKind::Deleted => {}
        }
        writer.write_all(self.url.as_bytes())?;
        writer.write_all(&[0])?;
        if self.title != self.url {
            writer.write_all(self.title.as_bytes())?;
        }
        writer.write_all(&[0])?;
        writer.write_all(&self.parameter)
    }

    /// The title shown to readers: the stored title, or the URL when empty.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }

    pub fn is_redirect(&self) -> bool {
        // Link targets have no content of their own, so they are dropped like redirects.
        matches!(self.kind, DirentKind::Redirect { .. } | DirentKind::LinkTarget)
    }

    pub fn is_deleted(&self) -> bool {
        self.kind == DirentKind::Deleted
    }
}

fn read_exact<R: BufRead>(reader: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => {
            ZimpackError::invalid_archive(format!("unexpected end of file reading {what}"))
        }
        _ => ZimpackError::Io(e),
    })
}

fn read_cstr<R: BufRead>(reader: &mut R, what: &str) -> Result<String> {
    let mut bytes = Vec::new();
    reader.read_until(0, &mut bytes)?;
    if bytes.pop() != Some(0) {
        return Err(ZimpackError::invalid_archive(format!(
            "unterminated {what} in directory entry"
        )));
    }
    String::from_utf8(bytes)
        .map_err(|e| ZimpackError::invalid_archive(format!("{what} is not valid UTF-8: {e}")))
}
