//! The fixed 80-byte ZIM file header.

use crate::error::{Result, ZimpackError};

/// Magic number at offset 0 of every ZIM file ("ZIM\x04" little-endian).
pub const MAGIC: u32 = 0x044D_495A;

/// Size of the header in bytes.
pub const HEADER_LEN: usize = 80;

/// Major format versions this reader understands.
pub const SUPPORTED_MAJOR_VERSIONS: &[u16] = &[5, 6];

/// "No main page" / "no layout page" marker.
pub const NO_PAGE: u32 = u32::MAX;

/// Decoded ZIM header. All fields are stored little-endian on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub major_version: u16,
    pub minor_version: u16,
    pub uuid: [u8; 16],
    pub entry_count: u32,
    pub cluster_count: u32,
    pub url_ptr_pos: u64,
    pub title_ptr_pos: u64,
    pub cluster_ptr_pos: u64,
    pub mime_list_pos: u64,
    pub main_page: u32,
    pub layout_page: u32,
    pub checksum_pos: u64,
}

impl Header {
    /// Decodes and validates a header.
    ///
    /// # Errors
    ///
    /// Returns [`ZimpackError::InvalidArchive`] for a wrong magic number or
    /// an unsupported major version.
    pub fn parse(buf: &[u8; HEADER_LEN]) -> Result<Self> {
        let magic = le_u32(buf, 0);
        if magic != MAGIC {
            return Err(ZimpackError::invalid_archive(format!(
                "bad magic number {magic:#010x}"
            )));
        }

        let mut uuid = [0u8; 16];
        uuid.copy_from_slice(&buf[8..24]);

        let header = Self {
            major_version: le_u16(buf, 4),
            minor_version: le_u16(buf, 6),
            uuid,
            entry_count: le_u32(buf, 24),
            cluster_count: le_u32(buf, 28),
            url_ptr_pos: le_u64(buf, 32),
            title_ptr_pos: le_u64(buf, 40),
            cluster_ptr_pos: le_u64(buf, 48),
            mime_list_pos: le_u64(buf, 56),
            main_page: le_u32(buf, 64),
            layout_page: le_u32(buf, 68),
            checksum_pos: le_u64(buf, 72),
        };

        if !SUPPORTED_MAJOR_VERSIONS.contains(&header.major_version) {
            return Err(ZimpackError::invalid_archive(format!(
                "unsupported format version {}.{}",
                header.major_version, header.minor_version
            )));
        }

        Ok(header)
    }

    /// Encodes the header.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[0..4].copy_from_slice(&MAGIC.to_le_bytes());
        buf[4..6].copy_from_slice(&self.major_version.to_le_bytes());
        buf[6..8].copy_from_slice(&self.minor_version.to_le_bytes());
        buf[8..24].copy_from_slice(&self.uuid);
        buf[24..28].copy_from_slice(&self.entry_count.to_le_bytes());
        buf[28..32].copy_from_slice(&self.cluster_count.to_le_bytes());
        buf[32..40].copy_from_slice(&self.url_ptr_pos.to_le_bytes());
        buf[40..48].copy_from_slice(&self.title_ptr_pos.to_le_bytes());
        buf[48..56].copy_from_slice(&self.cluster_ptr_pos.to_le_bytes());
        buf[56..64].copy_from_slice(&self.mime_list_pos.to_le_bytes());
        buf[64..68].copy_from_slice(&self.main_page.to_le_bytes());
        buf[68..72].copy_from_slice(&self.layout_page.to_le_bytes());
        buf[72..80].copy_from_slice(&self.checksum_pos.to_le_bytes());
        buf
    }

    /// Checks that the pointer lists fit inside a file of `file_len` bytes.
    pub fn check_bounds(&self, file_len: u64) -> Result<()> {
        let lists = [
            ("URL pointer list", self.url_ptr_pos, u64::from(self.entry_count) * 8),
            ("title pointer list", self.title_ptr_pos, u64::from(self.entry_count) * 4),
            ("cluster pointer list", self.cluster_ptr_pos, u64::from(self.cluster_count) * 8),
        ];
        for (name, pos, len) in lists {
            if pos.saturating_add(len) > file_len {
                return Err(ZimpackError::invalid_archive(format!(
                    "{name} at {pos} (+{len} bytes) exceeds file size {file_len}"
                )));
            }
        }
        Ok(())
    }
}

pub(crate) fn le_u16(buf: &[u8], at: usize) -> u16 {
    let mut bytes = [0u8; 2];
    bytes.copy_from_slice(&buf[at..at + 2]);
    u16::from_le_bytes(bytes)
}

pub(crate) fn le_u32(buf: &[u8], at: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[at..at + 4]);
    u32::from_le_bytes(bytes)
}

pub(crate) fn le_u64(buf: &[u8], at: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[at..at + 8]);
    u64::from_le_bytes(bytes)
}
