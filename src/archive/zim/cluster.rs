//! Clusters: compressed groups of blobs.
//!
//! A cluster starts with one info byte. Its low nibble is the compression
//! code and bit `0x10` marks 64-bit blob offsets. The (decompressed) body
//! starts with the offset table; the first offset divided by the offset
//! width gives the number of offsets, which is the blob count plus one.

#[cfg(feature = "xz")]
use std::io::Read;

use crate::error::{Result, ZimpackError};

const EXTENDED_FLAG: u8 = 0x10;

/// Cluster compression schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Stored as-is (codes 0 and 1).
    #[default]
    None,
    /// LZMA2 in an xz container (code 4).
    Xz,
    /// Zstandard (code 5).
    Zstd,
}

impl Compression {
    /// Maps an info-byte compression code.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 | 1 => Ok(Compression::None),
            4 => Ok(Compression::Xz),
            5 => Ok(Compression::Zstd),
            _ => Err(ZimpackError::UnsupportedCompression { code }),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Compression::None => 1,
            Compression::Xz => 4,
            Compression::Zstd => 5,
        }
    }

    fn decompress(self, body: &[u8]) -> Result<Vec<u8>> {
        match self {
            Compression::None => Ok(body.to_vec()),
            #[cfg(feature = "xz")]
            Compression::Xz => {
                let mut data = Vec::new();
                xz2::read::XzDecoder::new(body).read_to_end(&mut data)?;
                Ok(data)
            }
            #[cfg(not(feature = "xz"))]
            Compression::Xz => Err(ZimpackError::UnsupportedCompression { code: self.code() }),
            #[cfg(feature = "zstd")]
            Compression::Zstd => Ok(zstd::stream::decode_all(body)?),
            #[cfg(not(feature = "zstd"))]
            Compression::Zstd => Err(ZimpackError::UnsupportedCompression { code: self.code() }),
        }
    }

    fn compress(self, data: Vec<u8>) -> Result<Vec<u8>> {
        match self {
            Compression::None => Ok(data),
            #[cfg(feature = "xz")]
            Compression::Xz => {
                let mut out = Vec::new();
                xz2::read::XzEncoder::new(data.as_slice(), 6).read_to_end(&mut out)?;
                Ok(out)
            }
            #[cfg(not(feature = "xz"))]
            Compression::Xz => Err(ZimpackError::UnsupportedCompression { code: self.code() }),
            #[cfg(feature = "zstd")]
            Compression::Zstd => Ok(zstd::stream::encode_all(data.as_slice(), 3)?),
            #[cfg(not(feature = "zstd"))]
            Compression::Zstd => Err(ZimpackError::UnsupportedCompression { code: self.code() }),
        }
    }
}

/// A decompressed cluster.
#[derive(Debug, Clone)]
pub struct Cluster {
    data: Vec<u8>,
    offsets: Vec<usize>,
}

impl Cluster {
    /// Decodes a raw cluster, info byte included.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let (&info, body) = raw
            .split_first()
            .ok_or_else(|| ZimpackError::invalid_archive("empty cluster"))?;
        let compression = Compression::from_code(info & 0x0F)?;
        let width = if info & EXTENDED_FLAG == 0 { 4 } else { 8 };
        let data = compression.decompress(body)?;

        let first = read_offset(&data, 0, width)?;
        if first == 0 || first % width != 0 || first > data.len() {
            return Err(ZimpackError::invalid_archive(format!(
                "bad first blob offset {first} in cluster of {} bytes",
                data.len()
            )));
        }

        let count = first / width;
        let mut offsets = Vec::with_capacity(count);
        offsets.push(first);
        for i in 1..count {
            let offset = read_offset(&data, i * width, width)?;
            let previous = offsets[i - 1];
            if offset < previous || offset > data.len() {
                return Err(ZimpackError::invalid_archive(format!(
                    "blob offset {offset} out of order or past cluster end"
                )));
            }
            offsets.push(offset);
        }

        Ok(Self { data, offsets })
    }

    /// Encodes blobs into a raw cluster with 32-bit offsets.
    pub fn encode(blobs: &[Vec<u8>], compression: Compression) -> Result<Vec<u8>> {
        let table_len = (blobs.len() + 1) * 4;
        let total = table_len + blobs.iter().map(Vec::len).sum::<usize>();
        let mut data = Vec::with_capacity(total);

        let mut offset = table_len;
        for blob in blobs.iter().map(Vec::len).chain(std::iter::once(0)) {
            let value = u32::try_from(offset)
                .map_err(|_| ZimpackError::invalid_archive("cluster exceeds 4 GiB"))?;
            data.extend_from_slice(&value.to_le_bytes());
            offset += blob;
        }
        for blob in blobs {
            data.extend_from_slice(blob);
        }

        let mut raw = vec![compression.code()];
        raw.extend(compression.compress(data)?);
        Ok(raw)
    }

    /// Number of blobs stored in the cluster.
    pub fn blob_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Returns blob `n`.
    pub fn blob(&self, n: usize) -> Result<&[u8]> {
        if n >= self.blob_count() {
            return Err(ZimpackError::out_of_range(n, self.blob_count()));
        }
        Ok(&self.data[self.offsets[n]..self.offsets[n + 1]])
    }
}

fn read_offset(data: &[u8], at: usize, width: usize) -> Result<usize> {
    let bytes = data
        .get(at..at + width)
        .ok_or_else(|| ZimpackError::invalid_archive("cluster offset table truncated"))?;
    let value = if width == 4 {
        u64::from(super::header::le_u32(bytes, 0))
    } else {
        super::header::le_u64(bytes, 0)
    };
    usize::try_from(value).map_err(|_| ZimpackError::invalid_archive("blob offset overflows"))
}
