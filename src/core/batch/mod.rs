//! On-disk batch format.
//!
//! Admitted payloads are stored as frames (`[u32 big-endian length][bytes]`)
//! in gzip streams rotated every `capacity` frames:
//!
//! ```text
//! out/0001.htmls.gz   frames 1..=capacity
//! out/0002.htmls.gz   frames capacity+1..=2*capacity
//! ...
//! ```
//!
//! - [`codec`] - the compression seam ([`Codec`], [`GzipCodec`])
//! - [`naming`] - file names and directory listing
//! - [`frame`] - frame encoding and [`FrameReader`]
//! - [`writer`] - the rotating [`BatchWriter`]

pub mod codec;
pub mod frame;
pub mod naming;
pub mod writer;

use std::path::Path;

pub use codec::{Codec, DEFAULT_COMPRESSION_LEVEL, GzipCodec};
pub use frame::{FrameReader, LENGTH_PREFIX_LEN, frame_len, write_frame};
pub use naming::{DEFAULT_NAME_WIDTH, batch_file_name, list_batch_files, parse_batch_index};
pub use writer::{BatchFile, BatchSummary, BatchWriter, DEFAULT_DOCUMENTS_PER_FILE};

use crate::error::{Result, ZimpackError};

/// Reads every frame of a gzip batch file.
pub fn read_batch_file(path: &Path) -> Result<Vec<Vec<u8>>> {
    read_batch_file_with(path, &GzipCodec::default())
}

/// Reads every frame of a batch file written with `codec`.
pub fn read_batch_file_with<C: Codec>(path: &Path, codec: &C) -> Result<Vec<Vec<u8>>> {
    let reader = codec
        .open(path)
        .map_err(|e| ZimpackError::batch_file(path, e))?;
    FrameReader::new(reader).collect()
}

/// Reads every frame of every gzip batch file in `dir`, in file order.
pub fn read_batch_dir(dir: &Path) -> Result<Vec<Vec<u8>>> {
    let codec = GzipCodec::default();
    let mut frames = Vec::new();
    for path in list_batch_files(dir, codec.extension())? {
        frames.extend(read_batch_file_with(&path, &codec)?);
    }
    Ok(frames)
}
