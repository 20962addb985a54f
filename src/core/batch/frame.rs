//! Length-prefixed record framing.
//!
//! A frame is a 4-byte unsigned big-endian length followed by exactly that
//! many payload bytes. Frames are concatenated with nothing in between, so a
//! decompressed batch file is just `frame*`.

use std::io::{self, Read, Write};

use crate::error::{Result, ZimpackError};

/// Size of the length prefix in bytes.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Largest preallocation made from an untrusted length prefix.
const MAX_PREALLOC: usize = 1 << 20;

/// Returns the length prefix for `payload`, or [`ZimpackError::PayloadTooLarge`]
/// if it doesn't fit in 32 bits.
pub fn frame_len(payload: &[u8]) -> Result<u32> {
    u32::try_from(payload.len()).map_err(|_| ZimpackError::PayloadTooLarge {
        size: payload.len(),
    })
}

/// Writes one frame. Nothing is written when the payload is too large.
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<()> {
    let len = frame_len(payload)?;
    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(payload)?;
    Ok(())
}

/// Iterates over the frames of a decompressed batch stream.
///
/// Yields `Err` once and then stops if the stream ends inside a frame.
///
/// # Example
///
/// ```rust
/// use zimpack::core::batch::{FrameReader, write_frame};
///
/// # fn main() -> zimpack::Result<()> {
/// let mut stream = Vec::new();
/// write_frame(&mut stream, b"first")?;
/// write_frame(&mut stream, b"")?;
///
/// let frames: Vec<Vec<u8>> = FrameReader::new(stream.as_slice()).collect::<Result<_, _>>()?;
/// assert_eq!(frames, vec![b"first".to_vec(), Vec::new()]);
/// # Ok(())
/// # }
/// ```
pub struct FrameReader<R> {
    reader: R,
    done: bool,
}

impl<R: Read> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            done: false,
        }
    }

    /// Reads the next frame, `Ok(None)` on a clean end of stream.
    pub fn read_frame(&mut self) -> Result<Option<Vec<u8>>> {
        let mut prefix = [0u8; LENGTH_PREFIX_LEN];
        let filled = read_up_to(&mut self.reader, &mut prefix)?;
        if filled == 0 {
            return Ok(None);
        }
        if filled < LENGTH_PREFIX_LEN {
            return Err(ZimpackError::TruncatedFrame {
                expected: LENGTH_PREFIX_LEN,
                actual: filled,
            });
        }

        let len = u32::from_be_bytes(prefix) as usize;
        let mut payload = Vec::with_capacity(len.min(MAX_PREALLOC));
        (&mut self.reader)
            .take(len as u64)
            .read_to_end(&mut payload)?;
        if payload.len() < len {
            return Err(ZimpackError::TruncatedFrame {
                expected: len,
                actual: payload.len(),
            });
        }
        Ok(Some(payload))
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_frame() {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Fills as much of `buf` as the reader allows, returning the byte count.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
