//! Capped snappy-framed decompression.

use snap::read::FrameDecoder;
use std::io::Read;

/// An error decompressing a gossip payload.
#[derive(Debug, thiserror::Error)]
pub enum SnappyError {
    /// The payload is not valid snappy framing.
    #[error("invalid snappy framing: {0}")]
    Corrupt(#[from] std::io::Error),
    /// The payload inflates past the configured cap.
    #[error("decompressed payload exceeds {limit} bytes")]
    TooLarge {
        /// The configured cap.
        limit: usize,
    },
}

/// Decompresses a snappy-framed payload, refusing to inflate past `limit`.
pub fn decompress_snappy(data: &[u8], limit: usize) -> Result<Vec<u8>, SnappyError> {
    let mut out = Vec::new();
    FrameDecoder::new(data).take(limit as u64 + 1).read_to_end(&mut out)?;
    if out.len() > limit {
        return Err(SnappyError::TooLarge { limit });
    }
    Ok(out)
}

/// Compresses a payload with snappy framing. Test helper.
#[cfg(test)]
pub(crate) fn compress_snappy(data: &[u8]) -> Vec<u8> {
    use std::io::Write;
    let mut encoder = snap::write::FrameEncoder::new(Vec::new());
    encoder.write_all(data).unwrap();
    encoder.into_inner().unwrap()
}
