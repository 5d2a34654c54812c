//! Payload decompression.
//!
//! The archives do not say whether a payload is zlib-wrapped or raw
//! deflate, so each candidate codec is tried in order and the declared
//! uncompressed size decides which result is accepted.

use std::fmt;
use std::io::Read;

use flate2::read::{DeflateDecoder, ZlibDecoder};

use crate::error::DecodeFailure;

/// A candidate payload framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    /// Deflate wrapped in a zlib header and Adler-32 trailer
    Zlib,
    /// Headerless deflate
    RawDeflate,
}

/// Attempt order used by the extractor.
pub const CODECS: [Codec; 2] = [Codec::Zlib, Codec::RawDeflate];

impl Codec {
    /// Decompress `payload`, accepting the output only if it is exactly
    /// `expected` bytes long.
    pub fn decode(self, payload: &[u8], expected: u64) -> Result<Vec<u8>, DecodeFailure> {
        let mut output = Vec::new();
        // One byte past the declared size is enough to detect a mismatch
        let result = match self {
            Codec::Zlib => ZlibDecoder::new(payload)
                .take(expected + 1)
                .read_to_end(&mut output),
            Codec::RawDeflate => DeflateDecoder::new(payload)
                .take(expected + 1)
                .read_to_end(&mut output),
        };

        let actual = result.map_err(DecodeFailure::Corrupt)? as u64;
        if actual != expected {
            return Err(DecodeFailure::SizeMismatch { expected, actual });
        }
        Ok(output)
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Codec::Zlib => f.write_str("zlib"),
            Codec::RawDeflate => f.write_str("deflate"),
        }
    }
}

/// Try each codec in turn and return the first accepted output.
///
/// On failure every attempt is reported with the reason it was rejected.
pub fn decompress(
    codecs: &[Codec],
    payload: &[u8],
    expected: u64,
) -> Result<(Codec, Vec<u8>), Vec<(Codec, DecodeFailure)>> {
    let mut failures = Vec::new();
    for &codec in codecs {
        match codec.decode(payload, expected) {
            Ok(data) => return Ok((codec, data)),
            Err(failure) => {
                log::debug!("{} attempt rejected: {}", codec, failure);
                failures.push((codec, failure));
            }
        }
    }
    Err(failures)
}
