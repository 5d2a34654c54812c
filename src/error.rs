use std::fmt;

use crate::zip::Codec;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while reading or extracting an archive.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("End of Central Directory record not found")]
    EndOfCentralDirectoryNotFound,

    #[error("Invalid Central Directory File Header #{index} at offset {offset}: signature 0x{signature:08x}")]
    InvalidCentralDirectorySignature {
        index: usize,
        offset: u64,
        signature: u32,
    },

    #[error("Extra field of {file_name} overruns its region ({end} > {limit})")]
    ExtraFieldOverrun {
        file_name: String,
        end: u64,
        limit: u64,
    },

    #[error("Local header of {file_name} at {offset} is not before the Central Directory at {cd_offset}")]
    InvalidLocalHeaderOffset {
        file_name: String,
        offset: u64,
        cd_offset: u64,
    },

    #[error("Compressed size of {file_name} ({size} bytes) exceeds the archive length ({archive_len} bytes)")]
    CompressedSizeOutOfBounds {
        file_name: String,
        size: u64,
        archive_len: u64,
    },

    #[error("Fixed-length string requested without a length")]
    MissingFixedLength,

    #[error("Unknown string format: {0:?}")]
    UnknownStringFormat(crate::io::StringFormat),

    #[error("Could not decompress {file_name}: {}", AttemptList(.attempts))]
    Decompression {
        file_name: String,
        attempts: Vec<(Codec, DecodeFailure)>,
    },
}

impl Error {
    /// Whether this error comes from malformed archive or string data.
    pub fn is_format_error(&self) -> bool {
        !matches!(self, Error::Io(_) | Error::Decompression { .. })
    }
}

/// Why a single codec attempt was rejected.
#[derive(Debug)]
pub enum DecodeFailure {
    Corrupt(std::io::Error),
    SizeMismatch { expected: u64, actual: u64 },
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeFailure::Corrupt(e) => write!(f, "corrupt stream ({})", e),
            DecodeFailure::SizeMismatch { expected, actual } => {
                write!(f, "expected {} bytes, got {}", expected, actual)
            }
        }
    }
}

struct AttemptList<'a>(&'a [(Codec, DecodeFailure)]);

impl fmt::Display for AttemptList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (codec, failure)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", codec, failure)?;
        }
        Ok(())
    }
}
