//! InfiniZip archive parsing and extraction.
//!
//! InfiniZip is the ZIP dialect used by the Cars 3: Driven to Win data
//! archives. It is ordinary ZIP with two quirks:
//!
//! - a vendor extra field (ID `0x464B`) carrying a 16-byte integrity hash
//!   in each Central Directory record, with the CRC-32 slot repurposed
//! - payloads that are either zlib-wrapped or raw deflate, with nothing in
//!   the headers saying which
//!
//! ## Architecture
//!
//! - [`structures`]: record signatures, sizes and the parsed entry type
//! - [`parser`]: End of Central Directory discovery, Central Directory
//!   and Local File Header parsing
//! - [`decompress`]: ordered codec attempts gated on the declared size
//! - [`extractor`]: the archive session used by callers
//!
//! ## Limitations
//!
//! - No ZIP64, encryption or multi-disk support
//! - The integrity hash is parsed but not verified
//! - Read-only

mod decompress;
mod extractor;
mod parser;
mod structures;

pub use decompress::{CODECS, Codec, decompress};
pub use extractor::{ExtractedFile, ZipExtractor};
pub use parser::ZipParser;
pub use structures::*;
