//! # infinizip
//!
//! Extractor for InfiniZip, the ZIP dialect used by the data archives of
//! Cars 3: Driven to Win.
//!
//! The crate has two layers:
//!
//! - [`io::EndianReader`]: an endian-aware cursor over any `Read + Seek`
//!   stream, with integer, float and string primitives
//! - [`zip`]: the archive parser and extractor built on top of it
//!
//! ## Example
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufReader;
//! use std::path::Path;
//! use infinizip::ZipExtractor;
//!
//! fn main() -> infinizip::Result<()> {
//!     let file = BufReader::new(File::open("data.zip")?);
//!     let mut archive = ZipExtractor::open(file)?;
//!
//!     for entry in archive.entries() {
//!         println!("{}", entry.file_name);
//!     }
//!
//!     archive.extract_all(Path::new("."), |file| {
//!         println!("Successfully extracted {} ({} bytes)", file.file_name, file.size);
//!     })?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod zip;

pub use cli::Cli;
pub use encoding_rs;
pub use error::{DecodeFailure, Error, Result};
pub use io::{EndianReader, Endianness, StringFormat};
pub use zip::{Codec, ExtractedFile, ZipExtractor, ZipFileEntry, ZipParser};
