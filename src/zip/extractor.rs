use std::fs;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{Error, Result};

use super::decompress::{CODECS, Codec, decompress};
use super::parser::ZipParser;
use super::structures::ZipFileEntry;

/// Result of extracting one entry to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    pub file_name: String,
    pub path: PathBuf,
    pub size: u64,
    /// `None` for directory entries.
    pub codec: Option<Codec>,
}

/// An open archive: the stream, its parsed entry table and the
/// Central Directory offset.
///
/// The entry table is read once in [`open`](Self::open) and never changes.
pub struct ZipExtractor<R> {
    parser: ZipParser<R>,
    entries: Vec<ZipFileEntry>,
    cd_offset: u64,
}

impl<R: Read + Seek> ZipExtractor<R> {
    /// Open an archive and parse its Central Directory.
    ///
    /// # Arguments
    ///
    /// * `stream` - The archive, positioned anywhere; only seeks and reads
    ///   are performed on it
    ///
    /// # Returns
    ///
    /// A session holding the stream and the entry table.
    ///
    /// # Errors
    ///
    /// Returns a format error if no EOCD record is found or a directory
    /// record is malformed, and [`Error::Io`] if the stream cannot be read.
    pub fn open(stream: R) -> Result<Self> {
        let mut parser = ZipParser::new(stream)?;
        let (entries, cd_offset) = parser.list_files()?;
        Ok(Self {
            parser,
            entries,
            cd_offset,
        })
    }

    /// All entries, in directory order
    pub fn entries(&self) -> &[ZipFileEntry] {
        &self.entries
    }

    pub fn central_directory_offset(&self) -> u64 {
        self.cd_offset
    }

    /// Close the session and hand the stream back.
    pub fn into_inner(self) -> R {
        self.parser.into_inner()
    }

    /// Read an entry's compressed payload.
    pub fn read_compressed(&mut self, entry: &ZipFileEntry) -> Result<Vec<u8>> {
        self.parser.read_compressed(entry)
    }

    /// Extract file data to memory, reporting which codec succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decompression`] if no codec produced exactly
    /// `uncompressed_size` bytes.
    pub fn extract_to_memory(&mut self, entry: &ZipFileEntry) -> Result<(Codec, Vec<u8>)> {
        let payload = self.read_compressed(entry)?;
        decompress(&CODECS, &payload, entry.uncompressed_size).map_err(|attempts| {
            Error::Decompression {
                file_name: entry.file_name.clone(),
                attempts,
            }
        })
    }

    /// Extract one entry beneath `root`, creating parent directories as
    /// needed and overwriting any existing file.
    ///
    /// # Arguments
    ///
    /// * `entry` - An entry of this archive
    /// * `root` - Directory the stored path is resolved against
    ///
    /// # Returns
    ///
    /// The written path, its size and the codec that decoded it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decompression`] if the payload cannot be decoded to
    /// the declared size, or [`Error::Io`] if reading the archive, creating
    /// a directory or writing the file fails. Nothing is written on error.
    pub fn extract_to_file(&mut self, entry: &ZipFileEntry, root: &Path) -> Result<ExtractedFile> {
        let output_path = root.join(&entry.file_name);

        if entry.is_directory() {
            create_dir(&output_path)?;
            return Ok(ExtractedFile {
                file_name: entry.file_name.clone(),
                path: output_path,
                size: 0,
                codec: None,
            });
        }

        let (codec, data) = self.extract_to_memory(entry)?;

        // Create parent directories if needed
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir(parent)?;
            }
        }

        fs::write(&output_path, &data)?;
        debug!(
            "extracted {} ({} bytes, {})",
            entry.file_name,
            data.len(),
            codec
        );

        Ok(ExtractedFile {
            file_name: entry.file_name.clone(),
            path: output_path,
            size: data.len() as u64,
            codec: Some(codec),
        })
    }

    /// Extract every entry in directory order.
    ///
    /// `on_extracted` is called after each entry is written. The first
    /// failure aborts the run; files already written are left in place.
    ///
    /// # Errors
    ///
    /// Same as [`extract_to_file`](Self::extract_to_file), for the first
    /// entry that fails.
    pub fn extract_all<F>(&mut self, root: &Path, mut on_extracted: F) -> Result<Vec<ExtractedFile>>
    where
        F: FnMut(&ExtractedFile),
    {
        let entries = self.entries.clone();
        let mut extracted = Vec::with_capacity(entries.len());
        for entry in &entries {
            let file = self.extract_to_file(entry, root)?;
            on_extracted(&file);
            extracted.push(file);
        }
        Ok(extracted)
    }
}

fn create_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        info!("Creating directory: {}", path.display());
        fs::create_dir_all(path)?;
    }
    Ok(())
}
