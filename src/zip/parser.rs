//! Low-level parser for the InfiniZip directory.
//!
//! ## Parsing Strategy
//!
//! The archives are ordinary ZIP files read from the end:
//! 1. Find the End of Central Directory (EOCD) by scanning backwards
//! 2. Read the Central Directory to get metadata for all files,
//!    picking the vendor hash out of each extra field
//! 3. For extraction, read each file's Local File Header and data

use std::io::{Cursor, Read, Seek};

use log::debug;

use crate::error::{Error, Result};
use crate::io::{EndianReader, Endianness, StringFormat};

use super::structures::*;

/// Low-level ZIP file parser.
///
/// Owns the stream for as long as the archive is being read. It only
/// seeks and reads; dropping the parser (or calling
/// [`into_inner`](Self::into_inner)) hands the stream back.
pub struct ZipParser<R> {
    /// The underlying data source
    reader: EndianReader<R>,
    /// Total size of the archive in bytes
    size: u64,
}

impl<R: Read + Seek> ZipParser<R> {
    /// Create a new parser over a little-endian archive stream.
    pub fn new(inner: R) -> Result<Self> {
        Self::with_endianness(inner, Endianness::Little)
    }

    /// Create a parser reading multi-byte fields in the given order.
    ///
    /// # Arguments
    ///
    /// * `inner` - The archive stream
    /// * `endianness` - Byte order of every header field
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the stream length cannot be determined.
    pub fn with_endianness(inner: R, endianness: Endianness) -> Result<Self> {
        let mut reader = EndianReader::new(inner, endianness);
        let size = reader.stream_len()?;
        Ok(Self { reader, size })
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    /// Find and parse the End of Central Directory record.
    ///
    /// The record may be followed by a comment of unknown length, so the
    /// tail of the stream is scanned right to left starting 22 bytes
    /// before the end. The first (rightmost) signature match wins.
    ///
    /// # Returns
    ///
    /// A tuple of (EOCD record, offset of EOCD in file).
    ///
    /// # Errors
    ///
    /// Returns [`Error::EndOfCentralDirectoryNotFound`] if no signature is
    /// found, including for streams shorter than the record itself.
    pub fn find_eocd(&mut self) -> Result<(EndOfCentralDirectory, u64)> {
        if self.size < EndOfCentralDirectory::SIZE {
            return Err(Error::EndOfCentralDirectoryNotFound);
        }

        let search_size = (MAX_COMMENT_SIZE + EndOfCentralDirectory::SIZE).min(self.size);
        let search_start = self.size - search_size;

        self.reader.seek_begin(search_start)?;
        let buf = self.reader.read_bytes(search_size as usize)?;
        let mut tail = EndianReader::new(Cursor::new(buf), self.reader.endianness());

        let mut found = None;
        for i in (0..=search_size - EndOfCentralDirectory::SIZE).rev() {
            tail.seek_begin(i)?;
            if tail.read_u32()? == EndOfCentralDirectory::SIGNATURE {
                found = Some(search_start + i);
                break;
            }
        }
        let offset = found.ok_or(Error::EndOfCentralDirectoryNotFound)?;

        // Split archive fields are read but never acted upon
        self.reader.seek_begin(offset + 4)?;
        let disk_number = self.reader.read_u16()?;
        let disk_with_cd = self.reader.read_u16()?;
        let disk_entries = self.reader.read_u16()?;
        let total_entries = self.reader.read_u16()?;
        self.reader.skip(4)?;
        let cd_offset = self.reader.read_u32()?;

        debug!(
            "EOCD at {}: {} entries, central directory at {} (disks {}/{}/{})",
            offset, total_entries, cd_offset, disk_number, disk_with_cd, disk_entries
        );

        Ok((
            EndOfCentralDirectory {
                disk_number,
                disk_with_cd,
                disk_entries,
                total_entries,
                cd_offset,
            },
            offset,
        ))
    }

    /// Parse the whole Central Directory.
    ///
    /// # Returns
    ///
    /// The entries in directory order and the offset of the directory.
    ///
    /// # Errors
    ///
    /// Returns a format error for a missing EOCD, a record with the wrong
    /// signature, an extra field overrunning its region, a local header
    /// offset not before the directory or a compressed size larger than
    /// the archive. Short reads surface as [`Error::Io`].
    pub fn list_files(&mut self) -> Result<(Vec<ZipFileEntry>, u64)> {
        let (eocd, _) = self.find_eocd()?;
        let cd_offset = eocd.cd_offset as u64;

        self.reader.seek_begin(cd_offset)?;

        let mut entries = Vec::with_capacity(eocd.total_entries as usize);
        for index in 0..eocd.total_entries as usize {
            let entry = self.parse_cdfh(index, cd_offset)?;
            debug!("entry #{}: {}", index, entry);
            entries.push(entry);
        }

        Ok((entries, cd_offset))
    }

    /// Parse one Central Directory File Header at the cursor.
    fn parse_cdfh(&mut self, index: usize, cd_offset: u64) -> Result<ZipFileEntry> {
        let offset = self.reader.position()?;
        let signature = self.reader.read_u32()?;
        if signature != CDFH_SIGNATURE {
            return Err(Error::InvalidCentralDirectorySignature {
                index,
                offset,
                signature,
            });
        }

        // version made by, version needed, flags, method, time, date.
        // The method is ignored; decompression tries both codecs.
        self.reader.skip(12)?;

        let crc32 = self.reader.read_u32()?;
        let compressed_size = self.reader.read_u32()? as u64;
        let uncompressed_size = self.reader.read_u32()? as u64;
        let file_name_length = self.reader.read_u16()?;
        let extra_field_length = self.reader.read_u16()?;
        let file_comment_length = self.reader.read_u16()?;
        // disk number start, internal attrs, external attrs
        self.reader.skip(8)?;
        let lfh_offset = self.reader.read_u32()? as u64;

        let file_name = self
            .reader
            .read_string(StringFormat::FixedLength, Some(file_name_length as usize))?;

        let hash = if extra_field_length > 0 {
            self.parse_extra_field(&file_name, extra_field_length)?
        } else {
            None
        };

        if file_comment_length > 0 {
            self.reader.skip(file_comment_length as u64)?;
        }

        if lfh_offset >= cd_offset {
            return Err(Error::InvalidLocalHeaderOffset {
                file_name,
                offset: lfh_offset,
                cd_offset,
            });
        }
        if compressed_size > self.size {
            return Err(Error::CompressedSizeOutOfBounds {
                file_name,
                size: compressed_size,
                archive_len: self.size,
            });
        }

        Ok(ZipFileEntry {
            file_name,
            lfh_offset,
            compressed_size,
            uncompressed_size,
            crc32,
            hash,
        })
    }

    /// Walk the extra field sub-records, consuming exactly `length` bytes.
    ///
    /// Returns the vendor hash if a well-formed hash field is present.
    fn parse_extra_field(
        &mut self,
        file_name: &str,
        length: u16,
    ) -> Result<Option<[u8; HASH_LEN]>> {
        let start = self.reader.position()?;
        let end = start + length as u64;
        let mut hash = None;

        let mut pos = start;
        while pos < end {
            let overrun = |field_end: u64| Error::ExtraFieldOverrun {
                file_name: file_name.to_string(),
                end: field_end,
                limit: end,
            };

            if pos + 4 > end {
                return Err(overrun(pos + 4));
            }
            let field_id = self.reader.read_u16()?;
            let field_size = self.reader.read_u16()?;
            let field_end = pos + 4 + field_size as u64;
            if field_end > end {
                return Err(overrun(field_end));
            }

            if field_id == HASH_FIELD_ID && field_size == HASH_FIELD_SIZE {
                self.reader.skip(HASH_FIELD_PREFIX)?;
                let mut buf = [0u8; HASH_LEN];
                self.reader.get_mut().read_exact(&mut buf)?;
                hash = Some(buf);
            } else {
                self.reader.skip(field_size as u64)?;
            }
            pos = field_end;
        }

        Ok(hash)
    }

    /// Get the actual data offset for a file entry.
    ///
    /// The Local File Header (LFH) has variable-length fields (filename,
    /// extra field) that may differ from the Central Directory entry.
    /// The LFH signature is not checked: the offset comes from a directory
    /// whose own signatures were.
    ///
    /// # Returns
    ///
    /// The byte offset where the compressed file data begins.
    pub fn get_data_offset(&mut self, entry: &ZipFileEntry) -> Result<u64> {
        self.reader.seek_begin(entry.lfh_offset)?;
        self.reader.skip(LFH_SKIPPED_SIZE)?;

        let file_name_length = self.reader.read_u16()? as u64;
        let extra_field_length = self.reader.read_u16()? as u64;

        Ok(entry.lfh_offset + LFH_SKIPPED_SIZE + 4 + file_name_length + extra_field_length)
    }

    /// Read the raw compressed payload of an entry.
    pub fn read_compressed(&mut self, entry: &ZipFileEntry) -> Result<Vec<u8>> {
        let data_offset = self.get_data_offset(entry)?;
        self.reader.seek_begin(data_offset)?;
        self.reader.read_bytes(entry.compressed_size as usize)
    }
}
