use std::fmt;

/// End of Central Directory (EOCD) - 22 bytes minimum
pub struct EndOfCentralDirectory {
    pub disk_number: u16,
    pub disk_with_cd: u16,
    pub disk_entries: u16,
    pub total_entries: u16,
    pub cd_offset: u32,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: u32 = 0x0605_4b50;
    pub const SIZE: u64 = 22;
}

/// Longest archive comment that may follow the EOCD record.
///
/// The backward signature scan never looks further than this many bytes
/// past the last possible record position.
pub const MAX_COMMENT_SIZE: u64 = 65535;

/// Central Directory File Header (CDFH)
pub const CDFH_SIGNATURE: u32 = 0x0201_4b50;

/// Local File Header (LFH) - 30 bytes. The signature is never checked.
pub const LFH_SKIPPED_SIZE: u64 = 26;

/// Extra field ID of the vendor integrity hash.
pub const HASH_FIELD_ID: u16 = 0x464B;
/// Declared size of the hash field: 3 bytes of sub-header, then the hash.
pub const HASH_FIELD_SIZE: u16 = 19;
pub const HASH_FIELD_PREFIX: u64 = 3;
pub const HASH_LEN: usize = 16;

/// Parsed archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipFileEntry {
    /// Relative path as stored in the directory.
    pub file_name: String,
    pub lfh_offset: u64,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    /// Value of the CRC-32 slot. The archives repurpose it, so it is kept
    /// for display only.
    pub crc32: u32,
    /// Integrity hash from the vendor extra field, if present. Never verified.
    pub hash: Option<[u8; HASH_LEN]>,
}

impl ZipFileEntry {
    /// Directory entries end with '/'
    pub fn is_directory(&self) -> bool {
        self.file_name.ends_with('/')
    }

    pub fn hash_hex(&self) -> Option<String> {
        self.hash.map(hex::encode)
    }
}

impl fmt::Display for ZipFileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} -> {} bytes @ {})",
            self.file_name, self.compressed_size, self.uncompressed_size, self.lfh_offset
        )
    }
}
