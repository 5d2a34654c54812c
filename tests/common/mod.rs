#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use flate2::write::{DeflateEncoder, ZlibEncoder};
use std::io::Write;

pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

/// One extra field sub-record.
pub fn extra_field(id: u16, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_u16::<LittleEndian>(id).unwrap();
    out.write_u16::<LittleEndian>(data.len() as u16).unwrap();
    out.extend_from_slice(data);
    out
}

/// The vendor hash sub-record: 3 bytes of sub-header, then the hash.
pub fn hash_field(hash: [u8; 16]) -> Vec<u8> {
    let mut data = vec![0x01, 0x00, 0x10];
    data.extend_from_slice(&hash);
    extra_field(0x464B, &data)
}

pub struct TestEntry {
    pub name: String,
    pub payload: Vec<u8>,
    pub uncompressed_size: u32,
    pub cd_extra: Vec<u8>,
    pub local_extra: Vec<u8>,
    pub comment: Vec<u8>,
    /// Values written to the directory record instead of the real ones
    pub cd_lfh_offset: Option<u32>,
    pub cd_compressed_size: Option<u32>,
}

impl TestEntry {
    pub fn raw(name: &str, data: &[u8]) -> Self {
        Self::with_payload(name, deflate(data), data.len() as u32)
    }

    pub fn zlib(name: &str, data: &[u8]) -> Self {
        Self::with_payload(name, zlib(data), data.len() as u32)
    }

    pub fn with_payload(name: &str, payload: Vec<u8>, uncompressed_size: u32) -> Self {
        Self {
            name: name.to_string(),
            payload,
            uncompressed_size,
            cd_extra: Vec::new(),
            local_extra: Vec::new(),
            comment: Vec::new(),
            cd_lfh_offset: None,
            cd_compressed_size: None,
        }
    }

    pub fn cd_lfh_offset(mut self, offset: u32) -> Self {
        self.cd_lfh_offset = Some(offset);
        self
    }

    pub fn cd_compressed_size(mut self, size: u32) -> Self {
        self.cd_compressed_size = Some(size);
        self
    }

    pub fn cd_extra(mut self, extra: Vec<u8>) -> Self {
        self.cd_extra = extra;
        self
    }

    pub fn local_extra(mut self, extra: Vec<u8>) -> Self {
        self.local_extra = extra;
        self
    }

    pub fn comment(mut self, comment: &[u8]) -> Self {
        self.comment = comment.to_vec();
        self
    }
}

pub struct BuiltArchive {
    pub bytes: Vec<u8>,
    pub cd_offset: u64,
    pub lfh_offsets: Vec<u64>,
}

#[derive(Default)]
pub struct ArchiveBuilder {
    entries: Vec<TestEntry>,
    comment: Vec<u8>,
    signature_override: Option<u32>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, entry: TestEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Trailing archive comment after the EOCD.
    pub fn comment(mut self, comment: &[u8]) -> Self {
        self.comment = comment.to_vec();
        self
    }

    /// Replace the signature of every Central Directory record.
    pub fn cdfh_signature(mut self, signature: u32) -> Self {
        self.signature_override = Some(signature);
        self
    }

    pub fn build(&self) -> BuiltArchive {
        let mut out = Vec::new();
        let mut lfh_offsets = Vec::new();

        for e in &self.entries {
            lfh_offsets.push(out.len() as u64);
            out.write_u32::<LittleEndian>(0x0403_4b50).unwrap();
            out.write_u16::<LittleEndian>(20).unwrap(); // version needed
            out.write_u16::<LittleEndian>(0).unwrap(); // flags
            out.write_u16::<LittleEndian>(8).unwrap(); // method
            out.write_u16::<LittleEndian>(0).unwrap(); // time
            out.write_u16::<LittleEndian>(0).unwrap(); // date
            out.write_u32::<LittleEndian>(0).unwrap(); // crc
            out.write_u32::<LittleEndian>(e.payload.len() as u32).unwrap();
            out.write_u32::<LittleEndian>(e.uncompressed_size).unwrap();
            out.write_u16::<LittleEndian>(e.name.len() as u16).unwrap();
            out.write_u16::<LittleEndian>(e.local_extra.len() as u16).unwrap();
            out.extend_from_slice(e.name.as_bytes());
            out.extend_from_slice(&e.local_extra);
            out.extend_from_slice(&e.payload);
        }

        let cd_offset = out.len() as u64;
        for (e, lfh_offset) in self.entries.iter().zip(&lfh_offsets) {
            out.write_u32::<LittleEndian>(self.signature_override.unwrap_or(0x0201_4b50))
                .unwrap();
            out.write_u16::<LittleEndian>(20).unwrap(); // version made by
            out.write_u16::<LittleEndian>(20).unwrap(); // version needed
            out.write_u16::<LittleEndian>(0).unwrap(); // flags
            out.write_u16::<LittleEndian>(8).unwrap(); // method
            out.write_u16::<LittleEndian>(0).unwrap(); // time
            out.write_u16::<LittleEndian>(0).unwrap(); // date
            out.write_u32::<LittleEndian>(0xDEAD_BEEF).unwrap(); // crc slot
            out.write_u32::<LittleEndian>(
                e.cd_compressed_size.unwrap_or(e.payload.len() as u32),
            )
            .unwrap();
            out.write_u32::<LittleEndian>(e.uncompressed_size).unwrap();
            out.write_u16::<LittleEndian>(e.name.len() as u16).unwrap();
            out.write_u16::<LittleEndian>(e.cd_extra.len() as u16).unwrap();
            out.write_u16::<LittleEndian>(e.comment.len() as u16).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap(); // disk number
            out.write_u16::<LittleEndian>(0).unwrap(); // internal attrs
            out.write_u32::<LittleEndian>(0).unwrap(); // external attrs
            out.write_u32::<LittleEndian>(e.cd_lfh_offset.unwrap_or(*lfh_offset as u32))
                .unwrap();
            out.extend_from_slice(e.name.as_bytes());
            out.extend_from_slice(&e.cd_extra);
            out.extend_from_slice(&e.comment);
        }
        let cd_size = out.len() as u64 - cd_offset;

        out.write_u32::<LittleEndian>(0x0605_4b50).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(self.entries.len() as u16).unwrap();
        out.write_u16::<LittleEndian>(self.entries.len() as u16).unwrap();
        out.write_u32::<LittleEndian>(cd_size as u32).unwrap();
        out.write_u32::<LittleEndian>(cd_offset as u32).unwrap();
        out.write_u16::<LittleEndian>(self.comment.len() as u16).unwrap();
        out.extend_from_slice(&self.comment);

        BuiltArchive {
            bytes: out,
            cd_offset,
            lfh_offsets,
        }
    }
}
