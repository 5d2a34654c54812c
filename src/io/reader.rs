//! Sequential cursor over a seekable byte stream.
//!
//! [`EndianReader`] decodes integers in a configurable byte order and
//! strings in several on-disk layouts. It knows nothing about archives;
//! the ZIP parser builds on it.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use encoding_rs::{Decoder, Encoding, UTF_8};
use half::f16;
use std::io::{Read, Seek, SeekFrom};

use super::Endianness;
use crate::error::{Error, Result};

/// How a string is laid out in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    Unknown,
    /// Characters up to (and consuming) a zero byte.
    NullTerminated,
    /// Exactly N bytes, truncated at the first embedded zero byte.
    FixedLength,
    /// 8-bit character count followed by the characters.
    PrefixedLength8,
    /// 16-bit character count followed by the characters.
    PrefixedLength16,
    /// 32-bit character count followed by the characters.
    PrefixedLength32,
}

macro_rules! read_endian {
    ($self:ident, $method:ident) => {
        match $self.endianness {
            Endianness::Little => $self.inner.$method::<LittleEndian>()?,
            Endianness::Big => $self.inner.$method::<BigEndian>()?,
        }
    };
}

macro_rules! read_many {
    ($name:ident, $single:ident, $ty:ty) => {
        pub fn $name(&mut self, count: usize) -> Result<Vec<$ty>> {
            (0..count).map(|_| self.$single()).collect()
        }
    };
}

/// Endian-aware binary reader.
///
/// Byte order and text encoding are properties of each reader instance,
/// so several readers over different streams never interfere with one
/// another.
pub struct EndianReader<R> {
    inner: R,
    endianness: Endianness,
    encoding: &'static Encoding,
    offsets: Vec<u64>,
}

impl<R: Read + Seek> EndianReader<R> {
    /// Create a reader decoding strings as UTF-8.
    pub fn new(inner: R, endianness: Endianness) -> Self {
        Self::with_encoding(inner, endianness, UTF_8)
    }

    pub fn with_encoding(inner: R, endianness: Endianness, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            endianness,
            encoding,
            offsets: Vec::new(),
        }
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = encoding;
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub fn set_endianness(&mut self, endianness: Endianness) {
        self.endianness = endianness;
    }

    /// Whether multi-byte values are reversed relative to host order.
    pub fn swaps_bytes(&self) -> bool {
        self.endianness.differs_from_native()
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    // Cursor

    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Total length of the stream. The cursor is left where it was.
    pub fn stream_len(&mut self) -> Result<u64> {
        let current = self.inner.stream_position()?;
        let len = self.inner.seek(SeekFrom::End(0))?;
        if current != len {
            self.inner.seek(SeekFrom::Start(current))?;
        }
        Ok(len)
    }

    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        Ok(self.inner.seek(pos)?)
    }

    pub fn seek_begin(&mut self, offset: u64) -> Result<u64> {
        self.seek(SeekFrom::Start(offset))
    }

    pub fn seek_current(&mut self, offset: i64) -> Result<u64> {
        self.seek(SeekFrom::Current(offset))
    }

    pub fn seek_end(&mut self, offset: i64) -> Result<u64> {
        self.seek(SeekFrom::End(offset))
    }

    /// Advance the cursor without reading.
    pub fn skip(&mut self, len: u64) -> Result<u64> {
        self.seek_current(len as i64)
    }

    /// Save the current position on the offset stack.
    pub fn push_offset(&mut self) -> Result<()> {
        let pos = self.position()?;
        self.offsets.push(pos);
        Ok(())
    }

    pub fn push_offset_at(&mut self, offset: u64) {
        self.offsets.push(offset);
    }

    pub fn peek_offset(&self) -> Option<u64> {
        self.offsets.last().copied()
    }

    pub fn pop_offset(&mut self) -> Option<u64> {
        self.offsets.pop()
    }

    // Primitives

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.inner.read_u8()?)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.inner.read_i8()?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(read_endian!(self, read_u16))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(read_endian!(self, read_i16))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(read_endian!(self, read_u32))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(read_endian!(self, read_i32))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(read_endian!(self, read_u64))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(read_endian!(self, read_i64))
    }

    pub fn read_f16(&mut self) -> Result<f16> {
        Ok(f16::from_bits(self.read_u16()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    read_many!(read_i16s, read_i16, i16);
    read_many!(read_u16s, read_u16, u16);
    read_many!(read_i32s, read_i32, i32);
    read_many!(read_u32s, read_u32, u32);
    read_many!(read_i64s, read_i64, i64);
    read_many!(read_u64s, read_u64, u64);
    read_many!(read_f16s, read_f16, f16);
    read_many!(read_f32s, read_f32, f32);
    read_many!(read_f64s, read_f64, f64);

    // Strings

    /// Read one character in the reader's encoding.
    ///
    /// Malformed sequences yield U+FFFD. A byte that ends a malformed
    /// sequence without belonging to it is left in the stream, so a
    /// terminator or the next character is never swallowed.
    pub fn read_char(&mut self) -> Result<char> {
        let mut decoder = self.encoding.new_decoder_without_bom_handling();
        let mut out = String::with_capacity(16);
        let mut consumed = 0;

        loop {
            let byte = self.read_u8()?;
            consumed += 1;
            let _ = decoder.decode_to_string(&[byte], &mut out, false);

            let mut chars = out.chars();
            if let Some(c) = chars.next() {
                let spilled = chars.next().is_some();
                if consumed > 1 && (spilled || has_pending(&mut decoder)) {
                    self.seek_current(-1)?;
                }
                return Ok(c);
            }
        }
    }

    fn read_chars(&mut self, count: u64) -> Result<String> {
        let mut s = String::new();
        for _ in 0..count {
            s.push(self.read_char()?);
        }
        Ok(s)
    }

    /// Read a string in the given layout.
    ///
    /// `fixed_length` is only consulted for [`StringFormat::FixedLength`],
    /// where it is required.
    pub fn read_string(
        &mut self,
        format: StringFormat,
        fixed_length: Option<usize>,
    ) -> Result<String> {
        match format {
            StringFormat::NullTerminated => {
                let mut s = String::new();
                loop {
                    match self.read_char()? {
                        '\0' => break,
                        c => s.push(c),
                    }
                }
                Ok(s)
            }
            StringFormat::FixedLength => {
                let len = fixed_length.ok_or(Error::MissingFixedLength)?;
                let bytes = self.read_bytes(len)?;
                let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
                let (text, _) = self.encoding.decode_without_bom_handling(&bytes[..end]);
                Ok(text.into_owned())
            }
            StringFormat::PrefixedLength8 => {
                let count = self.read_u8()?;
                self.read_chars(count as u64)
            }
            StringFormat::PrefixedLength16 => {
                let count = self.read_u16()?;
                self.read_chars(count as u64)
            }
            StringFormat::PrefixedLength32 => {
                let count = self.read_u32()?;
                self.read_chars(count as u64)
            }
            StringFormat::Unknown => Err(Error::UnknownStringFormat(format)),
        }
    }

    /// Read a string without moving the cursor.
    pub fn peek_string(
        &mut self,
        format: StringFormat,
        fixed_length: Option<usize>,
    ) -> Result<String> {
        let current = self.position()?;
        let result = self.read_string(format, fixed_length);
        self.seek_begin(current)?;
        result
    }
}

/// Whether the decoder still holds bytes of an unfinished sequence.
fn has_pending(decoder: &mut Decoder) -> bool {
    let mut tail = String::with_capacity(16);
    let _ = decoder.decode_to_string(&[], &mut tail, true);
    !tail.is_empty()
}
