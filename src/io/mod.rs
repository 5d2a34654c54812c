mod endian;
mod reader;

pub use endian::Endianness;
pub use reader::{EndianReader, StringFormat};
