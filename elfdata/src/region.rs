//! Bounds-checked access to the bytes of an ELF file.
//!
//! Every read names an offset and a length. Reads that do not fit in the
//! region fail with [`Error::OutOfBounds`] instead of touching memory outside
//! of it. Values are decoded in host byte order, matching a plain copy of the
//! record into a native structure.

use std::convert::TryInto;
use std::io::{self, Cursor, Read};

use crate::Error;

/// Types implementing this trait can be created from their in-memory
/// representation in host byte order.
pub trait FromBytes {
    type Target;

    /// Create a value from its representation as a byte slice.
    ///
    /// # Panics
    ///
    /// This function will panic if the size of the slice does not match the
    /// size of the target type.
    fn from_ne_bytes(bytes: &[u8]) -> Self::Target;
}

macro_rules! impl_from_bytes {
    ($Ty:ty) => {
        impl FromBytes for $Ty {
            type Target = $Ty;

            fn from_ne_bytes(bytes: &[u8]) -> $Ty {
                <$Ty>::from_ne_bytes(bytes.try_into().unwrap())
            }
        }
    };
}

impl_from_bytes!(u8);
impl_from_bytes!(u16);
impl_from_bytes!(u32);
impl_from_bytes!(u64);

/// A `FieldRead` is a type of `Read`er which decodes fixed-size integers one
/// after another.
pub trait FieldRead: Read {
    /// Read the next value.
    fn read_field<T: FromBytes>(&mut self) -> Result<T::Target, io::Error> {
        let size = std::mem::size_of::<T::Target>();

        let mut buf = [0u8; 8];
        self.read_exact(&mut buf[..size])?;

        Ok(T::from_ne_bytes(&buf[..size]))
    }
}

impl<T> FieldRead for Cursor<T> where T: AsRef<[u8]> {}

/// Read-only view over the contents of a file.
#[derive(Debug, Clone, Copy)]
pub struct Region<'a> {
    bytes: &'a [u8],
}

impl<'a> Region<'a> {
    /// Returns a region covering `bytes`.
    pub fn new(bytes: &'a [u8]) -> Region<'a> {
        Region { bytes }
    }

    /// Returns the size of the region in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns the `len` bytes starting at `offset`.
    pub fn bytes(&self, offset: u64, len: usize) -> Result<&'a [u8], Error> {
        let oob = Error::OutOfBounds {
            offset,
            len,
            size: self.bytes.len(),
        };

        let start: usize = match offset.try_into() {
            Ok(start) => start,
            Err(_) => return Err(oob),
        };
        let end = match start.checked_add(len) {
            Some(end) => end,
            None => return Err(oob),
        };

        self.bytes.get(start..end).ok_or(oob)
    }

    /// Returns a cursor over the fixed-size record of `len` bytes found at
    /// `offset`. The whole record is checked up front, so the fields read
    /// from the cursor never run past the region.
    pub fn record(
        &self,
        offset: u64,
        len: usize,
    ) -> Result<Cursor<&'a [u8]>, Error> {
        Ok(Cursor::new(self.bytes(offset, len)?))
    }

    /// Returns the offset of the `index`-th entry of a table starting at
    /// `base` whose entries are `stride` bytes apart.
    pub fn entry_offset(
        base: u64,
        index: u64,
        stride: u64,
    ) -> Result<u64, Error> {
        index
            .checked_mul(stride)
            .and_then(|rel| base.checked_add(rel))
            .ok_or(Error::Overflow)
    }

    /// Returns an owned copy of the null-terminated string at `offset`. Bytes
    /// that are not valid UTF-8 are replaced with `U+FFFD`.
    pub fn string(&self, offset: u64) -> Result<String, Error> {
        // Validates `offset <= len`, so the cast below cannot truncate.
        self.bytes(offset, 0)?;
        let tail = &self.bytes[offset as usize..];

        let nul = tail
            .iter()
            .position(|&b| b == 0)
            .ok_or(Error::UnterminatedString { offset })?;

        Ok(String::from_utf8_lossy(&tail[..nul]).into_owned())
    }

    /// Returns the string found `index` bytes into the string table placed
    /// at `table_offset`.
    pub fn table_string(
        &self,
        table_offset: u64,
        index: u32,
    ) -> Result<String, Error> {
        let offset = table_offset
            .checked_add(index as u64)
            .ok_or(Error::Overflow)?;
        self.string(offset)
    }
}
