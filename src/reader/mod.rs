#![doc = r#"
Sequential byte reading over a MIDI buffer

A [`Reader`] walks a borrowed byte slice front to back. Every read either
returns the requested bytes and advances, or fails with a [`ReaderError`]
carrying the absolute offset of the failure. Readers never panic and never
read past the end of their slice.

Sub-readers made with [`Reader::split_off`] keep reporting offsets relative to
the start of the original buffer, so errors raised deep inside a track still
point at the right byte of the file.
"#]

mod error;
pub use error::*;

pub mod endian;
use endian::FromBeBytes;

pub mod vli;

/// A cursor over a borrowed MIDI byte buffer.
#[derive(Clone, Debug)]
pub struct Reader<'slc> {
    buf: &'slc [u8],
    pos: usize,
    offset: usize,
}

impl<'slc> Reader<'slc> {
    /// Create a reader over a slice. Positions start at zero.
    pub const fn from_byte_slice(buf: &'slc [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            offset: 0,
        }
    }

    /// The absolute offset of the next byte to be read.
    #[inline]
    pub const fn buffer_position(&self) -> usize {
        self.offset + self.pos
    }

    /// The number of bytes left to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// True if every byte has been consumed.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the next byte without consuming it.
    pub fn peek_u8(&self) -> ReadResult<u8> {
        self.buf
            .get(self.pos)
            .copied()
            .ok_or_else(|| ReaderError::truncated(self.buffer_position()))
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        let byte = self.peek_u8()?;
        self.pos += 1;
        Ok(byte)
    }

    /// Reads the next `len` bytes as a slice borrowed from the buffer.
    pub fn read_slice(&mut self, len: usize) -> ReadResult<&'slc [u8]> {
        if len > self.remaining() {
            return Err(ReaderError::truncated(self.buffer_position()));
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Reads exactly `N` bytes into an array.
    pub fn read_exact_size<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let slice = self.read_slice(N)?;
        let mut bytes = [0; N];
        bytes.copy_from_slice(slice);
        Ok(bytes)
    }

    /// Reads a big-endian integer.
    pub fn read_be<T: FromBeBytes>(&mut self) -> ReadResult<T> {
        let start = self.buffer_position();
        let slice = self.read_slice(T::SIZE)?;
        T::from_be_slice(slice).ok_or_else(|| ReaderError::truncated(start))
    }

    /// Reads a variable length integer. See [`vli`].
    pub fn read_vli(&mut self) -> ReadResult<u64> {
        vli::read(self)
    }

    /// Skips `len` bytes.
    pub fn skip(&mut self, len: usize) -> ReadResult<()> {
        self.read_slice(len).map(|_| ())
    }

    /// Splits the next `len` bytes off into their own reader and advances past them.
    ///
    /// The returned reader reports positions relative to the original buffer.
    pub fn split_off(&mut self, len: usize) -> ReadResult<Reader<'slc>> {
        let offset = self.buffer_position();
        let buf = self.read_slice(len)?;
        Ok(Reader {
            buf,
            pos: 0,
            offset,
        })
    }
}

#[test]
fn reads_advance_position() {
    let mut reader = Reader::from_byte_slice(&[1, 2, 3, 4, 5]);
    assert_eq!(reader.peek_u8().unwrap(), 1);
    assert_eq!(reader.read_u8().unwrap(), 1);
    assert_eq!(reader.read_exact_size::<2>().unwrap(), [2, 3]);
    assert_eq!(reader.buffer_position(), 3);
    assert_eq!(reader.remaining(), 2);
    assert_eq!(reader.read_slice(2).unwrap(), &[4, 5]);
    assert!(reader.is_empty());
}

#[test]
fn short_reads_fail_without_consuming() {
    let mut reader = Reader::from_byte_slice(&[1, 2]);
    let err = reader.read_slice(3).unwrap_err();
    assert_eq!(err.error_kind(), &ReaderErrorKind::TruncatedStream);
    assert_eq!(err.position(), 0);
    assert_eq!(reader.remaining(), 2);

    reader.skip(2).unwrap();
    assert!(reader.read_u8().unwrap_err().is_truncated());
    assert!(reader.peek_u8().is_err());
}

#[test]
fn split_off_keeps_absolute_positions() {
    let mut reader = Reader::from_byte_slice(&[0, 0, 7, 8, 9]);
    reader.skip(2).unwrap();
    let mut sub = reader.split_off(2).unwrap();
    assert!(reader.read_u8().is_ok());
    assert!(reader.is_empty());

    assert_eq!(sub.buffer_position(), 2);
    assert_eq!(sub.read_u8().unwrap(), 7);
    assert_eq!(sub.read_u8().unwrap(), 8);
    let err = sub.read_u8().unwrap_err();
    assert_eq!(err.position(), 4);
}

#[test]
fn split_off_past_the_end_is_truncation() {
    let mut reader = Reader::from_byte_slice(&[0, 1, 2]);
    assert!(reader.split_off(4).unwrap_err().is_truncated());
}
