#![doc = r#"
Chunk headers

MIDI files are organized into chunks, each identified by a 4-character ASCII type identifier
followed by a 32-bit big-endian length field and then the chunk data.

```text
[Header Chunk: "MThd", length 6]
[Track Chunk 1: "MTrk", length n1]
[Track Chunk 2: "MTrk", length n2]
...
```

The Standard MIDI File specification defines two chunk types, `MThd` and `MTrk`.
Anything else is an alien chunk, which readers skip using its declared length.
"#]

use crate::prelude::*;
use alloc::{borrow::Cow, string::String};

/// The id of the header chunk
pub const HEADER_ID: [u8; 4] = *b"MThd";
/// The id of a track chunk
pub const TRACK_ID: [u8; 4] = *b"MTrk";

/// The 8-byte prefix of every chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    id: [u8; 4],
    size: u32,
}

impl ChunkHeader {
    /// Create a new chunk header
    pub const fn new(id: [u8; 4], size: u32) -> Self {
        Self { id, size }
    }

    /// Reads 4 raw id bytes and a big-endian length.
    ///
    /// Fails with [`ReaderErrorKind::TruncatedHeader`] if fewer than 8 bytes remain.
    pub fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let start = reader.buffer_position();
        let truncated = |_| ReaderError::new(start, ReaderErrorKind::TruncatedHeader);
        let id = reader.read_exact_size::<4>().map_err(truncated)?;
        let size = reader.read_be::<u32>().map_err(truncated)?;
        Ok(Self { id, size })
    }

    /// The raw chunk id
    pub const fn id(&self) -> &[u8; 4] {
        &self.id
    }

    /// The chunk id as text. Non-UTF-8 ids are rendered lossily.
    pub fn id_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.id)
    }

    /// The declared length of the chunk body in bytes
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// True for an `MThd` chunk
    pub fn is_header(&self) -> bool {
        self.id == HEADER_ID
    }

    /// True for an `MTrk` chunk
    pub fn is_track(&self) -> bool {
        self.id == TRACK_ID
    }
}

#[test]
fn reads_header_chunk_header() {
    let mut reader = Reader::from_byte_slice(b"MThd\x00\x00\x00\x06");
    let header = ChunkHeader::read(&mut reader).unwrap();
    assert_eq!(header.id_str(), "MThd");
    assert_eq!(header.size(), 6);
    assert!(header.is_header());
    assert!(!header.is_track());
    assert!(reader.is_empty());
}

#[test]
fn reads_big_endian_sizes() {
    let mut reader = Reader::from_byte_slice(&[b'M', b'T', b'r', b'k', 0x12, 0x34, 0x56, 0x78]);
    let header = ChunkHeader::read(&mut reader).unwrap();
    assert!(header.is_track());
    assert_eq!(header.size(), 0x1234_5678);
}

#[test]
fn short_chunk_header_is_truncated_header() {
    for len in 0..8 {
        let bytes = b"MTrk\x00\x00\x00\x04";
        let mut reader = Reader::from_byte_slice(&bytes[..len]);
        let err = ChunkHeader::read(&mut reader).unwrap_err();
        assert_eq!(err.error_kind(), &ReaderErrorKind::TruncatedHeader);
        assert_eq!(err.position(), 0);
    }
}
