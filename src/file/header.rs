use crate::prelude::*;
use num_enum::TryFromPrimitive;

#[doc = r#"
How the tracks of a file relate to each other.

```text
0  the file contains a single multi-channel track
1  the file contains one or more simultaneous tracks
2  the file contains one or more sequentially independent
   single-track patterns
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u16)]
pub enum FormatType {
    /// Format 0
    SingleMultiChannel = 0,
    /// Format 1
    Simultaneous = 1,
    /// Format 2
    SequentiallyIndependent = 2,
}

#[doc = r#"
The `MThd` chunk: the chunk header followed by three big-endian 16-bit fields.

```text
4D 54 68 64  00 00 00 06  00 01  00 02  01 E0
"MThd"       length 6     format ntrks  division
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mthd {
    header: ChunkHeader,
    format: u16,
    track_count: u16,
    division: u16,
}

impl Mthd {
    /// Create a header from its fields. The chunk header is `MThd` with length 6.
    pub const fn new(format: u16, track_count: u16, division: u16) -> Self {
        Self {
            header: ChunkHeader::new(HEADER_ID, 6),
            format,
            track_count,
            division,
        }
    }

    /// Reads the `MThd` chunk.
    ///
    /// Declared bytes beyond the six known fields are skipped.
    pub fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let start = reader.buffer_position();
        let header = ChunkHeader::read(reader)?;
        if !header.is_header() {
            return Err(ReaderError::new(
                start,
                ReaderErrorKind::chunk(ChunkError::UnexpectedId {
                    expected: HEADER_ID,
                    found: *header.id(),
                }),
            ));
        }
        if header.size() < 6 {
            return Err(ReaderError::new(
                start,
                ReaderErrorKind::chunk(ChunkError::HeaderLength(header.size())),
            ));
        }

        let fields_at = reader.buffer_position();
        let truncated = |_| ReaderError::new(fields_at, ReaderErrorKind::TruncatedHeader);
        let format = reader.read_be::<u16>().map_err(truncated)?;
        let track_count = reader.read_be::<u16>().map_err(truncated)?;
        let division = reader.read_be::<u16>().map_err(truncated)?;

        let extra = (header.size() - 6) as usize;
        if extra > 0 {
            #[cfg(feature = "tracing")]
            tracing::debug!("skipping {extra} trailing bytes of the header chunk");
            let skip_at = reader.buffer_position();
            reader
                .skip(extra)
                .map_err(|_| ReaderError::new(skip_at, ReaderErrorKind::TruncatedHeader))?;
        }

        Ok(Self {
            header,
            format,
            track_count,
            division,
        })
    }

    /// The chunk header this was read with
    pub const fn chunk_header(&self) -> &ChunkHeader {
        &self.header
    }

    /// The raw format field
    pub const fn format(&self) -> u16 {
        self.format
    }

    /// The format as a known [`FormatType`], if it is one
    pub fn format_type(&self) -> Option<FormatType> {
        FormatType::try_from(self.format).ok()
    }

    /// The number of track chunks the file declares
    pub const fn track_count(&self) -> u16 {
        self.track_count
    }

    /// The raw division field
    pub const fn division(&self) -> u16 {
        self.division
    }

    /// Interprets the division field. See [`Timing`].
    pub fn timing(&self) -> Result<Timing, ParseError> {
        Timing::from_division(self.division)
    }
}

#[cfg(test)]
const MTHD: [u8; 14] = [
    b'M', b'T', b'h', b'd', 0x00, 0x00, 0x00, 0x06, // chunk header
    0x00, 0x01, // format
    0x00, 0x02, // tracks
    0x01, 0xE0, // division
];

#[test]
fn reads_mthd() {
    let mut reader = Reader::from_byte_slice(&MTHD);
    let mthd = Mthd::read(&mut reader).unwrap();
    assert_eq!(mthd.chunk_header().size(), 6);
    assert_eq!(mthd.format(), 1);
    assert_eq!(mthd.format_type(), Some(FormatType::Simultaneous));
    assert_eq!(mthd.track_count(), 2);
    assert_eq!(mthd.division(), 480);
    assert_eq!(mthd.timing(), Ok(Timing::TicksPerQuarterNote(480)));
    assert!(reader.is_empty());
    assert_eq!(mthd, Mthd::new(1, 2, 480));
}

#[test]
fn truncated_mthd() {
    for len in 0..MTHD.len() {
        let mut reader = Reader::from_byte_slice(&MTHD[..len]);
        let err = Mthd::read(&mut reader).unwrap_err();
        assert_eq!(err.error_kind(), &ReaderErrorKind::TruncatedHeader);
    }
}

#[test]
fn wrong_id_is_rejected() {
    let mut bytes = MTHD;
    bytes[..4].copy_from_slice(b"MTrk");
    let err = Mthd::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::chunk(ChunkError::UnexpectedId {
            expected: *b"MThd",
            found: *b"MTrk"
        })
    );
}

#[test]
fn longer_header_is_skipped() {
    let mut bytes = alloc::vec::Vec::from(MTHD);
    bytes[7] = 8;
    bytes.extend([0xAA, 0xBB, 0x42]);
    let mut reader = Reader::from_byte_slice(&bytes);
    let mthd = Mthd::read(&mut reader).unwrap();
    assert_eq!(mthd.track_count(), 2);
    assert_eq!(reader.read_u8().unwrap(), 0x42);
}

#[test]
fn short_trailing_header_bytes() {
    let mut bytes = alloc::vec::Vec::from(MTHD);
    bytes[7] = 9;
    bytes.push(0xAA);
    let err = Mthd::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert_eq!(err.error_kind(), &ReaderErrorKind::TruncatedHeader);
    assert_eq!(err.position(), 14);
}

#[test]
fn short_header_length_is_rejected() {
    let mut bytes = MTHD;
    bytes[7] = 4;
    let err = Mthd::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::chunk(ChunkError::HeaderLength(4))
    );
}

#[test]
fn unknown_format() {
    assert_eq!(Mthd::new(0, 1, 96).format_type(), Some(FormatType::SingleMultiChannel));
    assert_eq!(Mthd::new(2, 1, 96).format_type(), Some(FormatType::SequentiallyIndependent));
    assert_eq!(Mthd::new(7, 1, 96).format_type(), None);
}
