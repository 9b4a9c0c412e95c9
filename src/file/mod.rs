#![doc = r#"
Standard MIDI File decoding

A file is an `MThd` chunk followed by chunks of which the `MTrk`s carry
events. [`SmfDecoder`] walks the chunks, hands out one [`TrackEvents`] stream
per track and, through [`SmfDecoder::read_notes`], pairs each track's events
into [`Note`]s.
"#]

mod chunk;
pub use chunk::*;

mod header;
pub use header::*;

mod timing;
pub use timing::*;

mod event;
pub use event::*;

mod track;
pub use track::*;

use crate::prelude::*;
use alloc::vec::Vec;

#[doc = r#"
Pull-based decoder over the bytes of a Standard MIDI File.

The header is read up front. Tracks are then taken one at a time with
[`next_track`](Self::next_track) until the declared track count is reached.
Chunks that are not `MTrk` are skipped and do not count as tracks.

# Example
```rust
# use smf_notes::prelude::*;
let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96,
    b'M', b'T', b'r', b'k', 0, 0, 0, 12,
    0x00, 0x90, 0x3C, 0x40,
    0x60, 0x80, 0x3C, 0x00,
    0x00, 0xFF, 0x2F, 0x00,
];
let decoder = SmfDecoder::new(&bytes).unwrap();
assert_eq!(decoder.header().timing(), Ok(Timing::TicksPerQuarterNote(96)));

let notes = decoder.read_notes().unwrap();
assert_eq!(notes.len(), 1);
assert_eq!(notes[0].duration, Duration::new(96));
```
"#]
#[derive(Clone, Debug)]
pub struct SmfDecoder<'a> {
    reader: Reader<'a>,
    header: Mthd,
    tracks_read: u16,
}

impl<'a> SmfDecoder<'a> {
    /// Reads the `MThd` chunk at the start of `bytes`.
    pub fn new(bytes: &'a [u8]) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(bytes);
        let header = Mthd::read(&mut reader)?;
        Ok(Self {
            reader,
            header,
            tracks_read: 0,
        })
    }

    /// The file header
    pub const fn header(&self) -> &Mthd {
        &self.header
    }

    /// The number of tracks handed out so far
    pub const fn tracks_read(&self) -> u16 {
        self.tracks_read
    }

    /// Finds the next `MTrk` chunk and returns a stream over its events.
    ///
    /// Returns `Ok(None)` once as many tracks as the header declares have been
    /// read. Running out of bytes before that, or a chunk whose declared
    /// length runs past the end of the input, is
    /// [`ReaderErrorKind::TruncatedStream`].
    pub fn next_track(&mut self) -> ReadResult<Option<TrackEvents<'a>>> {
        if self.tracks_read >= self.header.track_count() {
            return Ok(None);
        }
        loop {
            let chunk =
                ChunkHeader::read(&mut self.reader).map_err(ReaderError::into_truncated_stream)?;
            let body = self.reader.split_off(chunk.size() as usize)?;
            if chunk.is_track() {
                self.tracks_read += 1;
                return Ok(Some(TrackEvents::new(body)));
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "skipping {:?} chunk of {} bytes",
                chunk.id_str(),
                chunk.size()
            );
        }
    }

    /// Decodes every remaining track into notes.
    ///
    /// Each track gets a fresh [`NoteAssembler`]; the notes of each track
    /// keep their emission order and tracks are concatenated in file order.
    /// Any error aborts the decode and no notes are returned.
    pub fn read_notes(mut self) -> ReadResult<Vec<Note>> {
        let mut notes = Vec::new();
        while let Some(mut track) = self.next_track()? {
            let mut assembler = NoteAssembler::new();
            while let Some(event) = track.read_event()? {
                assembler
                    .process(&event)
                    .map_err(|e| ReaderError::parse_error(track.buffer_position(), e))?;
            }
            let track_notes = assembler.into_notes();
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "track {} produced {} notes",
                self.tracks_read - 1,
                track_notes.len()
            );
            notes.extend(track_notes);
        }
        Ok(notes)
    }
}

/// Decodes every track of a Standard MIDI File into notes.
///
/// Shorthand for [`SmfDecoder::new`] followed by [`SmfDecoder::read_notes`].
pub fn read_notes(bytes: &[u8]) -> ReadResult<Vec<Note>> {
    SmfDecoder::new(bytes)?.read_notes()
}

#[cfg(test)]
fn file(track_count: u16, chunks: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&1u16.to_be_bytes());
    bytes.extend_from_slice(&track_count.to_be_bytes());
    bytes.extend_from_slice(&480u16.to_be_bytes());
    for (id, body) in chunks {
        bytes.extend_from_slice(*id);
        bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
        bytes.extend_from_slice(body);
    }
    bytes
}

#[cfg(test)]
const EMPTY_TRACK: &[u8] = &[0x00, 0xFF, 0x2F, 0x00];

#[test]
fn stops_at_declared_track_count() {
    let bytes = file(1, &[(b"MTrk", EMPTY_TRACK), (b"MTrk", EMPTY_TRACK)]);
    let mut decoder = SmfDecoder::new(&bytes).unwrap();
    assert!(decoder.next_track().unwrap().is_some());
    assert!(decoder.next_track().unwrap().is_none());
    assert_eq!(decoder.tracks_read(), 1);
}

#[test]
fn alien_chunks_are_skipped() {
    let bytes = file(1, &[(b"XFIH", &[1, 2, 3]), (b"MTrk", EMPTY_TRACK)]);
    let mut decoder = SmfDecoder::new(&bytes).unwrap();
    let track = decoder.next_track().unwrap().unwrap();
    assert_eq!(track.buffer_position(), 14 + 8 + 3 + 8);
    assert_eq!(track.count(), 1);
}

#[test]
fn missing_track_is_truncation() {
    let bytes = file(2, &[(b"MTrk", EMPTY_TRACK)]);
    let mut decoder = SmfDecoder::new(&bytes).unwrap();
    decoder.next_track().unwrap();
    let err = decoder.next_track().unwrap_err();
    assert_eq!(err.error_kind(), &ReaderErrorKind::TruncatedStream);
    assert_eq!(err.position(), bytes.len());
}

#[test]
fn oversized_chunk_length_is_truncation() {
    let mut bytes = file(1, &[(b"MTrk", EMPTY_TRACK)]);
    bytes[14 + 7] = 0xFF;
    let err = read_notes(&bytes).unwrap_err();
    assert_eq!(err.error_kind(), &ReaderErrorKind::TruncatedStream);
    assert_eq!(err.position(), 22);
}

#[test]
fn clock_overflow_reports_position() {
    // each delta fits in a u64, their sum does not
    let mut body = Vec::new();
    for _ in 0..2 {
        body.extend_from_slice(&crate::reader::vli::encode(u64::MAX));
        body.extend_from_slice(&[0x90, 0x3C, 0x40]);
    }
    body.extend_from_slice(EMPTY_TRACK);
    let bytes = file(1, &[(b"MTrk", &body)]);
    let err = read_notes(&bytes).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::ParseError(ParseError::IntegerOverflow)
    );
    assert_eq!(err.position(), 22 + body.len() - EMPTY_TRACK.len());
}
