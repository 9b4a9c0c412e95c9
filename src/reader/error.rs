use super::Reader;
use thiserror::Error;

#[doc = r#"
A set of errors that can occur while decoding a MIDI file
"#]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Reading at Position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReaderErrorKind {
    /// Parsing errors
    #[error("Parsing {0}")]
    ParseError(#[from] ParseError),
    /// Fewer bytes remain than a fixed-size or length-prefixed field requires.
    #[error("Stream ended before the field was complete")]
    TruncatedStream,
    /// Fewer bytes remain than a chunk header requires.
    #[error("Stream ended inside a chunk header")]
    TruncatedHeader,
}

/// Errors raised by well-formed reads of malformed data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The status byte is neither meta, sysex nor a channel voice message.
    ///
    /// Also raised for a data byte that appears before any status byte.
    #[error("Unrecognized event type {0:#04X}")]
    UnrecognizedEventType(u8),
    /// A variable length integer or an accumulated time exceeded 64 bits.
    #[error("Integer overflow")]
    IntegerOverflow,
    /// A chunk was not shaped as expected
    #[error("Chunk: {0}")]
    Chunk(#[from] ChunkError),
    /// The header's SMPTE division names an unsupported frame rate
    #[error("Invalid SMPTE frame rate {0}")]
    SmpteFrameRate(i8),
}

/// Errors tied to the chunk structure of a file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// The chunk id did not match the one required at this point
    #[error("Expected chunk {expected:?}, found {found:?}")]
    UnexpectedId {
        /// The id required here
        expected: [u8; 4],
        /// The id read from the stream
        found: [u8; 4],
    },
    /// The header chunk declared fewer than six bytes
    #[error("Header chunk length {0} is shorter than 6")]
    HeaderLength(u32),
}

impl ReaderErrorKind {
    pub(crate) const fn chunk(chunk_err: ChunkError) -> Self {
        Self::ParseError(ParseError::Chunk(chunk_err))
    }
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }
    /// True if the stream ended early, either inside a header or a track
    pub const fn is_truncated(&self) -> bool {
        matches!(
            self.kind,
            ReaderErrorKind::TruncatedStream | ReaderErrorKind::TruncatedHeader
        )
    }
    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }
    /// Returns the position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Create a new invalid data error
    pub const fn parse_error(position: usize, error: ParseError) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::ParseError(error),
        }
    }

    /// Create a new truncated stream error
    pub const fn truncated(position: usize) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::TruncatedStream,
        }
    }

    /// Reclassify a short header read as a short stream read.
    ///
    /// Track chunk headers are part of the stream: running out of bytes
    /// while looking for one means the file ended early.
    pub(crate) fn into_truncated_stream(self) -> Self {
        match self.kind {
            ReaderErrorKind::TruncatedHeader => Self::truncated(self.position),
            _ => self,
        }
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;

pub(crate) fn inv_data(reader: &Reader<'_>, v: impl Into<ParseError>) -> ReaderError {
    ReaderError::parse_error(reader.buffer_position(), v.into())
}

#[test]
fn header_truncation_becomes_stream_truncation() {
    let err = ReaderError::new(12, ReaderErrorKind::TruncatedHeader);
    let err = err.into_truncated_stream();
    assert_eq!(err.error_kind(), &ReaderErrorKind::TruncatedStream);
    assert_eq!(err.position(), 12);
    assert!(err.is_truncated());
}

#[test]
fn parse_errors_are_not_truncation() {
    let err = ReaderError::parse_error(3, ParseError::UnrecognizedEventType(0xF4));
    assert!(!err.is_truncated());
    assert_eq!(
        err.into_truncated_stream().error_kind(),
        &ReaderErrorKind::ParseError(ParseError::UnrecognizedEventType(0xF4))
    );
}
