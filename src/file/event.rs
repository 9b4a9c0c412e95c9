#![doc = r#"
Tagged track events

Every event in an `MTrk` chunk is a delta-time followed by one of three
kinds of message, told apart by the status byte:

```text
FF type len data...    meta event
F0 len data...         system exclusive
F7 len data...         system exclusive (continuation / escape)
8n..En data...         channel voice message on channel n
```

Meta and sysex payloads borrow from the decoded buffer rather than being copied.
"#]

use crate::prelude::*;
use num_enum::TryFromPrimitive;

/// Well-known meta event types
pub mod meta {
    /// Sequence number
    pub const SEQUENCE_NUMBER: u8 = 0x00;
    /// Arbitrary text
    pub const TEXT: u8 = 0x01;
    /// Copyright notice
    pub const COPYRIGHT: u8 = 0x02;
    /// Sequence or track name
    pub const TRACK_NAME: u8 = 0x03;
    /// Instrument name
    pub const INSTRUMENT_NAME: u8 = 0x04;
    /// Lyric
    pub const LYRIC: u8 = 0x05;
    /// Marker
    pub const MARKER: u8 = 0x06;
    /// Cue point
    pub const CUE_POINT: u8 = 0x07;
    /// Terminates a track. Exactly one per track, always last.
    pub const END_OF_TRACK: u8 = 0x2F;
    /// Microseconds per quarter note, 24-bit big-endian
    pub const TEMPO: u8 = 0x51;
    /// SMPTE offset of the track start
    pub const SMPTE_OFFSET: u8 = 0x54;
    /// Time signature
    pub const TIME_SIGNATURE: u8 = 0x58;
    /// Key signature
    pub const KEY_SIGNATURE: u8 = 0x59;
}

/// Status byte of a meta event
pub const META_STATUS: u8 = 0xFF;
/// Status byte of a system exclusive event
pub const SYSEX_STATUS: u8 = 0xF0;
/// Status byte of a system exclusive continuation or escape
pub const SYSEX_ESCAPE_STATUS: u8 = 0xF7;

#[doc = r#"
The top nibble of a channel voice status byte
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum VoiceKind {
    /// `0x8n note velocity`
    NoteOff = 0x8,
    /// `0x9n note velocity`
    NoteOn = 0x9,
    /// `0xAn note pressure`
    PolyphonicKeyPressure = 0xA,
    /// `0xBn controller value`
    ControlChange = 0xB,
    /// `0xCn program`
    ProgramChange = 0xC,
    /// `0xDn pressure`
    ChannelPressure = 0xD,
    /// `0xEn lsb msb`
    PitchWheelChange = 0xE,
}

impl VoiceKind {
    /// Identify the kind of a status byte, if it is a channel voice status.
    pub fn from_status(status: u8) -> Option<Self> {
        Self::try_from(status >> 4).ok()
    }

    /// The number of data bytes following the status byte
    pub const fn data_len(&self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelPressure => 1,
            _ => 2,
        }
    }
}

/// The message part of a [`TrackEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind<'a> {
    /// A key was pressed
    NoteOn {
        /// The channel
        channel: Channel,
        /// The key
        note: NoteNumber,
        /// Velocity. Zero is a note-off by convention.
        velocity: u8,
    },
    /// A key was released
    NoteOff {
        /// The channel
        channel: Channel,
        /// The key
        note: NoteNumber,
        /// Release velocity
        velocity: u8,
    },
    /// Aftertouch on a single key
    PolyphonicKeyPressure {
        /// The channel
        channel: Channel,
        /// The key
        note: NoteNumber,
        /// Pressure amount
        pressure: u8,
    },
    /// A controller moved
    ControlChange {
        /// The channel
        channel: Channel,
        /// Controller number
        controller: u8,
        /// Controller value
        value: u8,
    },
    /// The channel switched instrument
    ProgramChange {
        /// The channel
        channel: Channel,
        /// The new instrument
        program: Instrument,
    },
    /// Aftertouch on the whole channel
    ChannelPressure {
        /// The channel
        channel: Channel,
        /// Pressure amount
        pressure: u8,
    },
    /// The pitch wheel moved
    PitchWheelChange {
        /// The channel
        channel: Channel,
        /// 14-bit position, 0x2000 is centered
        value: u16,
    },
    /// Track metadata
    Meta {
        /// See [`meta`] for common types
        kind: u8,
        /// Raw payload
        data: &'a [u8],
    },
    /// System exclusive data
    Sysex {
        /// Raw payload, excluding the length prefix
        data: &'a [u8],
    },
}

impl EventKind<'_> {
    /// The channel of a channel voice message
    pub const fn channel(&self) -> Option<Channel> {
        use EventKind::*;
        match self {
            NoteOn { channel, .. }
            | NoteOff { channel, .. }
            | PolyphonicKeyPressure { channel, .. }
            | ControlChange { channel, .. }
            | ProgramChange { channel, .. }
            | ChannelPressure { channel, .. }
            | PitchWheelChange { channel, .. } => Some(*channel),
            Meta { .. } | Sysex { .. } => None,
        }
    }

    /// True for the meta event that terminates a track
    pub const fn is_end_of_track(&self) -> bool {
        matches!(
            self,
            EventKind::Meta {
                kind: meta::END_OF_TRACK,
                ..
            }
        )
    }
}

/// A delta-time paired with a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackEvent<'a> {
    delta: Duration,
    kind: EventKind<'a>,
}

impl<'a> TrackEvent<'a> {
    /// Create a new event
    pub const fn new(delta: Duration, kind: EventKind<'a>) -> Self {
        Self { delta, kind }
    }

    /// Ticks since the previous event of the same track
    pub const fn delta(&self) -> Duration {
        self.delta
    }

    /// The message
    pub const fn kind(&self) -> &EventKind<'a> {
        &self.kind
    }

    /// The channel of a channel voice message
    pub const fn channel(&self) -> Option<Channel> {
        self.kind.channel()
    }

    /// True for the meta event that terminates a track
    pub const fn is_end_of_track(&self) -> bool {
        self.kind.is_end_of_track()
    }
}

#[test]
fn voice_kinds_from_status() {
    assert_eq!(VoiceKind::from_status(0x80), Some(VoiceKind::NoteOff));
    assert_eq!(VoiceKind::from_status(0x9F), Some(VoiceKind::NoteOn));
    assert_eq!(VoiceKind::from_status(0xE3), Some(VoiceKind::PitchWheelChange));
    assert_eq!(VoiceKind::from_status(0xF0), None);
    assert_eq!(VoiceKind::from_status(0x7F), None);
    assert_eq!(VoiceKind::ProgramChange.data_len(), 1);
    assert_eq!(VoiceKind::ChannelPressure.data_len(), 1);
    assert_eq!(VoiceKind::ControlChange.data_len(), 2);
}

#[test]
fn channel_of_events() {
    let channel = Channel::new(9).unwrap();
    let on = EventKind::NoteOn {
        channel,
        note: NoteNumber::new(36).unwrap(),
        velocity: 90,
    };
    assert_eq!(on.channel(), Some(channel));
    assert_eq!(EventKind::Sysex { data: &[] }.channel(), None);

    let eot = TrackEvent::new(
        Duration::ZERO,
        EventKind::Meta {
            kind: meta::END_OF_TRACK,
            data: &[],
        },
    );
    assert!(eot.is_end_of_track());
    assert!(!TrackEvent::new(Duration::ZERO, on).is_end_of_track());
}
