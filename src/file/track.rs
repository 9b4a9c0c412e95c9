use crate::prelude::*;

#[doc = r#"
Decodes the body of one `MTrk` chunk into [`TrackEvent`]s.

Each event is read as a variable length delta-time, a status byte, and a
payload whose shape depends on the status. A byte with its high bit clear
where a status byte is expected is running status: the previous status is
reused and that byte is left in place as the first data byte.

Decoding stops after the End Of Track meta event. Bytes after it are never
looked at, and running out of bytes before it is an error.

# Example
```rust
# use smf_notes::prelude::*;
let body = [
    0x00, 0x90, 0x3C, 0x40, // note on, C4
    0x60, 0x3C, 0x00,       // running status: note on, velocity 0
    0x00, 0xFF, 0x2F, 0x00, // end of track
];
let events = TrackEvents::from_body(&body)
    .collect::<Result<Vec<_>, _>>()
    .unwrap();
assert_eq!(events.len(), 3);
assert_eq!(events[1].delta(), Duration::new(0x60));
assert!(events[2].is_end_of_track());
```
"#]
#[derive(Clone, Debug)]
pub struct TrackEvents<'a> {
    reader: Reader<'a>,
    running_status: Option<u8>,
    finished: bool,
}

impl<'a> TrackEvents<'a> {
    /// Decode events from a reader bounded to one chunk body.
    pub const fn new(reader: Reader<'a>) -> Self {
        Self {
            reader,
            running_status: None,
            finished: false,
        }
    }

    /// Decode events from a chunk body slice.
    pub const fn from_body(body: &'a [u8]) -> Self {
        Self::new(Reader::from_byte_slice(body))
    }

    /// The status byte running status would reuse, if one has been seen.
    pub const fn running_status(&self) -> Option<u8> {
        self.running_status
    }

    /// True once End Of Track has been read or an error was returned.
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// The absolute position of the next byte to decode.
    pub const fn buffer_position(&self) -> usize {
        self.reader.buffer_position()
    }

    /// Reads the next event.
    ///
    /// Returns `Ok(None)` once the track has finished.
    pub fn read_event(&mut self) -> ReadResult<Option<TrackEvent<'a>>> {
        if self.finished {
            return Ok(None);
        }
        match self.decode_event() {
            Ok(event) => {
                if event.is_end_of_track() {
                    self.finished = true;
                }
                Ok(Some(event))
            }
            Err(e) => {
                self.finished = true;
                Err(e)
            }
        }
    }

    fn decode_event(&mut self) -> ReadResult<TrackEvent<'a>> {
        let delta = Duration::new(self.reader.read_vli()?);
        let status = self.read_status()?;

        let kind = match status {
            META_STATUS => {
                let kind = self.reader.read_u8()?;
                let data = self.read_length_prefixed()?;
                EventKind::Meta { kind, data }
            }
            SYSEX_STATUS | SYSEX_ESCAPE_STATUS => EventKind::Sysex {
                data: self.read_length_prefixed()?,
            },
            _ => {
                let Some(voice) = VoiceKind::from_status(status) else {
                    return Err(inv_data(
                        &self.reader,
                        ParseError::UnrecognizedEventType(status),
                    ));
                };
                self.read_voice(voice, Channel::from_status(status))?
            }
        };

        Ok(TrackEvent::new(delta, kind))
    }

    /// A new status byte is consumed and remembered. A data byte is left unread
    /// so the payload reader sees it first.
    fn read_status(&mut self) -> ReadResult<u8> {
        let byte = self.reader.peek_u8()?;
        if byte & 0x80 != 0 {
            self.reader.read_u8()?;
            self.running_status = Some(byte);
            return Ok(byte);
        }
        self.running_status
            .ok_or_else(|| inv_data(&self.reader, ParseError::UnrecognizedEventType(byte)))
    }

    fn read_length_prefixed(&mut self) -> ReadResult<&'a [u8]> {
        let at = self.reader.buffer_position();
        let len = self.reader.read_vli()?;
        let len = usize::try_from(len).map_err(|_| ReaderError::truncated(at))?;
        self.reader.read_slice(len)
    }

    fn read_data_byte(&mut self) -> ReadResult<u8> {
        let byte = self.reader.read_u8()?;
        if byte & 0x80 != 0 {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "data byte {byte:#04X} at {} has its high bit set; masking to 7 bits",
                self.reader.buffer_position() - 1
            );
        }
        Ok(byte & 0x7F)
    }

    fn read_voice(&mut self, voice: VoiceKind, channel: Channel) -> ReadResult<EventKind<'a>> {
        let first = self.read_data_byte()?;
        let second = match voice.data_len() {
            2 => self.read_data_byte()?,
            _ => 0,
        };

        Ok(match voice {
            VoiceKind::NoteOff => EventKind::NoteOff {
                channel,
                note: NoteNumber::from_data_byte(first),
                velocity: second,
            },
            VoiceKind::NoteOn => EventKind::NoteOn {
                channel,
                note: NoteNumber::from_data_byte(first),
                velocity: second,
            },
            VoiceKind::PolyphonicKeyPressure => EventKind::PolyphonicKeyPressure {
                channel,
                note: NoteNumber::from_data_byte(first),
                pressure: second,
            },
            VoiceKind::ControlChange => EventKind::ControlChange {
                channel,
                controller: first,
                value: second,
            },
            VoiceKind::ProgramChange => EventKind::ProgramChange {
                channel,
                program: Instrument::from_data_byte(first),
            },
            VoiceKind::ChannelPressure => EventKind::ChannelPressure {
                channel,
                pressure: first,
            },
            VoiceKind::PitchWheelChange => EventKind::PitchWheelChange {
                channel,
                value: (u16::from(second) << 7) | u16::from(first),
            },
        })
    }
}

impl<'a> Iterator for TrackEvents<'a> {
    type Item = ReadResult<TrackEvent<'a>>;
    fn next(&mut self) -> Option<Self::Item> {
        self.read_event().transpose()
    }
}

impl core::iter::FusedIterator for TrackEvents<'_> {}

#[cfg(test)]
use alloc::vec::Vec;

#[cfg(test)]
const END_OF_TRACK: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

#[cfg(test)]
fn decode_all(body: &[u8]) -> ReadResult<Vec<TrackEvent<'_>>> {
    TrackEvents::from_body(body).collect()
}

#[cfg(test)]
fn with_end(events: &[u8]) -> Vec<u8> {
    let mut body = Vec::from(events);
    body.extend(END_OF_TRACK);
    body
}

#[cfg(test)]
fn ch(n: u8) -> Channel {
    Channel::new(n).unwrap()
}

#[cfg(test)]
fn nn(n: u8) -> NoteNumber {
    NoteNumber::new(n).unwrap()
}

#[cfg(test)]
fn eot() -> TrackEvent<'static> {
    TrackEvent::new(
        Duration::ZERO,
        EventKind::Meta {
            kind: meta::END_OF_TRACK,
            data: &[],
        },
    )
}

#[test]
fn empty_track() {
    let events = decode_all(&END_OF_TRACK).unwrap();
    assert_eq!(events, [eot()]);
}

#[test]
fn meta_event_with_payload() {
    let body = with_end(&[0x00, 0xFF, meta::TRACK_NAME, 0x03, b'a', b'b', b'c']);
    let events = decode_all(&body).unwrap();
    assert_eq!(
        events[0],
        TrackEvent::new(
            Duration::ZERO,
            EventKind::Meta {
                kind: meta::TRACK_NAME,
                data: b"abc"
            }
        )
    );
    assert_eq!(events[1], eot());
}

#[test]
fn sysex_payloads() {
    let body = with_end(&[0x00, 0xF0, 0x03, b'a', b'b', b'c', 0x00, 0xF7, 0x00]);
    let events = decode_all(&body).unwrap();
    assert_eq!(*events[0].kind(), EventKind::Sysex { data: b"abc" });
    assert_eq!(*events[1].kind(), EventKind::Sysex { data: &[] });
}

#[test]
fn sysex_with_multi_byte_length() {
    // length VLI 0x80 0x00 is a two byte encoding of zero
    let body = with_end(&[0x00, 0xF0, 0x80, 0x00]);
    let events = decode_all(&body).unwrap();
    assert_eq!(*events[0].kind(), EventKind::Sysex { data: &[] });

    let body = with_end(&[0x00, 0xF0, 0x80, 0x80, 0x01, b'q']);
    let events = decode_all(&body).unwrap();
    assert_eq!(*events[0].kind(), EventKind::Sysex { data: b"q" });
}

#[test]
fn multi_byte_delta_time() {
    let body = with_end(&[0b1000_0001, 0b0111_1111, 0xF0, 0x00]);
    let events = decode_all(&body).unwrap();
    assert_eq!(events[0].delta(), Duration::new(0b1111_1111));
}

#[test]
fn channel_voice_messages() {
    let body = with_end(&[
        0x00, 0x80, 60, 10, // note off
        0x01, 0x91, 61, 20, // note on
        0x02, 0xA2, 62, 30, // poly pressure
        0x03, 0xB3, 7, 100, // control change
        0x04, 0xC4, 41, // program change
        0x05, 0xD5, 99, // channel pressure
        0x06, 0xEF, 0x00, 0x40, // pitch wheel, centered
    ]);
    let events = decode_all(&body).unwrap();
    let kinds: Vec<_> = events.iter().map(|e| *e.kind()).collect();
    pretty_assertions::assert_eq!(
        kinds,
        [
            EventKind::NoteOff {
                channel: ch(0),
                note: nn(60),
                velocity: 10
            },
            EventKind::NoteOn {
                channel: ch(1),
                note: nn(61),
                velocity: 20
            },
            EventKind::PolyphonicKeyPressure {
                channel: ch(2),
                note: nn(62),
                pressure: 30
            },
            EventKind::ControlChange {
                channel: ch(3),
                controller: 7,
                value: 100
            },
            EventKind::ProgramChange {
                channel: ch(4),
                program: Instrument::new(41).unwrap()
            },
            EventKind::ChannelPressure {
                channel: ch(5),
                pressure: 99
            },
            EventKind::PitchWheelChange {
                channel: ch(15),
                value: 0x2000
            },
            *eot().kind(),
        ]
    );
    let deltas: Vec<_> = events.iter().map(|e| e.delta().ticks()).collect();
    assert_eq!(deltas, [0, 1, 2, 3, 4, 5, 6, 0]);
}

#[test]
fn pitch_wheel_is_low_byte_first() {
    let value: u16 = 0b11_0110_1110_0111;
    let body = with_end(&[
        0b1000_0001,
        0b0000_0001,
        0xEF,
        (value & 0x7F) as u8,
        (value >> 7) as u8,
    ]);
    let events = decode_all(&body).unwrap();
    assert_eq!(events[0].delta(), Duration::new(129));
    assert_eq!(
        *events[0].kind(),
        EventKind::PitchWheelChange {
            channel: ch(15),
            value
        }
    );
}

#[test]
fn running_status_repeats_the_last_status() {
    let body = with_end(&[
        0x00, 0x93, 60, 100, // explicit status
        0x10, 62, 101, // running
        0x20, 64, 102, // running
    ]);
    let events = decode_all(&body).unwrap();
    assert_eq!(events.len(), 4);
    for (event, (note, velocity)) in events.iter().zip([(60, 100), (62, 101), (64, 102)]) {
        assert_eq!(
            *event.kind(),
            EventKind::NoteOn {
                channel: ch(3),
                note: nn(note),
                velocity
            }
        );
    }
    assert_eq!(events[2].delta(), Duration::new(0x20));
}

#[test]
fn running_status_with_one_data_byte() {
    let body = with_end(&[0x00, 0xC2, 5, 0x00, 6]);
    let events = decode_all(&body).unwrap();
    assert_eq!(
        *events[1].kind(),
        EventKind::ProgramChange {
            channel: ch(2),
            program: Instrument::new(6).unwrap()
        }
    );
}

#[test]
fn running_status_after_sysex_reads_a_fresh_length() {
    // the byte after the delta-time is the first byte of the length VLI
    let body = with_end(&[0x00, 0xF0, 0x01, b'x', 0x00, 0x02, b'y', b'z']);
    let events = decode_all(&body).unwrap();
    assert_eq!(*events[0].kind(), EventKind::Sysex { data: b"x" });
    assert_eq!(*events[1].kind(), EventKind::Sysex { data: b"yz" });
}

#[test]
fn end_of_track_stops_decoding() {
    let mut body = Vec::from(END_OF_TRACK);
    body.extend([0xDE, 0xAD, 0xBE, 0xEF]);
    let mut events = TrackEvents::from_body(&body);
    assert_eq!(events.next(), Some(Ok(eot())));
    assert!(events.is_finished());
    assert_eq!(events.next(), None);
    assert_eq!(events.buffer_position(), 4);
}

#[test]
fn missing_end_of_track_is_truncation() {
    let body = [0x00, 0x90, 60, 100];
    let mut events = TrackEvents::from_body(&body);
    assert!(events.next().unwrap().is_ok());
    let err = events.next().unwrap().unwrap_err();
    assert_eq!(err.error_kind(), &ReaderErrorKind::TruncatedStream);
    assert_eq!(events.next(), None);
}

#[test]
fn short_payloads_are_truncation() {
    for body in [
        &[0x00, 0x90, 60][..],
        &[0x00, 0xFF, 0x01, 0x05, b'a'][..],
        &[0x00, 0xF0, 0x02, 0x01][..],
        &[0x00, 0xFF][..],
        &[0x81][..],
    ] {
        let err = decode_all(body).unwrap_err();
        assert_eq!(err.error_kind(), &ReaderErrorKind::TruncatedStream);
    }
}

#[test]
fn unrecognized_status() {
    for status in [0xF1, 0xF2, 0xF3, 0xF6, 0xF8, 0xFE] {
        let body = with_end(&[0x00, status, 0x00]);
        let err = decode_all(&body).unwrap_err();
        assert_eq!(
            err.error_kind(),
            &ReaderErrorKind::ParseError(ParseError::UnrecognizedEventType(status))
        );
        assert_eq!(err.position(), 2);
    }
}

#[test]
fn data_byte_without_running_status() {
    let body = with_end(&[0x00, 0x40, 0x40]);
    let err = decode_all(&body).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::ParseError(ParseError::UnrecognizedEventType(0x40))
    );
    assert_eq!(err.position(), 1);
}

#[test]
fn high_bit_data_bytes_are_masked() {
    let body = with_end(&[0x00, 0x90, 0x3C, 0x40, 0x00, 0x90, 0x3C, 0xC0]);
    let events = decode_all(&body).unwrap();
    assert_eq!(
        *events[1].kind(),
        EventKind::NoteOn {
            channel: ch(0),
            note: nn(0x3C),
            velocity: 0x40
        }
    );
}
