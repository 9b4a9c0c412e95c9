use crate::prelude::*;
use alloc::vec::Vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNote {
    start: Time,
    velocity: u8,
    instrument: Instrument,
}

#[doc = r#"
The note-pairing state of a single channel.

Every event advances the channel's clock, whichever channel it addresses,
so all sixteen clocks stay equal to the track clock. Only events addressed
to this channel open or close its notes and change its instrument.
"#]
#[derive(Debug, Clone)]
pub struct ChannelState {
    channel: Channel,
    elapsed: Time,
    instrument: Instrument,
    open: [Option<OpenNote>; 128],
}

impl ChannelState {
    /// A channel at time zero, playing instrument 0, with no notes held.
    pub const fn new(channel: Channel) -> Self {
        Self {
            channel,
            elapsed: Time::ZERO,
            instrument: Instrument::from_data_byte(0),
            open: [None; 128],
        }
    }

    /// The channel this state tracks
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// Ticks since the start of the track
    pub const fn elapsed(&self) -> Time {
        self.elapsed
    }

    /// The program set by the last program change, 0 before any
    pub const fn instrument(&self) -> Instrument {
        self.instrument
    }

    /// True while a note-on for `note` is waiting for its note-off
    pub const fn is_open(&self, note: NoteNumber) -> bool {
        self.open[note.index()].is_some()
    }

    fn advance(&mut self, delta: Duration) -> Result<(), ParseError> {
        self.elapsed = self
            .elapsed
            .checked_add(delta)
            .ok_or(ParseError::IntegerOverflow)?;
        Ok(())
    }

    fn apply(&mut self, kind: &EventKind<'_>, notes: &mut Vec<Note>) {
        match *kind {
            EventKind::ProgramChange { program, .. } => self.instrument = program,
            EventKind::NoteOn { note, velocity, .. } if velocity > 0 => {
                // a re-triggered pitch closes the held one at this instant
                notes.extend(self.close(note));
                self.open[note.index()] = Some(OpenNote {
                    start: self.elapsed,
                    velocity,
                    instrument: self.instrument,
                });
            }
            EventKind::NoteOn { note, .. } | EventKind::NoteOff { note, .. } => {
                let closed = self.close(note);
                #[cfg(feature = "tracing")]
                if closed.is_none() {
                    tracing::trace!(
                        "note-off for {note} on channel {} with no open note",
                        self.channel
                    );
                }
                notes.extend(closed);
            }
            _ => {}
        }
    }

    fn close(&mut self, note: NoteNumber) -> Option<Note> {
        let open = self.open[note.index()].take()?;
        Some(Note::new(
            note,
            open.start,
            self.elapsed - open.start,
            open.velocity,
            open.instrument,
        ))
    }
}

#[doc = r#"
Pairs note-on and note-off events of one track into [`Note`]s.

Sixteen [`ChannelState`]s see every event. A note-on with a nonzero velocity
opens a note. A note-off, or a note-on with velocity zero, closes it. A
note-on for a pitch that is already sounding closes the sounding note and
opens a new one at the same tick. A note-off with nothing open is ignored.

Notes come out in the order they are closed, not the order they started.

# Example
```rust
# use smf_notes::prelude::*;
let channel = Channel::new(0).unwrap();
let note = NoteNumber::new(5).unwrap();

let mut assembler = NoteAssembler::new();
assembler
    .process(&TrackEvent::new(
        Duration::new(0),
        EventKind::NoteOn { channel, note, velocity: 11 },
    ))
    .unwrap();
assembler
    .process(&TrackEvent::new(
        Duration::new(100),
        EventKind::NoteOff { channel, note, velocity: 0 },
    ))
    .unwrap();

assert_eq!(
    assembler.notes(),
    [Note::new(note, Time::new(0), Duration::new(100), 11, Instrument::default())]
);
```
"#]
#[derive(Debug, Clone)]
pub struct NoteAssembler {
    channels: [ChannelState; 16],
    notes: Vec<Note>,
}

impl Default for NoteAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteAssembler {
    /// A fresh assembler for a new track
    pub fn new() -> Self {
        Self {
            channels: Channel::all().map(ChannelState::new),
            notes: Vec::new(),
        }
    }

    /// Feeds one event to every channel.
    ///
    /// Fails only if the track clock would exceed 64 bits.
    pub fn process(&mut self, event: &TrackEvent<'_>) -> Result<(), ParseError> {
        let target = event.channel();
        for state in &mut self.channels {
            state.advance(event.delta())?;
            if target == Some(state.channel) {
                state.apply(event.kind(), &mut self.notes);
            }
        }
        Ok(())
    }

    /// The state of one channel
    pub fn channel(&self, channel: Channel) -> &ChannelState {
        &self.channels[channel.value() as usize]
    }

    /// Notes completed so far, in closing order
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Consumes the assembler. Notes still held are dropped.
    pub fn into_notes(self) -> Vec<Note> {
        self.notes
    }
}

#[cfg(test)]
fn on(dt: u64, channel: u8, note: u8, velocity: u8) -> TrackEvent<'static> {
    TrackEvent::new(
        Duration::new(dt),
        EventKind::NoteOn {
            channel: Channel::new(channel).unwrap(),
            note: NoteNumber::new(note).unwrap(),
            velocity,
        },
    )
}

#[cfg(test)]
fn off(dt: u64, channel: u8, note: u8, velocity: u8) -> TrackEvent<'static> {
    TrackEvent::new(
        Duration::new(dt),
        EventKind::NoteOff {
            channel: Channel::new(channel).unwrap(),
            note: NoteNumber::new(note).unwrap(),
            velocity,
        },
    )
}

#[cfg(test)]
fn program(dt: u64, channel: u8, program: u8) -> TrackEvent<'static> {
    TrackEvent::new(
        Duration::new(dt),
        EventKind::ProgramChange {
            channel: Channel::new(channel).unwrap(),
            program: Instrument::new(program).unwrap(),
        },
    )
}

#[cfg(test)]
fn expected(note: u8, start: u64, duration: u64, velocity: u8, instrument: u8) -> Note {
    Note::new(
        NoteNumber::new(note).unwrap(),
        Time::new(start),
        Duration::new(duration),
        velocity,
        Instrument::new(instrument).unwrap(),
    )
}

#[cfg(test)]
fn assemble(events: &[TrackEvent<'_>]) -> Vec<Note> {
    let mut assembler = NoteAssembler::new();
    for event in events {
        assembler.process(event).unwrap();
    }
    assembler.into_notes()
}

#[test]
fn single_note() {
    let notes = assemble(&[on(0, 0, 5, 11), off(100, 0, 5, 0)]);
    assert_eq!(notes, [expected(5, 0, 100, 11, 0)]);

    let notes = assemble(&[on(0, 2, 5, 32), off(100, 2, 5, 0)]);
    assert_eq!(notes, [expected(5, 0, 100, 32, 0)]);
}

#[test]
fn consecutive_notes() {
    let notes = assemble(&[
        on(0, 0, 5, 112),
        off(100, 0, 5, 0),
        on(100, 0, 7, 113),
        off(100, 0, 7, 0),
    ]);
    assert_eq!(
        notes,
        [expected(5, 0, 100, 112, 0), expected(7, 200, 100, 113, 0)]
    );
}

#[test]
fn clocks_advance_on_other_channels() {
    let notes = assemble(&[
        on(0, 0, 5, 112),
        off(100, 0, 5, 0),
        on(100, 1, 7, 113),
        off(100, 1, 7, 0),
    ]);
    assert_eq!(
        notes,
        [expected(5, 0, 100, 112, 0), expected(7, 200, 100, 113, 0)]
    );
}

#[test]
fn meta_and_sysex_advance_clocks() {
    let mut assembler = NoteAssembler::new();
    assembler.process(&on(10, 4, 60, 70)).unwrap();
    assembler
        .process(&TrackEvent::new(
            Duration::new(30),
            EventKind::Meta {
                kind: meta::TEXT,
                data: b"hi",
            },
        ))
        .unwrap();
    assembler
        .process(&TrackEvent::new(
            Duration::new(60),
            EventKind::Sysex { data: &[1, 2] },
        ))
        .unwrap();
    assembler.process(&off(0, 4, 60, 0)).unwrap();
    assert_eq!(assembler.notes(), [expected(60, 10, 90, 70, 0)]);
    for channel in Channel::all() {
        assert_eq!(assembler.channel(channel).elapsed(), Time::new(100));
    }
}

#[test]
fn velocity_zero_note_on_is_note_off() {
    let notes = assemble(&[on(100, 5, 50, 64), on(200, 5, 50, 0)]);
    assert_eq!(notes, [expected(50, 100, 200, 64, 0)]);
}

#[test]
fn overlapping_notes_close_in_release_order() {
    let notes = assemble(&[
        on(100, 3, 50, 72),
        on(200, 3, 40, 75),
        off(400, 3, 40, 0),
        off(300, 3, 50, 0),
    ]);
    assert_eq!(
        notes,
        [expected(40, 300, 400, 75, 0), expected(50, 100, 900, 72, 0)]
    );
}

#[test]
fn retriggered_note_closes_the_held_one() {
    let notes = assemble(&[on(100, 0, 50, 64), on(300, 0, 50, 32), on(200, 0, 50, 0)]);
    assert_eq!(
        notes,
        [expected(50, 100, 300, 64, 0), expected(50, 400, 200, 32, 0)]
    );
}

#[test]
fn note_off_without_note_on_is_ignored() {
    let mut assembler = NoteAssembler::new();
    assembler.process(&off(10, 0, 60, 64)).unwrap();
    assembler.process(&on(10, 0, 61, 0)).unwrap();
    assert!(assembler.notes().is_empty());
    assert_eq!(
        assembler.channel(Channel::new(0).unwrap()).elapsed(),
        Time::new(20)
    );
}

#[test]
fn note_off_on_another_channel_does_not_close() {
    let mut assembler = NoteAssembler::new();
    assembler.process(&on(0, 0, 60, 64)).unwrap();
    assembler.process(&off(10, 1, 60, 64)).unwrap();
    assert!(assembler.notes().is_empty());
    let state = assembler.channel(Channel::new(0).unwrap());
    assert!(state.is_open(NoteNumber::new(60).unwrap()));
}

#[test]
fn five_simultaneous_notes_with_instruments() {
    let mut events = Vec::new();
    for channel in 0..5u8 {
        events.push(program(0, channel, (channel + 1) * 10));
    }
    for channel in 0..5u8 {
        events.push(on(0, channel, channel, channel + 1));
    }
    events.push(on(1000, 0, 0, 0));
    for channel in 1..5u8 {
        events.push(on(0, channel, channel, 0));
    }

    let notes = assemble(&events);
    let expected_notes: Vec<_> = (0..5u8)
        .map(|c| expected(c, 0, 1000, c + 1, (c + 1) * 10))
        .collect();
    pretty_assertions::assert_eq!(notes, expected_notes);
}

#[test]
fn program_change_on_other_channel_does_not_apply() {
    let notes = assemble(&[
        program(0, 0, 41),
        on(0, 0, 5, 112),
        off(100, 0, 5, 0),
        program(0, 1, 45),
        on(100, 0, 7, 113),
        off(100, 0, 7, 0),
    ]);
    assert_eq!(
        notes,
        [expected(5, 0, 100, 112, 41), expected(7, 200, 100, 113, 41)]
    );
}

#[test]
fn program_change_applies_to_notes_opened_after_it() {
    let notes = assemble(&[
        on(0, 0, 60, 90),
        program(10, 0, 20),
        on(0, 0, 62, 90),
        off(10, 0, 60, 0),
        off(0, 0, 62, 0),
    ]);
    assert_eq!(
        notes,
        [expected(60, 0, 20, 90, 0), expected(62, 10, 10, 90, 20)]
    );
    let mut assembler = NoteAssembler::new();
    assembler.process(&program(0, 9, 33)).unwrap();
    assert_eq!(
        assembler.channel(Channel::new(9).unwrap()).instrument(),
        Instrument::new(33).unwrap()
    );
}

#[test]
fn other_channel_messages_emit_nothing() {
    let channel = Channel::new(0).unwrap();
    let mut assembler = NoteAssembler::new();
    assembler.process(&on(0, 0, 60, 90)).unwrap();
    for kind in [
        EventKind::PolyphonicKeyPressure {
            channel,
            note: NoteNumber::new(60).unwrap(),
            pressure: 3,
        },
        EventKind::ControlChange {
            channel,
            controller: 64,
            value: 127,
        },
        EventKind::ChannelPressure {
            channel,
            pressure: 9,
        },
        EventKind::PitchWheelChange {
            channel,
            value: 0x3FFF,
        },
    ] {
        assembler
            .process(&TrackEvent::new(Duration::new(5), kind))
            .unwrap();
    }
    assert!(assembler.notes().is_empty());
    assembler.process(&off(0, 0, 60, 0)).unwrap();
    assert_eq!(assembler.notes(), [expected(60, 0, 20, 90, 0)]);
}

#[test]
fn clock_overflow_is_an_error() {
    let mut assembler = NoteAssembler::new();
    assembler.process(&on(u64::MAX, 0, 1, 1)).unwrap();
    assert_eq!(
        assembler.process(&off(1, 0, 1, 0)),
        Err(ParseError::IntegerOverflow)
    );
}

#[test]
fn unclosed_notes_are_dropped() {
    let notes = assemble(&[on(0, 0, 60, 90), on(10, 0, 61, 90), off(10, 0, 61, 0)]);
    assert_eq!(notes, [expected(61, 10, 10, 90, 0)]);
}
