#![doc = r#"
Completed notes and the engine that pairs note-on and note-off events into them
"#]

mod assembler;
pub use assembler::*;

use crate::prelude::*;
use core::fmt;

/// A sounded note: when it started, how long it lasted, and how it was played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    /// Pitch
    pub note_number: NoteNumber,
    /// Absolute tick of the note-on
    pub start: Time,
    /// Ticks until the note was released
    pub duration: Duration,
    /// Note-on velocity
    pub velocity: u8,
    /// Program of the channel when the note started
    pub instrument: Instrument,
}

impl Note {
    /// Create a new note
    pub const fn new(
        note_number: NoteNumber,
        start: Time,
        duration: Duration,
        velocity: u8,
        instrument: Instrument,
    ) -> Self {
        Self {
            note_number,
            start,
            duration,
            velocity,
            instrument,
        }
    }

    /// The tick at which the note was released, capped at `u64::MAX`
    pub const fn end(&self) -> Time {
        self.start.saturating_add(self.duration)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} start={} duration={} velocity={} instrument={}",
            self.note_number, self.start, self.duration, self.velocity, self.instrument
        )
    }
}

/// Sorts notes by start time, then pitch. Notes are emitted in the order
/// they end, so anything that draws or plays them usually wants this first.
pub fn sort_by_start(notes: &mut [Note]) {
    notes.sort_by_key(|n| (n.start, n.note_number));
}

/// The extent of a set of notes in time and pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteSpan {
    /// The latest release time
    pub end: Time,
    /// The lowest pitch present
    pub lowest: NoteNumber,
    /// The highest pitch present
    pub highest: NoteNumber,
}

impl NoteSpan {
    /// Returns `None` for an empty list.
    pub fn of(notes: &[Note]) -> Option<Self> {
        let first = notes.first()?;
        let init = Self {
            end: first.end(),
            lowest: first.note_number,
            highest: first.note_number,
        };
        Some(notes.iter().fold(init, |span, note| Self {
            end: span.end.max(note.end()),
            lowest: span.lowest.min(note.note_number),
            highest: span.highest.max(note.note_number),
        }))
    }

    /// The number of distinct pitches between lowest and highest, inclusive
    pub fn pitch_range(&self) -> u8 {
        self.highest.value() - self.lowest.value() + 1
    }
}

#[cfg(test)]
fn note(number: u8, start: u64, duration: u64) -> Note {
    Note::new(
        NoteNumber::new(number).unwrap(),
        Time::new(start),
        Duration::new(duration),
        100,
        Instrument::default(),
    )
}

#[test]
fn span_of_notes() {
    let notes = [note(60, 0, 100), note(48, 50, 20), note(72, 200, 10)];
    let span = NoteSpan::of(&notes).unwrap();
    assert_eq!(span.end, Time::new(210));
    assert_eq!(span.lowest.value(), 48);
    assert_eq!(span.highest.value(), 72);
    assert_eq!(span.pitch_range(), 25);
    assert_eq!(NoteSpan::of(&[]), None);
}

#[test]
fn sorting_by_start() {
    let mut notes = [note(60, 300, 1), note(64, 0, 1), note(62, 0, 1)];
    sort_by_start(&mut notes);
    let order: alloc::vec::Vec<_> = notes.iter().map(|n| n.note_number.value()).collect();
    assert_eq!(order, [62, 64, 60]);
}

#[test]
fn end_is_start_plus_duration() {
    assert_eq!(note(1, 40, 2).end(), Time::new(42));
}

#[test]
fn end_of_a_note_past_the_last_tick() {
    let late = note(1, u64::MAX - 10, 100);
    assert_eq!(late.end(), Time::new(u64::MAX));
    assert_eq!(NoteSpan::of(&[late]).unwrap().end, Time::new(u64::MAX));
}
