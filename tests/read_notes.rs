mod common;

use common::*;
use pretty_assertions::assert_eq;
use smf_notes::prelude::*;

fn note(number: u8, start: u64, duration: u64, velocity: u8, instrument: u8) -> Note {
    Note::new(
        NoteNumber::new(number).unwrap(),
        Time::new(start),
        Duration::new(duration),
        velocity,
        Instrument::new(instrument).unwrap(),
    )
}

#[test]
fn zero_tracks() {
    let bytes = mthd(0);
    assert!(read_notes(&bytes).unwrap().is_empty());
}

#[test]
fn no_notes_in_track() {
    let bytes = smf(&[&[]]);
    assert!(read_notes(&bytes).unwrap().is_empty());
}

#[test]
fn single_note() {
    let track = events(&[(0, &note_on(0, 5, 127)), (100, &note_off(0, 5, 0))]);
    let bytes = smf(&[&track]);
    assert_eq!(read_notes(&bytes).unwrap(), [note(5, 0, 100, 127, 0)]);
}

#[test]
fn single_note_with_instrument_5() {
    let track = events(&[
        (0, &program_change(0, 5)),
        (0, &note_on(0, 5, 127)),
        (100, &note_off(0, 5, 0)),
    ]);
    let bytes = smf(&[&track]);
    assert_eq!(read_notes(&bytes).unwrap(), [note(5, 0, 100, 127, 5)]);
}

#[test]
fn two_notes_with_instruments_1_and_2() {
    let track = events(&[
        (0, &program_change(0, 1)),
        (0, &note_on(0, 5, 120)),
        (100, &note_off(0, 5, 0)),
        (0, &program_change(0, 2)),
        (100, &note_on(0, 8, 100)),
        (100, &note_on(0, 8, 0)),
    ]);
    let bytes = smf(&[&track]);
    assert_eq!(
        read_notes(&bytes).unwrap(),
        [note(5, 0, 100, 120, 1), note(8, 200, 100, 100, 2)]
    );
}

#[test]
fn notes_on_different_channels() {
    let track = events(&[
        (0, &program_change(1, 40)),
        (0, &note_on(0, 60, 90)),
        (10, &note_on(1, 64, 80)),
        (10, &note_off(0, 60, 0)),
        (10, &note_off(1, 64, 0)),
    ]);
    let bytes = smf(&[&track]);
    assert_eq!(
        read_notes(&bytes).unwrap(),
        [note(60, 0, 20, 90, 0), note(64, 10, 20, 80, 40)]
    );
}

#[test]
fn tracks_are_concatenated_in_order_with_fresh_state() {
    let first = events(&[
        (0, &program_change(0, 7)),
        (0, &note_on(0, 60, 90)),
        (50, &note_off(0, 60, 0)),
        // left open, dropped at the end of the track
        (0, &note_on(0, 61, 90)),
    ]);
    let second = events(&[(10, &note_on(0, 61, 70)), (10, &note_off(0, 61, 0))]);
    let bytes = smf(&[&first, &second]);
    assert_eq!(
        read_notes(&bytes).unwrap(),
        [note(60, 0, 50, 90, 7), note(61, 10, 10, 70, 0)]
    );
}

#[test]
fn many_notes_in_sequence() {
    let mut track = Vec::new();
    for _ in 0..1000 {
        track.extend(events(&[
            (0, &note_on(0, 69, 71)),
            (100, &note_off(0, 69, 71)),
        ]));
    }
    let bytes = smf(&[&track]);
    let notes = read_notes(&bytes).unwrap();
    assert_eq!(notes.len(), 1000);
    for (i, n) in notes.iter().enumerate() {
        assert_eq!(n.start, Time::new(i as u64 * 100));
        assert_eq!(n.duration, Duration::new(100));
        assert_eq!(n.note_number.value(), 69);
    }
}

#[test]
fn running_status_across_notes() {
    let mut track = vec![0x00, 0x90, 0x3C, 0x40];
    // running status: velocity 0 closes, then a new note
    track.extend_from_slice(&[0x20, 0x3C, 0x00, 0x00, 0x3E, 0x50, 0x20, 0x3E, 0x00]);
    let bytes = smf(&[&track]);
    assert_eq!(
        read_notes(&bytes).unwrap(),
        [note(60, 0, 32, 0x40, 0), note(62, 32, 32, 0x50, 0)]
    );
}

#[test]
fn decoding_is_idempotent() {
    let track = events(&[
        (0, &note_on(3, 50, 72)),
        (20, &note_on(3, 40, 75)),
        (40, &note_off(3, 40, 0)),
        (30, &note_off(3, 50, 0)),
    ]);
    let bytes = smf(&[&track, &track]);
    let first = read_notes(&bytes).unwrap();
    let second = read_notes(&bytes).unwrap();
    assert_eq!(first.len(), 4);
    assert_eq!(first, second);
}

#[test]
fn bytes_after_end_of_track_are_ignored() {
    let mut body = events(&[(0, &note_on(0, 5, 1)), (1, &note_off(0, 5, 0))]);
    body.extend_from_slice(&END_OF_TRACK);
    body.extend_from_slice(&[0x00, 0xF4, 0xFF]);
    let mut bytes = mthd(1);
    bytes.extend(chunk(b"MTrk", &body));
    assert_eq!(read_notes(&bytes).unwrap(), [note(5, 0, 1, 1, 0)]);
}

#[test]
fn alien_chunks_do_not_count_as_tracks() {
    let mut bytes = mthd(1);
    bytes.extend(chunk(b"XFIH", b"vendor data"));
    bytes.extend(mtrk(&events(&[
        (0, &note_on(0, 5, 1)),
        (1, &note_off(0, 5, 0)),
    ])));
    assert_eq!(read_notes(&bytes).unwrap(), [note(5, 0, 1, 1, 0)]);
}

#[test]
fn missing_track_is_truncated_stream() {
    let mut bytes = mthd(2);
    bytes.extend(mtrk(&[]));
    let err = read_notes(&bytes).unwrap_err();
    assert_eq!(err.error_kind(), &ReaderErrorKind::TruncatedStream);
    assert_eq!(err.position(), bytes.len());
}

#[test]
fn partial_track_header_is_truncated_stream() {
    let mut bytes = mthd(1);
    bytes.extend_from_slice(b"MTr");
    let err = read_notes(&bytes).unwrap_err();
    assert_eq!(err.error_kind(), &ReaderErrorKind::TruncatedStream);
    assert_eq!(err.position(), 14);
}

#[test]
fn track_without_end_of_track_is_truncated_stream() {
    let mut bytes = mthd(1);
    bytes.extend(chunk(b"MTrk", &[0x00, 0x90, 0x3C, 0x40]));
    let err = read_notes(&bytes).unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.error_kind(), &ReaderErrorKind::TruncatedStream);
}

#[test]
fn truncated_header_chunk() {
    let bytes = &mthd(1)[..10];
    let err = read_notes(bytes).unwrap_err();
    assert_eq!(err.error_kind(), &ReaderErrorKind::TruncatedHeader);
}

#[test]
fn unrecognized_event_type_aborts() {
    let bytes = smf(&[&[0x00, 0xF4]]);
    let err = read_notes(&bytes).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::ParseError(ParseError::UnrecognizedEventType(0xF4))
    );
}

#[test]
fn decoder_exposes_header_and_events() {
    let track = events(&[(0, &note_on(9, 36, 100)), (0, &[0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20])]);
    let bytes = smf(&[&track]);
    let mut decoder = SmfDecoder::new(&bytes).unwrap();
    assert_eq!(decoder.header().format_type(), Some(FormatType::Simultaneous));
    assert_eq!(decoder.header().track_count(), 1);
    assert_eq!(
        decoder.header().timing(),
        Ok(Timing::TicksPerQuarterNote(256))
    );

    let track = decoder.next_track().unwrap().unwrap();
    let kinds: Vec<EventKind<'_>> = track.map(|e| *e.unwrap().kind()).collect();
    assert_eq!(
        kinds,
        [
            EventKind::NoteOn {
                channel: Channel::new(9).unwrap(),
                note: NoteNumber::new(36).unwrap(),
                velocity: 100,
            },
            EventKind::Meta {
                kind: meta::TEMPO,
                data: &[0x07, 0xA1, 0x20],
            },
            EventKind::Meta {
                kind: meta::END_OF_TRACK,
                data: &[],
            },
        ]
    );
    assert!(decoder.next_track().unwrap().is_none());
}
