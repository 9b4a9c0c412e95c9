//! Lists the notes of a Standard MIDI File.

use clap::Parser;
use smf_notes::prelude::*;
use std::{path::PathBuf, process::ExitCode};
use thiserror::Error;

#[derive(Debug, Error)]
enum ListError {
    #[error(transparent)]
    Read(#[from] ReaderError),
    #[error("--track {index} is out of range, the file declares {count} tracks")]
    TrackOutOfRange { index: u16, count: u16 },
}

impl ListError {
    fn exit_code(&self) -> ExitCode {
        match self {
            // usage errors exit like clap's own
            Self::TrackOutOfRange { .. } => ExitCode::from(2),
            Self::Read(_) => ExitCode::FAILURE,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// The .mid file to read
    path: PathBuf,

    /// Only list the notes of this track (0-based)
    #[arg(short, long)]
    track: Option<u16>,

    /// Order notes by start time instead of release time
    #[arg(short, long)]
    sorted: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let bytes = match std::fs::read(&args.path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("{}: {e}", args.path.display());
            return ExitCode::FAILURE;
        }
    };
    match run(&args, &bytes) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", args.path.display());
            e.exit_code()
        }
    }
}

fn check_track(index: Option<u16>, header: &Mthd) -> Result<(), ListError> {
    match index {
        Some(index) if index >= header.track_count() => Err(ListError::TrackOutOfRange {
            index,
            count: header.track_count(),
        }),
        _ => Ok(()),
    }
}

fn run(args: &Args, bytes: &[u8]) -> Result<(), ListError> {
    let mut decoder = SmfDecoder::new(bytes)?;
    check_track(args.track, decoder.header())?;
    print_header(decoder.header());

    let mut notes = match args.track {
        None => decoder.read_notes()?,
        Some(index) => track_notes(&mut decoder, index)?,
    };
    if args.sorted {
        sort_by_start(&mut notes);
    }

    for note in &notes {
        println!("{note}");
    }
    match NoteSpan::of(&notes) {
        Some(span) => println!(
            "{} notes, {} to {} ({} pitches), ending at tick {}",
            notes.len(),
            span.lowest,
            span.highest,
            span.pitch_range(),
            span.end
        ),
        None => println!("no notes"),
    }
    Ok(())
}

fn print_header(header: &Mthd) {
    let format = match header.format_type() {
        Some(FormatType::SingleMultiChannel) => "single multi-channel track",
        Some(FormatType::Simultaneous) => "simultaneous tracks",
        Some(FormatType::SequentiallyIndependent) => "sequential tracks",
        None => "unknown",
    };
    println!("format {} ({format})", header.format());
    println!("tracks {}", header.track_count());
    match header.timing() {
        Ok(timing) => println!("timing {timing}"),
        Err(e) => println!("timing {e}"),
    }
}

fn track_notes(decoder: &mut SmfDecoder<'_>, index: u16) -> ReadResult<Vec<Note>> {
    let mut assembler = NoteAssembler::new();
    while let Some(mut track) = decoder.next_track()? {
        if decoder.tracks_read() - 1 != index {
            continue;
        }
        while let Some(event) = track.read_event()? {
            assembler
                .process(&event)
                .map_err(|e| ReaderError::parse_error(track.buffer_position(), e))?;
        }
        break;
    }
    Ok(assembler.into_notes())
}

#[test]
fn track_index_must_be_declared() {
    let header = Mthd::new(1, 2, 96);
    assert!(check_track(None, &header).is_ok());
    assert!(check_track(Some(1), &header).is_ok());
    let err = check_track(Some(2), &header).unwrap_err();
    assert!(matches!(
        err,
        ListError::TrackOutOfRange { index: 2, count: 2 }
    ));
    assert_eq!(
        err.to_string(),
        "--track 2 is out of range, the file declares 2 tracks"
    );
}

#[test]
fn out_of_range_track_is_reported_before_listing() {
    let bytes = [
        b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 0, 0, 96,
    ];
    let args = Args {
        path: PathBuf::from("empty.mid"),
        track: Some(0),
        sorted: false,
    };
    assert!(matches!(
        run(&args, &bytes),
        Err(ListError::TrackOutOfRange { index: 0, count: 0 })
    ));
}
