mod smpte;
pub use smpte::*;

use crate::prelude::*;

/// The header timing type.
///
/// This is either the number of ticks per quarter note or
/// the alternative SMPTE format. Delta-times in every track count ticks of this unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    /// The file's delta times are defined using a tick rate per quarter note
    TicksPerQuarterNote(u16),

    /// The file's delta times are defined using SMPTE frames and ticks per frame
    Smpte {
        /// Frames per second
        fps: SmpteFps,
        /// Subdivisions of a frame
        ticks_per_frame: u8,
    },
}

impl Timing {
    /// Interprets the `MThd` division field.
    ///
    /// With the top bit clear, the remaining 15 bits are ticks per quarter note.
    /// With it set, the high byte holds a negative frame rate (-24, -25, -29
    /// or -30) and the low byte the ticks per frame.
    pub fn from_division(division: u16) -> Result<Self, ParseError> {
        let [high, low] = division.to_be_bytes();
        match high >> 7 {
            0 => Ok(Timing::TicksPerQuarterNote(division & 0x7FFF)),
            _ => {
                let rate = high as i8;
                let fps =
                    SmpteFps::try_from(rate).map_err(|_| ParseError::SmpteFrameRate(rate))?;
                Ok(Timing::Smpte {
                    fps,
                    ticks_per_frame: low,
                })
            }
        }
    }

    /// Returns Some if the timing is defined as ticks per quarter note
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(t) => Some(*t),
            _ => None,
        }
    }
}

impl core::fmt::Display for Timing {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Timing::TicksPerQuarterNote(tpqn) => write!(f, "{tpqn} ticks per quarter note"),
            Timing::Smpte {
                fps,
                ticks_per_frame,
            } => write!(f, "{fps} fps, {ticks_per_frame} ticks per frame"),
        }
    }
}

#[test]
fn ticks_per_quarter_note() {
    assert_eq!(
        Timing::from_division(0x01E0),
        Ok(Timing::TicksPerQuarterNote(480))
    );
    assert_eq!(
        Timing::from_division(0x0060).unwrap().ticks_per_quarter_note(),
        Some(96)
    );
}

#[test]
fn smpte_division() {
    // -25 fps, 40 ticks per frame
    let division = u16::from_be_bytes([(-25i8) as u8, 40]);
    let timing = Timing::from_division(division).unwrap();
    assert_eq!(
        timing,
        Timing::Smpte {
            fps: SmpteFps::TwentyFive,
            ticks_per_frame: 40
        }
    );
    assert_eq!(timing.ticks_per_quarter_note(), None);
}

#[test]
fn invalid_smpte_rate() {
    let division = u16::from_be_bytes([(-26i8) as u8, 40]);
    assert_eq!(
        Timing::from_division(division),
        Err(ParseError::SmpteFrameRate(-26))
    );
}
