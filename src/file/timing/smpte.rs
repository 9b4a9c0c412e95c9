use core::fmt;
use num_enum::TryFromPrimitive;

/// The possible FPS (Frames Per Second) of an SMPTE division
///
/// The MIDI specification defines only four possible frame types,
/// stored in the header as negative numbers:
/// - 24 fps: Standard film rate
/// - 25 fps: PAL/SECAM television standard
/// - 29.97 fps: NTSC color television (drop-frame timecode)
/// - 30 fps: NTSC black & white, some digital video formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(i8)]
pub enum SmpteFps {
    /// 24 frames per second
    TwentyFour = -24,
    /// 25 frames per second
    TwentyFive = -25,
    /// 29.97 frames per second (30000/1001), drop-frame
    TwentyNine = -29,
    /// 30 frames per second
    Thirty = -30,
}

impl fmt::Display for SmpteFps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TwentyNine => f.write_str("29.97"),
            other => write!(f, "{}", -(*other as i8)),
        }
    }
}

#[test]
fn frame_rates_from_header_bytes() {
    assert_eq!(SmpteFps::try_from(-24i8).unwrap(), SmpteFps::TwentyFour);
    assert_eq!(SmpteFps::try_from(-30i8).unwrap(), SmpteFps::Thirty);
    assert!(SmpteFps::try_from(24i8).is_err());
    assert_eq!(alloc::format!("{}", SmpteFps::TwentyFive), "25");
    assert_eq!(alloc::format!("{}", SmpteFps::TwentyNine), "29.97");
}
