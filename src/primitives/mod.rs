#![doc = r#"
Small strongly typed values shared by the decoder and the note assembler

Every value here is derived from a fixed-width wire field, so construction
from raw bytes masks to the field width rather than failing.
"#]

mod time;
pub use time::*;

mod note_number;
pub use note_number::*;

use core::fmt;

#[doc = r#"
One of the sixteen MIDI channels, numbered from 0 to 15 as on the wire.

# Example
```rust
# use smf_notes::prelude::*;
let channel = Channel::from_status(0x93);
assert_eq!(channel.value(), 3);
assert_eq!(Channel::new(16), None);
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Channel(u8);

impl Channel {
    /// The number of channels in a MIDI stream.
    pub const COUNT: usize = 16;

    /// Returns `None` for values above 15.
    pub const fn new(channel: u8) -> Option<Self> {
        if channel as usize >= Self::COUNT {
            return None;
        }
        Some(Self(channel))
    }

    /// The channel addressed by a channel voice status byte (its low nibble).
    #[inline]
    pub const fn from_status(status: u8) -> Self {
        Self(status & 0x0F)
    }

    /// The channel number, 0-15
    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// All sixteen channels in ascending order
    pub fn all() -> [Channel; 16] {
        core::array::from_fn(|i| Channel(i as u8))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A General MIDI program number (0-127), as set by a program change.
#[derive(Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instrument(u8);

impl Instrument {
    /// Returns `None` if the byte has its high bit set.
    pub const fn new(program: u8) -> Option<Self> {
        if program > 127 {
            return None;
        }
        Some(Self(program))
    }

    /// Creates an instrument from the low seven bits of a data byte
    #[inline]
    pub const fn from_data_byte(byte: u8) -> Self {
        Self(byte & 0x7F)
    }

    /// The program number
    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[test]
fn channel_from_status() {
    for status in 0x80..=0xEF_u8 {
        assert_eq!(Channel::from_status(status).value(), status & 0x0F);
    }
    assert_eq!(Channel::all()[15], Channel::new(15).unwrap());
}

#[test]
fn instrument_range() {
    assert_eq!(Instrument::new(127).map(|i| i.value()), Some(127));
    assert_eq!(Instrument::new(128), None);
    assert_eq!(Instrument::from_data_byte(0xC5).value(), 0x45);
    assert_eq!(Instrument::default().value(), 0);
}
