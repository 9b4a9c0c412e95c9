use core::fmt;

#[doc = r#"
Identifies the pitch of a note.

Note numbers are 7-bit values. Each value corresponds to some [`Key`] and [`Octave`].

[`NoteNumber`] `0` is `C(-1)`, `60` is middle C (`C4`), and `127` is `G9`.

# Example
```rust
# use smf_notes::prelude::*;

let note = NoteNumber::new(63).unwrap(); // 63 is between 0-127

assert_eq!(note.key(), Key::DSharp);
assert_eq!(note.octave(), Octave::new(4));
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteNumber(u8);

impl NoteNumber {
    /// The lowest note.
    pub const MIN: Self = Self(0);
    /// The highest note.
    pub const MAX: Self = Self(127);

    /// Create a new note number.
    ///
    /// Returns `None` if the byte has its high bit set.
    pub const fn new(byte: u8) -> Option<Self> {
        if byte > 127 {
            return None;
        }
        Some(Self(byte))
    }

    /// Creates a note number from the low seven bits of a data byte
    #[inline]
    pub const fn from_data_byte(byte: u8) -> Self {
        Self(byte & 0x7F)
    }

    /// Returns the underlying byte of the note
    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// The note as an index into a 128 slot table
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Identifies the key of the note
    #[inline]
    pub const fn key(&self) -> Key {
        Key::from_note_number(self.0)
    }

    /// Identifies the octave of the note
    #[inline]
    pub const fn octave(&self) -> Octave {
        Octave((self.0 / 12) as i8 - 1)
    }

    /// Returns all possible note numbers (128)
    pub fn all() -> [NoteNumber; 128] {
        core::array::from_fn(|i| NoteNumber(i as u8))
    }
}

impl fmt::Display for NoteNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.key(), self.octave())
    }
}

#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[doc = r#"
The pitch class of a [`NoteNumber`], ignoring octave.
"#]
pub enum Key {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Key {
    /// Returns an array beginning with [`Key::C`] to [`Key::B`]
    pub fn all() -> [Key; 12] {
        use Key::*;
        [C, CSharp, D, DSharp, E, F, FSharp, G, GSharp, A, ASharp, B]
    }

    /// Returns true if the key is a black key.
    #[inline]
    pub const fn is_sharp(&self) -> bool {
        use Key::*;
        matches!(self, CSharp | DSharp | FSharp | GSharp | ASharp)
    }

    const fn from_note_number(byte: u8) -> Self {
        use Key::*;
        match byte % 12 {
            0 => C,
            1 => CSharp,
            2 => D,
            3 => DSharp,
            4 => E,
            5 => F,
            6 => FSharp,
            7 => G,
            8 => GSharp,
            9 => A,
            10 => ASharp,
            _ => B,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Key::*;
        let name = match self {
            C => "C",
            CSharp => "C#/Db",
            D => "D",
            DSharp => "D#/Eb",
            E => "E",
            F => "F",
            FSharp => "F#/Gb",
            G => "G",
            GSharp => "G#/Ab",
            A => "A",
            ASharp => "A#/Bb",
            B => "B",
        };
        f.write_str(name)
    }
}

/// The octave of a [`NoteNumber`]. Values range from -1 to 9.
#[derive(PartialEq, Eq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
pub struct Octave(i8);

impl Octave {
    /// Should be a value between [-1, 9]. Clamps between these two values.
    pub const fn new(octave: i8) -> Self {
        if octave < -1 {
            Self(-1)
        } else if octave > 9 {
            Self(9)
        } else {
            Self(octave)
        }
    }

    /// The octave, from `[-1,9]`
    pub const fn value(&self) -> i8 {
        self.0
    }
}

impl fmt::Display for Octave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[test]
fn note_names() {
    let c = NoteNumber::new(12).unwrap();
    assert_eq!(Key::C, c.key());
    assert_eq!(0, c.octave().value());

    let a_sharp = NoteNumber::new(94).unwrap();
    assert_eq!(Key::ASharp, a_sharp.key());
    assert_eq!(6, a_sharp.octave().value());

    assert_eq!(alloc::format!("{}", NoteNumber::new(60).unwrap()), "C4");
    assert_eq!(alloc::format!("{}", NoteNumber::MIN), "C-1");
    assert_eq!(alloc::format!("{}", NoteNumber::MAX), "G9");
}

#[test]
fn seven_bit_range() {
    assert_eq!(NoteNumber::new(128), None);
    assert_eq!(NoteNumber::from_data_byte(0x85).value(), 5);
    let all = NoteNumber::all();
    assert_eq!(all[0], NoteNumber::MIN);
    assert_eq!(all[127], NoteNumber::MAX);
    assert!(all.iter().enumerate().all(|(i, n)| n.index() == i));
}

#[test]
fn octave_clamps() {
    assert_eq!(Octave::new(12).value(), 9);
    assert_eq!(Octave::new(-4).value(), -1);
    assert_eq!(Key::all().iter().filter(|k| k.is_sharp()).count(), 5);
}
