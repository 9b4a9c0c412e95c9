#![doc = r#"
# smf-notes

Decode Standard MIDI Files into timed note records.

The crate reads the `MThd` header and each `MTrk` chunk of a file, decodes
the chunk's delta-timed events (running status included), and pairs
note-on and note-off events per channel into [`Note`](prelude::Note)s
carrying pitch, start tick, duration, velocity and instrument.

```rust
use smf_notes::prelude::*;

let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0x01, 0xE0,
    b'M', b'T', b'r', b'k', 0, 0, 0, 15,
    0x00, 0xC0, 0x05,             // program change: instrument 5
    0x00, 0x90, 0x3C, 0x64,       // note on C4
    0x83, 0x60, 0x3C, 0x00,       // 480 ticks later, running status note off
    0x00, 0xFF, 0x2F, 0x00,       // end of track
];
let notes = read_notes(&bytes).unwrap();
assert_eq!(
    notes,
    [Note::new(
        NoteNumber::new(60).unwrap(),
        Time::new(0),
        Duration::new(480),
        0x64,
        Instrument::new(5).unwrap(),
    )]
);
```

## Features
- `std` (default): `std::error::Error` for the error types.
- `tracing` (default): debug and warning events while decoding.
- `serde`: `Serialize` and `Deserialize` for notes and the primitives.
- `cli`: builds the `smf-notes` binary.
"#]
#![no_std]
#![warn(missing_docs)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod file;
pub mod notes;
pub mod primitives;
pub mod reader;

#[doc = r#"
Commonly used types
"#]
pub mod prelude {
    pub use crate::file::*;
    pub use crate::notes::*;
    pub use crate::primitives::*;
    pub use crate::reader::{
        ChunkError, ParseError, ReadResult, Reader, ReaderError, ReaderErrorKind,
    };

    pub(crate) use crate::reader::inv_data;
}
