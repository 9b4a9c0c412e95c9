#![allow(dead_code)]

/// Bytes of the End Of Track meta event with a zero delta-time
pub const END_OF_TRACK: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

pub const fn note_on(channel: u8, note: u8, velocity: u8) -> [u8; 3] {
    [0x90 | channel, note, velocity]
}

pub const fn note_off(channel: u8, note: u8, velocity: u8) -> [u8; 3] {
    [0x80 | channel, note, velocity]
}

pub const fn program_change(channel: u8, program: u8) -> [u8; 2] {
    [0xC0 | channel, program]
}

/// An `MThd` chunk with format 1 and 256 ticks per quarter note
pub fn mthd(track_count: u16) -> Vec<u8> {
    let mut bytes = b"MThd".to_vec();
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&1u16.to_be_bytes());
    bytes.extend_from_slice(&track_count.to_be_bytes());
    bytes.extend_from_slice(&256u16.to_be_bytes());
    bytes
}

/// A chunk with the given id whose length is the length of `body`
pub fn chunk(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut bytes = id.to_vec();
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(body);
    bytes
}

/// An `MTrk` chunk holding `events` followed by End Of Track
pub fn mtrk(events: &[u8]) -> Vec<u8> {
    let mut body = events.to_vec();
    body.extend_from_slice(&END_OF_TRACK);
    chunk(b"MTrk", &body)
}

/// A complete file with one `MTrk` per entry of `tracks`
pub fn smf(tracks: &[&[u8]]) -> Vec<u8> {
    let mut bytes = mthd(tracks.len() as u16);
    for events in tracks {
        bytes.extend(mtrk(events));
    }
    bytes
}

/// Concatenates delta-time/event pairs. Deltas must be below 128.
pub fn events(pairs: &[(u8, &[u8])]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for (delta, event) in pairs {
        assert!(*delta < 0x80);
        bytes.push(*delta);
        bytes.extend_from_slice(event);
    }
    bytes
}
