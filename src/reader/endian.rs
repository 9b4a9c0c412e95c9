//! Fixed-width big-endian fields.
//!
//! Chunk lengths and the `MThd` fields are stored most significant byte
//! first, whatever the host order.

/// An integer that can be decoded from its big-endian byte representation.
pub trait FromBeBytes: Sized {
    /// Width in bytes on the wire.
    const SIZE: usize;

    /// Decodes from exactly [`Self::SIZE`] bytes. Returns `None` on any other length.
    fn from_be_slice(bytes: &[u8]) -> Option<Self>;
}

macro_rules! impl_from_be_bytes {
    ($($ty:ty),*) => {
        $(
            impl FromBeBytes for $ty {
                const SIZE: usize = core::mem::size_of::<$ty>();

                #[inline]
                fn from_be_slice(bytes: &[u8]) -> Option<Self> {
                    bytes.try_into().ok().map(<$ty>::from_be_bytes)
                }
            }
        )*
    };
}

impl_from_be_bytes!(u16, u32, u64);

#[test]
fn converts_to_host_order() {
    assert_eq!(u16::from_be_slice(&[0x01, 0xE0]), Some(480));
    assert_eq!(u32::from_be_slice(&[0, 0, 0, 6]), Some(6));
    assert_eq!(
        u64::from_be_slice(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]),
        Some(0x0102_0304_0506_0708)
    );
}

#[test]
fn wrong_width_is_rejected() {
    assert_eq!(u16::from_be_slice(&[0x01]), None);
    assert_eq!(u32::from_be_slice(&[0, 0, 0, 0, 6]), None);
}

#[test]
fn reader_reads_big_endian() {
    let mut reader = super::Reader::from_byte_slice(&[0x00, 0x01, 0x00, 0x00, 0x01, 0x00]);
    assert_eq!(reader.read_be::<u16>().unwrap(), 1);
    assert_eq!(reader.read_be::<u32>().unwrap(), 256);
    assert!(reader.read_be::<u16>().unwrap_err().is_truncated());
}
