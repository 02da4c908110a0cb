//! # Scalar Encoding
//!
//! The fixed-width types the format can store inline, and how each one is
//! turned into bytes for a given byte order.
//!
//! | Type | Size |
//! |------|------|
//! | bool, u8, i8 | 1 |
//! | u16, i16 | 2 |
//! | u32, i32, f32 | 4 |
//! | u64, i64, f64 | 8 |
//!
//! `bool` is written as `0` or `1` and read as "any non-zero byte is true".

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

impl Endian {
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Endian::Big
        } else {
            Endian::Little
        }
    }
}

/// A value with a fixed width that can live directly in a table slot, a
/// struct member or a vector element.
///
/// `read_from` and `write_to` expect a slice of at least `SIZE` bytes; the
/// callers in this crate bounds-check before calling.
pub trait Scalar: Copy + PartialEq + Default + std::fmt::Debug {
    const SIZE: usize;

    fn read_from(bytes: &[u8], endian: Endian) -> Self;

    fn write_to(self, bytes: &mut [u8], endian: Endian);
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn read_from(bytes: &[u8], endian: Endian) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..Self::SIZE]);
                    match endian {
                        Endian::Little => <$ty>::from_le_bytes(raw),
                        Endian::Big => <$ty>::from_be_bytes(raw),
                    }
                }

                #[inline]
                fn write_to(self, bytes: &mut [u8], endian: Endian) {
                    let raw = match endian {
                        Endian::Little => self.to_le_bytes(),
                        Endian::Big => self.to_be_bytes(),
                    };
                    bytes[..Self::SIZE].copy_from_slice(&raw);
                }
            }
        )*
    };
}

impl_scalar!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

impl Scalar for bool {
    const SIZE: usize = 1;

    #[inline]
    fn read_from(bytes: &[u8], _endian: Endian) -> Self {
        bytes[0] != 0
    }

    #[inline]
    fn write_to(self, bytes: &mut [u8], _endian: Endian) {
        bytes[0] = self as u8;
    }
}
