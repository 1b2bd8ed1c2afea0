//! Sample Primitives
//!
//! The `Sample` trait is implemented by a macro for each of the ten numeric
//! types the kernel set handles. It knows how to read itself from a raw
//! native-endian byte chunk, widen into an accumulator type for the delta
//! math, and narrow back with saturation.

use num_traits::Float;

use crate::format::SampleFormat;

/// A scalar sample type accepted by the delta kernels
pub trait Sample: Copy + Send + Sync + 'static {
    /// Accumulator used for the delta computation
    ///
    /// `f64` for every integer type, the sample's own type for floats.
    type Acc: Float + From<f32>;

    /// The format this type represents
    const FORMAT: SampleFormat;

    /// Size of one sample in bytes
    const BYTES: usize;

    /// Read a sample from exactly `BYTES` native-endian bytes
    ///
    /// A chunk of the wrong length is a caller bug: it panics in debug
    /// builds and yields zero in release builds.
    fn from_ne_slice(bytes: &[u8]) -> Self;

    /// Write the sample into exactly `BYTES` native-endian bytes
    fn write_ne_slice(self, out: &mut [u8]);

    /// Widen into the accumulator type
    fn widen(self) -> Self::Acc;

    /// Narrow an accumulator value back, clamping to the representable range
    ///
    /// Integers saturate at `MIN..=MAX`; floats at `-MAX..=MAX`.
    fn narrow(value: Self::Acc) -> Self;
}

macro_rules! impl_int_sample {
    ($ty:ty, $variant:ident) => {
        impl Sample for $ty {
            type Acc = f64;
            const FORMAT: SampleFormat = SampleFormat::$variant;
            const BYTES: usize = std::mem::size_of::<$ty>();

            #[inline]
            fn from_ne_slice(bytes: &[u8]) -> Self {
                debug_assert_eq!(bytes.len(), Self::BYTES, "sample chunk length");
                match bytes.try_into() {
                    Ok(raw) => <$ty>::from_ne_bytes(raw),
                    Err(_) => 0,
                }
            }

            #[inline]
            fn write_ne_slice(self, out: &mut [u8]) {
                out.copy_from_slice(&self.to_ne_bytes());
            }

            #[inline]
            fn widen(self) -> f64 {
                self as f64
            }

            #[inline]
            fn narrow(value: f64) -> Self {
                value.clamp(<$ty>::MIN as f64, <$ty>::MAX as f64) as $ty
            }
        }
    };
}

macro_rules! impl_float_sample {
    ($ty:ty, $variant:ident) => {
        impl Sample for $ty {
            type Acc = $ty;
            const FORMAT: SampleFormat = SampleFormat::$variant;
            const BYTES: usize = std::mem::size_of::<$ty>();

            #[inline]
            fn from_ne_slice(bytes: &[u8]) -> Self {
                debug_assert_eq!(bytes.len(), Self::BYTES, "sample chunk length");
                match bytes.try_into() {
                    Ok(raw) => <$ty>::from_ne_bytes(raw),
                    Err(_) => 0.0,
                }
            }

            #[inline]
            fn write_ne_slice(self, out: &mut [u8]) {
                out.copy_from_slice(&self.to_ne_bytes());
            }

            #[inline]
            fn widen(self) -> $ty {
                self
            }

            #[inline]
            fn narrow(value: $ty) -> Self {
                value.clamp(-<$ty>::MAX, <$ty>::MAX)
            }
        }
    };
}

impl_int_sample!(i8, S8);
impl_int_sample!(u8, U8);
impl_int_sample!(i16, S16);
impl_int_sample!(u16, U16);
impl_int_sample!(i32, S32);
impl_int_sample!(u32, U32);
impl_int_sample!(i64, S64);
impl_int_sample!(u64, U64);
impl_float_sample!(f32, F32);
impl_float_sample!(f64, F64);

/// Pack samples into a native-endian byte buffer
pub fn encode_samples<T: Sample>(samples: &[T]) -> Vec<u8> {
    let mut bytes = vec![0u8; samples.len() * T::BYTES];
    for (sample, chunk) in samples.iter().zip(bytes.chunks_exact_mut(T::BYTES)) {
        sample.write_ne_slice(chunk);
    }
    bytes
}

/// Unpack a native-endian byte buffer into samples
///
/// Trailing bytes that do not form a whole sample are ignored.
pub fn decode_samples<T: Sample>(bytes: &[u8]) -> Vec<T> {
    bytes.chunks_exact(T::BYTES).map(T::from_ne_slice).collect()
}
