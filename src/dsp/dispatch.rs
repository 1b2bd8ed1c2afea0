//! Kernel Dispatch
//!
//! Maps a resolved format to exactly one monomorphised delta kernel. The
//! selection happens once per format change; after that the hot path is a
//! direct call through the cached function pointer.

use std::fmt;

use tracing::debug;

use crate::dsp::kernel::delta_bytes;
use crate::error::{DeltaError, Result};
use crate::format::{FormatDescriptor, SampleFormat};

/// Call signature shared by every kernel
pub type KernelFn = fn(&mut [u8], usize, f32) -> &mut [u8];

/// A delta kernel selected for one sample format
#[derive(Clone, Copy)]
pub struct Kernel {
    format: SampleFormat,
    func: KernelFn,
}

impl Kernel {
    /// The kernel for a sample format
    ///
    /// Total over [`SampleFormat`]; every variant has a distinct kernel.
    pub fn for_format(format: SampleFormat) -> Self {
        let func: KernelFn = match format {
            SampleFormat::S8 => delta_bytes::<i8>,
            SampleFormat::U8 => delta_bytes::<u8>,
            SampleFormat::S16 => delta_bytes::<i16>,
            SampleFormat::U16 => delta_bytes::<u16>,
            SampleFormat::S32 => delta_bytes::<i32>,
            SampleFormat::U32 => delta_bytes::<u32>,
            SampleFormat::S64 => delta_bytes::<i64>,
            SampleFormat::U64 => delta_bytes::<u64>,
            SampleFormat::F32 => delta_bytes::<f32>,
            SampleFormat::F64 => delta_bytes::<f64>,
        };
        Self { format, func }
    }

    /// Sample format this kernel operates on
    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// Run the kernel over a buffer of natively ordered samples
    ///
    /// Mutates `buffer` in place and returns it. `channels` must match the
    /// negotiated format; it is not re-validated here.
    #[inline]
    pub fn process<'a>(&self, buffer: &'a mut [u8], channels: usize, gain: f32) -> &'a mut [u8] {
        (self.func)(buffer, channels, gain)
    }
}

impl PartialEq for Kernel {
    fn eq(&self, other: &Self) -> bool {
        self.format == other.format
    }
}

impl Eq for Kernel {}

impl fmt::Debug for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("format", &self.format)
            .finish()
    }
}

/// Select the kernel for a format descriptor
///
/// # Errors
/// * `UnsupportedFormat` - If the width/integer/sign combination has no kernel
/// * `InvalidChannelCount` - If the descriptor has zero channels
pub fn resolve(descriptor: &FormatDescriptor) -> Result<Kernel> {
    if descriptor.channels == 0 {
        return Err(DeltaError::InvalidChannelCount {
            channels: descriptor.channels,
        });
    }

    let format = descriptor.sample_format()?;
    debug!(
        format = %format,
        channels = descriptor.channels,
        byte_order = %descriptor.byte_order,
        "resolved delta kernel"
    );
    Ok(Kernel::for_format(format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::sample::{decode_samples, encode_samples};
    use crate::format::ByteOrder;
    use std::collections::HashSet;
    use test_case::test_case;

    #[test_case(8, true, true, SampleFormat::S8 ; "s8")]
    #[test_case(8, true, false, SampleFormat::U8 ; "u8")]
    #[test_case(16, true, true, SampleFormat::S16 ; "s16")]
    #[test_case(16, true, false, SampleFormat::U16 ; "u16")]
    #[test_case(32, true, true, SampleFormat::S32 ; "s32")]
    #[test_case(32, true, false, SampleFormat::U32 ; "u32")]
    #[test_case(64, true, true, SampleFormat::S64 ; "s64")]
    #[test_case(64, true, false, SampleFormat::U64 ; "u64")]
    #[test_case(32, false, true, SampleFormat::F32 ; "f32")]
    #[test_case(64, false, false, SampleFormat::F64 ; "f64")]
    fn test_resolve_valid(bit_width: u32, is_integer: bool, is_signed: bool, expected: SampleFormat) {
        let desc = FormatDescriptor::new(bit_width, is_integer, is_signed, ByteOrder::Little, 2);
        let kernel = resolve(&desc).unwrap();
        assert_eq!(kernel.format(), expected);
    }

    #[test_case(8, false ; "f8")]
    #[test_case(16, false ; "f16")]
    #[test_case(24, true ; "s24")]
    #[test_case(128, true ; "s128")]
    #[test_case(0, true ; "zero width")]
    fn test_resolve_unsupported(bit_width: u32, is_integer: bool) {
        let desc = FormatDescriptor::new(bit_width, is_integer, true, ByteOrder::Little, 1);
        let err = resolve(&desc).unwrap_err();
        assert!(matches!(err, DeltaError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_resolve_rejects_zero_channels() {
        let desc = FormatDescriptor::from_sample_format(SampleFormat::S16, 0);
        let err = resolve(&desc).unwrap_err();
        assert!(matches!(err, DeltaError::InvalidChannelCount { channels: 0 }));
    }

    #[test]
    fn test_kernels_are_distinct() {
        let formats: HashSet<SampleFormat> = SampleFormat::ALL
            .iter()
            .map(|&f| Kernel::for_format(f).format())
            .collect();
        assert_eq!(formats.len(), SampleFormat::ALL.len());
    }

    // Inputs sit outside the range of the same-width type of the other
    // signedness, so a kernel wired to the wrong type lands on a different value.
    #[test_case(SampleFormat::S8, encode_samples(&[0i8, -100]), encode_samples(&[0i8, i8::MIN]) ; "s8")]
    #[test_case(SampleFormat::U8, encode_samples(&[0u8, 200]), encode_samples(&[0u8, u8::MAX]) ; "u8")]
    #[test_case(SampleFormat::S16, encode_samples(&[0i16, -20_000]), encode_samples(&[0i16, i16::MIN]) ; "s16")]
    #[test_case(SampleFormat::U16, encode_samples(&[0u16, 40_000]), encode_samples(&[0u16, u16::MAX]) ; "u16")]
    #[test_case(SampleFormat::S32, encode_samples(&[0i32, -2_000_000_000]), encode_samples(&[0i32, i32::MIN]) ; "s32")]
    #[test_case(SampleFormat::U32, encode_samples(&[0u32, 3_000_000_000]), encode_samples(&[0u32, u32::MAX]) ; "u32")]
    #[test_case(SampleFormat::S64, encode_samples(&[0i64, i64::MIN / 2 - 4096]), encode_samples(&[0i64, i64::MIN]) ; "s64")]
    #[test_case(SampleFormat::U64, encode_samples(&[0u64, 1 << 63]), encode_samples(&[0u64, u64::MAX]) ; "u64")]
    #[test_case(SampleFormat::F32, encode_samples(&[0.0f32, -0.75, f32::MAX]), encode_samples(&[0.0f32, -1.5, f32::MAX]) ; "f32")]
    #[test_case(SampleFormat::F64, encode_samples(&[0.0f64, -0.75, f64::MAX]), encode_samples(&[0.0f64, -1.5, f64::MAX]) ; "f64")]
    fn test_kernel_saturates_in_its_own_type(format: SampleFormat, input: Vec<u8>, expected: Vec<u8>) {
        let mut buffer = input;
        Kernel::for_format(format).process(&mut buffer, 1, 1.0);
        assert_eq!(buffer, expected);
    }

    #[test]
    fn test_resolved_kernel_runs_unsigned_wide_types() {
        let desc = FormatDescriptor::new(32, true, false, ByteOrder::native(), 1);
        let mut buffer = encode_samples(&[0u32, 3_000_000_000]);
        resolve(&desc).unwrap().process(&mut buffer, 1, 1.0);
        assert_eq!(decode_samples::<u32>(&buffer), vec![0, u32::MAX]);

        let desc = FormatDescriptor::new(64, true, false, ByteOrder::native(), 1);
        let mut buffer = encode_samples(&[0u64, 1 << 63]);
        resolve(&desc).unwrap().process(&mut buffer, 1, 1.0);
        assert_eq!(decode_samples::<u64>(&buffer), vec![0, u64::MAX]);
    }

    #[test]
    fn test_process_runs_selected_kernel() {
        let kernel = Kernel::for_format(SampleFormat::U8);
        let mut buffer = vec![10u8, 20, 5, 5];
        let out = kernel.process(&mut buffer, 1, 1.0);
        assert_eq!(out.to_vec(), vec![10, 30, 0, 5]);
    }

    #[test]
    fn test_process_interprets_width() {
        // the same bytes mean different things to different kernels
        let input = encode_samples(&[1000i16, 1100]);
        let mut as_s16 = input.clone();
        Kernel::for_format(SampleFormat::S16).process(&mut as_s16, 1, 1.0);
        assert_eq!(decode_samples::<i16>(&as_s16), vec![1000, 1200]);

        let mut as_s32 = input.clone();
        Kernel::for_format(SampleFormat::S32).process(&mut as_s32, 1, 1.0);
        assert_eq!(as_s32, input, "a single 32-bit frame is left alone");
    }
}
