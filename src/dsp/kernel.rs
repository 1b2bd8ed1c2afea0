//! Delta Kernels
//!
//! Noise sharpening over interleaved samples:
//!
//! ```text
//! out[f][c] = clamp(x[f][c] + gain * (x[f][c] - x[f-1][c]))
//! ```
//!
//! The first frame is left untouched. The per-channel reference is always the
//! raw input of the previous frame, never the sharpened output, so gain does
//! not compound from one frame to the next.
//!
//! Only whole frames are processed. Samples after the last complete frame
//! (and bytes after the last complete sample) are left as they are. Nothing
//! is carried across calls.

use num_traits::Float;

use crate::dsp::sample::Sample;

/// Channel count up to which the per-channel history lives on the stack
const INLINE_CHANNELS: usize = 8;

/// Previous raw sample per channel, scoped to one kernel call
enum History<A> {
    Inline([A; INLINE_CHANNELS]),
    Heap(Vec<A>),
}

impl<A: Float> History<A> {
    fn new(channels: usize) -> Self {
        if channels <= INLINE_CHANNELS {
            History::Inline([A::zero(); INLINE_CHANNELS])
        } else {
            History::Heap(vec![A::zero(); channels])
        }
    }

    fn slots(&mut self, channels: usize) -> &mut [A] {
        match self {
            History::Inline(values) => &mut values[..channels],
            History::Heap(values) => values.as_mut_slice(),
        }
    }
}

/// Sharpen one sample against its channel's previous raw value
///
/// Updates `prev` to the raw current value and returns the clamped result.
#[inline(always)]
fn sharpen<T: Sample>(current: T, prev: &mut T::Acc, gain: T::Acc) -> T {
    let raw = current.widen();
    let result = raw + gain * (raw - *prev);
    *prev = raw;
    T::narrow(result)
}

/// Apply the delta transform to a typed, interleaved sample slice
///
/// Returns the same slice for chaining. `channels` must be non-zero: a zero
/// count panics in debug builds and leaves the slice untouched in release.
pub fn delta_samples<T: Sample>(samples: &mut [T], channels: usize, gain: f32) -> &mut [T] {
    debug_assert!(channels > 0, "delta kernel called with zero channels");
    if channels == 0 {
        return samples;
    }

    let frames = samples.len() / channels;
    if frames < 2 {
        return samples;
    }

    let gain = <T::Acc as From<f32>>::from(gain);
    let mut history = History::<T::Acc>::new(channels);
    let prev = history.slots(channels);

    let (first, rest) = samples[..frames * channels].split_at_mut(channels);
    for (slot, sample) in prev.iter_mut().zip(first.iter()) {
        *slot = sample.widen();
    }

    for frame in rest.chunks_exact_mut(channels) {
        for (sample, slot) in frame.iter_mut().zip(prev.iter_mut()) {
            *sample = sharpen(*sample, slot, gain);
        }
    }

    samples
}

/// Apply the delta transform to a raw byte buffer of natively ordered `T`
///
/// This is the entry point the dispatcher uses. The buffer needs no
/// particular alignment. Returns the same buffer for chaining. `channels`
/// follows the same contract as [`delta_samples`].
pub fn delta_bytes<T: Sample>(buffer: &mut [u8], channels: usize, gain: f32) -> &mut [u8] {
    debug_assert!(channels > 0, "delta kernel called with zero channels");
    if channels == 0 {
        return buffer;
    }

    let frame_bytes = channels * T::BYTES;
    let frames = buffer.len() / frame_bytes;
    if frames < 2 {
        return buffer;
    }

    let gain = <T::Acc as From<f32>>::from(gain);
    let mut history = History::<T::Acc>::new(channels);
    let prev = history.slots(channels);

    let (first, rest) = buffer[..frames * frame_bytes].split_at_mut(frame_bytes);
    for (slot, chunk) in prev.iter_mut().zip(first.chunks_exact(T::BYTES)) {
        *slot = T::from_ne_slice(chunk).widen();
    }

    for frame in rest.chunks_exact_mut(frame_bytes) {
        for (chunk, slot) in frame.chunks_exact_mut(T::BYTES).zip(prev.iter_mut()) {
            sharpen(T::from_ne_slice(chunk), slot, gain).write_ne_slice(chunk);
        }
    }

    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::sample::{decode_samples, encode_samples};
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_u8_end_to_end() {
        let mut samples: Vec<u8> = vec![10, 20, 5, 5];
        delta_samples(&mut samples, 1, 1.0);
        assert_eq!(samples, vec![10, 30, 0, 5]);
    }

    #[test]
    fn test_reference_is_raw_input() {
        // frame 2 is computed against raw 100, not the sharpened 200
        let mut samples: Vec<i16> = vec![0, 100, 0];
        delta_samples(&mut samples, 1, 1.0);
        assert_eq!(samples, vec![0, 200, -100]);
    }

    #[test]
    fn test_reference_is_raw_even_when_clamped() {
        let mut samples: Vec<i8> = vec![0, 100, 100];
        delta_samples(&mut samples, 1, 1.0);
        // 100 + 100 clamps to 127; the next delta still uses raw 100
        assert_eq!(samples, vec![0, 127, 100]);
    }

    #[test]
    fn test_clamp_no_wraparound() {
        let mut samples: Vec<i8> = (0..64)
            .map(|i| if i % 2 == 0 { 127 } else { -128 })
            .collect();
        delta_samples(&mut samples, 1, 2.0);
        assert_eq!(samples[0], 127);
        for (i, &s) in samples.iter().enumerate().skip(1) {
            let expected = if i % 2 == 0 { 127 } else { -128 };
            assert_eq!(s, expected, "sample {} wrapped", i);
        }
    }

    #[test]
    fn test_channels_are_independent() {
        // channel 0 constant, channel 1 ramps
        let mut samples: Vec<i32> = vec![50, 0, 50, 10, 50, 30, 50, 60];
        delta_samples(&mut samples, 2, 1.0);
        assert_eq!(samples, vec![50, 0, 50, 20, 50, 50, 50, 90]);
    }

    #[test]
    fn test_partial_trailing_frame_untouched() {
        let mut samples: Vec<i16> = vec![0, 0, 10, 10, 99];
        delta_samples(&mut samples, 2, 1.0);
        assert_eq!(samples, vec![0, 0, 20, 20, 99]);
    }

    #[test]
    fn test_short_buffers_are_noops() {
        let mut empty: Vec<u16> = Vec::new();
        assert!(delta_samples(&mut empty, 2, 1.0).is_empty());

        let mut one_frame: Vec<u16> = vec![1, 2];
        delta_samples(&mut one_frame, 2, 1.0);
        assert_eq!(one_frame, vec![1, 2]);

        let mut shorter_than_frame: Vec<u16> = vec![9];
        delta_samples(&mut shorter_than_frame, 4, 1.0);
        assert_eq!(shorter_than_frame, vec![9]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "zero channels")]
    fn test_zero_channels_panics_in_debug() {
        let mut samples: Vec<i8> = vec![1, 50, -50];
        delta_samples(&mut samples, 0, 2.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "zero channels")]
    fn test_zero_channels_bytes_panics_in_debug() {
        let mut bytes = vec![1u8, 2, 3, 4];
        delta_bytes::<u8>(&mut bytes, 0, 2.0);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_zero_channels_is_noop_in_release() {
        let mut samples: Vec<i8> = vec![1, 50, -50];
        delta_samples(&mut samples, 0, 2.0);
        assert_eq!(samples, vec![1, 50, -50]);

        let mut bytes = vec![1u8, 2, 3, 4];
        delta_bytes::<u8>(&mut bytes, 0, 2.0);
        assert_eq!(bytes, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_float_kernel_fractional_gain() {
        let mut samples: Vec<f32> = vec![0.1, 0.3, 0.2];
        delta_samples(&mut samples, 1, 0.5);
        assert_relative_eq!(samples[0], 0.1);
        assert_relative_eq!(samples[1], 0.4, epsilon = 1e-6);
        assert_relative_eq!(samples[2], 0.15, epsilon = 1e-6);
    }

    #[test]
    fn test_float_kernel_clamps_to_finite() {
        let mut samples: Vec<f64> = vec![-f64::MAX, f64::MAX];
        delta_samples(&mut samples, 1, 2.0);
        assert_eq!(samples[1], f64::MAX);
    }

    #[test]
    fn test_unsigned_64_saturates() {
        let mut samples: Vec<u64> = vec![0, u64::MAX / 2 + 1, 0];
        delta_samples(&mut samples, 1, 2.0);
        assert_eq!(samples[1], u64::MAX);
        assert_eq!(samples[2], 0);
    }

    #[test]
    fn test_wide_channel_count_uses_heap_history() {
        let channels = INLINE_CHANNELS + 4;
        let mut samples: Vec<i16> = (0..channels as i16).collect();
        samples.extend((0..channels as i16).map(|c| c + 10));
        delta_samples(&mut samples, channels, 1.0);
        for c in 0..channels {
            assert_eq!(samples[c], c as i16);
            assert_eq!(samples[channels + c], c as i16 + 20);
        }
    }

    #[test]
    fn test_bytes_match_typed_kernel() {
        let input: Vec<i32> = vec![0, -5, 1000, -4000, 2_000_000_000, -2_000_000_000, 7, 8];
        let mut typed = input.clone();
        delta_samples(&mut typed, 2, 1.5);

        let mut bytes = encode_samples(&input);
        delta_bytes::<i32>(&mut bytes, 2, 1.5);
        assert_eq!(decode_samples::<i32>(&bytes), typed);
    }

    #[test]
    fn test_bytes_trailing_partial_sample_untouched() {
        let mut bytes = encode_samples(&[100u16, 200u16]);
        bytes.push(0xab);
        delta_bytes::<u16>(&mut bytes, 1, 1.0);
        assert_eq!(decode_samples::<u16>(&bytes[..4]), vec![100, 300]);
        assert_eq!(bytes[4], 0xab);
    }

    #[test]
    fn test_bytes_unaligned_slice() {
        let mut storage = vec![0u8; 1];
        storage.extend(encode_samples(&[1.0f64, 2.0, 4.0]));
        delta_bytes::<f64>(&mut storage[1..], 1, 1.0);
        assert_eq!(decode_samples::<f64>(&storage[1..]), vec![1.0, 3.0, 6.0]);
    }
}
