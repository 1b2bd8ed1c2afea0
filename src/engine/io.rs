//! WAV file I/O for DeltaDsp
//!
//! Host-side plumbing for the CLI: a WAV file becomes one interleaved,
//! natively ordered byte buffer plus the descriptor the filter negotiates
//! on, and goes back out with the same spec.
//!
//! Supported WAV encodings: 8-bit unsigned PCM, 16-bit and 32-bit signed
//! PCM, 32-bit float. 24-bit PCM has no matching kernel and is rejected.

use std::path::Path;

use hound::{SampleFormat as WavSampleFormat, WavReader, WavSpec, WavWriter};
use tracing::debug;

use crate::dsp::{decode_samples, encode_samples};
use crate::error::{DeltaError, Result};
use crate::format::{ByteOrder, FormatDescriptor, SampleFormat};

/// Interleaved sample bytes with their format
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    /// Format of `data`, always in native byte order
    pub format: FormatDescriptor,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Interleaved, natively ordered sample bytes
    pub data: Vec<u8>,
}

impl PcmBuffer {
    /// Wrap typed samples into a buffer
    pub fn from_samples<T: crate::dsp::Sample>(
        samples: &[T],
        channels: usize,
        sample_rate: u32,
    ) -> Self {
        Self {
            format: FormatDescriptor::from_sample_format(T::FORMAT, channels),
            sample_rate,
            data: encode_samples(samples),
        }
    }

    /// Number of complete frames
    pub fn num_frames(&self) -> usize {
        match self.format.frame_bytes() {
            0 => 0,
            frame_bytes => self.data.len() / frame_bytes,
        }
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.num_frames() as f64 / self.sample_rate as f64
    }
}

/// Import a WAV file as a byte buffer and format descriptor
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidAudio` - If the file is not a readable WAV file
/// * `UnsupportedFormat` - If the encoding has no matching kernel
pub fn import_wav(path: &Path) -> Result<PcmBuffer> {
    if !path.exists() {
        return Err(DeltaError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let reader = WavReader::open(path).map_err(|e| wav_error("Failed to open WAV file", e))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let (format, data) = match (spec.sample_format, spec.bits_per_sample) {
        (WavSampleFormat::Float, 32) => (SampleFormat::F32, read_as_bytes::<f32, _>(reader)?),
        (WavSampleFormat::Int, 8) => {
            // hound hands out 8-bit WAV (unsigned on disk) re-biased to i8
            let samples: Vec<u8> = read_samples::<i8, _>(reader)?
                .into_iter()
                .map(|v| (v as i16 + 128) as u8)
                .collect();
            (SampleFormat::U8, samples)
        }
        (WavSampleFormat::Int, 16) => (SampleFormat::S16, read_as_bytes::<i16, _>(reader)?),
        (WavSampleFormat::Int, 32) => (SampleFormat::S32, read_as_bytes::<i32, _>(reader)?),
        (sample_format, bits) => {
            return Err(DeltaError::unsupported(format!(
                "{}-bit {} WAV",
                bits,
                match sample_format {
                    WavSampleFormat::Float => "float",
                    WavSampleFormat::Int => "integer",
                }
            )));
        }
    };

    debug!(
        path = %path.display(),
        format = %format,
        channels,
        sample_rate = spec.sample_rate,
        "imported WAV"
    );

    Ok(PcmBuffer {
        format: FormatDescriptor::from_sample_format(format, channels),
        sample_rate: spec.sample_rate,
        data,
    })
}

/// Export a byte buffer to a WAV file
///
/// # Errors
/// * `UnsupportedFormat` - If the format cannot be stored as WAV
/// * `InvalidAudio` - If the file cannot be written
pub fn export_wav(buffer: &PcmBuffer, path: &Path) -> Result<()> {
    let format = buffer.format.sample_format()?;
    if buffer.format.byte_order != ByteOrder::native() {
        return Err(DeltaError::unsupported(format!(
            "{} samples in {} byte order",
            format, buffer.format.byte_order
        )));
    }

    let channels = u16::try_from(buffer.format.channels).map_err(|_| {
        DeltaError::unsupported(format!("{}-channel WAV", buffer.format.channels))
    })?;

    let (bits_per_sample, sample_format) = match format {
        SampleFormat::U8 => (8, WavSampleFormat::Int),
        SampleFormat::S16 => (16, WavSampleFormat::Int),
        SampleFormat::S32 => (32, WavSampleFormat::Int),
        SampleFormat::F32 => (32, WavSampleFormat::Float),
        other => {
            return Err(DeltaError::unsupported(format!(
                "{} WAV export (only U8, S16, S32, F32)",
                other
            )));
        }
    };

    let spec = WavSpec {
        channels,
        sample_rate: buffer.sample_rate,
        bits_per_sample,
        sample_format,
    };

    let mut writer =
        WavWriter::create(path, spec).map_err(|e| wav_error("Failed to create WAV file", e))?;

    match format {
        SampleFormat::U8 => {
            for v in decode_samples::<u8>(&buffer.data) {
                write_sample(&mut writer, (v as i16 - 128) as i8)?;
            }
        }
        SampleFormat::S16 => {
            for v in decode_samples::<i16>(&buffer.data) {
                write_sample(&mut writer, v)?;
            }
        }
        SampleFormat::S32 => {
            for v in decode_samples::<i32>(&buffer.data) {
                write_sample(&mut writer, v)?;
            }
        }
        _ => {
            for v in decode_samples::<f32>(&buffer.data) {
                write_sample(&mut writer, v)?;
            }
        }
    }

    writer
        .finalize()
        .map_err(|e| wav_error("Failed to finalize WAV file", e))?;

    debug!(path = %path.display(), format = %format, "exported WAV");
    Ok(())
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn wav_error(context: &str, e: hound::Error) -> DeltaError {
    DeltaError::InvalidAudio {
        reason: format!("{}: {}", context, e),
        source: Some(Box::new(e)),
    }
}

fn read_samples<S, R>(mut reader: WavReader<R>) -> Result<Vec<S>>
where
    S: hound::Sample,
    R: std::io::Read,
{
    reader
        .samples::<S>()
        .collect::<std::result::Result<Vec<S>, _>>()
        .map_err(|e| wav_error("Failed to read samples", e))
}

fn read_as_bytes<S, R>(reader: WavReader<R>) -> Result<Vec<u8>>
where
    S: hound::Sample + crate::dsp::Sample,
    R: std::io::Read,
{
    Ok(encode_samples(&read_samples::<S, R>(reader)?))
}

fn write_sample<S, W>(writer: &mut WavWriter<W>, sample: S) -> Result<()>
where
    S: hound::Sample,
    W: std::io::Write + std::io::Seek,
{
    writer
        .write_sample(sample)
        .map_err(|e| wav_error("Failed to write sample", e))
}

// ============================================================================
// Tests
// ============================================================================
