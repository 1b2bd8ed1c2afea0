//! DeltaDsp - Noise Sharpening Audio Filter
//!
//! Replaces every sample with a sharpened version that amplifies the
//! difference to the previous sample on the same channel, then clamps to
//! the range of the sample type.
//!
//! # Architecture
//!
//! - Kernel set: one delta kernel per sample representation (8/16/32/64-bit
//!   signed and unsigned integers, 32/64-bit floats)
//! - Dispatcher: resolves a [`format::FormatDescriptor`] to one kernel, once
//!   per format change
//! - Filter: caches the selected kernel and applies it to each buffer, in
//!   place or into a separate output buffer

pub mod cli;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod format;

pub use config::DeltaSettings;
pub use dsp::{DeltaFilter, Kernel};
pub use error::{DeltaError, Result};
pub use format::{ByteOrder, FormatDescriptor, SampleFormat};
