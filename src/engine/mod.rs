//! Host Engine Module
//!
//! The host side the CLI needs around the filter core:
//! - WAV file import/export into interleaved byte buffers

pub mod io;

pub use io::{export_wav, import_wav, PcmBuffer};
