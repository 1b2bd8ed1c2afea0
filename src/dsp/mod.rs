//! Delta DSP
//!
//! The kernel set (one monomorphised delta kernel per sample type), the
//! dispatcher that picks a kernel for a resolved format, and the filter
//! instance that caches the selection between format changes.

mod dispatch;
mod filter;
mod kernel;
mod sample;

pub use dispatch::{resolve, Kernel, KernelFn};
pub use filter::{DeltaFilter, FilterState};
pub use kernel::{delta_bytes, delta_samples};
pub use sample::{decode_samples, encode_samples, Sample};
