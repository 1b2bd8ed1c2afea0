//! Delta Filter
//!
//! One filter instance: settings plus the kernel cached for the current
//! format. Format changes and buffer transforms must not overlap on the same
//! instance; the host serialises them. Transforms take `&self` and keep all
//! per-channel state on the call stack, so independent instances run in
//! parallel without sharing anything.

use std::fmt;

use tracing::{info, trace, warn};

use crate::config::DeltaSettings;
use crate::dsp::dispatch::{resolve, Kernel};
use crate::error::{DeltaError, Result};
use crate::format::FormatDescriptor;

/// Negotiation state of a filter instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterState {
    /// No valid format yet; buffers are refused
    #[default]
    Unresolved,
    /// A kernel is cached for the negotiated format
    Resolved {
        format: FormatDescriptor,
        kernel: Kernel,
    },
}

impl fmt::Display for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterState::Unresolved => write!(f, "Unresolved"),
            FilterState::Resolved { kernel, .. } => write!(f, "Resolved({})", kernel.format()),
        }
    }
}

/// Noise sharpening filter over interleaved sample buffers
///
/// # Example
/// ```
/// use deltadsp::dsp::DeltaFilter;
/// use deltadsp::format::{FormatDescriptor, SampleFormat};
///
/// let mut filter = DeltaFilter::new();
/// filter
///     .set_format(FormatDescriptor::from_sample_format(SampleFormat::U8, 1))
///     .unwrap();
///
/// let mut buffer = vec![10u8, 20, 5, 5];
/// filter.transform_in_place(&mut buffer).unwrap();
/// assert_eq!(buffer, vec![10, 30, 0, 5]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DeltaFilter {
    settings: DeltaSettings,
    state: FilterState,
}

impl DeltaFilter {
    /// Create an unresolved filter with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unresolved filter with the given settings
    pub fn with_settings(settings: DeltaSettings) -> Self {
        Self {
            settings,
            state: FilterState::Unresolved,
        }
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Current settings
    pub fn settings(&self) -> &DeltaSettings {
        &self.settings
    }

    /// Replace all settings
    pub fn set_settings(&mut self, settings: DeltaSettings) {
        self.settings = settings;
    }

    /// Set the gain in percent (0-200)
    pub fn set_gain_percent(&mut self, percent: u32) -> Result<()> {
        self.settings.set_gain_percent(percent)
    }

    /// Gain in percent
    pub fn gain_percent(&self) -> u32 {
        self.settings.gain_percent()
    }

    /// Gain multiplier applied by the kernels
    pub fn gain(&self) -> f32 {
        self.settings.gain()
    }

    /// Enable or suppress the format dump
    pub fn set_silent(&mut self, silent: bool) {
        self.settings.set_silent(silent);
    }

    // ========================================================================
    // Format Negotiation
    // ========================================================================

    /// Handle a format change
    ///
    /// Re-runs kernel selection. On failure the filter drops back to
    /// `Unresolved` and refuses buffers until a supported format arrives.
    ///
    /// # Errors
    /// * `UnsupportedFormat` - If no kernel matches the descriptor
    /// * `InvalidChannelCount` - If the descriptor has zero channels
    pub fn set_format(&mut self, format: FormatDescriptor) -> Result<Kernel> {
        match resolve(&format) {
            Ok(kernel) => {
                self.state = FilterState::Resolved { format, kernel };
                if !self.settings.is_silent() {
                    info!("format changed\n{}", self);
                }
                Ok(kernel)
            }
            Err(err) => {
                warn!(error = %err, "format change rejected, filter unresolved");
                self.state = FilterState::Unresolved;
                Err(err)
            }
        }
    }

    /// Discard the cached kernel
    pub fn clear_format(&mut self) {
        self.state = FilterState::Unresolved;
    }

    /// Current negotiation state
    pub fn state(&self) -> FilterState {
        self.state
    }

    /// True once a kernel is cached
    pub fn is_resolved(&self) -> bool {
        matches!(self.state, FilterState::Resolved { .. })
    }

    /// The negotiated format, if any
    pub fn format(&self) -> Option<&FormatDescriptor> {
        match &self.state {
            FilterState::Resolved { format, .. } => Some(format),
            FilterState::Unresolved => None,
        }
    }

    /// The cached kernel, if any
    pub fn kernel(&self) -> Option<Kernel> {
        match self.state {
            FilterState::Resolved { kernel, .. } => Some(kernel),
            FilterState::Unresolved => None,
        }
    }

    // ========================================================================
    // Buffer Processing
    // ========================================================================

    /// Sharpen a buffer in place and return it
    ///
    /// The buffer is trusted to match the negotiated format; a trailing
    /// partial frame is left untouched.
    ///
    /// # Errors
    /// * `NotResolved` - If no format has been resolved
    pub fn transform_in_place<'a>(&self, buffer: &'a mut [u8]) -> Result<&'a mut [u8]> {
        let FilterState::Resolved { format, kernel } = &self.state else {
            return Err(DeltaError::NotResolved);
        };
        trace!(bytes = buffer.len(), "delta transform");
        Ok(kernel.process(buffer, format.channels, self.settings.gain()))
    }

    /// Copy `input` into `output` and sharpen `output`
    ///
    /// # Errors
    /// * `NotResolved` - If no format has been resolved
    /// * `BufferSizeMismatch` - If the buffers differ in length
    pub fn transform(&self, input: &[u8], output: &mut [u8]) -> Result<()> {
        if !self.is_resolved() {
            return Err(DeltaError::NotResolved);
        }
        if input.len() != output.len() {
            return Err(DeltaError::BufferSizeMismatch {
                input: input.len(),
                output: output.len(),
            });
        }
        output.copy_from_slice(input);
        self.transform_in_place(output)?;
        Ok(())
    }
}

impl fmt::Display for DeltaFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--------")?;
        writeln!(f, "Delta Dsp ({})", self.state)?;
        writeln!(f, "--------")?;
        if let Some(format) = self.format() {
            writeln!(f, "{}", format)?;
            writeln!(f, "--------")?;
        }
        writeln!(f, "gain: {:.2}", self.settings.gain())?;
        writeln!(f, "silent: {}", self.settings.is_silent())?;
        write!(f, "--------")
    }
}
