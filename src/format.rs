//! Sample format description and resolution
//!
//! The host pipeline hands over a structured [`FormatDescriptor`] once per
//! format change. Resolution turns it into one of the ten [`SampleFormat`]
//! variants the kernel set supports, or rejects it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DeltaError, Result};

// ============================================================================
// Byte Order
// ============================================================================

/// Byte order of the samples in a buffer
///
/// Informational only: kernels operate on natively ordered samples, any
/// swapping happens upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ByteOrder {
    /// Least significant byte first
    Little,
    /// Most significant byte first
    Big,
}

impl ByteOrder {
    /// Byte order of the machine we are running on
    pub const fn native() -> Self {
        if cfg!(target_endian = "little") {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        }
    }

    /// Short suffix used in format names ("LE" / "BE")
    pub fn suffix(&self) -> &'static str {
        match self {
            ByteOrder::Little => "LE",
            ByteOrder::Big => "BE",
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::native()
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

// ============================================================================
// Sample Format
// ============================================================================

/// One of the ten resolved sample representations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleFormat {
    /// 8-bit signed integer
    S8,
    /// 8-bit unsigned integer
    U8,
    /// 16-bit signed integer
    S16,
    /// 16-bit unsigned integer
    U16,
    /// 32-bit signed integer
    S32,
    /// 32-bit unsigned integer
    U32,
    /// 64-bit signed integer
    S64,
    /// 64-bit unsigned integer
    U64,
    /// 32-bit IEEE float
    F32,
    /// 64-bit IEEE float
    F64,
}

impl SampleFormat {
    /// Every supported format, integer formats first
    pub const ALL: [SampleFormat; 10] = [
        SampleFormat::S8,
        SampleFormat::U8,
        SampleFormat::S16,
        SampleFormat::U16,
        SampleFormat::S32,
        SampleFormat::U32,
        SampleFormat::S64,
        SampleFormat::U64,
        SampleFormat::F32,
        SampleFormat::F64,
    ];

    /// Select the format for a (width, integer, signed) triple
    ///
    /// `is_signed` is ignored for floating point. Returns `None` for any
    /// combination outside the supported set.
    pub const fn from_parts(bit_width: u32, is_integer: bool, is_signed: bool) -> Option<Self> {
        match (bit_width, is_integer, is_signed) {
            (8, true, true) => Some(SampleFormat::S8),
            (8, true, false) => Some(SampleFormat::U8),
            (16, true, true) => Some(SampleFormat::S16),
            (16, true, false) => Some(SampleFormat::U16),
            (32, true, true) => Some(SampleFormat::S32),
            (32, true, false) => Some(SampleFormat::U32),
            (64, true, true) => Some(SampleFormat::S64),
            (64, true, false) => Some(SampleFormat::U64),
            (32, false, _) => Some(SampleFormat::F32),
            (64, false, _) => Some(SampleFormat::F64),
            _ => None,
        }
    }

    /// Bits per sample
    pub const fn bits(self) -> u32 {
        match self {
            SampleFormat::S8 | SampleFormat::U8 => 8,
            SampleFormat::S16 | SampleFormat::U16 => 16,
            SampleFormat::S32 | SampleFormat::U32 | SampleFormat::F32 => 32,
            SampleFormat::S64 | SampleFormat::U64 | SampleFormat::F64 => 64,
        }
    }

    /// Bytes per sample
    pub const fn bytes(self) -> usize {
        (self.bits() / 8) as usize
    }

    /// True for the eight integer formats
    pub const fn is_integer(self) -> bool {
        !matches!(self, SampleFormat::F32 | SampleFormat::F64)
    }

    /// True for signed integers and for floats
    pub const fn is_signed(self) -> bool {
        !matches!(
            self,
            SampleFormat::U8 | SampleFormat::U16 | SampleFormat::U32 | SampleFormat::U64
        )
    }

    /// Base name without byte order suffix ("S16", "F32", ...)
    pub fn name(&self) -> &'static str {
        match self {
            SampleFormat::S8 => "S8",
            SampleFormat::U8 => "U8",
            SampleFormat::S16 => "S16",
            SampleFormat::U16 => "U16",
            SampleFormat::S32 => "S32",
            SampleFormat::U32 => "U32",
            SampleFormat::S64 => "S64",
            SampleFormat::U64 => "U64",
            SampleFormat::F32 => "F32",
            SampleFormat::F64 => "F64",
        }
    }

    /// Full pipeline-style name for a byte order ("S16LE", "U8", ...)
    pub fn caps_name(&self, byte_order: ByteOrder) -> String {
        if self.bits() == 8 {
            self.name().to_string()
        } else {
            format!("{}{}", self.name(), byte_order.suffix())
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a pipeline-style format name into its format and byte order
///
/// Accepts exactly `<S|U|F><width>` followed by `LE`/`BE` for widths above
/// 8 bits, and no suffix for 8-bit formats. 8-bit formats report the native
/// byte order.
fn parse_caps_name(name: &str) -> Result<(SampleFormat, ByteOrder)> {
    let reject = || DeltaError::unsupported(name.to_string());

    let (body, byte_order) = if let Some(body) = name.strip_suffix("LE") {
        (body, Some(ByteOrder::Little))
    } else if let Some(body) = name.strip_suffix("BE") {
        (body, Some(ByteOrder::Big))
    } else {
        (name, None)
    };

    let mut chars = body.chars();
    let (is_integer, is_signed) = match chars.next() {
        Some('S') => (true, true),
        Some('U') => (true, false),
        Some('F') => (false, true),
        _ => return Err(reject()),
    };

    let width_str = chars.as_str();
    if width_str.is_empty() || !width_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(reject());
    }
    let bit_width: u32 = width_str.parse().map_err(|_| reject())?;

    let format = SampleFormat::from_parts(bit_width, is_integer, is_signed).ok_or_else(reject)?;

    match (format.bits(), byte_order) {
        (8, None) => Ok((format, ByteOrder::native())),
        (8, Some(_)) => Err(reject()),
        (_, Some(order)) => Ok((format, order)),
        (_, None) => Err(reject()),
    }
}

impl FromStr for SampleFormat {
    type Err = DeltaError;

    fn from_str(s: &str) -> Result<Self> {
        parse_caps_name(s).map(|(format, _)| format)
    }
}

// ============================================================================
// Format Descriptor
// ============================================================================

/// Resolved format of the buffers a filter instance will see
///
/// Immutable per format-change event. Whether the combination of fields is
/// supported is decided by [`FormatDescriptor::sample_format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    /// Bits per sample (8, 16, 32 or 64)
    pub bit_width: u32,
    /// False for floating point samples
    pub is_integer: bool,
    /// Signedness; meaningless for floating point
    pub is_signed: bool,
    /// Byte order of the samples as delivered
    pub byte_order: ByteOrder,
    /// Number of interleaved channels
    pub channels: usize,
}

impl FormatDescriptor {
    /// Create a descriptor from its raw fields
    pub fn new(
        bit_width: u32,
        is_integer: bool,
        is_signed: bool,
        byte_order: ByteOrder,
        channels: usize,
    ) -> Self {
        Self {
            bit_width,
            is_integer,
            is_signed,
            byte_order,
            channels,
        }
    }

    /// Descriptor for a known sample format in native byte order
    pub fn from_sample_format(format: SampleFormat, channels: usize) -> Self {
        Self {
            bit_width: format.bits(),
            is_integer: format.is_integer(),
            is_signed: format.is_signed(),
            byte_order: ByteOrder::native(),
            channels,
        }
    }

    /// Descriptor from a pipeline-style format name such as "S16LE" or "F32BE"
    pub fn from_caps_name(name: &str, channels: usize) -> Result<Self> {
        let (format, byte_order) = parse_caps_name(name)?;
        Ok(Self {
            byte_order,
            ..Self::from_sample_format(format, channels)
        })
    }

    /// Resolve the descriptor to a supported sample format
    ///
    /// # Errors
    /// * `UnsupportedFormat` - If no kernel exists for this combination
    pub fn sample_format(&self) -> Result<SampleFormat> {
        SampleFormat::from_parts(self.bit_width, self.is_integer, self.is_signed).ok_or_else(
            || {
                DeltaError::unsupported(format!(
                    "{}-bit {}{}",
                    self.bit_width,
                    if self.is_integer {
                        if self.is_signed {
                            "signed "
                        } else {
                            "unsigned "
                        }
                    } else {
                        ""
                    },
                    if self.is_integer { "integer" } else { "float" }
                ))
            },
        )
    }

    /// Bytes in one frame (one sample per channel)
    pub fn frame_bytes(&self) -> usize {
        (self.bit_width as usize / 8) * self.channels
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "is_int: {}", if self.is_integer { "int" } else { "float" })?;
        writeln!(f, "channels: {}", self.channels)?;
        writeln!(f, "byte_order: {}", self.byte_order)?;
        writeln!(
            f,
            "signed: {}",
            if self.is_signed { "signed" } else { "unsigned" }
        )?;
        write!(f, "width: {}", self.bit_width)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_covers_all_formats() {
        for format in SampleFormat::ALL {
            let resolved =
                SampleFormat::from_parts(format.bits(), format.is_integer(), format.is_signed());
            assert_eq!(resolved, Some(format));
        }
    }

    #[test]
    fn test_from_parts_rejects_narrow_floats() {
        assert_eq!(SampleFormat::from_parts(8, false, true), None);
        assert_eq!(SampleFormat::from_parts(16, false, false), None);
        assert_eq!(SampleFormat::from_parts(24, true, true), None);
        assert_eq!(SampleFormat::from_parts(0, true, false), None);
    }

    #[test]
    fn test_float_ignores_signedness() {
        assert_eq!(
            SampleFormat::from_parts(32, false, false),
            Some(SampleFormat::F32)
        );
        assert_eq!(
            SampleFormat::from_parts(64, false, true),
            Some(SampleFormat::F64)
        );
    }

    #[test]
    fn test_parse_caps_names() {
        let (format, order) = parse_caps_name("S16LE").unwrap();
        assert_eq!(format, SampleFormat::S16);
        assert_eq!(order, ByteOrder::Little);

        let (format, order) = parse_caps_name("F64BE").unwrap();
        assert_eq!(format, SampleFormat::F64);
        assert_eq!(order, ByteOrder::Big);

        let (format, order) = parse_caps_name("U8").unwrap();
        assert_eq!(format, SampleFormat::U8);
        assert_eq!(order, ByteOrder::native());
    }

    #[test]
    fn test_parse_caps_rejects_malformed() {
        for name in ["", "S16", "S8LE", "F16LE", "X32LE", "S 16LE", "S-16LE", "S24LE", "F8"] {
            assert!(
                parse_caps_name(name).is_err(),
                "expected '{}' to be rejected",
                name
            );
        }
    }

    #[test]
    fn test_caps_name_round_trip() {
        for format in SampleFormat::ALL {
            let name = format.caps_name(ByteOrder::Big);
            let parsed: SampleFormat = name.parse().unwrap();
            assert_eq!(parsed, format);
        }
    }

    #[test]
    fn test_descriptor_resolution() {
        let desc = FormatDescriptor::from_caps_name("U32BE", 2).unwrap();
        assert_eq!(desc.bit_width, 32);
        assert!(desc.is_integer);
        assert!(!desc.is_signed);
        assert_eq!(desc.byte_order, ByteOrder::Big);
        assert_eq!(desc.sample_format().unwrap(), SampleFormat::U32);
        assert_eq!(desc.frame_bytes(), 8);
    }

    #[test]
    fn test_descriptor_rejects_unsupported() {
        let desc = FormatDescriptor::new(8, false, true, ByteOrder::Little, 1);
        let err = desc.sample_format().unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
        assert!(err.to_string().contains("8-bit float"));
    }

    #[test]
    fn test_descriptor_display() {
        let desc = FormatDescriptor::new(16, true, true, ByteOrder::Little, 2);
        let text = desc.to_string();
        assert!(text.contains("is_int: int"));
        assert!(text.contains("channels: 2"));
        assert!(text.contains("byte_order: LE"));
        assert!(text.contains("width: 16"));
    }

    #[test]
    fn test_descriptor_serde() {
        let desc = FormatDescriptor::from_sample_format(SampleFormat::F32, 2);
        let json = serde_json::to_string(&desc).unwrap();
        let restored: FormatDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, desc);
    }
}
