//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use tracing::info;

use crate::config::DeltaSettings;
use crate::dsp::DeltaFilter;
use crate::engine::{export_wav, import_wav};
use crate::error::Result;
use crate::format::{ByteOrder, SampleFormat};

/// Build settings from an optional file plus command-line overrides.
pub fn load_settings(
    settings_path: Option<&Path>,
    gain: Option<u32>,
    verbose: bool,
) -> Result<DeltaSettings> {
    let mut settings = match settings_path {
        Some(path) => DeltaSettings::load(path)?,
        None => DeltaSettings::default(),
    };
    if let Some(percent) = gain {
        settings.set_gain_percent(percent)?;
    }
    if verbose {
        settings.set_silent(false);
    }
    Ok(settings)
}

/// Sharpen a WAV file and write the result.
pub fn process(input: &Path, output: &Path, settings: DeltaSettings) -> Result<()> {
    info!("Processing {} -> {}", input.display(), output.display());

    let mut buffer = import_wav(input)?;

    let mut filter = DeltaFilter::with_settings(settings);
    filter.set_format(buffer.format)?;
    filter.transform_in_place(&mut buffer.data)?;

    export_wav(&buffer, output)?;

    println!(
        "Processed {} frames ({:.2}s, {} x {}ch) with gain {}%",
        buffer.num_frames(),
        buffer.duration_secs(),
        buffer.format.sample_format()?,
        buffer.format.channels,
        filter.gain_percent()
    );
    println!("Written: {}", output.display());

    Ok(())
}

/// Print the format a WAV file resolves to.
pub fn show_info(input: &Path) -> Result<()> {
    let buffer = import_wav(input)?;
    let format = buffer.format.sample_format()?;

    println!("File: {}", input.display());
    println!("Format: {}", format.caps_name(buffer.format.byte_order));
    println!("{}", buffer.format);
    println!("sample_rate: {}", buffer.sample_rate);
    println!("frames: {}", buffer.num_frames());
    println!("duration: {:.3}s", buffer.duration_secs());

    Ok(())
}

/// List every supported sample format.
pub fn list_formats() -> Result<()> {
    let order = ByteOrder::native();
    for format in SampleFormat::ALL {
        let kind = match (format.is_integer(), format.is_signed()) {
            (true, true) => "signed integer",
            (true, false) => "unsigned integer",
            (false, _) => "float",
        };
        println!("{:<6} {:>2}-bit {}", format.caps_name(order), format.bits(), kind);
    }
    Ok(())
}
