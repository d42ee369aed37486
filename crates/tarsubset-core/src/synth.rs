//! Fabricating a mini corpus archive from local sample texts.
//!
//! Produces the same ten members as a real subsetting run, each padded to a
//! fixed body size, for machines that do not have the full corpus.

use std::fs;
use std::io;
use std::path::Path;

use tar::Header;

use crate::Result;
use crate::SubsetError;
use crate::catalog::SAMPLE_CATALOG;
use crate::catalog::SampleSpec;
use crate::config::SynthesisConfig;
use crate::formats::detect::detect_format;
use crate::repack::write_archive_atomically;
use crate::report::SynthesisReport;

/// Byline placed under every synthesized title.
pub const SAMPLE_AUTHOR_LINE: &str = "by Sample Gutenberg Author";

/// Writes the synthesized archive described by `config`.
///
/// # Errors
///
/// Returns an error if:
/// - the configuration is invalid
/// - a sample file referenced by the catalog is missing
/// - the output format is not recognized or the archive cannot be written
///
/// # Examples
///
/// ```no_run
/// use tarsubset_core::SynthesisConfig;
/// use tarsubset_core::synthesize_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SynthesisConfig::new("samples", "mini-gutenberg-10mb.tar.gz");
/// let report = synthesize_archive(&config)?;
/// println!("{}", report.summary_line());
/// # Ok(())
/// # }
/// ```
pub fn synthesize_archive(config: &SynthesisConfig) -> Result<SynthesisReport> {
    config.validate()?;
    let format = detect_format(&config.output)?;

    // Load everything up front so a missing sample never touches the output.
    let mut entries = Vec::with_capacity(SAMPLE_CATALOG.len());
    for spec in &SAMPLE_CATALOG {
        let text = load_sample(&config.samples_dir, spec)?;
        entries.push((spec.id.member_name(), sample_entry(spec, &text, config.target_bytes)));
    }

    let mut bytes_written = 0u64;
    let output_size =
        write_archive_atomically(&config.output, format, config.compression_level, |builder| {
            for (name, content) in &entries {
                let mut header = Header::new_gnu();
                header.set_entry_type(tar::EntryType::Regular);
                header.set_size(content.len() as u64);
                header.set_mode(0o644);
                builder.append_data(&mut header, name, content.as_bytes())?;
                bytes_written += content.len() as u64;
            }
            Ok(())
        })?;

    log::info!(
        "synthesized {} sample members into {}",
        entries.len(),
        config.output.display()
    );

    Ok(SynthesisReport {
        output_path: config.output.clone(),
        members: entries.into_iter().map(|(name, _)| name).collect(),
        bytes_written,
        output_size,
    })
}

/// Repeats the normalized `text` until it fills `target_bytes`, cutting the
/// last copy at a UTF-8 boundary at or below the target.
///
/// Line endings are normalized to `\n` and each copy is trimmed and followed
/// by a blank line.
///
/// # Examples
///
/// ```
/// use tarsubset_core::synth::build_sample_body;
///
/// assert_eq!(build_sample_body("ab\r\n", 7), "ab\n\nab\n");
/// ```
#[must_use]
pub fn build_sample_body(text: &str, target_bytes: usize) -> String {
    let mut unit = text.replace("\r\n", "\n").trim().to_string();
    unit.push_str("\n\n");

    let copies = target_bytes.div_ceil(unit.len());
    let mut body = unit.repeat(copies);

    let mut cut = target_bytes.min(body.len());
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    body.truncate(cut);
    body
}

fn sample_entry(spec: &SampleSpec, text: &str, target_bytes: usize) -> String {
    [
        spec.title,
        SAMPLE_AUTHOR_LINE,
        "",
        &build_sample_body(text, target_bytes),
    ]
    .join("\n")
}

fn load_sample(samples_dir: &Path, spec: &SampleSpec) -> Result<String> {
    let path = samples_dir.join(spec.sample_file);
    fs::read_to_string(&path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            SubsetError::SampleNotFound { path }
        } else {
            SubsetError::Io(e)
        }
    })
}
