//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use tarsubset_core::ArchiveManifest;
use tarsubset_core::SubsetReport;
use tarsubset_core::SynthesisReport;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct ManifestEntryOutput<'a> {
    path: &'a str,
    kind: String,
    size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<u32>,
}

#[derive(Serialize)]
struct ManifestOutput<'a> {
    format: String,
    total_entries: usize,
    total_size: u64,
    entries: Vec<ManifestEntryOutput<'a>>,
}

impl<'a> ManifestOutput<'a> {
    fn new(manifest: &'a ArchiveManifest, with_mode: bool) -> Self {
        Self {
            format: manifest.format.to_string(),
            total_entries: manifest.total_entries,
            total_size: manifest.total_size,
            entries: manifest
                .entries
                .iter()
                .map(|e| ManifestEntryOutput {
                    path: &e.path,
                    kind: e.kind.to_string(),
                    size: e.size,
                    mode: if with_mode { e.mode } else { None },
                })
                .collect(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_subset_result(&self, report: &SubsetReport) -> Result<()> {
        #[derive(Serialize)]
        struct SubsetOutput<'a> {
            output_path: String,
            members: &'a [String],
            bytes_written: u64,
            bytes_compressed: u64,
            output_size: u64,
            compression_ratio: f64,
            entries_skipped: usize,
            #[serde(skip_serializing_if = "Option::is_none")]
            kept_staging: Option<String>,
            duration_ms: u128,
        }

        let data = SubsetOutput {
            output_path: report.output_path.display().to_string(),
            members: &report.members,
            bytes_written: report.bytes_written,
            bytes_compressed: report.bytes_compressed,
            output_size: report.output_size,
            compression_ratio: report.compression_ratio(),
            entries_skipped: report.entries_skipped,
            kept_staging: report
                .kept_staging
                .as_ref()
                .map(|p| p.display().to_string()),
            duration_ms: report.duration.as_millis(),
        };

        Self::output(&JsonOutput::success("build", data))
    }

    fn format_synthesis_result(&self, report: &SynthesisReport) -> Result<()> {
        #[derive(Serialize)]
        struct SynthesisOutput<'a> {
            output_path: String,
            members: &'a [String],
            bytes_written: u64,
            output_size: u64,
        }

        let data = SynthesisOutput {
            output_path: report.output_path.display().to_string(),
            members: &report.members,
            bytes_written: report.bytes_written,
            output_size: report.output_size,
        };

        Self::output(&JsonOutput::success("synth", data))
    }

    fn format_manifest_short(&self, manifest: &ArchiveManifest) -> Result<()> {
        Self::output(&JsonOutput::success(
            "list",
            ManifestOutput::new(manifest, false),
        ))
    }

    fn format_manifest_long(&self, manifest: &ArchiveManifest, _human_readable: bool) -> Result<()> {
        Self::output(&JsonOutput::success(
            "list",
            ManifestOutput::new(manifest, true),
        ))
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::error("tarsubset", format!("{error:#}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tarsubset_core::ArchiveEntry;
    use tarsubset_core::MemberKind;
    use tarsubset_core::formats::ArchiveType;

    #[test]
    fn test_manifest_output_structure() {
        let mut manifest = ArchiveManifest::new(ArchiveType::TarGz);
        manifest.add_entry(ArchiveEntry {
            path: "cache/epub/11/pg11.txt".to_string(),
            kind: MemberKind::File,
            size: 42,
            mode: Some(0o644),
        });

        let short = serde_json::to_value(ManifestOutput::new(&manifest, false)).unwrap();
        assert_eq!(short["total_entries"], 1);
        assert_eq!(short["entries"][0]["path"], "cache/epub/11/pg11.txt");
        assert_eq!(short["entries"][0]["kind"], "file");
        assert!(short["entries"][0].get("mode").is_none());

        let long = serde_json::to_value(ManifestOutput::new(&manifest, true)).unwrap();
        assert_eq!(long["entries"][0]["mode"], 0o644);
    }
}
