//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use tarsubset_core::ArchiveManifest;
use tarsubset_core::SubsetReport;
use tarsubset_core::SynthesisReport;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn write_summary(&self, line: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{}", style(line).green().bold()));
        } else {
            let _ = self.term.write_line(line);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_subset_result(&self, report: &SubsetReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.write_summary(&report.summary_line());

        if self.verbose {
            for member in &report.members {
                let _ = self.term.write_line(&format!("  {member}"));
            }
            let _ = self.term.write_line(&format!(
                "  Uncompressed:     {}",
                Self::format_size(report.bytes_written)
            ));
            let _ = self.term.write_line(&format!(
                "  Compression:      {:.1}x",
                report.compression_ratio()
            ));
            let _ = self.term.write_line(&format!(
                "  Entries skipped:  {}",
                Self::format_number(report.entries_skipped)
            ));
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", report.duration));
        }

        Ok(())
    }

    fn format_synthesis_result(&self, report: &SynthesisReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.write_summary(&report.summary_line());

        if self.verbose {
            for member in &report.members {
                let _ = self.term.write_line(&format!("  {member}"));
            }
            let _ = self.term.write_line(&format!(
                "  Uncompressed:     {}",
                Self::format_size(report.bytes_written)
            ));
        }

        Ok(())
    }

    fn format_manifest_short(&self, manifest: &ArchiveManifest) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in &manifest.entries {
            let _ = self.term.write_line(&entry.path);
        }

        Ok(())
    }

    fn format_manifest_long(&self, manifest: &ArchiveManifest, human_readable: bool) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in &manifest.entries {
            let size_str = if human_readable {
                Self::format_size(entry.size)
            } else {
                entry.size.to_string()
            };

            let mode_str = entry
                .mode
                .map_or_else(|| "-".to_string(), |m| format!("{m:o}"));

            let _ = self.term.write_line(&format!(
                "{}{:<6} {:>10}  {}",
                entry.kind.marker(),
                mode_str,
                size_str,
                entry.path
            ));
        }

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "Total: {} entries, {}",
            Self::format_number(manifest.total_entries),
            Self::format_size(manifest.total_size)
        ));

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = term.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = term.write_line(&format!("WARNING: {message}"));
        }
    }
}
