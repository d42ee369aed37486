//! Synth command implementation

use crate::cli::SynthArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use std::path::PathBuf;
use tarsubset_core::SynthesisConfig;
use tarsubset_core::config::OUTPUT_ARCHIVE_NAME;
use tarsubset_core::synthesize_archive;

pub fn execute(args: &SynthArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(OUTPUT_ARCHIVE_NAME));
    let target_bytes = usize::try_from(args.target_size)
        .with_context(|| format!("target size {} is too large", args.target_size))?;

    let config = SynthesisConfig::new(&args.samples_dir, &output)
        .with_target_bytes(target_bytes)
        .with_compression_level(args.compression_level);

    let report = add_archive_context(synthesize_archive(&config), &output)?;
    formatter.format_synthesis_result(&report)
}
