//! Build command implementation.

use crate::cli::BuildArgs;
use crate::error::add_build_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use std::path::Path;
use std::path::PathBuf;
use tarsubset_core::EbookId;
use tarsubset_core::NoopProgress;
use tarsubset_core::SubsetConfig;
use tarsubset_core::build_subset;

pub fn execute(args: &BuildArgs, formatter: &dyn OutputFormatter, show_progress: bool) -> Result<()> {
    let config = config_from_args(args);
    log::debug!("build configuration: {config:?}");

    let result = if show_progress && CliProgress::should_show() {
        let mut progress = CliProgress::new();
        build_subset(&config, &mut progress)
    } else {
        build_subset(&config, &mut NoopProgress)
    };
    let report = add_build_context(result, &config)?;

    if let Some(path) = &report.kept_staging {
        formatter.format_warning(&format!("staging directory kept at {}", path.display()));
    }
    formatter.format_subset_result(&report)
}

/// Project root used when `--root` is not given: the workspace root this
/// binary was built from.
pub fn default_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .unwrap_or(manifest_dir)
        .to_path_buf()
}

fn config_from_args(args: &BuildArgs) -> SubsetConfig {
    let root = args.root.clone().unwrap_or_else(default_root);
    let mut config = SubsetConfig::for_root(root)
        .with_compression_level(args.compression_level)
        .with_keep_staging(args.keep_staging);

    if let Some(source) = &args.source {
        config = config.with_source(source);
    }
    if let Some(output) = &args.output {
        config = config.with_output(output);
    }
    if let Some(staging_dir) = &args.staging_dir {
        config = config.with_staging_dir(staging_dir);
    }
    if !args.ids.is_empty() {
        config = config.with_ids(args.ids.iter().copied().map(EbookId::new).collect());
    }
    config
}
