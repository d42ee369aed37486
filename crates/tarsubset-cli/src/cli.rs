//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tarsubset")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Build options used when no subcommand is given
    #[command(flatten)]
    pub build: BuildArgs,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the subset archive (default)
    Build(BuildArgs),
    /// List archive contents without extraction
    List(ListArgs),
    /// Fabricate a mini archive from local sample texts
    Synth(SynthArgs),
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct BuildArgs {
    /// Project root holding the source archive (default: workspace root)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Source archive (default: <ROOT>/gutenberg-txt-files.tar.gz)
    #[arg(long, value_name = "ARCHIVE")]
    pub source: Option<PathBuf>,

    /// Output archive (default: <ROOT>/mini-gutenberg-10mb.tar.gz)
    #[arg(long, value_name = "ARCHIVE")]
    pub output: Option<PathBuf>,

    /// Staging directory (default: <ROOT>/.mini_tmp)
    #[arg(long, value_name = "DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Ebook identifier to include (repeatable; default: the built-in ten)
    #[arg(long = "id", value_name = "ID", value_delimiter = ',')]
    pub ids: Vec<u32>,

    /// Compression level (1-9)
    #[arg(
        short = 'l',
        long,
        default_value = "9",
        value_parser = clap::value_parser!(u8).range(1..=9)
    )]
    pub compression_level: u8,

    /// Leave the staging directory on disk after the run
    #[arg(long)]
    pub keep_staging: bool,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Show detailed file information
    #[arg(short, long)]
    pub long: bool,

    /// Show sizes in human-readable format
    #[arg(short = 'H', long)]
    pub human_readable: bool,
}

#[derive(clap::Args)]
pub struct SynthArgs {
    /// Directory holding alice.txt, pride.txt, frankenstein.txt, dracula.txt
    /// and sherlock.txt
    #[arg(value_name = "SAMPLES_DIR")]
    pub samples_dir: PathBuf,

    /// Output archive (default: ./mini-gutenberg-10mb.tar.gz)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Body size of each entry
    #[arg(long, default_value = "1M", value_parser = parse_byte_size)]
    pub target_size: u64,

    /// Compression level (1-9)
    #[arg(
        short = 'l',
        long,
        default_value = "9",
        value_parser = clap::value_parser!(u8).range(1..=9)
    )]
    pub compression_level: u8,
}

/// Parse byte size with optional suffix (K, M, G)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}
