//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! pesos inspect model.json model.weights.bin
//! pesos inspect model.json group1-shard*.bin --format json
//! pesos repack model.json group1-shard*.bin --output-dir ./out --prefix merged
//! pesos --config pesos.yaml repack model.json shard.bin
//! ```

use super::settings::IoConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pesos: model artifact transport
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "pesos")]
#[command(author = "PAIML")]
#[command(version)]
#[command(about = "Save model topology + weights as named files and merge them back")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// YAML configuration file with save defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Log filter directive for the verbosity flags, `None` defers to `RUST_LOG`
    pub fn log_filter(&self) -> Option<&'static str> {
        if self.quiet {
            return Some("error");
        }
        match self.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Load a model JSON and its weight files and report what they hold
    Inspect(InspectArgs),

    /// Load a model and save it again as one JSON and one weights file
    Repack(RepackArgs),
}

/// Arguments for the inspect command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InspectArgs {
    /// Model JSON file and weight files, in any order
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the repack command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct RepackArgs {
    /// Model JSON file and weight files, in any order
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Override output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Override file name prefix
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Pretty-print the JSON payload
    #[arg(long)]
    pub pretty: bool,
}

/// Output format for the inspect command
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => Err(format!(
                "Unknown output format: {}. Valid formats: text, json, yaml",
                s
            )),
        }
    }
}

/// Parse command line arguments
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Apply command-line overrides to an IoConfig
pub fn apply_overrides(config: &mut IoConfig, args: &RepackArgs) {
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(prefix) = &args.prefix {
        config.prefix = prefix.clone();
    }
    if args.pretty {
        config.pretty = true;
    }
}
