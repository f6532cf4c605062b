//! Configuration: CLI arguments and YAML save defaults

mod cli;
mod settings;

pub use cli::{apply_overrides, parse_args, Cli, Command, InspectArgs, OutputFormat, RepackArgs};
pub use settings::{load_config, validate_config, IoConfig, ValidationError};
