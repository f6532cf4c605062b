//! Pesos CLI
//!
//! # Usage
//!
//! ```bash
//! # Report what a model JSON and its weight files hold
//! pesos inspect model.json group1-shard1of2.bin group1-shard2of2.bin
//!
//! # Merge sharded weights into a single model.weights.bin
//! pesos repack model.json group1-shard*.bin --output-dir ./out
//!
//! # Use save defaults from a config file
//! pesos --config pesos.yaml repack model.json model.weights.bin
//! ```

use clap::Parser;
use pesos::artifacts::ModelArtifactsInfo;
use pesos::config::{
    apply_overrides, load_config, Cli, Command, InspectArgs, IoConfig, OutputFormat, RepackArgs,
};
use pesos::io::{load_from_paths, save_to_dir};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.log_filter() {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Inspect(args) => run_inspect(args).await,
        Command::Repack(args) => run_repack(args, cli.config.as_deref(), cli.quiet).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectReport {
    weight_specs: Vec<String>,
    format: Option<String>,
    generated_by: Option<String>,
    converted_by: Option<String>,
    model_artifacts_info: ModelArtifactsInfo,
}

async fn run_inspect(args: InspectArgs) -> Result<(), String> {
    let artifacts = load_from_paths(&args.files)
        .await
        .map_err(|e| e.to_string())?;
    let info = artifacts.info().map_err(|e| e.to_string())?;

    let report = InspectReport {
        weight_specs: artifacts
            .weight_specs
            .iter()
            .flatten()
            .map(|spec| format!("{} {:?} {}", spec.name, spec.shape, spec.dtype))
            .collect(),
        format: artifacts.format.clone(),
        generated_by: artifacts.generated_by.clone(),
        converted_by: artifacts.converted_by.clone(),
        model_artifacts_info: info,
    };

    match args.format {
        OutputFormat::Text => {
            let info = &report.model_artifacts_info;
            println!("Topology:     {} bytes", info.model_topology_bytes);
            println!("Weight specs: {} bytes", info.weight_specs_bytes);
            println!("Weight data:  {} bytes", info.weight_data_bytes);
            if let Some(format) = &report.format {
                println!("Format:       {format}");
            }
            if let Some(generated_by) = &report.generated_by {
                println!("Generated by: {generated_by}");
            }
            if let Some(converted_by) = &report.converted_by {
                println!("Converted by: {converted_by}");
            }
            println!("Weights ({}):", report.weight_specs.len());
            for spec in &report.weight_specs {
                println!("  {spec}");
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&report).map_err(|e| e.to_string())?;
            print!("{yaml}");
        }
    }

    Ok(())
}

async fn run_repack(args: RepackArgs, config: Option<&Path>, quiet: bool) -> Result<(), String> {
    let mut settings = match config {
        Some(path) => load_config(path).map_err(|e| e.to_string())?,
        None => IoConfig::default(),
    };
    apply_overrides(&mut settings, &args);
    pesos::config::validate_config(&settings).map_err(|e| e.to_string())?;

    let artifacts = load_from_paths(&args.files)
        .await
        .map_err(|e| e.to_string())?;
    let save_config = settings.save_config();
    let result = save_to_dir(&artifacts, &settings.output_dir, save_config.clone())
        .await
        .map_err(|e| e.to_string())?;

    if !quiet {
        let info = result.model_artifacts_info;
        println!(
            "Wrote {} ({} bytes topology)",
            settings.output_dir.join(save_config.json_file_name()).display(),
            info.model_topology_bytes
        );
        if info.weight_data_bytes > 0 {
            println!(
                "Wrote {} ({} bytes weights)",
                settings.output_dir.join(save_config.weights_file_name()).display(),
                info.weight_data_bytes
            );
        }
    }

    Ok(())
}
