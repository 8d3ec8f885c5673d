use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use gpuprof_common::platform::{library_search_path_var, platform_name};
use gpuprof_core::config::{default_config_path, GpuprofConfig};
use gpuprof_core::ProbeReport;
use gpuprof_driver::Backend;

#[derive(Parser)]
#[command(name = "gpuprof")]
#[command(about = "gpuprof - lazy loading of optional GPU profiling libraries")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Try to load each profiling backend and report the outcome
    Probe {
        /// Backend to probe (repeatable; default: from config)
        #[arg(short, long = "backend")]
        backends: Vec<Backend>,

        /// Configuration file path (default: $GPUPROF_CONFIG, then the system config)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show where each backend's library is looked up, without loading it
    Info,
}

fn main() -> anyhow::Result<()> {
    gpuprof_common::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Probe {
            backends,
            config,
            json,
        } => {
            let config_path = config.unwrap_or_else(default_config_path);
            let gpuprof_config = GpuprofConfig::load_or_default(&config_path);

            let backends = if backends.is_empty() {
                gpuprof_config.probe.backends.clone()
            } else {
                backends
            };
            info!(
                "probing {} backend(s), config {}",
                backends.len(),
                config_path.display()
            );

            let report = gpuprof_core::probe(&backends);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }

            report.check_required(&gpuprof_config.probe.required)?;
        }

        Commands::Info => {
            println!("Platform:     {}", platform_name());
            println!("Search path:  {}", library_search_path_var());
            println!();
            for backend in Backend::ALL {
                println!("  {}", backend);
                println!("    Library:      {}", backend.library_name());
                println!(
                    "    Default dir:  {}",
                    backend.default_dir().unwrap_or("(none)")
                );
            }
        }
    }

    Ok(())
}

fn print_report(report: &ProbeReport) {
    println!(
        "gpuprof probe ({}, libraries searched via {})",
        report.platform, report.search_path_var
    );
    println!();
    for status in &report.backends {
        let marker = if status.loaded { "[PASS]" } else { "[FAIL]" };
        println!("  {} {} ({})", marker, status.backend, status.library);
        if let Some(version) = status.version {
            println!("         version: {}", version);
        }
        if let Some(ref error) = status.error {
            println!("         {}", error);
        }
    }
}
