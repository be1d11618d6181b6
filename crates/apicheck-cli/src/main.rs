//! apicheck CLI - project scaffolding for API conformance testing
//!
//! Test execution itself happens in the user's own binary through
//! `apicheck_runner::Harness`; this CLI covers the tooling around it:
//! config scaffolding, stub generation, report schema export, and sanity
//! checks.

mod generate;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use apicheck_core::{Config, ReportSummary};

#[derive(Parser)]
#[command(name = "apicheck")]
#[command(about = "API conformance testing toolkit")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config file
    Init,

    /// Generate test stubs from an OpenAPI spec
    Generate {
        /// OpenAPI spec path (default: spec_path from config)
        #[arg(short, long)]
        spec: Option<PathBuf>,

        /// Output directory for generated stub modules
        #[arg(short, long, default_value = "tests")]
        out: PathBuf,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Export JSON Schema for the report format
    Schema,

    /// Check config and spec files
    Doctor,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Init => {
            let config_path = ".apicheck.toml";
            if Path::new(config_path).exists() {
                eprintln!("{config_path} already exists");
                return Ok(1);
            }

            std::fs::write(config_path, Config::example())?;
            println!("Created {config_path}");
            println!("\nEdit the file to configure:");
            println!("  - base_url: server under test");
            println!("  - headers: auth tokens, API keys");
            println!("  - openapi: spec path and strict mode");
            println!("  - reporters: JSON/HTML report output");
            Ok(0)
        }

        Commands::Generate { spec, out, force } => {
            let spec_path = match spec {
                Some(path) => path,
                None => Config::load_default()?
                    .openapi
                    .map(|openapi| openapi.spec_path)
                    .context("no spec given: pass --spec or configure [openapi] spec_path")?,
            };

            let outcome = generate::generate_stubs(&spec_path, &out, force)?;

            for path in &outcome.written {
                println!("  Generated: {}", path.display());
            }
            for path in &outcome.skipped {
                println!("  Skipped: {} (already exists, use --force)", path.display());
            }

            if outcome.written.is_empty() && outcome.skipped.is_empty() {
                println!("No operations found in {}", spec_path.display());
            } else {
                println!(
                    "\nDone: {} generated, {} skipped",
                    outcome.written.len(),
                    outcome.skipped.len()
                );
            }
            Ok(0)
        }

        Commands::Schema => {
            let schema = ReportSummary::json_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(0)
        }

        Commands::Doctor => {
            println!("apicheck doctor");
            println!("===============\n");

            let config = Config::load_default();
            let config_ok = config.is_ok();
            println!(
                "[{}] Config file (.apicheck.toml)",
                if config_ok { "OK" } else { "--" }
            );

            let mut broken = false;
            if let Ok(config) = config {
                if let Some(openapi) = &config.openapi {
                    match apicheck_runner::SpecValidator::from_file(&openapi.spec_path, openapi.strict)
                    {
                        Ok(_) => println!("[OK] Spec file ({})", openapi.spec_path.display()),
                        Err(e) => {
                            broken = true;
                            println!("[NG] Spec file ({}): {e}", openapi.spec_path.display());
                        }
                    }
                }
                if let Some(base_url) = &config.base_url {
                    println!("[OK] base_url ({base_url})");
                }
            }

            if !config_ok {
                println!("\nCreate config file:");
                println!("  apicheck init");
            }

            Ok(i32::from(broken))
        }
    }
}
