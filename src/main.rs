//! chmod-assets
//!
//! Applies rule-based file permissions to a build output directory.
//!
//! # Usage
//!
//! ```bash
//! # Apply rules to every file under dist/
//! chmod-assets apply --config chmod.json --output-dir dist
//!
//! # Apply rules to specific assets only
//! chmod-assets apply --config chmod.json --output-dir dist bin/cli.js bin/setup.sh
//!
//! # Show what would change
//! chmod-assets apply --config chmod.json --output-dir dist --dry-run
//!
//! # Check a configuration file
//! chmod-assets validate --config chmod.json
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chmod_plugin::core::Diagnostics;
use chmod_plugin::hooks::EmitContext;
use chmod_plugin::logging;
use chmod_plugin::plugin::ChmodPlugin;
use chmod_plugin::rules::PluginOptions;
use chmod_plugin::target::{DryRunFileSystem, LocalFileSystem, OutputFileSystem};
use clap::{Parser, Subcommand};
use colored::Colorize;

/// Rule-based file permissions for build output
#[derive(Parser, Debug)]
#[command(name = "chmod-assets")]
#[command(about = "Apply rule-based file permissions to build output")]
#[command(version)]
struct Args {
    /// Log filter (trace, debug, info, warn, error); overrides CHMOD_PLUGIN_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply permission rules to an output directory
    Apply {
        /// Rules file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Output directory the asset names are relative to
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Log changes without touching any file
        #[arg(long)]
        dry_run: bool,

        /// Asset names (default: every file under the output directory)
        assets: Vec<String>,
    },

    /// Validate a rules file and print the normalized rules
    Validate {
        /// Rules file (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let logging = match &args.log_level {
        Some(filter) => logging::init_logging_with_filter(filter),
        None => logging::init_logging(),
    };
    if let Err(e) = logging {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        return ExitCode::FAILURE;
    }

    let result = match args.command {
        Commands::Apply {
            config,
            output_dir,
            dry_run,
            assets,
        } => cmd_apply(&config, &output_dir, assets, dry_run).await,
        Commands::Validate { config } => cmd_validate(&config),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn cmd_apply(
    config: &Path,
    output_dir: &Path,
    assets: Vec<String>,
    dry_run: bool,
) -> Result<ExitCode> {
    let plugin = ChmodPlugin::new(PluginOptions::from_file(config)?);

    let output_dir = output_dir
        .canonicalize()
        .with_context(|| format!("Output directory not found: {}", output_dir.display()))?;

    let assets = if assets.is_empty() {
        discover_assets(&output_dir)?
    } else {
        assets
    };
    tracing::info!("{} asset(s) in {}", assets.len(), output_dir.display());

    let local = LocalFileSystem::new();
    let dry = DryRunFileSystem::new();
    let output_fs: &dyn OutputFileSystem = if dry_run { &dry } else { &local };

    let sink = Diagnostics::new();
    let ctx = EmitContext::new(assets, &output_dir, &sink).with_output_fs(output_fs);
    let result = plugin.apply(&ctx).await;

    for warning in sink.warnings() {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }
    for error in sink.errors() {
        eprintln!("{} {}", "error:".red().bold(), error);
    }

    match result {
        Ok(report) => {
            println!(
                "{} {} applied, {} failed{}",
                "chmod:".green().bold(),
                report.applied(),
                report.failed(),
                if dry_run { " (dry run)" } else { "" }
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(_) => Ok(ExitCode::FAILURE),
    }
}

fn cmd_validate(config: &Path) -> Result<ExitCode> {
    let options = PluginOptions::from_file(config)?;

    println!("{}", serde_json::to_string_pretty(&options.rules)?);
    eprintln!(
        "{} {} rule(s) in {}",
        "valid:".green().bold(),
        options.rules.len(),
        config.display()
    );

    Ok(ExitCode::SUCCESS)
}

/// List every regular file under `output_dir` as a `/`-separated relative name
fn discover_assets(output_dir: &Path) -> Result<Vec<String>> {
    let base = output_dir
        .to_str()
        .context("Output directory path is not valid UTF-8")?;
    let pattern = format!("{}/**/*", glob::Pattern::escape(base));

    let mut assets = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if !path.is_file() {
            continue;
        }

        let relative = path.strip_prefix(output_dir)?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        assets.push(name);
    }

    assets.sort();
    Ok(assets)
}
