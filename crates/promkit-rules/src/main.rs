//! promkit-rules: render an alert rules config into a Prometheus rule file.
//!
//! `promkit-rules --config rules.yaml --target v2 [--output alerts.yml]`

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use promkit_core::error::{PromkitError, Result};
use promkit_rules::{config, render_group, PrometheusVersion};

#[derive(Debug, Parser)]
#[command(name = "promkit-rules", about = "Generate Prometheus alert rule files")]
struct Args {
    /// Rules config (YAML, or JSON with a `.json` extension).
    #[arg(short, long)]
    config: PathBuf,

    /// Target Prometheus version: v1 or v2.
    #[arg(short, long, default_value = "v2")]
    target: PrometheusVersion,

    /// Write here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn run(args: &Args) -> Result<()> {
    let cfg = config::load_from_file(&args.config)?;
    let text = render_group(args.target, &cfg.metric_prefix, &cfg.group)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &text).map_err(|e| {
                PromkitError::Config(format!("write {} failed: {e}", path.display()))
            })?;
            tracing::info!(path = %path.display(), rules = cfg.group.rules.len(), "rule file written");
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code(), error = %e, "rule generation failed");
            ExitCode::FAILURE
        }
    }
}
