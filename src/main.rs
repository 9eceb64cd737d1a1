// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use kubefacade::config::Config;
use kubefacade::facade::Facade;
use kubefacade::types::Operation;

/// Apply, read, delete or scale one resource on the cluster named by the
/// operation's own kubeconfig, and print the result envelope as JSON.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Operation document (JSON or YAML); stdin when absent or "-"
    input: Option<PathBuf>,

    /// Indent the printed envelope
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr, stdout only carries the envelope
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: credential_dir={}, probe_policy={:?}",
        config.credential_dir.display(),
        config.probe_policy
    );

    let document = read_input(args.input.as_deref())?;
    let op: Operation =
        serde_yaml::from_str(&document).context("Failed to parse operation document")?;

    let envelope = Facade::new(&config).execute(op).await;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };
    println!("{}", rendered);

    if !envelope.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read operation from {}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read operation from stdin")?;
            Ok(buf)
        }
    }
}
