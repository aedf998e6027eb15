//! `generate-minecraft-server` entry point.
//!
//! Fetches the version catalog, runs the questionnaire, then writes the
//! server directory.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use minecraft_server_generator::catalog::{CatalogClient, Endpoints};
use minecraft_server_generator::config::{self, GeneratorConfig};
use minecraft_server_generator::filesystem::expand_home;
use minecraft_server_generator::form::{TerminalBackend, run_form};
use minecraft_server_generator::generator::Generator;
use minecraft_server_generator::schema::server_prompts;

/// Interactively generate a Minecraft server directory.
#[derive(Parser)]
#[command(name = "generate-minecraft-server", version, about, long_about = None)]
struct Cli {
    /// Directory to generate the server into.
    #[arg(long, default_value = ".")]
    dir: String,

    /// Configuration file with generator defaults.
    #[arg(long, env = "MINECRAFT_SERVER_GENERATOR_CONFIG")]
    config: Option<PathBuf>,

    /// Java executable used to run the Fabric installer.
    #[arg(long, default_value = "java")]
    java: PathBuf,

    /// Only ask the basic questions; everything else keeps its default.
    #[arg(long)]
    quick: bool,

    /// Detailed logs (-v for info, -vv for debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

async fn load_config(path: Option<PathBuf>) -> GeneratorConfig {
    match path.or_else(config::default_config_path) {
        Some(path) => config::load_config(&path).await,
        None => GeneratorConfig::default(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config).await;
    let out_dir = expand_home(&cli.dir)?;

    println!("{} Minecraft Server Generator\n", style("ℹ").blue());

    let client = reqwest::Client::builder()
        .user_agent(concat!("minecraft-server-generator/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let catalog = CatalogClient::new(client, Endpoints::default());

    let progress = spinner();
    progress.set_message("Downloading Minecraft versions.");
    let manifest = catalog.fetch_manifest().await;
    progress.finish_and_clear();
    let manifest = Arc::new(manifest.context("Unable to fetch the Minecraft version list")?);

    let descriptors = server_prompts(Arc::clone(&manifest), &config, !cli.quick);
    let answers = run_form(&descriptors, &mut TerminalBackend)?;

    let progress = spinner();
    let result = Generator::new(catalog, config, out_dir)
        .with_java(cli.java)
        .with_progress(progress.clone())
        .generate(&manifest, &descriptors, &answers)
        .await;
    progress.finish_and_clear();

    if let Err(err) = &result {
        eprintln!("{} Unable to generate the server.", style("✖").red());
        tracing::debug!(error = ?err, "Generation failed");
    }
    result?;

    println!("{} Successfully generated.", style("✔").green());
    Ok(())
}
