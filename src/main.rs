//! apidoc: generate route and table documentation from doc comments.
//!
//! - `apidoc api --routes routes.json` documents every route handler
//! - `apidoc db --tables tables.json` documents every configured database

use anyhow::{Context, Result};
use apidoc::build::{ApiBuilder, DbBuilder};
use apidoc::config::Config;
use apidoc::diagnostics::Diagnostics;
use apidoc::schema::{Route, TableRegistry};
use apidoc::store::{FsStore, MemoryStore, PageStore};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "apidoc",
    about = "Generate markdown documentation from annotated route handlers and table schemas"
)]
struct Cli {
    /// Configuration file
    #[arg(short = 'c', long, default_value = "apidoc.toml", global = true)]
    config: PathBuf,

    /// Output directory (overrides `output` from the config)
    #[arg(short = 'o', long, global = true)]
    output: Option<PathBuf>,

    /// Render everything but do not write pages; print the index instead
    #[arg(long, alias = "only-test", global = true)]
    dry_run: bool,

    /// Exit with failure when any error-level diagnostic was collected
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Document route handlers listed in a route registry
    Api {
        /// Route registry (JSON array)
        #[arg(long)]
        routes: PathBuf,
    },
    /// Document tables listed in a table registry
    Db {
        /// Table registry (JSON object: database → table → schema)
        #[arg(long)]
        tables: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(&cli.config)?;
    if let Some(ref output) = cli.output {
        config.output = output.clone();
    }

    let mut diags = Diagnostics::new();
    if cli.dry_run {
        let mut store = MemoryStore::new(config.base_url.clone());
        let index = run(&cli.command, &config, &mut store, &mut diags)?;
        print!("{}", index);
    } else {
        let mut store = FsStore::open(&config.output, config.base_url.clone())?;
        run(&cli.command, &config, &mut store, &mut diags)?;
    }

    let errors = diags.errors().len();
    diags
        .report(&mut io::stderr())
        .context("failed to write diagnostics")?;

    if cli.strict && errors > 0 {
        anyhow::bail!("{} documentation error(s)", errors);
    }
    Ok(())
}

/// Run the selected pass and return the rendered index text.
fn run<S: PageStore>(
    command: &Command,
    config: &Config,
    store: &mut S,
    diags: &mut Diagnostics,
) -> Result<String> {
    match command {
        Command::Api { routes } => {
            let routes: Vec<Route> = read_json(routes)?;
            let report = ApiBuilder::new(config, store, diags).build(&routes)?;
            Ok(report.index)
        }
        Command::Db { tables } => {
            let registry: TableRegistry = read_json(tables)?;
            let reports = DbBuilder::new(config, store, diags).build(&registry)?;
            Ok(reports.into_values().map(|r| r.index).collect())
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid registry: {}", path.display()))
}
