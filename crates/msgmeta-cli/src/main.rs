//! `msgmeta`: annotate message bus events from the command line.

mod annotate;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use msgmeta_core::{Family, MetaConfig, default_registry};
use msgmeta_proto::ProcessorRegistry;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "msgmeta", version, about = "Human-readable metadata for message bus events")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: msgmeta.yml or msgmeta.yaml in the current directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Annotate events read from a file or stdin
    Annotate(annotate::AnnotateArgs),

    /// List the registered processors and the event families they know
    Families,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Annotate(args) => annotate::execute(config, &args),
        Commands::Families => {
            let registry =
                default_registry(config).context("Failed to build processor registry")?;
            write_families(&registry, &mut std::io::stdout().lock())
        }
    }
}

/// Prints each processor's metadata followed by the family table.
fn write_families(registry: &ProcessorRegistry, out: &mut impl Write) -> Result<()> {
    for processor in registry.processors() {
        writeln!(out, "{} ({})", processor.name(), processor.object_kind())?;
        if let Some(home) = processor.home_url() {
            writeln!(out, "  home: {home}")?;
        }
        if let Some(docs) = processor.docs_url() {
            writeln!(out, "  docs: {docs}")?;
        }
    }
    writeln!(out)?;
    for (tag, family) in Family::all() {
        writeln!(out, "{tag:<36} {:?}", family.group())?;
    }
    Ok(())
}

/// Logs go to stderr so annotations on stdout stay machine-readable.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the explicit config file, or the first standard one found.
fn load_config(explicit: Option<&Path>) -> Result<MetaConfig> {
    if let Some(path) = explicit {
        return MetaConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    let root = std::env::current_dir().context("Failed to get current directory")?;
    Ok(find_config(&root))
}

/// Tries the standard file names under `root`, falling back to defaults.
fn find_config(root: &Path) -> MetaConfig {
    for candidate in ["msgmeta.yml", "msgmeta.yaml"] {
        let path = root.join(candidate);
        if !path.exists() {
            continue;
        }
        match MetaConfig::from_file(&path) {
            Ok(config) => {
                debug!(path = %path.display(), "Loaded config");
                return config;
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Ignoring invalid config"),
        }
    }
    MetaConfig::default()
}
