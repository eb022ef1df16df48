//! The `annotate` command.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use msgmeta_core::{MetaConfig, default_registry};
use msgmeta_proto::{Annotation, Event, ProcessorRegistry};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
pub struct AnnotateArgs {
    /// File holding one event, or one event per line (default: stdin)
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON annotation per line
    Json,
    /// Indented human-readable blocks
    Text,
}

pub fn execute(config: MetaConfig, args: &AnnotateArgs) -> Result<()> {
    let registry = default_registry(config).context("Failed to build processor registry")?;
    let input = read_input(args.file.as_deref())?;
    let events = parse_events(&input)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let written = write_annotations(&registry, &events, args.format, &mut out)?;
    info!(events = events.len(), annotated = written, "Done");
    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read events from {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read events from stdin")?;
            Ok(input)
        }
    }
}

/// Parses a single JSON event or a stream of whitespace-separated events.
fn parse_events(input: &str) -> Result<Vec<Event>> {
    serde_json::Deserializer::from_str(input)
        .into_iter::<Event>()
        .enumerate()
        .map(|(index, event)| event.with_context(|| format!("Invalid event #{}", index + 1)))
        .collect()
}

/// Annotates every event and writes the results; unclaimed events are skipped.
fn write_annotations(
    registry: &ProcessorRegistry,
    events: &[Event],
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<usize> {
    let mut written = 0;
    for event in events {
        let Some(annotation) = registry.annotate(event) else {
            warn!(topic = %event.topic, "No processor for topic, skipping");
            continue;
        };

        match format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, &annotation)?;
                writeln!(out)?;
            }
            OutputFormat::Text => write!(out, "{}", render_text(&annotation))?,
        }
        written += 1;
    }
    Ok(written)
}

fn render_text(annotation: &Annotation) -> String {
    let mut text = format!("{}\n", annotation.title);
    if let Some(subtitle) = &annotation.subtitle {
        text.push_str(&format!("  {subtitle}\n"));
    }
    if let Some(link) = &annotation.link {
        text.push_str(&format!("  link:      {link}\n"));
    }
    if !annotation.usernames.is_empty() {
        let users: Vec<&str> = annotation.usernames.iter().map(String::as_str).collect();
        text.push_str(&format!("  usernames: {}\n", users.join(", ")));
    }
    if !annotation.objects.is_empty() {
        let objects: Vec<&str> = annotation.objects.iter().map(String::as_str).collect();
        text.push_str(&format!("  objects:   {}\n", objects.join(", ")));
    }
    text
}
