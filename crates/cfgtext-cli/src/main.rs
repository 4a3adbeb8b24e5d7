//! `cfgtext` CLI: format, query and edit engine configuration files.
//!
//! ## Usage
//!
//! ```sh
//! # Re-emit canonical text (stdin → stdout)
//! cat project.godot | cfgtext format
//!
//! # Validate a file
//! cfgtext check -i export_presets.cfg
//!
//! # Read and write single values
//! cfgtext get -i project.godot application run/max_fps
//! cfgtext set -i project.godot -o project.godot display window/size/viewport_width 1920
//!
//! # Dump as JSON
//! cfgtext json -i project.godot
//!
//! # List, find and merge export presets
//! cfgtext presets -i export_presets.cfg
//! cfgtext presets -i export_presets.cfg --find android
//! cfgtext presets -i export_presets.cfg --merge 0,"Windows Desktop"
//! ```
//!
//! Logging goes to stderr, filtered by `RUST_LOG` (default `warn`, raised by `-v`).

use anyhow::{Context, Result};
use cfgtext_core::{
    find_preset, merge_presets, parse_document, serialize_document, serialize_value, Document,
    Preset, PresetQuery, Value,
};
use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cfgtext",
    version,
    about = "Format, query and edit engine configuration files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and re-emit canonical text
    Format {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Validate syntax and print `ok`
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Print one value in configuration syntax
    Get {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Section name (use "" for keys before the first header)
        section: String,
        key: String,
    },
    /// Store one value and re-emit the document
    Set {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        section: String,
        key: String,
        /// Value in configuration syntax, e.g. `60`, `"text"`, `Vector2(1, 2)`
        value: String,
    },
    /// Print the document as pretty JSON
    Json {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// List export presets as JSON, or find / merge selected ones
    Presets {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Print the first preset matching an index, platform or name
        #[arg(long, conflicts_with = "merge")]
        find: Option<String>,
        /// Comma-separated queries; prints the left-to-right merge of their presets
        #[arg(long)]
        merge: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Format { input, output } => {
            let document = load_document(input.as_deref())?;
            write_output(output.as_deref(), &serialize_document(&document))?;
        }
        Commands::Check { input } => {
            let document = load_document(input.as_deref())?;
            debug!(sections = document.len(), "check passed");
            println!("ok");
        }
        Commands::Get {
            input,
            section,
            key,
        } => {
            let document = load_document(input.as_deref())?;
            let value = document
                .get(&section, &key)
                .context("Failed to look up value")?;
            println!("{}", serialize_value(value));
        }
        Commands::Set {
            input,
            output,
            section,
            key,
            value,
        } => {
            let mut document = load_document(input.as_deref())?;
            let value: Value = value
                .parse()
                .with_context(|| format!("Invalid value: {}", value))?;
            document.set(&section, &key, value);
            write_output(output.as_deref(), &serialize_document(&document))?;
        }
        Commands::Json { input } => {
            let document = load_document(input.as_deref())?;
            let pretty = serde_json::to_string_pretty(&document)?;
            println!("{}", pretty);
        }
        Commands::Presets {
            input,
            find,
            merge,
        } => {
            let document = load_document(input.as_deref())?;
            let presets =
                Preset::extract_all(&document).context("Failed to read export presets")?;

            let pretty = match (find, merge) {
                (Some(query), _) => {
                    let preset = lookup(&presets, &query)?;
                    serde_json::to_string_pretty(preset)?
                }
                (None, Some(queries)) => {
                    let selected = queries
                        .split(',')
                        .map(str::trim)
                        .filter(|q| !q.is_empty())
                        .map(|q| lookup(&presets, q))
                        .collect::<Result<Vec<_>>>()?;
                    let merged = merge_presets(selected).context("Failed to merge presets")?;
                    serde_json::to_string_pretty(&merged)?
                }
                (None, None) => serde_json::to_string_pretty(&presets)?,
            };
            println!("{}", pretty);
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Resolve a `--find` / `--merge` query against the extracted presets.
fn lookup<'a>(presets: &'a [Preset], query: &str) -> Result<&'a Preset> {
    find_preset(presets, &PresetQuery::parse(query))
        .with_context(|| format!("No preset matches '{}'", query))
}

/// Read and strictly parse the input; a syntax error fails the command.
fn load_document(path: Option<&str>) -> Result<Document> {
    let text = read_input(path)?;
    parse_document(&text)
        .into_result()
        .with_context(|| format!("Failed to parse {}", path.unwrap_or("stdin")))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
