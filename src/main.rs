//! Markdown Kit - render a markdown file to preview HTML
//!
//! Entry point for the demo binary. Handles CLI argument parsing,
//! logging initialization, and the render run.

use anyhow::{bail, Context, Result};
use markdown_kit::{Config, RenderPipeline, Theme};
use std::io::{Read, Write};
use std::path::PathBuf;

/// Application name for logging
const APP_NAME: &str = "markdown-kit";

/// Parsed command line options
#[derive(Debug, Default)]
struct Flags {
    /// Input file, stdin when absent
    input: Option<PathBuf>,
    /// Output file, stdout when absent
    output: Option<PathBuf>,
    /// Explicit configuration file
    config: Option<PathBuf>,
    /// Theme override
    theme: Option<Theme>,
}

fn main() -> Result<()> {
    // Initialize logging
    init_logging();

    let flags = parse_args()?;
    log::debug!("Starting {} with {:?}", APP_NAME, flags);

    let config = match &flags.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load().unwrap_or_else(|err| {
            log::warn!("Using default configuration: {}", err);
            Config::default()
        }),
    };

    let mut render = config.render.clone();
    if let Some(theme) = flags.theme {
        render.theme = theme;
    }
    let pipeline = RenderPipeline::new(&render).context("Failed to create render pipeline")?;

    let markdown = read_input(flags.input.as_ref())?;
    let document = pipeline.render(&markdown);
    if let Some(frontmatter) = &document.frontmatter {
        log::info!("Frontmatter keys: {:?}", frontmatter.keys());
        log::debug!("Frontmatter:\n{}", frontmatter.raw());
    }

    match &flags.output {
        Some(path) => std::fs::write(path, &document.html)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => std::io::stdout()
            .write_all(document.html.as_bytes())
            .context("Failed to write to stdout")?,
    }
    Ok(())
}

/// Initialize the logging system
fn init_logging() {
    // Set default log level if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info,markdown_kit=debug");
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .target(env_logger::Target::Stderr)
        .init();
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut markdown = String::new();
            std::io::stdin()
                .read_to_string(&mut markdown)
                .context("Failed to read stdin")?;
            Ok(markdown)
        }
    }
}

/// Parse command line arguments
fn parse_args() -> Result<Flags> {
    let args: Vec<String> = std::env::args().collect();
    let mut flags = Flags::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "--dark" => flags.theme = Some(Theme::Dark),
            "--light" => flags.theme = Some(Theme::Light),
            "-c" | "--config" => {
                i += 1;
                match args.get(i) {
                    Some(path) => flags.config = Some(PathBuf::from(path)),
                    None => bail!("--config requires a path argument"),
                }
            }
            "-o" | "--output" => {
                i += 1;
                match args.get(i) {
                    Some(path) => flags.output = Some(PathBuf::from(path)),
                    None => bail!("--output requires a path argument"),
                }
            }
            "-" => flags.input = None,
            arg if arg.starts_with('-') => {
                bail!("Unknown option: {} (use --help for usage information)", arg)
            }
            path => {
                if flags.input.is_some() {
                    bail!("Only one input file can be rendered at a time");
                }
                flags.input = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    Ok(flags)
}

/// Print help message
fn print_help() {
    println!(
        r#"Markdown Kit - Render markdown to preview HTML

USAGE:
    markdown-kit [OPTIONS] [FILE]

Reads FILE (or stdin when FILE is absent or "-") and writes the HTML
fragment to stdout.

OPTIONS:
    -h, --help              Show this help message
    -v, --version           Show version information
        --dark              Highlight code with the dark theme
        --light             Highlight code with the light theme
    -c, --config <PATH>     Load configuration from PATH
    -o, --output <PATH>     Write HTML to PATH instead of stdout

EXAMPLES:
    markdown-kit README.md
    markdown-kit --dark notes.md -o notes.html
    cat draft.md | markdown-kit
"#
    );
}

/// Print version information
fn print_version() {
    println!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION"));
}
