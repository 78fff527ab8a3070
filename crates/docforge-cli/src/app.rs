//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use docforge_ooxml::{BlockSummary, BuildOutput, Engine, EngineConfig, PackageSummary};

use crate::content::ContentFile;

/// Output format for package summaries
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "docforge")]
#[command(author, version, about = "Declarative DOCX assembly", long_about = None)]
struct Cli {
    /// Log pipeline stages to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a DOCX package from a JSON content file
    Build {
        /// Input content file (JSON)
        input: PathBuf,

        /// Engine configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output DOCX file (default: input with .docx extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarize the structure of a DOCX package
    Inspect {
        /// Input DOCX file
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Run the CLI application
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Build {
            input,
            config,
            output,
        } => {
            build_command(&input, config.as_deref(), output.as_deref())?;
        }
        Commands::Inspect { input, format } => {
            inspect_command(&input, format)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    // A second initialization (tests driving run_cli) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load the engine configuration, falling back to defaults
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

/// Build a content file into a DOCX package
pub fn build_command(
    input: &Path,
    config: Option<&Path>,
    output: Option<&Path>,
) -> Result<BuildOutput> {
    println!("docforge v{}", docforge_ooxml::VERSION);
    println!("Building: {}", input.display());

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => input.with_extension("docx"),
    };

    let config = load_config(config)?;
    let engine = Engine::new(config).context("Invalid style catalog")?;
    debug!("Registered {} styles", engine.registry().len());

    let document = ContentFile::load(input)?
        .into_document(engine.config())
        .context("Invalid document structure")?;
    info!(
        "Assembled {} sections, {} blocks",
        document.sections().len(),
        document.block_count()
    );

    let built = engine
        .build(&document)
        .with_context(|| format!("Failed to build: {}", input.display()))?;

    fs::write(&output_path, &built.bytes)
        .with_context(|| format!("Failed to write output: {}", output_path.display()))?;

    println!("  Pages: {}", built.page_count());
    println!("  SHA-256: {}", built.digest());
    println!("  Output: {}", output_path.display());

    Ok(built)
}

/// Print the structure of a DOCX package
pub fn inspect_command(input: &Path, format: OutputFormat) -> Result<()> {
    let bytes =
        fs::read(input).with_context(|| format!("Failed to read: {}", input.display()))?;
    let summary = PackageSummary::from_bytes(&bytes)
        .with_context(|| format!("Failed to inspect: {}", input.display()))?;

    match format {
        OutputFormat::Text => print!("{}", render_summary(&summary)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    Ok(())
}

/// Render a package summary as indented text
pub fn render_summary(summary: &PackageSummary) -> String {
    let mut out = String::new();
    if let Some(ref title) = summary.title {
        out.push_str(&format!("Title: {}\n", title));
    }
    if let Some(pages) = summary.pages {
        out.push_str(&format!("Pages: {}\n", pages));
    }
    out.push_str(&format!(
        "Styles: {}\n",
        summary
            .styles
            .iter()
            .map(|s| s.id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    ));

    for (index, section) in summary.sections.iter().enumerate() {
        out.push_str(&format!(
            "Section {} ({}x{} twips)\n",
            index + 1,
            section.width,
            section.height
        ));
        for block in &section.blocks {
            match block {
                BlockSummary::Paragraph {
                    text,
                    outline_level: Some(level),
                    ..
                } => {
                    out.push_str(&format!("  Heading {}: {}\n", level, text));
                }
                BlockSummary::Paragraph { style, text, .. } => {
                    let style = style.as_deref().unwrap_or("Normal");
                    out.push_str(&format!("  Paragraph [{}]: {}\n", style, text));
                }
                BlockSummary::Table { rows, columns } => {
                    out.push_str(&format!("  Table: {} rows x {} columns\n", rows, columns));
                }
                BlockSummary::PageBreak => out.push_str("  Page break\n"),
            }
        }
    }
    out
}
