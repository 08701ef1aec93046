//! ChatVault — export AI-chat conversations from saved page snapshots.
//!
//! The host side of the pipeline: reads a rendered-HTML snapshot, drives
//! the exporter, and writes the finished documents to disk (the persistence
//! boundary the core deliberately does not own).

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use chatvault_core::{ExportFormat, ExtractionLimits};
use chatvault_page::HtmlPage;
use chatvault_runtime::Exporter;

#[derive(Parser)]
#[command(name = "chatvault", about = "Export AI-chat conversations to JSON or Markdown")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a URL belongs to a supported chat platform
    Detect {
        /// Page URL (e.g. https://claude.ai/chat/abc)
        #[arg(long)]
        url: String,
    },
    /// Extract a conversation from a saved page and write export files
    Export {
        /// Path to the saved HTML snapshot
        #[arg(long)]
        input: PathBuf,
        /// URL the snapshot was captured from
        #[arg(long)]
        url: String,
        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: FormatArg,
        /// Directory for the export files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Directory holding limits.json overrides
        #[arg(long)]
        config_dir: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Markdown,
    Both,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Markdown => ExportFormat::Markdown,
            FormatArg::Both => ExportFormat::Both,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Detect { url } => {
            let page = HtmlPage::parse("", &url);
            match Exporter::new().detect(&page) {
                Some(response) => println!("{} (supported)", response.platform),
                None => {
                    println!("No supported AI chat detected at this URL");
                    std::process::exit(1);
                }
            }
        }
        Commands::Export {
            input,
            url,
            format,
            out_dir,
            config_dir,
        } => {
            let html = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read snapshot {}", input.display()))?;
            let page = HtmlPage::parse(&html, &url);

            let limits = match config_dir {
                Some(dir) => ExtractionLimits::load(&dir),
                None => ExtractionLimits::default(),
            };
            let exporter = Exporter::with_limits(limits);

            let response = exporter.extract(&page, format.into()).await?;
            for warning in &response.warnings {
                warn!("{}", warning);
            }
            if response.turn_count == 0 {
                anyhow::bail!(response.errors.join("; "));
            }

            std::fs::create_dir_all(&out_dir)?;
            for request in exporter.save_requests(&response) {
                let path = out_dir.join(&request.filename);
                std::fs::write(&path, &request.content)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("{}", path.display());
            }
            println!(
                "Exported {} turns in {:.1}s",
                response.turn_count,
                response.duration_ms as f64 / 1000.0
            );
        }
    }

    Ok(())
}
