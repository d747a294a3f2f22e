//! CLI binary for ghostpdf.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! [`SessionConfig`] and routes result bytes to a file or stdout.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ghostpdf::{cleanup, Session, SessionConfig, ShrinkOptions};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Rasterize page 1 at the default 600 DPI
  ghostpdf page document.pdf -o page1.png

  # Page 3 of a remote PDF at screen resolution
  ghostpdf page https://example.com/report.pdf --page 3 --dpi 150 -o p3.png

  # Recompress for email; output is never larger than the input
  ghostpdf shrink scan.pdf -o scan-small.pdf

  # Aggressive grayscale shrink targeting PDF 1.4
  ghostpdf shrink scan.pdf --dpi 72 --pdf-version 1.4 --grayscale -o tiny.pdf

  # Declared version and page count
  ghostpdf info document.pdf
  ghostpdf info document.pdf --json

ENVIRONMENT VARIABLES:
  GHOSTPDF_GS   Path to the Ghostscript binary (default: gs on PATH,
                gswin64c on Windows)

Ghostscript must be installed separately; it is not bundled.
"#;

/// Rasterize, shrink, and inspect PDFs through Ghostscript.
#[derive(Parser, Debug)]
#[command(
    name = "ghostpdf",
    version,
    about = "Rasterize, shrink, and inspect PDFs through Ghostscript",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to the Ghostscript binary.
    #[arg(long, global = true, env = "GHOSTPDF_GS")]
    gs_binary: Option<PathBuf>,

    /// HTTP download timeout for URL inputs, in seconds.
    #[arg(long, global = true, default_value_t = 120)]
    download_timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rasterize a single page to a PNG.
    Page {
        /// Local PDF file path or HTTP/HTTPS URL.
        input: String,

        /// Page number (1-based).
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Rendering DPI (default from the library: 600).
        #[arg(long)]
        dpi: Option<u32>,

        /// Write the PNG here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Recompress a PDF; output is guaranteed not larger than the input.
    Shrink {
        /// Local PDF file path or HTTP/HTTPS URL.
        input: String,

        /// Downsampling DPI for embedded images (default 300).
        #[arg(long)]
        dpi: Option<u32>,

        /// Compatibility level to declare (default: the input's own version).
        #[arg(long)]
        pdf_version: Option<String>,

        /// Convert the output to grayscale.
        #[arg(long)]
        grayscale: bool,

        /// Write the PDF here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the declared PDF version and page count.
    Info {
        /// Local PDF file path or HTTP/HTTPS URL.
        input: String,

        /// Output JSON instead of the human-readable listing.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct PdfInfo<'a> {
    input: &'a str,
    pdf_version: String,
    page_count: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let mut config_builder = SessionConfig::builder().download_timeout_secs(cli.download_timeout);
    if let Some(ref gs) = cli.gs_binary {
        config_builder = config_builder.gs_binary(gs.clone());
    }
    let config = config_builder.build().context("Invalid configuration")?;

    let result = run(&cli.command, config).await;

    // Safety net for anything a panic-free run somehow left behind; the
    // sessions themselves clean up through Drop.
    cleanup::sweep();

    result
}

async fn run(command: &Command, config: SessionConfig) -> Result<()> {
    match command {
        Command::Page {
            input,
            page,
            dpi,
            output,
        } => {
            let mut session = Session::from_input(input, config);
            let png = session
                .page_image(*page, *dpi)
                .await
                .with_context(|| format!("Failed to rasterize page {page} of '{input}'"))?;
            write_bytes(output.as_deref(), &png)?;
        }

        Command::Shrink {
            input,
            dpi,
            pdf_version,
            grayscale,
            output,
        } => {
            let mut options = ShrinkOptions::default().grayscale(*grayscale);
            options.dpi = *dpi;
            options.pdf_version = pdf_version.clone();

            let mut session = Session::from_input(input, config);
            let pdf = session
                .shrink(&options)
                .await
                .with_context(|| format!("Failed to shrink '{input}'"))?;
            write_bytes(output.as_deref(), &pdf)?;
        }

        Command::Info { input, json } => {
            let mut session = Session::from_input(input, config);
            let pdf_version = session
                .pdf_version()
                .await
                .with_context(|| format!("Failed to inspect '{input}'"))?;
            let page_count = session
                .page_count()
                .await
                .with_context(|| format!("Failed to count pages of '{input}'"))?;

            let info = PdfInfo {
                input,
                pdf_version,
                page_count,
            };

            if *json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&info).context("Failed to serialize info")?
                );
            } else {
                println!("File:         {}", info.input);
                println!("PDF Version:  {}", info.pdf_version);
                match info.page_count {
                    Some(n) => println!("Pages:        {n}"),
                    None => println!("Pages:        (unreadable converter output)"),
                }
            }
        }
    }

    Ok(())
}

/// Route result bytes to a file or, when no path is given, raw to stdout.
fn write_bytes(output: Option<&std::path::Path>, bytes: &[u8]) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, bytes)
                .with_context(|| format!("Failed to write output file '{}'", path.display()))?;
            eprintln!("Wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(bytes)
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
