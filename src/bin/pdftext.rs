//! CLI binary for edgequake-pdftext.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractorConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdftext::{DocumentMetadata, ExtractorConfig, PageRecord, PdfExtractor};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Whole document as one line of text
  pdftext report.pdf

  # One block per page with character and word counts
  pdftext --pages report.pdf

  # Per-page records as JSON
  pdftext --pages --json report.pdf > pages.json

  # Document metadata (never fails; unreadable files report 0 pages)
  pdftext --metadata report.pdf

  # Accept Illustrator files, which are PDF underneath
  pdftext --ext pdf --ext ai artwork.ai

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to an existing libpdfium; skips auto-download
  PDFIUM_AUTO_CACHE_DIR   Override the default pdfium cache directory
  RUST_LOG                Fine-grained log filter (overrides -v / -q)

SETUP:
  PDFium (~30 MB) is downloaded automatically on first run and cached in
  ~/.cache/pdftext/pdfium-7690/. No manual library setup is required.
"#;

/// Extract text and metadata from PDF files.
#[derive(Parser, Debug)]
#[command(
    name = "pdftext",
    version,
    about = "Extract text and metadata from PDF files",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the PDF file.
    input: PathBuf,

    /// Print one record per page instead of the whole document.
    #[arg(long, conflicts_with = "metadata")]
    pages: bool,

    /// Print document metadata only.
    #[arg(long)]
    metadata: bool,

    /// Output structured JSON.
    #[arg(long, env = "PDFTEXT_JSON")]
    json: bool,

    /// Accepted file extension; repeat to allow several. Default: pdf.
    #[arg(long = "ext", value_name = "EXT", env = "PDFTEXT_EXTENSIONS", value_delimiter = ',')]
    extensions: Vec<String>,

    /// Bind this PDFium library instead of the cached or downloaded one.
    #[arg(long, value_name = "PATH", env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFTEXT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFTEXT_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Ensure PDFium engine is available ────────────────────────────────
    // First run downloads the library (~30 MB); later runs only check the path.
    if cli.pdfium_lib.is_none() && !pdfium_auto::is_pdfium_cached() {
        ensure_engine(cli.quiet)?;
    }

    let config = build_config(&cli)?;
    let extractor = PdfExtractor::with_config(config).context("Failed to start PDF engine")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.metadata {
        let meta = extractor.metadata(&cli.input);
        if cli.json {
            let json = serde_json::to_string_pretty(&meta).context("Failed to serialise metadata")?;
            writeln!(out, "{json}").context("Failed to write to stdout")?;
        } else {
            print_metadata(&mut out, &cli.input, &meta).context("Failed to write to stdout")?;
        }
        return Ok(());
    }

    if cli.pages {
        let pages = extractor
            .extract_pages(&cli.input)
            .with_context(|| format!("Failed to extract pages from {}", cli.input.display()))?;
        if cli.json {
            let json = serde_json::to_string_pretty(&pages).context("Failed to serialise pages")?;
            writeln!(out, "{json}").context("Failed to write to stdout")?;
        } else {
            print_pages(&mut out, &pages).context("Failed to write to stdout")?;
        }
        if !cli.quiet {
            let with_text = pages.iter().filter(|p| p.has_text).count();
            eprintln!(
                "{} {}/{} pages with text",
                green("✔"),
                bold(&with_text.to_string()),
                pages.len()
            );
        }
        return Ok(());
    }

    let text = extractor
        .extract_text(&cli.input)
        .with_context(|| format!("Failed to extract text from {}", cli.input.display()))?;
    if cli.json {
        let json = serde_json::to_string_pretty(&serde_json::json!({ "text": text }))
            .context("Failed to serialise text")?;
        writeln!(out, "{json}").context("Failed to write to stdout")?;
    } else {
        writeln!(out, "{text}").context("Failed to write to stdout")?;
    }
    Ok(())
}

/// Download PDFium, with a progress bar unless `quiet`.
fn ensure_engine(quiet: bool) -> Result<()> {
    if quiet {
        pdfium_auto::ensure_pdfium_library(None).context("Failed to download PDFium engine")?;
        return Ok(());
    }

    let dl_bar = ProgressBar::new(0);
    dl_bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    dl_bar.set_prefix("PDF engine");
    dl_bar.enable_steady_tick(Duration::from_millis(80));

    let bar = dl_bar.clone();
    pdfium_auto::ensure_pdfium_library(Some(&move |downloaded, total| {
        if let Some(t) = total {
            if bar.length() != Some(t) {
                bar.set_length(t);
            }
        }
        bar.set_position(downloaded);
    }))
    .context("Failed to download PDFium engine")?;

    dl_bar.finish_and_clear();
    eprintln!("{} PDF engine ready", green("✔"));
    Ok(())
}

/// Map CLI args to `ExtractorConfig`.
fn build_config(cli: &Cli) -> Result<ExtractorConfig> {
    let mut builder = ExtractorConfig::builder();
    if !cli.extensions.is_empty() {
        builder = builder.supported_extensions(&cli.extensions);
    }
    if let Some(ref path) = cli.pdfium_lib {
        builder = builder.pdfium_library_path(path);
    }
    builder.build().context("Invalid configuration")
}

fn print_pages(out: &mut impl Write, pages: &[PageRecord]) -> io::Result<()> {
    for page in pages {
        writeln!(
            out,
            "{}  {}",
            bold(&format!("── Page {} ──", page.page_number)),
            dim(&format!("{} chars, {} words", page.char_count, page.word_count)),
        )?;
        if page.has_text {
            writeln!(out, "{}", page.text)?;
        } else {
            writeln!(out, "{}", dim("(no text)"))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn print_metadata(out: &mut impl Write, path: &Path, meta: &DocumentMetadata) -> io::Result<()> {
    writeln!(out, "File:         {}", path.display())?;
    writeln!(out, "Pages:        {}", meta.nb_pages)?;
    let Some(ref info) = meta.info else {
        return writeln!(out, "{}", dim("(metadata unavailable)"));
    };
    for (label, value) in [
        ("Title", &info.title),
        ("Author", &info.author),
        ("Subject", &info.subject),
        ("Creator", &info.creator),
        ("Producer", &info.producer),
    ] {
        if !value.is_empty() {
            writeln!(out, "{:<14}{}", format!("{label}:"), value)?;
        }
    }
    Ok(())
}
