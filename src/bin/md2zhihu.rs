//! CLI binary for md2zhihu.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use md2zhihu::{convert, ConversionConfig, ConversionOutput, LocalImagePolicy};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

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
  md2zhihu post.md                         HTML fragment to stdout
  md2zhihu post.md -o post.html            write to a file
  cat post.md | md2zhihu -                 read from stdin
  md2zhihu post.md --embed-local-images    inline ![alt](file:img.png) as base64
  md2zhihu post.md --json                  HTML plus conversion stats as JSON
"#;

/// Convert Markdown to Zhihu-flavoured HTML.
#[derive(Parser, Debug)]
#[command(
    name = "md2zhihu",
    version,
    about = "Convert Markdown to Zhihu-flavoured HTML",
    long_about = "Convert a Markdown document to the HTML dialect accepted by Zhihu's article \
editor: equation images, footnote superscripts, annotated figures and tables.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Markdown file path, or `-` for stdin.
    input: String,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long, env = "MD2ZHIHU_OUTPUT")]
    output: Option<PathBuf>,

    /// Embed `![alt](file:path)` images as base64 data URIs.
    #[arg(long, env = "MD2ZHIHU_EMBED_LOCAL_IMAGES")]
    embed_local_images: bool,

    /// Refuse to embed local images larger than this many bytes.
    #[arg(long, env = "MD2ZHIHU_MAX_IMAGE_BYTES")]
    max_image_bytes: Option<u64>,

    /// Rewrite `$x$` to `$$x$$` so single-dollar math renders as display equations.
    #[arg(long, env = "MD2ZHIHU_PROMOTE_INLINE_MATH")]
    promote_inline_math: bool,

    /// Output structured JSON (ConversionOutput) instead of HTML.
    #[arg(long, env = "MD2ZHIHU_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MD2ZHIHU_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MD2ZHIHU_QUIET")]
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
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let markdown = read_input(&cli.input)?;
    let output = convert(&markdown, &config).context("Conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        write_output(&cli, json.as_bytes())?;
    } else {
        write_output(&cli, output.html.as_bytes())?;
    }

    if !cli.quiet {
        print_summary(&cli, &output);
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let policy = if cli.embed_local_images {
        LocalImagePolicy::Embed
    } else {
        LocalImagePolicy::Inline
    };

    let mut builder = ConversionConfig::builder()
        .local_images(policy)
        .promote_inline_math(cli.promote_inline_math);
    if let Some(limit) = cli.max_image_bytes {
        builder = builder.max_local_image_bytes(limit);
    }

    builder.build().context("Invalid configuration")
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read Markdown from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {input:?}"))
    }
}

fn write_output(cli: &Cli, bytes: &[u8]) -> Result<()> {
    if let Some(ref path) = cli.output {
        std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write output file {}", path.display()))?;
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(bytes)
            .context("Failed to write to stdout")?;
        // Ensure a trailing newline on stdout.
        handle.write_all(b"\n").ok();
    }
    Ok(())
}

fn print_summary(cli: &Cli, output: &ConversionOutput) {
    let stats = &output.stats;
    let target = cli
        .output
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdout".to_string());
    eprintln!(
        "{}  {} blocks  {}ms  →  {}",
        green("✔"),
        stats.rendered_blocks,
        stats.total_duration_ms,
        bold(&target),
    );
    if stats.embedded_images > 0 {
        eprintln!(
            "   {} local image(s) embedded",
            dim(&stats.embedded_images.to_string())
        );
    }
}
