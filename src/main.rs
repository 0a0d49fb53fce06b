//! docmirror entry point
//!
//! Command-line interface for the documentation mirror. With `--url` the
//! crawler runs non-interactively; without it, configuration is collected
//! through prompts. Exit code is 0 on completion and 1 on any unhandled
//! failure or user interruption.

use anyhow::Context;
use clap::Parser;
use docmirror::config::{default_user_agent, interactive, CrawlConfig, DiscoveryMethod};
use docmirror::crawler::{build_http_client, Crawler};
use docmirror::url::normalize_url;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Download web documentation and convert it to Markdown
#[derive(Parser, Debug)]
#[command(name = "docmirror")]
#[command(version)]
#[command(about = "Download web documentation and convert it to Markdown", long_about = None)]
struct Cli {
    /// Base URL of the documentation site (omit for interactive mode)
    #[arg(long)]
    url: Option<String>,

    /// Output directory for the Markdown tree
    #[arg(long, default_value = "markdown_docs")]
    output: PathBuf,

    /// Crawling method
    #[arg(long, value_enum, default_value = "auto")]
    method: DiscoveryMethod,

    /// Custom sitemap URL, used with --method sitemap
    #[arg(long)]
    sitemap: Option<String>,

    /// Delay between requests in seconds
    #[arg(long, default_value_t = 1.0)]
    delay: f64,

    /// Maximum number of pages to download
    #[arg(long)]
    max_pages: Option<usize>,

    /// Ignore robots.txt restrictions
    #[arg(long)]
    no_robots: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };
    std::process::exit(code);
}

async fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet).context("failed to initialize logging")?;

    let client = build_http_client(&default_user_agent())
        .context("failed to build the HTTP client")?;

    let config = match &cli.url {
        Some(url) => config_from_cli(&cli, url)?,
        None => interactive::collect_config(&client).await?,
    };

    // First Ctrl-C stops dequeuing after the in-flight page finishes, so no
    // partial files are left behind
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut interrupt_rx = shutdown_rx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing the current page before stopping");
            let _ = shutdown_tx.send(true);
        }
    });

    println!("\nStarting documentation download...");
    let output_dir = config.output_dir.clone();

    let mut crawler = Crawler::new(config, client, shutdown_rx).await?;
    crawler.run().await?;

    if *interrupt_rx.borrow_and_update() {
        println!("\nProcess interrupted by user");
        return Ok(1);
    }

    println!("\nSuccess! Documentation has been downloaded and converted.");
    println!(
        "You can find the Markdown files in '{}'.",
        output_dir.display()
    );
    Ok(0)
}

/// Builds a crawl configuration from command-line flags
fn config_from_cli(cli: &Cli, base: &str) -> anyhow::Result<CrawlConfig> {
    let base_url = normalize_url(base).context("invalid --url")?;
    let sitemap_url = cli
        .sitemap
        .as_deref()
        .map(normalize_url)
        .transpose()
        .context("invalid --sitemap")?;

    Ok(CrawlConfig {
        base_url,
        output_dir: cli.output.clone(),
        method: cli.method,
        sitemap_url,
        delay: cli.delay,
        max_pages: cli.max_pages,
        respect_robots: !cli.no_robots,
        user_agent: default_user_agent(),
    })
}

/// Sets up the tracing subscriber: a console layer on stderr plus a
/// timestamped run log in `crawler.log`
fn setup_logging(verbose: u8, quiet: bool) -> anyhow::Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docmirror=info,warn"),
            1 => EnvFilter::new("docmirror=debug,info"),
            2 => EnvFilter::new("docmirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("crawler.log")
        .context("failed to open crawler.log")?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(log_file)),
        )
        .init();

    Ok(())
}
