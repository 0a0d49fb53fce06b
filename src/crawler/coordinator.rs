//! Crawl orchestration
//!
//! The [`Crawler`] owns everything a run needs: configuration, HTTP client,
//! robots policy, scope filter, frontier, writer and statistics. The crawl
//! loop is single-threaded and cooperative by design: one fetch in flight at
//! a time with an explicit delay between requests, favoring predictable load
//! on the crawled host over throughput.

use crate::config::{validate, CrawlConfig, DiscoveryMethod, CRAWLER_NAME};
use crate::crawler::frontier::{Frontier, FrontierState};
use crate::crawler::processor::process_page;
use crate::output::{CrawlStats, MarkdownWriter};
use crate::robots::{load_robots, RobotsPolicy};
use crate::sitemap::{detect_sitemap, resolve_sitemap};
use crate::url::ScopeFilter;
use crate::{ConfigError, CrawlError};
use reqwest::Client;
use std::time::Duration;
use tokio::sync::watch;
use url::Url;

/// Coordinates one crawl run
pub struct Crawler {
    config: CrawlConfig,
    client: Client,
    filter: ScopeFilter,
    frontier: Frontier,
    writer: MarkdownWriter,
    stats: CrawlStats,
    delay: Duration,
    shutdown: watch::Receiver<bool>,
}

impl Crawler {
    /// Prepares a crawl run.
    ///
    /// Validates the configuration, creates the output directory (fatal when
    /// uncreatable) and loads the robots policy (non-fatal; a failed load
    /// means permissive). The `shutdown` receiver stops the loop between
    /// pages when it flips to true.
    pub async fn new(
        config: CrawlConfig,
        client: Client,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self, CrawlError> {
        validate(&config)?;

        let writer = MarkdownWriter::new(&config.output_dir);
        writer.create_output_dir()?;

        let robots = if config.respect_robots {
            load_robots(&client, &config.base_url).await
        } else {
            tracing::info!("Robots.txt enforcement disabled");
            None
        };

        let delay = effective_delay(config.delay, robots.as_ref(), CRAWLER_NAME);
        let filter = ScopeFilter::new(&config.base_url, robots, CRAWLER_NAME)?;
        let frontier = Frontier::new(config.max_pages);

        Ok(Self {
            config,
            client,
            filter,
            frontier,
            writer,
            stats: CrawlStats::new(),
            delay,
            shutdown,
        })
    }

    /// Runs the crawl to completion and returns the run statistics.
    ///
    /// Strategy selection follows the configured method: `sitemap` fails the
    /// run when the sitemap is unusable, while `auto` logs the problem and
    /// falls back to recursive link-following.
    pub async fn run(&mut self) -> Result<CrawlStats, CrawlError> {
        self.stats.start();

        match self.config.method {
            DiscoveryMethod::Recursive => self.run_recursive().await?,
            DiscoveryMethod::Sitemap => {
                let sitemap_url = self.config.sitemap_url.clone().ok_or_else(|| {
                    ConfigError::Validation("sitemap method requires a sitemap URL".to_string())
                })?;
                self.run_sitemap(&sitemap_url).await?;
            }
            DiscoveryMethod::Auto => {
                match detect_sitemap(&self.client, &self.config.base_url).await {
                    Some(sitemap_url) => match self.run_sitemap(&sitemap_url).await {
                        Ok(()) => {}
                        Err(CrawlError::Sitemap(e)) => {
                            tracing::warn!(
                                "Sitemap discovery unusable ({}), falling back to recursive crawling",
                                e
                            );
                            self.run_recursive().await?;
                        }
                        Err(e) => return Err(e),
                    },
                    None => {
                        tracing::info!("No sitemap found, using recursive crawling");
                        self.run_recursive().await?;
                    }
                }
            }
        }

        self.stats.finish();
        self.stats.log_summary();
        Ok(self.stats.clone())
    }

    /// Sitemap strategy: resolve the page list up front, then visit it.
    ///
    /// The page budget truncates the resolved list by document order before
    /// any visit. Links found on pages are counted but not followed.
    async fn run_sitemap(&mut self, sitemap_url: &Url) -> Result<(), CrawlError> {
        tracing::info!("Fetching sitemap...");
        let pages = resolve_sitemap(
            &self.client,
            sitemap_url,
            &self.filter,
            self.config.max_pages,
        )
        .await?;

        self.frontier.extend(pages);
        self.drain(false).await
    }

    /// Recursive strategy: seed with the base URL and follow in-scope links.
    ///
    /// The page budget here bounds visits, not discovery: the run halts once
    /// the visited count reaches the limit.
    async fn run_recursive(&mut self) -> Result<(), CrawlError> {
        self.frontier.push(self.config.base_url.clone());
        self.drain(true).await
    }

    /// The crawl loop: pull one URL at a time until a terminal state.
    ///
    /// A failing page is logged and counted, never fatal. The politeness
    /// delay applies after every iteration regardless of outcome.
    async fn drain(&mut self, follow_links: bool) -> Result<(), CrawlError> {
        loop {
            if *self.shutdown.borrow() {
                tracing::info!("Stop requested, halting crawl");
                break;
            }

            match self.frontier.state() {
                FrontierState::BudgetReached => {
                    tracing::info!(
                        "Page budget reached ({} pages visited)",
                        self.frontier.visited_count()
                    );
                    break;
                }
                FrontierState::Exhausted => break,
                FrontierState::Running => {}
            }

            let Some(url) = self.frontier.next() else {
                break;
            };

            tracing::debug!("Processing URL: {}", url);
            match process_page(&self.client, &url, &self.filter).await {
                Ok(page) => {
                    self.stats.links_discovered += page.outbound_links.len();

                    match self.writer.save(&page.title, &page.markdown, &url) {
                        Ok(_) => self.stats.pages_saved += 1,
                        Err(e) => {
                            tracing::error!("Failed to save {}: {}", url, e);
                            self.stats.pages_failed += 1;
                        }
                    }

                    if follow_links {
                        for link in page.outbound_links {
                            self.frontier.push(link);
                        }
                    }
                }
                Err(e) => {
                    tracing::error!("{}", e);
                    self.stats.pages_failed += 1;
                }
            }

            if self.frontier.visited_count() % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages visited, {} pending",
                    self.frontier.visited_count(),
                    self.frontier.pending_count()
                );
            }

            self.pause().await;
        }

        Ok(())
    }

    /// Politeness delay, cancellable by the shutdown signal
    async fn pause(&mut self) {
        if self.delay.is_zero() {
            return;
        }

        let sleep = tokio::time::sleep(self.delay);
        tokio::pin!(sleep);
        tokio::select! {
            _ = &mut sleep => {}
            Ok(()) = self.shutdown.changed() => {}
        }
    }
}

/// Effective politeness delay: the configured delay, or the robots
/// `Crawl-delay` for our agent when that is longer.
fn effective_delay(configured_secs: f64, robots: Option<&RobotsPolicy>, agent: &str) -> Duration {
    let configured = Duration::from_secs_f64(configured_secs);
    let from_robots = robots
        .and_then(|policy| policy.crawl_delay(agent))
        .filter(|delay| delay.is_finite() && *delay >= 0.0)
        .map(Duration::from_secs_f64)
        .unwrap_or(Duration::ZERO);

    configured.max(from_robots)
}
