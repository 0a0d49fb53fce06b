//! Interactive configuration prompts.
//!
//! When no `--url` flag is given, the crawler is configured through a short
//! question-and-answer session on stdin. Every answer falls back to the same
//! default the CLI flags use.

use crate::config::types::{default_user_agent, CrawlConfig, DiscoveryMethod};
use crate::config::validation::validate;
use crate::crawler::fetcher::is_reachable;
use crate::sitemap::detect_sitemap;
use crate::url::normalize_url;
use crate::ConfigError;
use reqwest::Client;
use std::io::{self, Write};
use std::path::PathBuf;
use url::Url;

const BANNER: &str = r"
+-------------------------------------------+
|        docmirror - docs to Markdown       |
+-------------------------------------------+
";

/// Collects a full crawl configuration interactively.
///
/// The client is only used for sitemap reachability probes; no page is
/// fetched here.
pub async fn collect_config(client: &Client) -> Result<CrawlConfig, ConfigError> {
    println!("{}", BANNER);
    println!("This tool downloads web documentation and converts it to Markdown.\n");

    let base_url = prompt_base_url()?;
    let (method, sitemap_url) = prompt_method(client, &base_url).await?;

    let output_dir = prompt_with_default("Output directory", "markdown_docs")?;
    let delay = prompt_delay()?;
    let max_pages = prompt_max_pages()?;
    let respect_robots = prompt_yes_no("Respect robots.txt restrictions?", true)?;

    let config = CrawlConfig {
        base_url,
        output_dir: PathBuf::from(output_dir),
        method,
        sitemap_url,
        delay,
        max_pages,
        respect_robots,
        user_agent: default_user_agent(),
    };
    validate(&config)?;
    Ok(config)
}

fn prompt_base_url() -> Result<Url, ConfigError> {
    loop {
        let answer = prompt("Enter the base documentation URL (e.g. https://docs.example.com): ")?;
        if answer.is_empty() {
            println!("Please enter a URL.");
            continue;
        }

        // Accept bare hostnames by assuming https
        let candidate = if answer.starts_with("http://") || answer.starts_with("https://") {
            answer
        } else {
            format!("https://{}", answer)
        };

        match normalize_url(&candidate) {
            Ok(url) => return Ok(url),
            Err(e) => println!("Not a valid URL ({}). Please try again.", e),
        }
    }
}

async fn prompt_method(
    client: &Client,
    base_url: &Url,
) -> Result<(DiscoveryMethod, Option<Url>), ConfigError> {
    loop {
        println!("\nChoose crawling method:");
        println!("1. Auto-detect sitemap.xml");
        println!("2. Recursive crawling (follows links)");
        println!("3. Enter custom sitemap URL");

        match prompt("\nEnter choice (1/2/3): ")?.as_str() {
            "1" => {
                println!("\nChecking conventional sitemap locations...");
                if let Some(url) = detect_sitemap(client, base_url).await {
                    println!("Found sitemap at: {}", url);
                    return Ok((DiscoveryMethod::Sitemap, Some(url)));
                }
                println!("No sitemap found. Please choose another method.");
            }
            "2" => return Ok((DiscoveryMethod::Recursive, None)),
            "3" => {
                let answer = prompt("Enter the complete sitemap URL: ")?;
                match normalize_url(&answer) {
                    Ok(url) => {
                        if is_reachable(client, &url).await {
                            return Ok((DiscoveryMethod::Sitemap, Some(url)));
                        }
                        println!("Could not access {}. Please try again.", url);
                    }
                    Err(e) => println!("Not a valid URL ({}). Please try again.", e),
                }
            }
            _ => println!("Please answer 1, 2 or 3."),
        }
    }
}

fn prompt_delay() -> Result<f64, ConfigError> {
    loop {
        let answer = prompt("\nDelay between requests in seconds [1.0]: ")?;
        if answer.is_empty() {
            return Ok(1.0);
        }
        match answer.parse::<f64>() {
            Ok(delay) if delay.is_finite() && delay >= 0.0 => return Ok(delay),
            _ => println!("Please enter a non-negative number."),
        }
    }
}

fn prompt_max_pages() -> Result<Option<usize>, ConfigError> {
    let answer = prompt("\nMaximum number of pages (leave empty for no limit): ")?;
    if answer.is_empty() {
        return Ok(None);
    }
    match answer.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(Some(n)),
        _ => {
            println!("Invalid value. No maximum limit will be applied.");
            Ok(None)
        }
    }
}

fn prompt_yes_no(question: &str, default: bool) -> Result<bool, ConfigError> {
    let hint = if default { "[y]" } else { "[n]" };
    let answer = prompt(&format!("\n{} (y/n) {}: ", question, hint))?.to_lowercase();
    Ok(match answer.as_str() {
        "y" | "yes" => true,
        "n" | "no" => false,
        _ => default,
    })
}

fn prompt_with_default(question: &str, default: &str) -> Result<String, ConfigError> {
    let answer = prompt(&format!("\n{} [{}]: ", question, default))?;
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer
    })
}

fn prompt(message: &str) -> Result<String, ConfigError> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
