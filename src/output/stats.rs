//! Run statistics

use std::time::{Duration, Instant};

/// Counters accumulated over one crawl run
#[derive(Debug, Default, Clone)]
pub struct CrawlStats {
    pub pages_saved: usize,
    pub pages_failed: usize,
    pub links_discovered: usize,
    start_time: Option<Instant>,
    end_time: Option<Instant>,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn finish(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Total pages visited, successfully or not
    pub fn pages_visited(&self) -> usize {
        self.pages_saved + self.pages_failed
    }

    pub fn duration(&self) -> Option<Duration> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(end.duration_since(start)),
            _ => None,
        }
    }

    /// Logs the end-of-run summary
    pub fn log_summary(&self) {
        tracing::info!("Pages saved: {}", self.pages_saved);
        tracing::info!("Pages failed: {}", self.pages_failed);
        tracing::info!("Links discovered: {}", self.links_discovered);
        if let Some(duration) = self.duration() {
            tracing::info!("Total duration: {:.2}s", duration.as_secs_f64());
        }
    }
}
