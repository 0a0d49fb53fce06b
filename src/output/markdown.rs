//! Markdown persistence
//!
//! Each page becomes one `.md` file. The URL path maps to the file location:
//! intermediate segments become directories, the last segment is slugified
//! into the file name, and the site root becomes `index.md`. A front-matter
//! block recording title, source URL and download time precedes the body.

use crate::OutputError;
use chrono::Utc;
use std::fs;
use std::path::PathBuf;
use url::Url;

/// Writes converted pages under one output directory
#[derive(Debug, Clone)]
pub struct MarkdownWriter {
    output_dir: PathBuf,
}

impl MarkdownWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Creates the output directory, parents included.
    ///
    /// An uncreatable output directory is one of the few failures that abort
    /// the whole run, so this is called once before crawling starts.
    pub fn create_output_dir(&self) -> Result<(), OutputError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| OutputError::CreateDir {
            path: self.output_dir.display().to_string(),
            source,
        })?;
        tracing::info!("Created output directory: {}", self.output_dir.display());
        Ok(())
    }

    /// Maps a page URL to its file path.
    ///
    /// Deterministic: depends only on the URL and the output directory.
    pub fn target_path(&self, url: &Url) -> PathBuf {
        let segments: Vec<&str> = url
            .path()
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let mut path = self.output_dir.clone();
        let file_name = match segments.split_last() {
            Some((last, parents)) => {
                for parent in parents {
                    path.push(parent);
                }
                let slug = slugify(last);
                if slug.is_empty() {
                    "index".to_string()
                } else {
                    slug
                }
            }
            None => "index".to_string(),
        };

        path.push(format!("{}.md", file_name));
        path
    }

    /// Writes one converted page, creating parent directories as needed.
    ///
    /// Returns the path written. Failures are page-local; the caller logs
    /// them and keeps crawling.
    pub fn save(&self, title: &str, markdown: &str, url: &Url) -> Result<PathBuf, OutputError> {
        let path = self.target_path(url);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| OutputError::CreateDir {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let contents = format!("{}{}", front_matter(title, url), markdown);
        fs::write(&path, contents).map_err(|source| OutputError::Write {
            path: path.display().to_string(),
            source,
        })?;

        tracing::debug!("Saved: {}", path.display());
        Ok(path)
    }
}

fn front_matter(title: &str, url: &Url) -> String {
    format!(
        "---\ntitle: {}\nsource_url: {}\ndate_downloaded: {}\n---\n\n",
        title,
        url,
        Utc::now().format("%Y-%m-%d %H:%M:%S")
    )
}

/// Converts an arbitrary string into a filesystem-safe token: lowercase,
/// alphanumeric runs separated by single hyphens, no leading or trailing
/// hyphen.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
