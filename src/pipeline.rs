use std::fmt;

use tracing::{info, warn};

use crate::error::{Result, ScrapeError};
use crate::fetch::fetch;
use crate::output::{self, OutputFiles};
use crate::parser::articles::{extract_articles, ArticleFilter};
use crate::parser::flat::extract_flat;
use crate::parser::{Document, ExtractionUnit};
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// One file per matched article plus a labeled aggregate.
    Articles,
    /// All visible text in one file.
    Flat,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Articles => f.write_str("articles"),
            Strategy::Flat => f.write_str("flat"),
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub strategy: Strategy,
    pub unit_count: usize,
    pub files: OutputFiles,
}

/// Fetch → split into articles → write. Nothing touches the filesystem until
/// extraction has succeeded.
pub fn run_articles(settings: &Settings) -> Result<RunReport> {
    let filter = settings.filter()?;
    let document = fetch(&settings.url)?;
    let units = extract_articles_from(&document, &filter)?;

    if units.is_empty() {
        if settings.require_matches {
            return Err(ScrapeError::NoMatches {
                filter: filter.to_string(),
            });
        }
        warn!(
            "No elements matched `{}` on {}; writing an empty aggregate",
            filter,
            document.url()
        );
    }

    let files = output::write_articles(&settings.out_dir, &units)?;
    info!("Extracted {} articles from {}", units.len(), document.url());
    Ok(RunReport {
        strategy: Strategy::Articles,
        unit_count: units.len(),
        files,
    })
}

/// Fetch → whole-page text → write.
pub fn run_flat(settings: &Settings) -> Result<RunReport> {
    let document = fetch(&settings.url)?;
    let unit = extract_flat_from(&document);
    let files = output::write_flat(&settings.out_dir, &unit)?;
    Ok(RunReport {
        strategy: Strategy::Flat,
        unit_count: 1,
        files,
    })
}

pub fn run(strategy: Strategy, settings: &Settings) -> Result<RunReport> {
    match strategy {
        Strategy::Articles => run_articles(settings),
        Strategy::Flat => run_flat(settings),
    }
}

pub fn extract_articles_from(document: &Document, filter: &ArticleFilter) -> Result<Vec<ExtractionUnit>> {
    extract_articles(&document.parse(), filter)
}

pub fn extract_flat_from(document: &Document) -> ExtractionUnit {
    extract_flat(&document.parse())
}

// ── Tests ──
