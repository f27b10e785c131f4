use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use super::text::visible_text;
use super::ExtractionUnit;
use crate::error::{Result, ScrapeError};

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$").unwrap());
static CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[_\p{L}][_\p{L}\p{N}-]*$").unwrap());

pub const DEFAULT_TAG: &str = "div";
pub const DEFAULT_CLASS: &str = "articulo";

/// Which elements count as one article: tag name plus one class from the
/// element's class list. Written as `tag.class`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleFilter {
    tag: String,
    class: String,
}

impl ArticleFilter {
    pub fn new(tag: &str, class: &str) -> Result<Self> {
        let (tag, class) = (tag.trim(), class.trim());
        if !TAG_RE.is_match(tag) || !CLASS_RE.is_match(class) {
            return Err(ScrapeError::InvalidFilter(format!("{tag}.{class}")));
        }
        Ok(ArticleFilter {
            tag: tag.to_ascii_lowercase(),
            class: class.to_string(),
        })
    }

    fn selector(&self) -> Result<Selector> {
        Selector::parse(&self.to_string()).map_err(|_| ScrapeError::InvalidFilter(self.to_string()))
    }
}

impl Default for ArticleFilter {
    fn default() -> Self {
        ArticleFilter {
            tag: DEFAULT_TAG.to_string(),
            class: DEFAULT_CLASS.to_string(),
        }
    }
}

impl FromStr for ArticleFilter {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self> {
        let (tag, class) = s
            .split_once('.')
            .ok_or_else(|| ScrapeError::InvalidFilter(s.to_string()))?;
        ArticleFilter::new(tag, class).map_err(|_| ScrapeError::InvalidFilter(s.to_string()))
    }
}

impl fmt::Display for ArticleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.tag, self.class)
    }
}

/// Every element matching `filter`, in document order, numbered from 1.
/// Nested matches are returned individually.
pub fn extract_articles(html: &Html, filter: &ArticleFilter) -> Result<Vec<ExtractionUnit>> {
    let selector = filter.selector()?;
    let units: Vec<ExtractionUnit> = html
        .select(&selector)
        .enumerate()
        .map(|(i, el)| ExtractionUnit::indexed(i + 1, visible_text(el)))
        .collect();
    debug!("{} elements matched `{}`", units.len(), filter);
    Ok(units)
}

// ── Tests ──
