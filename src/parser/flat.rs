use scraper::Html;

use super::text::visible_text;
use super::ExtractionUnit;

/// All visible text of the page, head included, as a single unlabeled unit.
pub fn extract_flat(html: &Html) -> ExtractionUnit {
    ExtractionUnit::unlabeled(visible_text(html.root_element()))
}
