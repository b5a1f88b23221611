//! Per-source title extraction.

use crate::Result;
use crate::browse::Browse;
use crate::chains::Source;
use crate::text::{self, TitleFilter};

/// Pull the cleaned title list for one source from the loaded page.
///
/// Every selector in the source's set is queried and the results merged
/// before cleaning. Zero matching elements is a valid outcome ("nothing
/// listed"), distinct from a navigation failure upstream.
pub async fn extract_titles<B: Browse + ?Sized>(
    browser: &B,
    source: &Source,
) -> Result<Vec<String>> {
    let selectors: Vec<&str> = source.selectors.iter().map(String::as_str).collect();
    let raw = browser.query_text(&selectors).await?;
    let filter = TitleFilter::new(source.max_title_len);
    Ok(text::clean_titles(raw, &filter))
}
