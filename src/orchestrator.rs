//! Sequential scrape run: load each source, extract, merge, stamp.

use chrono::{SecondsFormat, Utc};
use tracing::{info, warn};

use crate::browse::Browse;
use crate::chains::Source;
use crate::extract;
use crate::loader::{self, LoadOptions};
use crate::text;
use crate::{Result, Snapshot};

/// Visit every enabled source once, in configuration order, and collect the
/// merged, deduplicated title list.
///
/// One source failing (timeout, network error, markup surprise) costs only
/// that source's titles: the failure is logged with its chain tag and the
/// run moves on. Sources share one browsing session, strictly sequentially;
/// parallel loads would trip the chains' bot detection for no gain.
pub async fn run_scrape<B: Browse>(
    browser: &mut B,
    sources: &[Source],
    city: &str,
    opts: &LoadOptions,
) -> Snapshot {
    let mut all: Vec<String> = Vec::new();
    for source in sources {
        if !source.enabled {
            info!(chain = %source.chain, "source disabled, skipping");
            continue;
        }
        match scrape_source(browser, source, opts).await {
            Ok(titles) => {
                info!(chain = %source.chain, count = titles.len(), "extracted titles");
                all.extend(titles);
            }
            Err(err) => {
                warn!(chain = %source.chain, error = %err, "source failed, continuing");
            }
        }
    }

    Snapshot {
        city: city.to_string(),
        updated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        titles: text::dedupe(all),
    }
}

async fn scrape_source<B: Browse>(
    browser: &mut B,
    source: &Source,
    opts: &LoadOptions,
) -> Result<Vec<String>> {
    loader::load_page(browser, &source.url, opts).await?;
    extract::extract_titles(browser, source).await
}
