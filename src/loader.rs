//! Page readiness and interstitial handling.

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::Result;
use crate::browse::Browse;

/// Elements whose presence means the listing has rendered something usable.
const READY_SELECTORS: &[&str] = &["img", "article", "a", ".movie-card"];

/// Known consent / region dialog buttons, tried best-effort.
const DISMISS_SELECTORS: &[&str] = &[
    "#onetrust-accept-btn-handler",
    "button[id*='accept']",
    "button[class*='accept']",
    "button[class*='cookie']",
    "button[class*='continue']",
    ".modal button[class*='close']",
];

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub navigation_timeout: Duration,
    /// Pause after navigation so client-side rendering can settle.
    pub settle_delay: Duration,
    /// Upper bound on waiting for one of the readiness selectors.
    pub ready_timeout: Duration,
    pub ready_poll: Duration,
    pub post_ready_delay: Duration,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(90),
            settle_delay: Duration::from_millis(3000),
            ready_timeout: Duration::from_millis(7000),
            ready_poll: Duration::from_millis(250),
            post_ready_delay: Duration::from_millis(1500),
        }
    }
}

/// What the dismissal pass did: how many button patterns were tried and how
/// many actually matched an element on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DismissOutcome {
    pub attempted: usize,
    pub matched: usize,
}

/// Navigate and wait until the page has had a chance to render.
///
/// The readiness wait is advisory: a page that never shows one of the
/// expected elements may still carry usable content, or legitimately have
/// none, so running out the timeout is not an error. Only the navigation
/// itself can fail.
pub async fn load_page<B: Browse + ?Sized>(
    browser: &mut B,
    url: &str,
    opts: &LoadOptions,
) -> Result<DismissOutcome> {
    browser.navigate(url, opts.navigation_timeout).await?;
    sleep(opts.settle_delay).await;

    let deadline = Instant::now() + opts.ready_timeout;
    loop {
        if !browser.query_text(READY_SELECTORS).await?.is_empty() {
            break;
        }
        if Instant::now() >= deadline {
            debug!(url, "no readiness selector matched, proceeding anyway");
            break;
        }
        sleep(opts.ready_poll).await;
    }
    sleep(opts.post_ready_delay).await;

    let outcome = dismiss_dialogs(browser).await;
    if outcome.matched > 0 {
        debug!(
            attempted = outcome.attempted,
            matched = outcome.matched,
            "dismissed interstitial dialogs"
        );
    }
    Ok(outcome)
}

/// Try each known dialog button once. Failing to find or click one is normal
/// (most pages show no dialog), so errors are swallowed and only the counts
/// are reported.
pub async fn dismiss_dialogs<B: Browse + ?Sized>(browser: &mut B) -> DismissOutcome {
    let mut matched = 0;
    for selector in DISMISS_SELECTORS {
        if browser.click(selector).await.unwrap_or(false) {
            matched += 1;
        }
    }
    DismissOutcome {
        attempted: DISMISS_SELECTORS.len(),
        matched,
    }
}
