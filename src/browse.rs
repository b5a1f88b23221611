//! Page-access capability. The rest of the pipeline only ever navigates,
//! reads element text by selector, and clicks, so the engine behind those
//! three verbs stays swappable.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use scraper::{Html, Selector};

use crate::{Error, Result};

/// Browser-like identity presented to the scraped sites.
#[derive(Debug, Clone)]
pub struct BrowseConfig {
    pub user_agent: String,
    pub accept_language: String,
    pub viewport: (u32, u32),
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                         AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/124.0.0.0 Safari/537.36"
                .to_string(),
            accept_language: "es-ES,es;q=0.9".to_string(),
            viewport: (1366, 850),
        }
    }
}

#[async_trait]
pub trait Browse {
    /// Load `url`; on return the handle reflects the new page.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()>;

    /// Text content of every element matching any of `selectors`, in
    /// document order per selector. Empty text is excluded.
    async fn query_text(&self, selectors: &[&str]) -> Result<Vec<String>>;

    /// Click the first element matching `selector`. `false` when nothing
    /// matched; callers decide whether that matters.
    async fn click(&mut self, selector: &str) -> Result<bool>;
}

/// HTTP-backed implementation: one GET per navigation, selector queries
/// answered from the parsed response body.
///
/// Cookies persist across navigations within a run (consent cookies set by
/// one chain's domain survive a later visit), mirroring a real session.
pub struct HttpBrowser {
    client: Client,
    config: BrowseConfig,
    body: Option<String>,
}

impl HttpBrowser {
    pub fn new(config: BrowseConfig) -> Result<Self> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            config,
            body: None,
        })
    }
}

#[async_trait]
impl Browse for HttpBrowser {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()> {
        let resp = self
            .client
            .get(url)
            .timeout(timeout)
            .header(header::USER_AGENT, self.config.user_agent.as_str())
            .header(
                header::ACCEPT_LANGUAGE,
                self.config.accept_language.as_str(),
            )
            .header("Viewport-Width", self.config.viewport.0.to_string())
            .send()
            .await?
            .error_for_status()?;
        self.body = Some(resp.text().await?);
        Ok(())
    }

    async fn query_text(&self, selectors: &[&str]) -> Result<Vec<String>> {
        let Some(body) = &self.body else {
            return Ok(Vec::new());
        };
        // Limit lifetime of Html to avoid crossing await boundaries
        let texts = {
            let doc = Html::parse_document(body);
            let mut texts = Vec::new();
            for pattern in selectors {
                let sel = Selector::parse(pattern)
                    .map_err(|_| Error::Selector(pattern.to_string()))?;
                for el in doc.select(&sel) {
                    let text = el
                        .text()
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .collect::<Vec<_>>()
                        .join(" ");
                    if !text.is_empty() {
                        texts.push(text);
                    }
                }
            }
            texts
        };
        Ok(texts)
    }

    async fn click(&mut self, selector: &str) -> Result<bool> {
        // A plain HTTP session cannot run the element's click handler; report
        // whether the element exists so dismissal passes can count matches.
        let Some(body) = &self.body else {
            return Ok(false);
        };
        let matched = {
            let doc = Html::parse_document(body);
            let sel =
                Selector::parse(selector).map_err(|_| Error::Selector(selector.to_string()))?;
            doc.select(&sel).next().is_some()
        };
        Ok(matched)
    }
}
