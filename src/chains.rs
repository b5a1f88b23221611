//! Scrape targets. Each chain's markup differs, so the selector set and the
//! filter strictness ride along with the URL as configuration data: adding a
//! chain means adding an entry here, not a code path.

use crate::text::DEFAULT_MAX_TITLE_LEN;

/// One cinema chain's listing page plus the extraction config for its markup.
#[derive(Debug, Clone)]
pub struct Source {
    pub chain: String,
    pub url: String,
    /// CSS selectors for title-bearing elements. All of them are queried and
    /// the results merged (union), so a selector that stops matching after a
    /// site redesign costs nothing while a fallback still hits.
    pub selectors: Vec<String>,
    pub max_title_len: usize,
    pub enabled: bool,
}

impl Source {
    pub fn new(chain: &str, url: &str, selectors: &[&str]) -> Self {
        Self {
            chain: chain.to_string(),
            url: url.to_string(),
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
            max_title_len: DEFAULT_MAX_TITLE_LEN,
            enabled: true,
        }
    }

    pub fn with_max_title_len(mut self, max_title_len: usize) -> Self {
        self.max_title_len = max_title_len;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// The Madrid line-up.
pub fn madrid_sources() -> Vec<Source> {
    vec![
        Source::new(
            "Kinepolis",
            "https://kinepolis.es/?main_section=ya+a+la+venta",
            &[
                "a[href*='/peliculas/']",
                "article a",
                ".views-row a",
                ".movie-card a",
                "a.card",
            ],
        )
        .with_enabled(kinepolis_enabled()),
        // Cinesa mixes section headings into the same elements as titles, so
        // it gets the stricter length cap.
        Source::new(
            "Cinesa",
            "https://www.cinesa.es/peliculas/",
            &[
                "a[href*='/peliculas/']",
                ".movie-card a",
                "a.c-link",
                "h3",
                "h2",
            ],
        )
        .with_max_title_len(120),
        Source::new(
            "Yelmo",
            "https://www.yelmocines.es/cartelera",
            &[
                "a[href*='/pelicula/']",
                "a[href*='/peliculas/']",
                ".movie-card a",
                "h3",
                "h2",
            ],
        ),
    ]
}

/// `CARTELERA_SKIP_KINEPOLIS=1` drops the chain for runs where its consent
/// wall blocks non-interactive sessions.
fn kinepolis_enabled() -> bool {
    !matches!(
        std::env::var("CARTELERA_SKIP_KINEPOLIS").as_deref(),
        Ok("1") | Ok("true")
    )
}
