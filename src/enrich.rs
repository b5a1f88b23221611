//! TMDB enrichment of a scraped snapshot.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::debug;

use crate::{EnrichedSnapshot, Error, MovieEntry, Result, Snapshot};

pub const TMDB_API_URL: &str = "https://api.themoviedb.org/3";
const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";

/// One candidate returned by the metadata search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// External movie-metadata search capability.
#[async_trait]
pub trait MovieSearch {
    async fn search(&self, query: &str, language: &str) -> Result<Vec<SearchHit>>;
}

/// TMDB `/search/movie` client, keyed by an api_key query parameter.
pub struct TmdbSearch {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbSearch {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, TMDB_API_URL.to_string())
    }

    /// Point the client at a different endpoint (test servers).
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Read the credential from `TMDB_API_KEY`. Checked before any snapshot
    /// is read or request sent: without a key no enrichment is possible.
    pub fn from_env() -> Result<Self> {
        match std::env::var("TMDB_API_KEY") {
            Ok(key) if !key.is_empty() => Self::new(key),
            _ => Err(Error::MissingCredential("TMDB_API_KEY")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[async_trait]
impl MovieSearch for TmdbSearch {
    async fn search(&self, query: &str, language: &str) -> Result<Vec<SearchHit>> {
        let resp = self
            .client
            .get(format!("{}/search/movie", self.base_url))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", language),
                ("query", query),
                ("include_adult", "false"),
            ])
            .send()
            .await?;

        // A rejected query (bad key, rate limit) counts as "no match" for
        // this title; only transport errors abort the run.
        if !resp.status().is_success() {
            debug!(status = %resp.status(), query, "search rejected");
            return Ok(Vec::new());
        }

        let parsed: SearchResponse = resp.json().await?;
        Ok(parsed.results)
    }
}

/// Pacing and locale for the enrichment loop.
#[derive(Debug, Clone)]
pub struct EnrichOptions {
    pub language: String,
    /// Pause after each query. TMDB tolerates modest sequential traffic;
    /// this keeps us under its per-second window.
    pub request_delay: Duration,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            language: "es-ES".to_string(),
            request_delay: Duration::from_millis(300),
        }
    }
}

/// Join each snapshot title with its best search match, in input order.
///
/// Titles are independent: a miss (no results, rejected query) produces an
/// entry with all optional fields `None` and the loop continues.
pub async fn enrich_snapshot<S: MovieSearch + ?Sized>(
    search: &S,
    snapshot: &Snapshot,
    opts: &EnrichOptions,
) -> Result<EnrichedSnapshot> {
    let mut movies = Vec::with_capacity(snapshot.titles.len());
    for title in &snapshot.titles {
        let hit = search
            .search(title, &opts.language)
            .await?
            .into_iter()
            .next();
        let entry = match hit {
            Some(hit) => MovieEntry {
                title: title.clone(),
                poster: hit.poster_path.map(|p| format!("{POSTER_BASE}{p}")),
                overview: hit.overview.filter(|s| !s.is_empty()),
                release_date: hit.release_date.filter(|s| !s.is_empty()),
            },
            None => MovieEntry::unmatched(title.clone()),
        };
        debug!(title = %entry.title, matched = entry.poster.is_some(), "enriched");
        movies.push(entry);
        sleep(opts.request_delay).await;
    }

    Ok(EnrichedSnapshot {
        city: snapshot.city.clone(),
        updated_at: snapshot.updated_at.clone(),
        titles: snapshot.titles.clone(),
        movies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Search stub that only knows one title.
    struct OneHit {
        known: &'static str,
    }

    #[async_trait]
    impl MovieSearch for OneHit {
        async fn search(&self, query: &str, _language: &str) -> Result<Vec<SearchHit>> {
            if query == self.known {
                Ok(vec![SearchHit {
                    poster_path: Some("/dune.jpg".to_string()),
                    overview: Some("Arrakis.".to_string()),
                    release_date: Some("2024-02-28".to_string()),
                }])
            } else {
                Ok(Vec::new())
            }
        }
    }

    fn snapshot(titles: &[&str]) -> Snapshot {
        Snapshot {
            city: "Madrid".to_string(),
            updated_at: "2026-08-06T10:00:00.000Z".to_string(),
            titles: titles.iter().map(|t| t.to_string()).collect(),
        }
    }

    // Paused clock: the 300 ms inter-request pauses resolve instantly.
    #[tokio::test(start_paused = true)]
    async fn misses_keep_their_slot_with_absent_fields() {
        let search = OneHit { known: "Title A" };
        let enriched = enrich_snapshot(
            &search,
            &snapshot(&["Title A", "Title B"]),
            &EnrichOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(enriched.movies.len(), 2);
        assert_eq!(
            enriched.movies[0].poster.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/dune.jpg")
        );
        assert_eq!(enriched.movies[1], MovieEntry::unmatched("Title B".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_metadata_strings_become_null() {
        struct EmptyFields;

        #[async_trait]
        impl MovieSearch for EmptyFields {
            async fn search(&self, _query: &str, _language: &str) -> Result<Vec<SearchHit>> {
                Ok(vec![SearchHit {
                    poster_path: None,
                    overview: Some(String::new()),
                    release_date: Some(String::new()),
                }])
            }
        }

        let enriched = enrich_snapshot(&EmptyFields, &snapshot(&["X2"]), &EnrichOptions::default())
            .await
            .unwrap();
        assert_eq!(enriched.movies[0], MovieEntry::unmatched("X2".to_string()));
    }
}
