use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub mod browse;
pub mod chains;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod loader;
pub mod orchestrator;
pub mod text;

pub use error::{Error, Result};

/// Raw scrape result for one city at one point in time.
///
/// Field order is the file-format contract: consumers read `city`,
/// `updated_at`, `titles`, and expect `titles` to be present even when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub city: String,
    pub updated_at: String,
    pub titles: Vec<String>,
}

/// One title joined with its best metadata match. `None` fields serialize as
/// `null` and mean "no match found", not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieEntry {
    pub title: String,
    pub poster: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
}

impl MovieEntry {
    /// Entry for a title the search could not match.
    pub fn unmatched(title: String) -> Self {
        Self {
            title,
            poster: None,
            overview: None,
            release_date: None,
        }
    }
}

/// A [`Snapshot`] plus one [`MovieEntry`] per title, in the same order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSnapshot {
    pub city: String,
    pub updated_at: String,
    pub titles: Vec<String>,
    pub movies: Vec<MovieEntry>,
}

impl Snapshot {
    pub fn read_from(path: &Path) -> Result<Self> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }
}

impl EnrichedSnapshot {
    pub fn write_to(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }
}

/// Pretty-printed JSON write, creating parent directories as needed.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}
