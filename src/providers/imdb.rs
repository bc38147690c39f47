//! IMDB identifier lookup via the public title suggestion endpoint.
//!
//! Used only by the OMDb client as a second attempt when a title/year query
//! misses: the suggestion service is far more forgiving about punctuation and
//! articles than OMDb's exact title match.

use serde::Deserialize;
use tracing::debug;

use super::{FetchContext, HttpFetcher, ProviderError};

pub const DEFAULT_BASE_URL: &str = "https://v3.sg.media-imdb.com";

#[derive(Debug, Deserialize)]
struct SuggestionResponse {
    #[serde(default)]
    d: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
struct Suggestion {
    id: String,
    #[serde(default)]
    y: Option<u32>,
}

/// Client for the suggestion endpoint.
#[derive(Debug, Clone)]
pub struct ImdbLookup {
    http: HttpFetcher,
    base_url: String,
}

impl ImdbLookup {
    pub fn new(http: HttpFetcher, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Find the IMDB id (`tt…`) for `title`.
    ///
    /// With a non-zero `year`, only suggestions dated within one year of it
    /// are accepted.
    pub async fn find_id(
        &self,
        title: &str,
        year: u32,
        ctx: &FetchContext,
    ) -> Result<String, ProviderError> {
        let url = format!(
            "{}/suggestion/x/{}.json",
            self.base_url,
            urlencoding::encode(title)
        );
        let response: SuggestionResponse = self.http.fetch_json(&url, &[], ctx).await?;

        let id = response
            .d
            .into_iter()
            .find(|s| s.id.starts_with("tt") && year_matches(year, s.y))
            .map(|s| s.id)
            .ok_or_else(|| ProviderError::not_found(format!("no IMDB id for {title} ({year})")))?;

        debug!(title = title, year = year, imdb_id = %id, "Resolved IMDB id");
        Ok(id)
    }
}

fn year_matches(wanted: u32, found: Option<u32>) -> bool {
    match (wanted, found) {
        (0, _) => true,
        (_, None) => false,
        (wanted, Some(found)) => wanted.abs_diff(found) <= 1,
    }
}
