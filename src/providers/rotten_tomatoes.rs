//! Rotten Tomatoes audience score scraper.

use async_trait::async_trait;
use mediascore_common::NOT_AVAILABLE;
use tracing::debug;

use super::http::first_text;
use super::{
    slugify, FetchContext, HttpFetcher, PartialRating, ProviderError, RatingProvider, RatingQuery,
};

pub const DEFAULT_BASE_URL: &str = "https://www.rottentomatoes.com";

const TV_SCORE: &str = ".superPageFontColor.meter-align";
const MOVIE_SCORE: &str =
    "span.mop-ratings-wrap__percentage.mop-ratings-wrap__percentage--audience";

/// The audience-score provider.
pub struct RottenTomatoesProvider {
    http: HttpFetcher,
    base_url: String,
}

impl RottenTomatoesProvider {
    pub fn new(http: HttpFetcher, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Page to scrape: the hint from the primary provider when present,
    /// otherwise a guessed canonical path.
    pub fn page_url(&self, query: &RatingQuery) -> String {
        if let Some(hint) = query
            .audience_url
            .as_deref()
            .filter(|u| !u.is_empty() && *u != NOT_AVAILABLE)
        {
            return hint.to_string();
        }

        let identity = &query.identity;
        if identity.is_tv() {
            format!(
                "{}/tv/{}/s{}",
                self.base_url,
                slugify(&identity.title),
                identity.season
            )
        } else {
            format!("{}/m/{}", self.base_url, slugify(query.best_title()))
        }
    }
}

#[async_trait]
impl RatingProvider for RottenTomatoesProvider {
    fn name(&self) -> &'static str {
        "rotten_tomatoes"
    }

    async fn fetch(
        &self,
        query: &RatingQuery,
        ctx: &FetchContext,
    ) -> Result<PartialRating, ProviderError> {
        let url = self.page_url(query);
        let body = self.http.fetch_page(&url, Some(&self.base_url), ctx).await?;

        let selector = if query.identity.is_tv() { TV_SCORE } else { MOVIE_SCORE };
        let score = first_text(&body, selector)?
            .map(|text| parse_percentage(&text))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        debug!(url = %url, score = %score, "Rotten Tomatoes score");
        Ok(PartialRating {
            rotten_tomatoes: Some(score),
            ..Default::default()
        })
    }
}

/// Turn text like `"91%  Audience Score"` into `"91"`, or `"N/A"`.
pub fn parse_percentage(text: &str) -> String {
    let token = text.split_whitespace().next().unwrap_or_default();
    let number = token.trim_end_matches('%');
    match number.parse::<i64>() {
        Ok(value) => value.to_string(),
        Err(_) => NOT_AVAILABLE.to_string(),
    }
}
