//! Metacritic critic score scraper.
//!
//! Two page loads per lookup: an advanced search limited to the release
//! year and the one after it, then the first result's page. A missing
//! metascore falls back to the user score scaled to 0-100.

use async_trait::async_trait;
use mediascore_common::NOT_AVAILABLE;
use tracing::debug;

use super::http::{first_attr, first_text};
use super::{FetchContext, HttpFetcher, PartialRating, ProviderError, RatingProvider, RatingQuery};

pub const DEFAULT_BASE_URL: &str = "https://www.metacritic.com";

const SEARCH_REFERER: &str = "http://www.metacritic.com/advanced-search";
const RESULT_LINK: &str = ".result a[href]";
const METASCORE: &str = ".phead_summary .metascore_w";
const USER_SCORE: &str = ".metascore_w.user";

/// The secondary critic-score provider.
pub struct MetacriticProvider {
    http: HttpFetcher,
    base_url: String,
}

impl MetacriticProvider {
    pub fn new(http: HttpFetcher, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn search_url(&self, query: &RatingQuery) -> String {
        let identity = &query.identity;
        let (kind, title) = if identity.is_tv() {
            ("tv", identity.title.as_str())
        } else {
            ("movie", query.best_title())
        };
        let year = query.best_year();

        format!(
            "{}/search/{}/{}/results?date_range_from=01-01-{}&date_range_to=30-12-{}\
             &search_type=advanced",
            self.base_url,
            kind,
            urlencoding::encode(title),
            year,
            year + 1
        )
    }

    fn media_url(&self, href: &str, query: &RatingQuery) -> String {
        let mut url = if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else {
            format!("{}{}", self.base_url, href)
        };
        if query.identity.is_tv() {
            url.push_str(&format!("/season-{}", query.identity.season));
        }
        url
    }
}

#[async_trait]
impl RatingProvider for MetacriticProvider {
    fn name(&self) -> &'static str {
        "metacritic"
    }

    async fn fetch(
        &self,
        query: &RatingQuery,
        ctx: &FetchContext,
    ) -> Result<PartialRating, ProviderError> {
        let search_url = self.search_url(query);
        let results = self.http.fetch_page(&search_url, Some(SEARCH_REFERER), ctx).await?;

        let Some(href) = first_attr(&results, RESULT_LINK, "href")? else {
            debug!(identity = %query.identity, "No Metacritic search result");
            return Ok(PartialRating {
                metacritic: Some(NOT_AVAILABLE.to_string()),
                ..Default::default()
            });
        };

        let page_url = self.media_url(&href, query);
        let page = self.http.fetch_page(&page_url, Some(SEARCH_REFERER), ctx).await?;
        let score = extract_score(&page)?;

        debug!(url = %page_url, score = %score, "Metacritic score");
        Ok(PartialRating {
            metacritic: Some(score),
            ..Default::default()
        })
    }
}

/// Metascore if present, otherwise the user score times ten.
fn extract_score(page: &str) -> Result<String, ProviderError> {
    if let Some(score) = first_text(page, METASCORE)?.and_then(|t| t.parse::<i64>().ok()) {
        return Ok(score.to_string());
    }

    let score = first_text(page, USER_SCORE)?
        .and_then(|t| t.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .map(|v| ((v * 10.0) as i64).to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::http::DEFAULT_TIMEOUT;
    use mediascore_common::MediaIdentity;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(base: &str) -> MetacriticProvider {
        MetacriticProvider::new(HttpFetcher::new(DEFAULT_TIMEOUT).unwrap(), base)
    }

    #[test]
    fn test_search_url_uses_year_and_next() {
        let mc = provider("https://mc.example");
        let mut query = RatingQuery::new(MediaIdentity::new("heat", 1995, 0, 0));
        query.canonical_title = Some("Heat".into());

        assert_eq!(
            mc.search_url(&query),
            "https://mc.example/search/movie/Heat/results?date_range_from=01-01-1995\
             &date_range_to=30-12-1996&search_type=advanced"
        );
    }

    #[test]
    fn test_search_url_tv_uses_parsed_title() {
        let mc = provider("https://mc.example");
        let mut query = RatingQuery::new(MediaIdentity::new("Show Name", 0, 2, 5));
        query.canonical_title = Some("Episode Five".into());
        query.canonical_year = Some("2019".into());

        assert_eq!(
            mc.search_url(&query),
            "https://mc.example/search/tv/Show%20Name/results?date_range_from=01-01-2019\
             &date_range_to=30-12-2020&search_type=advanced"
        );
    }

    #[test]
    fn test_extract_score() {
        let both = r#"<div class="phead_summary"><span class="metascore_w">73</span></div>
                      <span class="metascore_w user">8.1</span>"#;
        assert_eq!(extract_score(both).unwrap(), "73");

        let user_only = r#"<div class="phead_summary"><span class="metascore_w">tbd</span></div>
                           <span class="metascore_w user">8.1</span>"#;
        assert_eq!(extract_score(user_only).unwrap(), "81");

        let user_garbage = r#"<span class="metascore_w user">tbd</span>"#;
        assert_eq!(extract_score(user_garbage).unwrap(), NOT_AVAILABLE);

        assert_eq!(extract_score("<html></html>").unwrap(), NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn test_follows_first_result_with_season_suffix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/tv/Show%20Name/results"))
            .and(query_param("date_range_from", "01-01-2019"))
            .and(query_param("date_range_to", "30-12-2020"))
            .and(header("referer", SEARCH_REFERER))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<ul>
                     <li class="result"><a href="/tv/show-name">Show Name</a></li>
                     <li class="result"><a href="/tv/show-name-2010">Show Name (2010)</a></li>
                   </ul>"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tv/show-name/season-2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<div class="phead_summary"><a class="metascore_w">77</a></div>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let mut query = RatingQuery::new(MediaIdentity::new("Show Name", 2019, 2, 5));
        query.canonical_title = Some("Episode Five".into());
        let found = provider(&server.uri())
            .fetch(&query, &FetchContext::default())
            .await
            .unwrap();
        assert_eq!(found.metacritic.as_deref(), Some("77"));
    }

    #[tokio::test]
    async fn test_no_results_is_not_available() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>No results</p>"))
            .expect(1)
            .mount(&server)
            .await;

        let query = RatingQuery::new(MediaIdentity::new("Obscure", 2001, 0, 0));
        let found = provider(&server.uri())
            .fetch(&query, &FetchContext::default())
            .await
            .unwrap();
        assert_eq!(found.metacritic.as_deref(), Some(NOT_AVAILABLE));
    }
}
