//! HTTP and HTML fetch helpers shared by the provider clients.
//!
//! Every request is bounded by the client timeout and raced against the
//! caller's cancellation token. Pages are returned as text; selectors are
//! evaluated synchronously by the helpers below so parsed documents never
//! live across an `.await`.

use std::future::Future;
use std::time::Duration;

use reqwest::header::REFERER;
use reqwest::StatusCode;
use scraper::{Html, Selector};
use serde::de::DeserializeOwned;
use tracing::trace;

use super::{FetchContext, ProviderError};

/// Default request timeout for every provider call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(6);

const USER_AGENT: &str = concat!("mediascore/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper around a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// GET `url` with an optional referer and return the body text.
    ///
    /// Anything other than 200 OK is an error.
    pub async fn fetch_page(
        &self,
        url: &str,
        referer: Option<&str>,
        ctx: &FetchContext,
    ) -> Result<String, ProviderError> {
        let mut request = self.client.get(url);
        if let Some(referer) = referer {
            request = request.header(REFERER, referer);
        }

        cancellable(ctx, async {
            trace!(url = url, "GET");
            let resp = request.send().await?;
            if resp.status() != StatusCode::OK {
                return Err(ProviderError::Status {
                    status: resp.status().as_u16(),
                    url: url.to_string(),
                });
            }
            Ok(resp.text().await?)
        })
        .await
    }

    /// GET `url` with query parameters and decode a JSON body.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        ctx: &FetchContext,
    ) -> Result<T, ProviderError> {
        let request = self.client.get(url).query(query);

        cancellable(ctx, async {
            let resp = request.send().await?;
            if resp.status() != StatusCode::OK {
                return Err(ProviderError::Status {
                    status: resp.status().as_u16(),
                    url: url.to_string(),
                });
            }
            resp.json::<T>()
                .await
                .map_err(|e| ProviderError::parse(format!("invalid JSON from {url}: {e}")))
        })
        .await
    }
}

/// Race `fut` against the context's cancellation token.
pub async fn cancellable<F, T>(ctx: &FetchContext, fut: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    tokio::select! {
        biased;
        _ = ctx.cancel_token().cancelled() => Err(ProviderError::Cancelled),
        result = fut => result,
    }
}

fn selector(css: &str) -> Result<Selector, ProviderError> {
    Selector::parse(css).map_err(|e| ProviderError::parse(format!("invalid selector {css}: {e:?}")))
}

/// Text of the first element matching `css`, trimmed. Empty text counts as absent.
pub fn first_text(body: &str, css: &str) -> Result<Option<String>, ProviderError> {
    let selector = selector(css)?;
    let document = Html::parse_document(body);
    let text = document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty());
    Ok(text)
}

/// Value of `attr` on the first element matching `css`.
pub fn first_attr(body: &str, css: &str, attr: &str) -> Result<Option<String>, ProviderError> {
    let selector = selector(css)?;
    let document = Html::parse_document(body);
    let value = document
        .select(&selector)
        .find_map(|el| el.value().attr(attr))
        .map(str::to_string);
    Ok(value)
}
