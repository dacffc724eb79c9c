//! Unsplash photo lookups with deterministic fallbacks.
//!
//! The client never fails from the caller's point of view: a missing access
//! key, a network error, a non-success status, a timeout or an empty result
//! all resolve to `picsum.photos` URLs derived from the query. Successful
//! lookups are cached for an hour.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use supplement_store_core::Catalog;
use supplement_store_core::image::{SEARCH_RESULT_SIZING, fallback_image_url, fallback_image_urls};

use crate::config::ImageConfig;

const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Errors from a single Unsplash call. Logged, never surfaced.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unsplash API returned {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("no photos found")]
    Empty,

    #[error("no access key configured")]
    NoAccessKey,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

/// Client for the Unsplash photo API.
#[derive(Clone)]
pub struct ImageClient {
    inner: Arc<ImageClientInner>,
}

struct ImageClientInner {
    client: reqwest::Client,
    api_url: String,
    access_key: Option<SecretString>,
    timeout: Duration,
    cache: Cache<String, Vec<String>>,
}

impl ImageClient {
    #[must_use]
    pub fn new(config: &ImageConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(500)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(ImageClientInner {
                client: reqwest::Client::new(),
                api_url: config.api_url.clone(),
                access_key: config.access_key.clone(),
                timeout: config.timeout,
                cache,
            }),
        }
    }

    /// Whether lookups can reach the API at all.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.inner.access_key.is_some()
    }

    /// Up to `count` square photo URLs for a query.
    ///
    /// Always returns exactly `count` URLs when the API is unavailable.
    #[instrument(skip(self))]
    pub async fn search_photos(&self, query: &str, count: usize) -> Vec<String> {
        let cache_key = format!("search:{query}:{count}");
        if let Some(urls) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for photo search");
            return urls;
        }

        match self.fetch_search(query, count).await {
            Ok(urls) => {
                self.inner.cache.insert(cache_key, urls.clone()).await;
                urls
            }
            Err(ImageError::NoAccessKey) => fallback_image_urls(query, count),
            Err(e) => {
                warn!(error = %e, "Photo search failed, using fallback images");
                fallback_image_urls(query, count)
            }
        }
    }

    /// One random square photo URL for a query.
    #[instrument(skip(self))]
    pub async fn random_photo(&self, query: &str) -> String {
        let cache_key = format!("random:{query}");
        if let Some(url) = self
            .inner
            .cache
            .get(&cache_key)
            .await
            .and_then(|urls| urls.into_iter().next())
        {
            return url;
        }

        match self.fetch_random(query).await {
            Ok(url) => {
                self.inner.cache.insert(cache_key, vec![url.clone()]).await;
                url
            }
            Err(ImageError::NoAccessKey) => fallback_image_url(query),
            Err(e) => {
                warn!(error = %e, "Random photo failed, using fallback image");
                fallback_image_url(query)
            }
        }
    }

    /// Replace catalogue images with search results, one call per query group.
    ///
    /// Products keep their category image when a group comes back short or
    /// the API is not configured. Returns the number of products updated.
    #[instrument(skip(self, catalog))]
    pub async fn refresh_catalog(&self, catalog: &mut Catalog) -> usize {
        if !self.is_configured() {
            return 0;
        }

        let mut updated = 0;
        for group in catalog.image_groups() {
            let urls = match self.fetch_search(group.query, group.product_ids.len()).await {
                Ok(urls) => urls,
                Err(e) => {
                    warn!(query = group.query, error = %e, "Keeping default images");
                    continue;
                }
            };
            for (id, url) in group.product_ids.iter().zip(urls) {
                if catalog.set_image(id, url) {
                    updated += 1;
                }
            }
        }
        updated
    }

    async fn fetch_search(&self, query: &str, count: usize) -> Result<Vec<String>, ImageError> {
        let per_page = count.to_string();
        let url = self.endpoint(
            "/search/photos",
            &[
                ("query", query),
                ("per_page", per_page.as_str()),
                ("orientation", "squarish"),
            ],
        )?;
        let response: SearchResponse = self.get_json(url).await?;
        let urls: Vec<String> = response
            .results
            .into_iter()
            .map(|p| sized(&p.urls.regular))
            .collect();
        if urls.is_empty() {
            return Err(ImageError::Empty);
        }
        Ok(urls)
    }

    async fn fetch_random(&self, query: &str) -> Result<String, ImageError> {
        let url = self.endpoint(
            "/photos/random",
            &[("orientation", "squarish"), ("query", query)],
        )?;
        let photo: Photo = self.get_json(url).await?;
        Ok(sized(&photo.urls.regular))
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ImageError> {
        Ok(Url::parse_with_params(
            &format!("{}{path}", self.inner.api_url),
            params,
        )?)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, ImageError> {
        let key = self
            .inner
            .access_key
            .as_ref()
            .ok_or(ImageError::NoAccessKey)?;

        let response = self
            .inner
            .client
            .get(url)
            .header("Accept-Version", "v1")
            .header("Authorization", format!("Client-ID {}", key.expose_secret()))
            .timeout(self.inner.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Status(status));
        }
        Ok(response.json::<T>().await?)
    }
}

fn sized(regular: &str) -> String {
    format!("{regular}{SEARCH_RESULT_SIZING}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_client_uses_fallbacks() {
        let client = ImageClient::new(&ImageConfig::default());
        assert!(!client.is_configured());

        let urls = client.search_photos("ab", 3).await;
        assert_eq!(urls, fallback_image_urls("ab", 3));
        assert_eq!(client.random_photo("ab").await, fallback_image_url("ab"));
    }

    #[tokio::test]
    async fn test_refresh_without_key_keeps_category_images() {
        let client = ImageClient::new(&ImageConfig::default());
        let mut catalog = Catalog::standard();
        let before = catalog.clone();
        assert_eq!(client.refresh_catalog(&mut catalog).await, 0);
        assert_eq!(catalog.products(), before.products());
    }

    #[tokio::test]
    async fn test_unreachable_api_falls_back() {
        let client = ImageClient::new(&ImageConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            access_key: Some(SecretString::from("k3y-For-Tests")),
            timeout: Duration::from_millis(200),
        });
        assert_eq!(
            client.search_photos("protein", 2).await,
            fallback_image_urls("protein", 2)
        );
    }

    #[test]
    fn test_sized_appends_crop_parameters() {
        assert_eq!(
            sized("https://images.unsplash.com/photo-1?ixid=abc"),
            "https://images.unsplash.com/photo-1?ixid=abc&w=800&h=800&fit=crop"
        );
    }

    #[test]
    fn test_search_endpoint_encodes_query() {
        let client = ImageClient::new(&ImageConfig::default());
        let url = client
            .endpoint("/search/photos", &[("query", "pre workout"), ("per_page", "2")])
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(
            url.as_str(),
            "https://api.unsplash.com/search/photos?query=pre+workout&per_page=2"
        );
    }
}
