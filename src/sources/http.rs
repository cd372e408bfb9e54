//! Remote playlist fetching

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, REFERER};
use std::time::Duration;
use tracing::{debug, info};

use super::local;
use super::traits::TextFetcher;
use crate::errors::{ConfigError, ConfigResult, SourceError, SourceResult};
use crate::models::SourceLocation;
use crate::utils::retry::{RetryPolicy, with_retry};
use crate::utils::url::UrlUtils;

const ACCEPT_TEXT: &str = "text/plain,*/*";

/// Request settings shared by every remote source
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub user_agent: String,
    pub referrer: Option<String>,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

/// Fetches remote sources over HTTP and reads local ones from disk
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    retry: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(settings: &FetchSettings) -> ConfigResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_TEXT));
        if let Some(referrer) = settings.referrer.as_deref().filter(|r| !r.is_empty()) {
            let value = HeaderValue::from_str(referrer)
                .map_err(|e| ConfigError::invalid("referrer", e.to_string()))?;
            headers.insert(REFERER, value);
        }

        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ConfigError::invalid("http client", e.to_string()))?;

        Ok(Self {
            client,
            retry: settings.retry.clone(),
        })
    }

    /// GET a URL as text, retrying transient failures
    pub async fn fetch(&self, url: &str) -> SourceResult<String> {
        let label = UrlUtils::obfuscate_credentials(url);
        info!("Fetching {}", label);

        let body = with_retry(&self.retry, || self.fetch_once(url, &label), &label).await?;

        debug!("Fetched {} bytes from {}", body.len(), label);
        Ok(body)
    }

    async fn fetch_once(&self, url: &str, label: &str) -> SourceResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| request_error(label, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                url: label.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| request_error(label, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn request_error(label: &str, error: reqwest::Error) -> SourceError {
    if error.is_timeout() {
        SourceError::Timeout {
            url: label.to_string(),
        }
    } else {
        SourceError::Connection {
            url: label.to_string(),
            message: error.without_url().to_string(),
        }
    }
}

#[async_trait]
impl TextFetcher for HttpFetcher {
    async fn fetch_text(&self, location: &SourceLocation) -> SourceResult<String> {
        match location {
            SourceLocation::Remote(url) => self.fetch(url).await,
            SourceLocation::Local(path) => local::read_file(path).await,
        }
    }
}
