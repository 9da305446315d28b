use std::future::Future;

use reqwest::Url;

use crate::config::ContentConfig;
use crate::error::LoadError;

/// Source of inline text bodies
pub trait Fetch: Send + Sync + 'static {
    fn fetch_text(&self, locator: &str) -> impl Future<Output = Result<String, LoadError>> + Send;
}

/// Fetches text over HTTP(S)
pub struct HttpFetcher {
    client: reqwest::Client,
    base: Option<Url>,
}

impl HttpFetcher {
    pub fn new(config: &ContentConfig) -> Result<Self, LoadError> {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &ContentConfig) -> Result<Self, LoadError> {
        let base = match &config.base_url {
            Some(base) => Some(Url::parse(base).map_err(|e| LoadError::InvalidLocator {
                locator: base.clone(),
                reason: e.to_string(),
            })?),
            None => None,
        };

        Ok(Self { client, base })
    }

    /// Resolve a locator: absolute URLs pass through, relative ones are joined
    /// onto the base URL
    pub fn resolve(&self, locator: &str) -> Result<Url, LoadError> {
        let invalid = |reason: String| LoadError::InvalidLocator {
            locator: locator.to_string(),
            reason,
        };

        match (Url::parse(locator), &self.base) {
            (Ok(url), _) => Ok(url),
            (Err(_), Some(base)) => base.join(locator).map_err(|e| invalid(e.to_string())),
            (Err(e), None) => Err(invalid(format!("{} (no base_url configured)", e))),
        }
    }
}

impl Fetch for HttpFetcher {
    fn fetch_text(&self, locator: &str) -> impl Future<Output = Result<String, LoadError>> + Send {
        let client = self.client.clone();
        let url = self.resolve(locator);
        async move {
            let url = url?;
            let response = client.get(url).send().await?;

            if !response.status().is_success() {
                return Err(LoadError::Status(response.status().as_u16()));
            }

            Ok(response.text().await?)
        }
    }
}
