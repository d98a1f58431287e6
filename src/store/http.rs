use super::ProductStore;
use crate::errors::{Error, Result};
use crate::models::{Product, ProductDraft};
use async_trait::async_trait;
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

const COLLECTION: &str = "productos";

/// [`ProductStore`] talking to the remote REST service.
pub struct HttpProductStore {
    client: reqwest::Client,
    collection_url: Url,
}

impl HttpProductStore {
    /// Create a client for the service rooted at `base_url`
    ///
    /// # Errors
    ///
    /// Returns error if the URL does not parse or the client cannot be built
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        // Without a trailing slash `join` would replace the last path segment
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let collection_url = Url::parse(&base)
            .and_then(|url| url.join(COLLECTION))
            .map_err(|e| Error::Config {
                message: format!("Invalid API base URL '{base_url}': {e}"),
            })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| Error::Config {
            message: format!("Failed to build HTTP client: {e}"),
        })?;

        Ok(Self {
            client,
            collection_url,
        })
    }

    /// The `productos` collection endpoint.
    #[must_use]
    pub const fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    fn item_url(&self, id: i64) -> Url {
        let mut url = self.collection_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(&id.to_string());
        }
        url
    }

    /// Turns a non-success status into [`Error::Rejected`]
    fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        tracing::debug!(status = %status, url = %response.url(), "received response");
        if status.is_success() {
            Ok(response)
        } else {
            tracing::error!(status = %status, "product service rejected request");
            Err(Error::Rejected {
                status: status.as_u16(),
            })
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse response");
            Error::InvalidResponse(e.to_string())
        })
    }
}

fn transport_error(e: reqwest::Error) -> Error {
    tracing::error!(error = %e, "product service request failed");
    Error::Transport(e.to_string())
}

#[async_trait]
impl ProductStore for HttpProductStore {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn list(&self) -> Result<Vec<Product>> {
        let response = self
            .client
            .get(self.collection_url.clone())
            .send()
            .await
            .map_err(transport_error)?;
        Self::decode(Self::check_status(response)?).await
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product> {
        let response = self
            .client
            .post(self.collection_url.clone())
            .json(draft)
            .send()
            .await
            .map_err(transport_error)?;
        Self::decode(Self::check_status(response)?).await
    }

    async fn update(&self, id: i64, draft: &ProductDraft) -> Result<Product> {
        let response = self
            .client
            .put(self.item_url(id))
            .json(draft)
            .send()
            .await
            .map_err(transport_error)?;
        Self::decode(Self::check_status(response)?).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let response = self
            .client
            .delete(self.item_url(id))
            .send()
            .await
            .map_err(transport_error)?;
        Self::check_status(response).map(|_| ())
    }
}
