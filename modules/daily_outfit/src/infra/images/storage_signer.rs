use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use crate::domain::error::DomainError;
use crate::domain::ports::ImageSigner;
use crate::infra::http::TracedClient;

const SERVICE: &str = "image storage";

/// Signs object paths through a Supabase-style storage API:
/// `POST {base}/object/sign/{bucket}/{path}` with `{"expiresIn": secs}`.
pub struct StorageImageSigner {
    client: TracedClient,
    base: Url,
    bucket: String,
    service_key: Option<String>,
    ttl: Duration,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignRequest {
    expires_in: u64,
}

#[derive(Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL", alias = "signedUrl")]
    signed_url: String,
}

impl StorageImageSigner {
    pub fn new(
        client: TracedClient,
        base: Url,
        bucket: impl Into<String>,
        service_key: Option<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            client,
            base,
            bucket: bucket.into(),
            service_key: service_key.filter(|k| !k.trim().is_empty()),
            ttl,
        }
    }

    fn sign_endpoint(&self, path: &str) -> Result<Url, DomainError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                DomainError::validation("images.base_url", "cannot be a base URL")
            })?;
            segments
                .pop_if_empty()
                .extend(&["object", "sign", self.bucket.as_str()]);
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
        }
        Ok(url)
    }

    /// Upstream returns a path relative to the storage root.
    fn absolutize(&self, signed: &str) -> String {
        if signed.starts_with("http://") || signed.starts_with("https://") {
            return signed.to_string();
        }
        format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            signed.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl ImageSigner for StorageImageSigner {
    #[instrument(name = "daily_outfit.http.images.sign", skip_all, fields(path = %path))]
    async fn sign(&self, path: &str) -> Result<String, DomainError> {
        let key = self
            .service_key
            .as_deref()
            .ok_or_else(|| DomainError::not_configured(SERVICE))?;
        let url = self.sign_endpoint(path)?;

        let request = self
            .client
            .request(reqwest::Method::POST, url)
            .bearer_auth(key)
            .json(&SignRequest {
                expires_in: self.ttl.as_secs(),
            });
        let response = self
            .client
            .send(request)
            .await
            .map_err(|e| DomainError::upstream(SERVICE, e.to_string()))?;

        if !response.status().is_success() {
            return Err(DomainError::upstream(
                SERVICE,
                format!("HTTP {}", response.status()),
            ));
        }

        let body: SignResponse = response
            .json()
            .await
            .map_err(|e| DomainError::malformed(SERVICE, e.to_string()))?;
        Ok(self.absolutize(&body.signed_url))
    }
}
