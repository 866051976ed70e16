//! Traced HTTP client for upstream calls.
//!
//! Wraps `reqwest::Client`, opens an `outgoing_http` span per request and
//! stamps a W3C `traceparent` header so upstream logs can be correlated.

use std::time::Duration;

use reqwest::header::HeaderValue;
use tracing::{field, Instrument, Level};
use url::Url;
use uuid::Uuid;

pub const TRACEPARENT: &str = "traceparent";

#[derive(Clone)]
pub struct TracedClient {
    inner: reqwest::Client,
}

impl TracedClient {
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Client with a whole-request timeout.
    pub fn with_timeout(timeout: Duration) -> anyhow::Result<Self> {
        let inner = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::new(inner))
    }

    /// Execute a built request inside an `outgoing_http` span.
    pub async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let span = tracing::span!(
            Level::INFO, "outgoing_http",
            http.method = %req.method(),
            http.url = %redacted(req.url()),
            http.status_code = field::Empty,
            error = field::Empty,
            otel.kind = "client",
        );

        if let Ok(value) = HeaderValue::from_str(&new_traceparent()) {
            req.headers_mut().insert(TRACEPARENT, value);
        }

        let response = self.inner.execute(req).instrument(span.clone()).await?;

        let status = response.status();
        span.record("http.status_code", status.as_u16());
        if status.is_client_error() || status.is_server_error() {
            span.record("error", true);
        }
        Ok(response)
    }

    pub async fn send(&self, builder: reqwest::RequestBuilder) -> reqwest::Result<reqwest::Response> {
        let req = builder.build()?;
        self.execute(req).await
    }

    pub fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.inner.request(method, url)
    }

    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }
}

impl From<reqwest::Client> for TracedClient {
    fn from(c: reqwest::Client) -> Self {
        Self::new(c)
    }
}

impl Default for TracedClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

/// URL without query string; upstream keys travel as query parameters.
fn redacted(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.to_string()
}

fn new_traceparent() -> String {
    let trace_id = Uuid::new_v4().simple().to_string();
    let span_id = &Uuid::new_v4().simple().to_string()[..16];
    format!("00-{trace_id}-{span_id}-01")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn query_is_stripped_from_logged_url() {
        let url = Url::parse("https://api.example.com/data?q=Paris&appid=secret").unwrap();
        assert_eq!(redacted(&url), "https://api.example.com/data");
    }

    #[test]
    fn traceparent_has_w3c_shape() {
        let tp = new_traceparent();
        let parts: Vec<&str> = tp.split('-').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "00");
        assert_eq!(parts[1].len(), 32);
        assert_eq!(parts[2].len(), 16);
        assert_eq!(parts[3], "01");
    }

    #[tokio::test]
    async fn outgoing_requests_carry_traceparent() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET).path("/ping").header_exists(TRACEPARENT);
            then.status(200).body("ok");
        });

        let client = TracedClient::default();
        let url = Url::parse(&format!("{}/ping", server.base_url())).unwrap();
        let resp = client
            .send(client.request(reqwest::Method::GET, url))
            .await
            .unwrap();

        assert!(resp.status().is_success());
        m.assert();
    }
}
