//! HTTP client abstraction for testability

use std::time::Duration;

use async_trait::async_trait;

/// HTTP response from a request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Reason phrase for the status code, e.g. "Not Found"
    pub reason: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over HTTP client for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send a GET request with extra headers and query parameters
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> crate::Result<HttpResponse>;

    /// Send a POST request with a JSON body
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> crate::Result<HttpResponse>;
}

/// Production HTTP client using reqwest
#[derive(Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Build a client whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| crate::WatcherError::Config(format!("Building HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

async fn into_http_response(
    method: &str,
    url: &str,
    response: reqwest::Response,
) -> crate::Result<HttpResponse> {
    let status = response.status();
    let reason = status
        .canonical_reason()
        .unwrap_or("Unknown status")
        .to_string();
    let body = response.text().await.map_err(|e| {
        crate::WatcherError::NetworkFailure(format!(
            "Reading {} {} response body: {}",
            method,
            redact(url),
            e.without_url()
        ))
    })?;

    tracing::debug!(
        "{} {} -> {} ({} bytes)",
        method,
        redact(url),
        status.as_u16(),
        body.len()
    );
    Ok(HttpResponse {
        status: status.as_u16(),
        reason,
        body,
    })
}

/// Strip anything that looks like a bot token out of a URL before logging it
fn redact(url: &str) -> String {
    match url.find("/bot") {
        Some(idx) => {
            let rest = &url[idx + 4..];
            let tail = rest.find('/').map(|i| &rest[i..]).unwrap_or("");
            format!("{}/bot***{}", &url[..idx], tail)
        }
        None => url.to_string(),
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> crate::Result<HttpResponse> {
        tracing::debug!("GET {}", url);
        let mut target = reqwest::Url::parse(url).map_err(|e| {
            crate::WatcherError::NetworkFailure(format!("Invalid URL {}: {}", url, e))
        })?;
        if !query.is_empty() {
            target.query_pairs_mut().extend_pairs(query);
        }
        let mut request = self.client.get(target);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        // The query carries the per-tick timestamp; keep it out of the error
        // so repeated failures produce identical reports.
        let response = request.send().await.map_err(|e| {
            crate::WatcherError::NetworkFailure(format!("GET {} failed: {}", url, e.without_url()))
        })?;

        into_http_response("GET", url, response).await
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> crate::Result<HttpResponse> {
        tracing::debug!("POST {}", redact(url));
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                crate::WatcherError::NetworkFailure(format!(
                    "POST {} failed: {}",
                    redact(url),
                    e.without_url()
                ))
            })?;

        into_http_response("POST", url, response).await
    }
}
