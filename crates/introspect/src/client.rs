//! HTTP client that sends introspection queries.
//!
//! One POST per call, no retries. Non-2xx responses are reported as
//! [`IntrospectionError::Http`] without looking at the body as JSON.

use crate::{IntrospectionError, IntrospectionResult, QueryDetail, Result};
use std::time::Duration;

/// Default timeout for introspection requests (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Longest slice of an error body kept in [`IntrospectionError::Http`].
const MAX_ERROR_BODY: usize = 2048;

/// A configurable client for executing GraphQL introspection queries.
///
/// # Examples
///
/// ```no_run
/// use graphql_introspect::{IntrospectionClient, QueryDetail};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = IntrospectionClient::new().with_timeout(Duration::from_secs(60));
/// let result = client
///     .introspect("https://api.example.com/graphql", QueryDetail::Full)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct IntrospectionClient {
    timeout: Duration,
    connect_timeout: Duration,
}

impl Default for IntrospectionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl IntrospectionClient {
    /// Creates a client with a 30 second request timeout and a 10 second
    /// connection timeout.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Sets the request timeout.
    ///
    /// This is the maximum time allowed for the entire request (connection + transfer).
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Sends the query document for `detail` to `url`.
    pub async fn introspect(&self, url: &str, detail: QueryDetail) -> Result<IntrospectionResult> {
        self.fetch(url, detail.query()).await
    }

    /// Posts `{"query": query}` to `url` and parses the response body.
    ///
    /// # Errors
    ///
    /// - [`IntrospectionError::InvalidUrl`] if `url` is not an absolute http(s) URL
    /// - [`IntrospectionError::Network`] on connection failure, timeout or an
    ///   unreadable body
    /// - [`IntrospectionError::Http`] on a non-2xx status
    /// - [`IntrospectionError::Decode`] if the body is not a JSON response object
    #[tracing::instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn fetch(&self, url: &str, query: &str) -> Result<IntrospectionResult> {
        let endpoint = parse_endpoint(url)?;

        tracing::debug!("Creating HTTP client with timeouts");
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(|e| {
                IntrospectionError::Network(format!("Failed to create HTTP client: {e}"))
            })?;

        let body = serde_json::json!({ "query": query });

        tracing::info!("Sending introspection query");
        let response = client
            .post(endpoint)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| IntrospectionError::Network(describe_transport_error(&e)))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Received response");

        if !status.is_success() {
            let mut error_body = response.text().await.unwrap_or_default();
            truncate_body(&mut error_body);
            tracing::error!(status = status.as_u16(), body = %error_body, "HTTP error response");
            return Err(IntrospectionError::Http(status.as_u16(), error_body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| IntrospectionError::Network(describe_transport_error(&e)))?;

        tracing::debug!(bytes = bytes.len(), "Parsing introspection response");
        let result: IntrospectionResult = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(error = %e, "Failed to parse introspection response");
            IntrospectionError::Decode(e.to_string())
        })?;

        tracing::info!(
            has_errors = result.errors.as_ref().is_some_and(|e| !e.is_empty()),
            has_data = result.data.as_ref().is_some_and(|d| !d.is_null()),
            "Introspection response received"
        );

        Ok(result)
    }
}

/// Accepts only absolute `http` and `https` URLs.
fn parse_endpoint(url: &str) -> Result<reqwest::Url> {
    let invalid = |reason: String| IntrospectionError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let parsed = reqwest::Url::parse(url.trim()).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {error}")
    } else if error.is_connect() {
        format!("connection failed: {error}")
    } else {
        error.to_string()
    }
}

fn truncate_body(body: &mut String) {
    if body.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
        body.push('…');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_default() {
        let client = IntrospectionClient::new();
        assert_eq!(client.timeout(), Duration::from_secs(30));
        assert_eq!(client.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_client_with_timeouts() {
        let client = IntrospectionClient::new()
            .with_timeout(Duration::from_secs(60))
            .with_connect_timeout(Duration::from_secs(2));
        assert_eq!(client.timeout(), Duration::from_secs(60));
        assert_eq!(client.connect_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_parse_endpoint() {
        assert!(parse_endpoint("https://api.example.com/graphql").is_ok());
        assert!(parse_endpoint("http://localhost:4000/graphql").is_ok());

        let err = parse_endpoint("api.example.com/graphql").unwrap_err();
        assert!(matches!(err, IntrospectionError::InvalidUrl { .. }));

        let err = parse_endpoint("ftp://example.com/graphql").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn test_truncate_body() {
        let mut short = "Bad Gateway".to_string();
        truncate_body(&mut short);
        assert_eq!(short, "Bad Gateway");

        let mut long = "é".repeat(MAX_ERROR_BODY);
        truncate_body(&mut long);
        assert!(long.len() <= MAX_ERROR_BODY + '…'.len_utf8());
        assert!(long.ends_with('…'));
    }

    #[tokio::test]
    async fn test_invalid_url_sends_nothing() {
        let err = IntrospectionClient::new()
            .introspect("not a url", QueryDetail::Full)
            .await
            .unwrap_err();
        assert!(matches!(err, IntrospectionError::InvalidUrl { .. }));
    }
}
