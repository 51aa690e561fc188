//! configuration
//!
//! [`ClientConfig`] configures the http transport; pass it to
//! [`crate::Client::new`]. [`RegistryOptions`] controls how field registries
//! are derived from introspection metadata.

use crate::error::{Error, Result};
use crate::field::FieldType;
use crate::registry::ScalarMap;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// configuration for the http client
#[derive(Clone)]
pub struct ClientConfig {
    /// original endpoint input
    pub(crate) raw_endpoint: String,

    /// graphql endpoint (e.g., "<https://api.example.com/graphql>")
    pub(crate) endpoint: Url,

    /// parse failure of the provided endpoint, reported by `validate`
    pub(crate) endpoint_error: Option<url::ParseError>,

    /// bearer token sent as `Authorization`
    pub(crate) token: Option<String>,

    pub(crate) timeout: Duration,

    pub(crate) user_agent: String,

    pub(crate) verify_ssl: bool,

    /// additional headers to send with every request
    pub(crate) extra_headers: HeaderMap,

    /// prebuilt http client (takes precedence over http_client_builder)
    pub(crate) http_client: Option<reqwest::Client>,

    /// callback to customize the http client builder before building
    pub(crate) http_client_builder:
        Option<Arc<dyn Fn(reqwest::ClientBuilder) -> reqwest::ClientBuilder + Send + Sync>>,
}

impl ClientConfig {
    /// create a new client configuration
    ///
    /// # arguments
    ///
    /// * `endpoint` - full url of the graphql endpoint; a missing scheme defaults to https
    ///
    /// # example
    ///
    /// ```
    /// use graphrow::ClientConfig;
    ///
    /// let config = ClientConfig::new("https://api.example.com/graphql")
    ///     .with_bearer_token("your-token-here");
    /// ```
    pub fn new(endpoint: impl AsRef<str>) -> Self {
        let raw = endpoint.as_ref();

        let (endpoint, endpoint_error) =
            match Url::parse(raw).or_else(|_| Url::parse(&format!("https://{}", raw))) {
                Ok(url) => (url, None),
                Err(err) => (
                    Url::parse("https://invalid.invalid").expect("static url"),
                    Some(err),
                ),
            };

        Self {
            raw_endpoint: raw.to_string(),
            endpoint,
            endpoint_error,
            token: None,
            timeout: Duration::from_secs(30),
            user_agent: format!("graphrow/{} (Rust)", env!("CARGO_PKG_VERSION")),
            verify_ssl: true,
            extra_headers: HeaderMap::new(),
            http_client: None,
            http_client_builder: None,
        }
    }

    /// send `Authorization: Bearer <token>` with every request
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// set the request timeout
    ///
    /// default: 30 seconds
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// disable ssl certificate verification (not recommended for production)
    ///
    /// default: enabled
    pub fn with_ssl_verification(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// add a header to every request
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.extra_headers.insert(name, value);
        self
    }

    /// add a set of headers to every request
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.extra_headers.extend(headers);
        self
    }

    /// graphql endpoint this config points at
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// inject a prebuilt http client.
    ///
    /// when set, the client is used as-is: token, headers, timeout, ssl
    /// verification and user agent from this config are ignored.
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// customize the http client builder before the client is created.
    ///
    /// the callback receives a builder with auth, extra headers, user agent,
    /// timeout, and ssl settings already applied. ignored if
    /// `with_http_client` is also set.
    pub fn with_http_client_builder<F>(mut self, f: F) -> Self
    where
        F: Fn(reqwest::ClientBuilder) -> reqwest::ClientBuilder + Send + Sync + 'static,
    {
        self.http_client_builder = Some(Arc::new(f));
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(err) = self.endpoint_error {
            tracing::debug!(endpoint = %self.raw_endpoint, "endpoint did not parse");
            return Err(Error::Url(err));
        }

        if self.endpoint.scheme() != "http" && self.endpoint.scheme() != "https" {
            return Err(Error::Config(format!(
                "invalid url scheme: {}. must be http or https",
                self.endpoint.scheme()
            )));
        }

        if matches!(&self.token, Some(token) if token.is_empty()) {
            return Err(Error::Config("bearer token cannot be empty".to_string()));
        }

        Ok(())
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("verify_ssl", &self.verify_ssl)
            .field("extra_headers", &self.extra_headers.len())
            .field("http_client", &self.http_client.is_some())
            .field("http_client_builder", &self.http_client_builder.is_some())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// options for deriving a field registry
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    /// how many nested object levels to descend into
    pub(crate) max_depth: usize,
    pub(crate) scalars: ScalarMap,
    /// label overrides keyed by resulting field key
    pub(crate) labels: BTreeMap<String, String>,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            max_depth: 1,
            scalars: ScalarMap::default(),
            labels: BTreeMap::new(),
        }
    }
}

impl RegistryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// default: 1
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// map a scalar name to a field type, replacing any default mapping
    pub fn with_scalar(mut self, scalar: impl Into<String>, field_type: FieldType) -> Self {
        self.scalars.insert(scalar, field_type);
        self
    }

    /// merge several scalar mappings
    pub fn with_scalars<I, S>(mut self, scalars: I) -> Self
    where
        I: IntoIterator<Item = (S, FieldType)>,
        S: Into<String>,
    {
        for (name, field_type) in scalars {
            self.scalars.insert(name, field_type);
        }
        self
    }

    /// override the label of the field with this key
    pub fn with_label(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(key.into(), label.into());
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn scalars(&self) -> &ScalarMap {
        &self.scalars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config() {
        let config = ClientConfig::new("https://api.example.com/graphql");
        assert_eq!(config.endpoint().as_str(), "https://api.example.com/graphql");
        assert_eq!(config.token, None);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_scheme_defaults_to_https() {
        let config = ClientConfig::new("api.example.com/graphql");
        assert_eq!(config.endpoint().scheme(), "https");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_url() {
        let config = ClientConfig::new("");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Url(url::ParseError::EmptyHost)));
        assert!(err.to_string().starts_with("url error:"));
    }

    #[test]
    fn test_validation_invalid_scheme() {
        let config = ClientConfig::new("ftp://example.com/graphql");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validation_empty_token() {
        let config = ClientConfig::new("https://api.example.com/graphql").with_bearer_token("");
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_helpers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-test"),
            HeaderValue::from_static("value"),
        );

        let config = ClientConfig::new("https://api.example.com/graphql")
            .with_bearer_token("token")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("graphrow-test")
            .with_ssl_verification(false)
            .with_headers(headers)
            .with_header(
                HeaderName::from_static("x-other"),
                HeaderValue::from_static("other"),
            )
            .with_http_client_builder(|b| b.connection_verbose(true));

        assert_eq!(config.token.as_deref(), Some("token"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "graphrow-test");
        assert!(!config.verify_ssl);
        assert_eq!(config.extra_headers.get("x-test").unwrap(), "value");
        assert_eq!(config.extra_headers.get("x-other").unwrap(), "other");
        assert!(config.http_client_builder.is_some());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config =
            ClientConfig::new("https://api.example.com/graphql").with_bearer_token("secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("http_client: false"));
    }

    #[test]
    fn test_registry_options() {
        let options = RegistryOptions::new()
            .with_max_depth(2)
            .with_scalar("Decimal", FieldType::Number)
            .with_scalars([("ID", FieldType::Number)])
            .with_label("orderNumber", "Order #");

        assert_eq!(options.max_depth(), 2);
        assert_eq!(options.scalars().get("Decimal"), Some(FieldType::Number));
        assert_eq!(options.scalars().get("ID"), Some(FieldType::Number));
        assert_eq!(options.scalars().get("String"), Some(FieldType::String));
        assert_eq!(options.labels.get("orderNumber").map(String::as_str), Some("Order #"));
        assert_eq!(RegistryOptions::default().max_depth(), 1);
    }
}
