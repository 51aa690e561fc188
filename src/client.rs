//! http client
//!
//! posts graphql documents as json and doubles as the default
//! [`Transport`] for the introspection gateway.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::gateway::Transport;
use crate::graphql::GraphQlResponse;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use url::Url;

/// graphql client over http post
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    http: reqwest::Client,
}

impl Client {
    /// create a new client
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = match &config.http_client {
            Some(http) => http.clone(),
            None => build_http_client(&config)?,
        };

        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    /// access the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// execute a raw graphql document
    pub async fn execute_raw(
        &self,
        query: &str,
        variables: Option<Value>,
    ) -> Result<GraphQlResponse<Value>> {
        self.execute_with(query, variables, |url, body| self.post(url, body))
            .await
    }

    /// execute a graphql document and deserialize `data` into `T`
    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<Value>,
    ) -> Result<GraphQlResponse<T>> {
        self.execute_with(query, variables, |url, body| self.post(url, body))
            .await
    }

    async fn post(&self, url: Url, body: Value) -> Result<(StatusCode, String)> {
        let response = self.http.post(url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        Ok((status, text))
    }

    pub(crate) async fn execute_with<T: DeserializeOwned, F, Fut>(
        &self,
        query: &str,
        variables: Option<Value>,
        send: F,
    ) -> Result<GraphQlResponse<T>>
    where
        F: FnOnce(Url, Value) -> Fut,
        Fut: Future<Output = Result<(StatusCode, String)>>,
    {
        let body = serde_json::json!({
            "query": query,
            "variables": variables.unwrap_or_else(|| serde_json::json!({})),
        });

        let (status, text) = send(self.config.endpoint.clone(), body).await?;
        parse_graphql_response(status, text)
    }
}

#[async_trait]
impl Transport for Client {
    async fn execute(&self, document: &str, variables: Value) -> Result<Value> {
        let response = self.execute_raw(document, Some(variables)).await?;
        Ok(response.into_data())
    }
}

fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    if let Some(token) = &config.token {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|err| Error::Config(format!("invalid bearer token header value: {err}")))?,
        );
    }
    headers.extend(config.extra_headers.clone());

    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout)
        .danger_accept_invalid_certs(!config.verify_ssl);

    if let Some(customize) = &config.http_client_builder {
        builder = customize(builder);
    }

    Ok(builder.build()?)
}

fn parse_graphql_response<T: DeserializeOwned>(
    status: StatusCode,
    text: String,
) -> Result<GraphQlResponse<T>> {
    if !status.is_success() {
        let errors = serde_json::from_str::<GraphQlResponse<Value>>(&text)
            .map(|parsed| parsed.errors)
            .unwrap_or_default();
        return Err(Error::transport(Some(status.as_u16()), errors, text));
    }

    let parsed: GraphQlResponse<T> = serde_json::from_str(&text)?;
    if parsed.has_errors() {
        tracing::warn!(
            status = status.as_u16(),
            errors = parsed.errors.len(),
            "graphql errors in response"
        );
        return Err(Error::transport(Some(status.as_u16()), parsed.errors, text));
    }

    Ok(parsed)
}
