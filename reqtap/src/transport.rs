//! Reqwest-backed terminal stage and HTTP client construction.
//!
//! The pipeline stays transport-agnostic; this module provides the one
//! transport that ships with it, plus yaml-driven client configuration:
//!
//! ```yaml
//! http:
//!     timeout: 30
//!     connect_timeout: 10
//! ```
//!
//! Retrying is this layer's responsibility alone. The interceptors above
//! never retry; an opted-in transport repeats failed exchanges with
//! exponential backoff.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;

use crate::{HttpRequest, HttpResponse, PipelineError, Transport};

/// Parameters for configuring the HTTP client behind [`ReqwestTransport`].
#[derive(Debug)]
pub struct ClientParams<'a> {
    pub timeout: u64,
    pub connect_timeout: u64,
    pub user_agent: &'a str,
}

impl<'a> ClientParams<'a> {
    /// Creates client params from a YAML configuration.
    ///
    /// # Panics
    /// Panics if required configuration fields are missing (timeout,
    /// connect_timeout)
    pub fn from_config(
        http_config: &serde_yaml::Value,
        user_agent: &'a str,
    ) -> Self {
        let timeout = http_config["timeout"]
            .as_u64()
            .expect("No timeout field in config");
        let connect_timeout = http_config["connect_timeout"]
            .as_u64()
            .expect("No connect_timeout field in config");

        Self {
            timeout,
            connect_timeout,
            user_agent,
        }
    }
}

/// Builds an HTTP client with the specified parameters.
///
/// Creates a reqwest::Client configured with TLS, timeouts and user agent.
pub fn build_http_client(
    params: ClientParams,
) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::ClientBuilder::new()
        .use_rustls_tls()
        .timeout(Duration::from_secs(params.timeout))
        .connect_timeout(Duration::from_secs(params.connect_timeout))
        .user_agent(params.user_agent)
        .build()
}

/// Terminal pipeline stage that performs the exchange over reqwest.
pub struct ReqwestTransport {
    client: reqwest::Client,
    retry: bool,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            retry: false,
        }
    }

    pub fn from_params(params: ClientParams) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(params)?))
    }

    /// Repeat failed exchanges with exponential backoff. Only transport
    /// errors are retried; non-2xx responses are returned as-is.
    pub fn with_retry(mut self) -> Self {
        self.retry = true;
        self
    }

    async fn send_once(
        &self,
        request: HttpRequest,
    ) -> Result<HttpResponse, PipelineError> {
        let method =
            reqwest::Method::from_bytes(request.method.to_ascii_uppercase().as_bytes())
                .map_err(|e| {
                    PipelineError::InvalidRequest(format!(
                        "bad method {:?}: {e}",
                        request.method
                    ))
                })?;

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;

        let url = response.url().to_string();
        let status = response.status().as_u16();
        let protocol = format!("{:?}", response.version());
        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            headers.insert(
                name.to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            url,
            status,
            headers,
            body,
            protocol,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(
        &self,
        request: HttpRequest,
    ) -> Result<HttpResponse, PipelineError> {
        if !self.retry {
            return self.send_once(request).await;
        }

        let backoff = ExponentialBackoffBuilder::new()
            .with_max_interval(Duration::from_secs(10))
            .with_max_elapsed_time(Some(Duration::from_secs(30)))
            .build();
        backoff::future::retry(backoff, || async {
            Ok(self.send_once(request.clone()).await?)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML_CONF_TEXT: &str = r#"
    http:
      timeout: 30
      connect_timeout: 10
    "#;

    const WRONG_YAML_CONF_TEXT: &str = r#"
    http:
      connect_timeout: 10
    "#;

    #[test]
    fn test_build_client() {
        let client = build_http_client(ClientParams {
            timeout: 10,
            connect_timeout: 5,
            user_agent: "hello",
        });

        assert!(client.is_ok());
    }

    #[test]
    fn test_build_client_from_config() {
        let config: serde_yaml::Value =
            serde_yaml::from_str(YAML_CONF_TEXT).unwrap();
        let params =
            ClientParams::from_config(config.get("http").unwrap(), "hellobot");

        assert_eq!(params.timeout, 30);
        assert_eq!(params.connect_timeout, 10);
        assert!(ReqwestTransport::from_params(params).is_ok());
    }

    #[test]
    #[should_panic(expected = "No timeout field in config")]
    fn test_build_client_bad_config() {
        let config: serde_yaml::Value =
            serde_yaml::from_str(WRONG_YAML_CONF_TEXT).unwrap();
        let _ =
            ClientParams::from_config(config.get("http").unwrap(), "hellobot");
    }

    #[test]
    fn test_unknown_method_is_invalid() {
        let transport = ReqwestTransport::new(reqwest::Client::new());
        let rt = tokio::runtime::Runtime::new().unwrap();
        let res = rt.block_on(transport.send_once(HttpRequest::new(
            "NOT A METHOD",
            "http://127.0.0.1:1",
        )));
        assert!(matches!(res, Err(PipelineError::InvalidRequest(_))));
    }
}
