//! Provider Invoker.
//!
//! Every adapter reaches its provider through the same single round trip:
//! resolve the credential, POST the JSON payload, classify the outcome.
//!
//! The wire is behind the `Transport` trait so the rest of the crate only
//! ever sees a decoded JSON body or a `TransportError`:
//! - `HttpTransport` is the real implementation on top of reqwest
//! - tests plug in a recording fake and count calls
//!
//! One attempt per call: no retry, no timeout override, no rate limiting.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{AppConfig, Credential};
use crate::error::{ToolError, TransportError, UNKNOWN_ERROR};

/// Request payload: exactly the keys the provider should see.
pub type Payload = Map<String, Value>;

/// One authenticated JSON POST.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        credential: &Credential,
        payload: &Payload,
    ) -> Result<Value, TransportError>;

    /// Name for logging.
    fn name(&self) -> &str;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Use a preconfigured client (proxy, TLS roots, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        credential: &Credential,
        payload: &Payload,
    ) -> Result<Value, TransportError> {
        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Key {}", credential.expose()))
            .header(CONTENT_TYPE, "application/json")
            .header(CACHE_CONTROL, "no-store")
            .json(payload)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| UNKNOWN_ERROR.to_string());
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::MalformedBody {
                status: status.as_u16(),
                reason: e.to_string(),
            })?;

        serde_json::from_slice(&body).map_err(|e| TransportError::MalformedBody {
            status: status.as_u16(),
            reason: e.to_string(),
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Shared context handed to every adapter invocation.
///
/// Holds immutable configuration and the transport; cloning is cheap and
/// concurrent invocations share nothing mutable.
#[derive(Clone)]
pub struct ProviderInvoker {
    config: Arc<AppConfig>,
    transport: Arc<dyn Transport>,
}

impl ProviderInvoker {
    pub fn new(config: AppConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    /// Invoker over real HTTP.
    pub fn http(config: AppConfig) -> Self {
        Self::new(config, Arc::new(HttpTransport::new()))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// POST `payload` to the provider `route` (e.g. `fal-ai/fast-svd-lcm`).
    ///
    /// The credential is resolved first; when it is missing no request is
    /// attempted.
    pub async fn call(&self, route: &str, payload: &Payload) -> Result<Value, ToolError> {
        let credential = self.config.credential()?;
        let url = self.config.endpoint(route);
        debug!(
            url = %url,
            transport = self.transport.name(),
            fields = payload.len(),
            "sending provider request"
        );
        let body = self.transport.post_json(&url, &credential, payload).await?;
        Ok(body)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording transport for adapter tests.

    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    pub struct RecordedCall {
        pub url: String,
        pub credential: String,
        pub payload: Payload,
    }

    pub struct RecordingTransport {
        reply: Result<Value, TransportError>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl RecordingTransport {
        pub fn replying(body: Value) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(body),
                calls: Mutex::new(Vec::new()),
            })
        }

        pub fn failing(error: TransportError) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(error),
                calls: Mutex::new(Vec::new()),
            })
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn post_json(
            &self,
            url: &str,
            credential: &Credential,
            payload: &Payload,
        ) -> Result<Value, TransportError> {
            self.calls.lock().unwrap().push(RecordedCall {
                url: url.to_string(),
                credential: credential.expose().to_string(),
                payload: payload.clone(),
            });
            self.reply.clone()
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    pub fn keyed_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.provider.api_key = Some("test-key".to_string());
        config
    }

    pub fn keyless_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.provider.api_key = None;
        config.provider.api_key_env = "GENMEDIA_TEST_NO_SUCH_KEY".to_string();
        config
    }

    pub fn invoker_with(config: AppConfig, transport: &Arc<RecordingTransport>) -> ProviderInvoker {
        ProviderInvoker::new(config, transport.clone())
    }
}
