//! HTTP transport for the `datastore_search` action.
//!
//! [`DatastoreTransport`] is the seam between the provider's fetch loop and
//! the network: one call, one page. [`HttpTransport`] implements it with an
//! async reqwest client bridged to the synchronous trait by blocking on an
//! internally owned Tokio runtime.

use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use geotable_core::ProviderError;
use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::api::{SearchEnvelope, SearchParams};

/// Issue one `datastore_search` call.
///
/// Implementations are synchronous and blocking: the provider issues calls
/// strictly in sequence and fully awaits each response before building the
/// next request.
pub trait DatastoreTransport {
    /// Perform the search described by `params` and decode the envelope.
    ///
    /// # Errors
    ///
    /// A non-success HTTP status is [`ProviderError::Connection`]; a body
    /// that fails to decode is [`ProviderError::Query`]; failures before a
    /// status was received are [`ProviderError::Network`].
    fn search(&self, params: &SearchParams) -> Result<SearchEnvelope, ProviderError>;
}

impl<T: DatastoreTransport + ?Sized> DatastoreTransport for &T {
    fn search(&self, params: &SearchParams) -> Result<SearchEnvelope, ProviderError> {
        (**self).search(params)
    }
}

impl<T: DatastoreTransport + ?Sized> DatastoreTransport for Rc<T> {
    fn search(&self, params: &SearchParams) -> Result<SearchEnvelope, ProviderError> {
        (**self).search(params)
    }
}

impl<T: DatastoreTransport + ?Sized> DatastoreTransport for Arc<T> {
    fn search(&self, params: &SearchParams) -> Result<SearchEnvelope, ProviderError> {
        (**self).search(params)
    }
}

/// Error type for [`HttpTransport`] construction failures.
#[derive(Debug, Error)]
pub enum TransportBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Default user agent for datastore requests.
pub const DEFAULT_USER_AGENT: &str = "geotable-ckan/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Full URL of the `datastore_search` action, e.g.
    /// `"https://demo.ckan.org/api/3/action/datastore_search"`.
    pub endpoint: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl HttpTransportConfig {
    /// Create a configuration for the given endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// HTTP-backed [`DatastoreTransport`].
///
/// Owns a Tokio runtime that is reused across calls, avoiding the overhead
/// of creating a new runtime per request. The reqwest client's connection
/// pool keeps a remote connection alive across the sequential calls of one
/// fetch loop.
///
/// # Runtime behaviour
///
/// When called from outside any Tokio runtime, the transport uses its own
/// stored runtime. When called from within an existing multi-threaded Tokio
/// runtime (detected via [`Handle::try_current()`] and
/// [`RuntimeFlavor::MultiThread`]), it uses that runtime's handle with
/// [`tokio::task::block_in_place`] to avoid nested runtime panics. From
/// within a `current_thread` runtime it falls back to its own runtime,
/// which avoids a panic but may deadlock if the caller's runtime is driving
/// IO this request depends on.
pub struct HttpTransport {
    client: Client,
    config: HttpTransportConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpTransport {
    /// Create a transport for the given endpoint with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TransportBuildError> {
        Self::with_config(HttpTransportConfig::new(endpoint))
    }

    /// Create a transport with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpTransportConfig) -> Result<Self, TransportBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    async fn search_async(&self, params: &SearchParams) -> Result<SearchEnvelope, ProviderError> {
        let url = self.config.endpoint.as_str();
        log::debug!("datastore_search offset={} limit={}", params.offset, params.limit);

        let response = self
            .client
            .get(url)
            .query(&params.to_query())
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, url))?;

        let status = response.status();
        if !status.is_success() {
            log::error!("bad HTTP response code {status} from {url}");
            return Err(ProviderError::Connection {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        response
            .json::<SearchEnvelope>()
            .await
            .map_err(|err| ProviderError::Query {
                message: err.to_string(),
            })
    }
}

/// Convert a reqwest error to a `ProviderError`.
fn convert_reqwest_error(error: &reqwest::Error, url: &str) -> ProviderError {
    if let Some(status) = error.status() {
        return ProviderError::Connection {
            url: url.to_owned(),
            status: status.as_u16(),
        };
    }

    ProviderError::Network {
        url: url.to_owned(),
        message: error.to_string(),
    }
}

impl DatastoreTransport for HttpTransport {
    fn search(&self, params: &SearchParams) -> Result<SearchEnvelope, ProviderError> {
        // If we're already inside a Tokio runtime, check the runtime flavour.
        // block_in_place requires a multi-threaded runtime; for current_thread
        // runtimes we fall back to our own stored runtime.
        let future = self.search_async(params);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            // No runtime detected, or current_thread runtime: use our own runtime.
            _ => self.runtime.block_on(future),
        }
    }
}
