//! Client struct, builder, and the [`Gateway`] implementation.

use std::future::Future;
use std::time::Duration;

use courier_types::wire::{Action, Event, Link, Pack, RootLinks};
use courier_types::{ClientError, Gateway, find_by_rel};
use reqwest::StatusCode;

use crate::error::map_transport_error;

/// Default server base URL.
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default API version segment appended to the base URL.
const DEFAULT_VERSION: &str = "v1";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Relation of the root link used to register packs.
const LIST_PACKS_REL: &str = "pack/listPacks";

/// HTTP gateway to an orchestration server.
///
/// Implements [`Gateway`] for use anywhere the pack runtime accepts one.
/// Holds the discovery state written during registration: the root links
/// (fetched lazily, at most once) and the take-action and event URLs taken
/// from the registered pack's echo. Each registration replaces the URLs.
///
/// # Example
///
/// ```no_run
/// use courier_client::Client;
///
/// let client = Client::builder("http://orchestrator.example.com:8080")
///     .timeout(std::time::Duration::from_secs(10))
///     .build()
///     .expect("client");
/// ```
pub struct Client {
    /// Versioned API root, e.g. `http://localhost:8080/v1`.
    pub(crate) api_url: String,
    /// Shared HTTP client, configured with timeout and TLS options.
    pub(crate) http: reqwest::Client,
    /// Root links, fetched lazily and cached for the client's lifetime.
    pub(crate) links: Option<Vec<Link>>,
    /// Take-action URL from the latest registration.
    pub(crate) take_action_url: Option<String>,
    /// Event-posting URL from the latest registration.
    pub(crate) events_url: Option<String>,
}

/// Builder for [`Client`].
///
/// Created via [`Client::builder`].
pub struct ClientBuilder {
    base_url: String,
    version: String,
    timeout: Duration,
    danger_accept_invalid_certs: bool,
}

impl ClientBuilder {
    /// Override the API version segment (default `v1`).
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Override the request timeout (default 5 seconds).
    ///
    /// Applies to every request: discovery, registration, polling, posting.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disable TLS certificate verification.
    ///
    /// Only for talking to a server with a self-signed certificate in a
    /// trusted network.
    #[must_use]
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.danger_accept_invalid_certs = accept;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying HTTP client cannot be
    /// constructed (e.g. the TLS backend fails to initialize).
    pub fn build(self) -> Result<Client, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(self.danger_accept_invalid_certs)
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;

        Ok(Client {
            api_url: format!("{}/{}", self.base_url.trim_end_matches('/'), self.version),
            http,
            links: None,
            take_action_url: None,
            events_url: None,
        })
    }
}

impl Client {
    /// Start building a client for the server at `base_url`.
    ///
    /// Defaults: version `v1`, 5 second timeout, TLS verification on.
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            base_url: base_url.into(),
            version: DEFAULT_VERSION.into(),
            timeout: DEFAULT_TIMEOUT,
            danger_accept_invalid_certs: false,
        }
    }

    /// Build a client for a server on localhost with all defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the HTTP client cannot be constructed.
    pub fn local() -> Result<Self, ClientError> {
        Self::builder(DEFAULT_BASE_URL).build()
    }

    /// GET the server's versioned root and parse its discovery links.
    async fn discover_root_links(&self) -> Result<Vec<Link>, ClientError> {
        tracing::debug!(url = %self.api_url, "fetching api links");
        let (body, status) = self.fetch(&self.api_url).await?;
        if status.as_u16() >= 400 {
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }
        let root: RootLinks =
            serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(root.links)
    }

    /// GET a URL, returning the body and status. Transport faults are tagged
    /// with the URL.
    async fn fetch(&self, url: &str) -> Result<(String, StatusCode), ClientError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| map_transport_error(url, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_transport_error(url, e))?;
        Ok((body, status))
    }

    /// POST a JSON body to a URL, returning the response body and status.
    async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        json: &T,
    ) -> Result<(String, StatusCode), ClientError> {
        let response = self
            .http
            .post(url)
            .json(json)
            .send()
            .await
            .map_err(|e| map_transport_error(url, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_transport_error(url, e))?;
        Ok((body, status))
    }

    /// POST with an empty body to a URL, returning the response body and
    /// status.
    async fn post_empty(&self, url: &str) -> Result<(String, StatusCode), ClientError> {
        let response = self
            .http
            .post(url)
            .send()
            .await
            .map_err(|e| map_transport_error(url, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_transport_error(url, e))?;
        Ok((body, status))
    }
}

impl Gateway for Client {
    /// Register the pack with the server.
    ///
    /// Resolves the `pack/listPacks` relation from the root links (fetched
    /// lazily and cached), POSTs the pack, and caches the take-action and
    /// event URLs from the registered echo. A missing relation in the echo
    /// fails the registration here rather than on the first poll.
    fn register_pack(
        &mut self,
        pack: &Pack,
    ) -> impl Future<Output = Result<Pack, ClientError>> + Send {
        async move {
            if self.links.is_none() {
                let links = self.discover_root_links().await?;
                self.links = Some(links);
            }
            let packs_url = {
                let links = self.links.as_deref().unwrap_or_default();
                find_by_rel(links, LIST_PACKS_REL)?.to_string()
            };

            tracing::debug!(url = %packs_url, pack = %pack.name, "registering pack");
            let (body, status) = self.post_json(&packs_url, pack).await?;
            if status.as_u16() >= 400 {
                return Err(ClientError::Server {
                    status: status.as_u16(),
                    body,
                });
            }
            let registered: Pack =
                serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))?;

            self.take_action_url = Some(registered.take_action_url()?.to_string());
            self.events_url = Some(registered.events_url()?.to_string());

            Ok(registered)
        }
    }

    /// Post an event to the cached events URL.
    ///
    /// The server signals acceptance with 202; any other success status is a
    /// rejection.
    fn post_event(&self, event: &Event) -> impl Future<Output = Result<(), ClientError>> + Send {
        async move {
            let url = self.events_url.as_deref().ok_or(ClientError::NotRegistered)?;

            tracing::debug!(url = %url, event = %event.event, "posting event");
            let (body, status) = self.post_json(url, event).await?;
            if status.as_u16() >= 400 {
                return Err(ClientError::Server {
                    status: status.as_u16(),
                    body,
                });
            }
            if status.as_u16() != 202 {
                return Err(ClientError::EventNotAccepted {
                    event: event.event.clone(),
                    status: status.as_u16(),
                });
            }
            Ok(())
        }
    }

    /// Poll the cached take-action URL for the next unit of work.
    ///
    /// 204 and 404 mean no work. Statuses >= 400 are server errors. Anything
    /// else unrecognized is swallowed as "no action" so polling never crashes
    /// the loop over a status code it does not know.
    fn take_action(&self) -> impl Future<Output = Result<Option<Action>, ClientError>> + Send {
        async move {
            let url = self
                .take_action_url
                .as_deref()
                .ok_or(ClientError::NotRegistered)?;

            let (body, status) = self.post_empty(url).await?;
            match status.as_u16() {
                204 => {
                    tracing::info!("no actions available yet");
                    Ok(None)
                }
                200 => {
                    let action: Action = serde_json::from_str(&body)
                        .map_err(|e| ClientError::Decode(e.to_string()))?;
                    Ok(Some(action))
                }
                404 => {
                    tracing::error!(url = %url, "resource not found");
                    Ok(None)
                }
                s if s >= 400 => Err(ClientError::Server { status: s, body }),
                s => {
                    tracing::debug!(status = s, "unrecognized take-action status, no action");
                    Ok(None)
                }
            }
        }
    }

    /// Report an action's result to the action's own completion URL.
    fn complete_action(
        &self,
        action: &Action,
        event: &Event,
    ) -> impl Future<Output = Result<(), ClientError>> + Send {
        async move {
            let url = action.action_result_url()?;

            tracing::debug!(url = %url, command = %action.command, "completing action");
            let (body, status) = self.post_json(url, event).await?;
            if status.as_u16() >= 400 {
                return Err(ClientError::Server {
                    status: status.as_u16(),
                    body,
                });
            }
            Ok(())
        }
    }
}
