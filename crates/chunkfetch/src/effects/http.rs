use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

use crate::data::ResponseHead;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Head and streaming body of a GET response.
pub struct StreamResponse<E> {
    pub head: ResponseHead,
    pub body: BoxStream<'static, Result<Bytes, E>>,
}

/// Asynchronous HTTP client abstraction.
///
/// This trait provides the minimal interface the downloader needs: a
/// metadata-only probe and a streaming GET with caller-supplied headers.
/// Implementations handle their own redirect following, timeout
/// configuration and TLS.
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - Mock implementations for testing
pub trait HttpClient: Send + Sync {
    /// Error type for transport failures.
    type Error: std::error::Error + Send + 'static;

    /// Send a HEAD request and return status and headers.
    ///
    /// A non-success status is not an error at this level; only failures
    /// to get any response at all are.
    fn head(&self, url: &str) -> impl Future<Output = Result<ResponseHead, Self::Error>> + Send;

    /// Send a GET request with `headers` and stream the response body.
    fn stream(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> impl Future<Output = Result<StreamResponse<Self::Error>, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use std::time::Duration;

    use futures_util::StreamExt;
    use reqwest::{Client, Proxy, Url};

    use super::*;
    use crate::error::{Error, Result};

    /// Settings for the production client.
    #[derive(Debug, Clone, Default)]
    pub struct ClientSettings {
        /// Proxies, routed by their own scheme: `https://` proxies handle
        /// https traffic, everything else handles http traffic.
        pub proxies:         Vec<Url>,
        pub connect_timeout: Option<Duration>,
        pub user_agent:      Option<String>,
    }

    impl ClientSettings {
        pub fn build(self) -> Result<Client> {
            let (secure, insecure): (Vec<Url>, Vec<Url>) =
                self.proxies.into_iter().partition(|u| u.scheme() == "https");

            let mut cb = Client::builder();

            for u in secure {
                cb = cb.proxy(Proxy::https(u).map_err(network)?);
            }

            for u in insecure {
                cb = cb.proxy(Proxy::http(u).map_err(network)?);
            }

            if let Some(timeout) = self.connect_timeout {
                cb = cb.connect_timeout(timeout);
            }

            if let Some(agent) = self.user_agent {
                cb = cb.user_agent(agent);
            }

            cb.build().map_err(network)
        }
    }

    fn network(e: reqwest::Error) -> Error { Error::Network(e.to_string()) }

    /// Production HTTP client implementation using reqwest.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        client: Client,
    }

    impl ReqwestClient {
        /// Create a new ReqwestClient with default configuration.
        pub fn new() -> Result<Self> { Self::with_settings(ClientSettings::default()) }

        pub fn with_settings(settings: ClientSettings) -> Result<Self> {
            Ok(Self {
                client: settings.build()?,
            })
        }
    }

    fn response_head(response: &reqwest::Response) -> ResponseHead {
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();

        ResponseHead {
            status: response.status().as_u16(),
            headers,
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn head(&self, url: &str) -> std::result::Result<ResponseHead, Self::Error> {
            let response = self.client.head(url).send().await?;
            Ok(response_head(&response))
        }

        async fn stream(
            &self,
            url: &str,
            headers: &[(String, String)],
        ) -> std::result::Result<StreamResponse<Self::Error>, Self::Error> {
            let mut request = self.client.get(url);

            for (key, value) in headers {
                request = request.header(key, value);
            }

            let response = request.send().await?;
            let head = response_head(&response);
            let body = response.bytes_stream().boxed();

            Ok(StreamResponse { head, body })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::{ClientSettings, ReqwestClient};
