use crate::Error;
use futures::future::BoxFuture;
use reqwest::redirect::Policy;
use reqwest::{Request, Response};
use std::time::Duration;

/// Sends a prepared request and returns the first response.
///
/// [`reqwest::Client`] implements this trait. Supply your own implementation through
/// [`ClientBuilder::transport`][`crate::ClientBuilder::transport`] to route requests elsewhere,
/// for instance in tests. Implementations must not follow redirects: the status and
/// `Set-Cookie` headers of the first response decide the outcome of every call.
pub trait Transport: Send + Sync {
    /// Executes `request`.
    fn execute(&self, request: Request) -> BoxFuture<'_, Result<Response, reqwest::Error>>;
}

impl Transport for reqwest::Client {
    fn execute(&self, request: Request) -> BoxFuture<'_, Result<Response, reqwest::Error>> {
        Box::pin(reqwest::Client::execute(self, request))
    }
}

/// The transport used when none is configured: redirects disabled, cookies left to the
/// [`SessionStore`][`crate::SessionStore`].
pub(crate) fn default_transport(timeout: Option<Duration>) -> Result<reqwest::Client, Error> {
    let mut builder = reqwest::Client::builder().redirect(Policy::none());
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}
