use crate::transport::default_transport;
use crate::{Error, SessionStore, Transport};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Method, Request, Response, StatusCode};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://aur.archlinux.org";
const DEFAULT_USER_AGENT: &str = concat!("votar/", env!("CARGO_PKG_VERSION"));

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Username and password used to log in.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Returns true if both the username and the password are set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Direction of a vote request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Add a vote.
    Vote,
    /// Remove a vote.
    Unvote,
}

impl Action {
    fn path(self) -> &'static str {
        match self {
            Action::Vote => "vote",
            Action::Unvote => "unvote",
        }
    }

    fn form(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Action::Vote => &[("do_Vote", "Vote+for+this+package")],
            Action::Unvote => &[("do_UnVote", "Remove+vote")],
        }
    }
}

/// Configures and creates a [`Client`].
///
/// Every option falls back to a default when left unset: the `https://aur.archlinux.org` base
/// URL, a `votar/<version>` user agent, and a [`reqwest::Client`] that does not follow
/// redirects.
#[derive(Default)]
#[must_use]
pub struct ClientBuilder {
    transport: Option<Box<dyn Transport>>,
    base_url: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Sends requests through `transport` instead of the default HTTP client.
    pub fn transport(mut self, transport: impl Transport + 'static) -> ClientBuilder {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Talks to `base_url` instead of `https://aur.archlinux.org`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> ClientBuilder {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sends `user_agent` as the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> ClientBuilder {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets a total timeout for each request made by the default transport.
    pub fn timeout(mut self, timeout: Duration) -> ClientBuilder {
        self.timeout = Some(timeout);
        self
    }

    /// Creates the [`Client`], failing if the base URL or user agent are invalid.
    pub fn build(self) -> Result<Client, Error> {
        let mut base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        while base_url.ends_with('/') {
            base_url.pop();
        }
        let url = Url::parse(&base_url)?;
        if url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }
        let origin = HeaderValue::from_str(&base_url)?;
        let user_agent = HeaderValue::from_str(
            self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT),
        )?;

        let transport: Box<dyn Transport> = match self.transport {
            Some(transport) => {
                if self.timeout.is_some() {
                    tracing::warn!("timeout is ignored when a custom transport is set");
                }
                transport
            }
            None => Box::new(default_transport(self.timeout)?),
        };

        Ok(Client {
            base_url,
            origin,
            user_agent,
            credentials: Credentials::default(),
            session: SessionStore::new(url),
            transport,
        })
    }
}

/// AUR web client.
///
/// A `Client` holds one login session. It logs in lazily: the first [`Client::vote`] or
/// [`Client::unvote`] made while the [`SessionStore`] is empty posts the login form first, and
/// later calls reuse the cookies it received. To vote from several tasks at once, give each
/// task its own `Client`.
pub struct Client {
    base_url: String,
    origin: HeaderValue,
    user_agent: HeaderValue,
    credentials: Credentials,
    pub(crate) session: SessionStore,
    transport: Box<dyn Transport>,
}

impl Client {
    /// Creates a `Client` with every option at its default.
    pub fn new() -> Result<Client, Error> {
        Client::builder().build()
    }

    /// Returns a [`ClientBuilder`] to configure a `Client`.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// The base URL requests are made against, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The `User-Agent` header sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &HeaderValue {
        &self.user_agent
    }

    /// The credentials used for the next login.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The cookies of the current session.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Sets the username and password used to log in.
    ///
    /// Nothing is checked here; missing credentials are reported by the first vote that needs
    /// to log in.
    pub fn set_credentials(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.credentials = Credentials {
            username: username.into(),
            password: password.into(),
        };
    }

    /// Votes for `pkgbase`.
    #[tracing::instrument(skip(self))]
    pub async fn vote(&mut self, pkgbase: &str) -> Result<(), Error> {
        self.submit(pkgbase, Action::Vote).await
    }

    /// Removes the vote for `pkgbase`.
    #[tracing::instrument(skip(self))]
    pub async fn unvote(&mut self, pkgbase: &str) -> Result<(), Error> {
        self.submit(pkgbase, Action::Unvote).await
    }

    /// Sends a vote or unvote for `pkgbase`, logging in first if there is no session yet.
    ///
    /// Only `303 See Other` counts as success.
    #[tracing::instrument(skip(self))]
    pub async fn submit(&mut self, pkgbase: &str, action: Action) -> Result<(), Error> {
        if self.session.is_empty() {
            self.login().await?;
        }

        let package_url = self.endpoint(&["pkgbase", pkgbase]);
        let mut action_url = package_url.clone();
        if let Ok(mut path) = action_url.path_segments_mut() {
            path.push(action.path());
        }
        let request = self.form_request(action_url, &package_url, action.form())?;
        let response = self.send(request).await?;

        let status = response.status();
        if status != StatusCode::SEE_OTHER {
            let body = response.text().await?;
            tracing::warn!(%status, pkgbase, "vote rejected");
            return Err(Error::VoteFailed {
                status,
                cookies: self.session.describe(),
                body,
            });
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(username = %self.credentials.username))]
    pub(crate) async fn login(&mut self) -> Result<(), Error> {
        if !self.credentials.is_complete() {
            return Err(Error::MissingCredentials);
        }

        let login_url = self.endpoint(&["login"]);
        let request = self.form_request(
            login_url.clone(),
            &login_url,
            &LoginForm {
                user: &self.credentials.username,
                passwd: &self.credentials.password,
                referer: &self.base_url,
                remember_me: "on",
                next: "packages",
            },
        )?;
        let response = self.send(request).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        if status.is_client_error() || status.is_server_error() {
            tracing::warn!(%status, "login rejected");
            return Err(Error::LoginFailed { status, body });
        }

        self.session.store_response(&headers);
        tracing::info!(cookies = self.session.cookies().len(), "logged in");
        Ok(())
    }

    /// The base URL with `segments` appended, each one percent-encoded as a single segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.session.url().clone();
        // base URLs that cannot be a base are rejected by `ClientBuilder::build`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Builds a form POST carrying the fixed browser-like header set and the session cookies.
    fn form_request<T>(&self, url: Url, referer: &Url, form: &T) -> Result<Request, Error>
    where
        T: Serialize + ?Sized,
    {
        let mut request = Request::new(Method::POST, url);

        let headers: &mut HeaderMap = request.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(FORM_CONTENT_TYPE),
        );
        headers.insert(header::REFERER, HeaderValue::from_str(referer.as_str())?);
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert(header::ORIGIN, self.origin.clone());
        headers.insert(
            header::UPGRADE_INSECURE_REQUESTS,
            HeaderValue::from_static("1"),
        );
        headers.insert(header::USER_AGENT, self.user_agent.clone());
        if let Some(cookie) = self.session.header() {
            headers.insert(header::COOKIE, cookie);
        }

        *request.body_mut() = Some(serde_urlencoded::to_string(form)?.into());
        Ok(request)
    }

    async fn send(&self, request: Request) -> Result<Response, Error> {
        tracing::info!(method = %request.method(), url = %request.url(), "Client::send");
        let response = self.transport.execute(request).await?;
        tracing::debug!(status = %response.status());
        Ok(response)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("credentials", &self.credentials)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct LoginForm<'a> {
    user: &'a str,
    passwd: &'a str,
    referer: &'a str,
    remember_me: &'a str,
    next: &'a str,
}
