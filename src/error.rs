use reqwest::StatusCode;

/// Errors that might occur when using the library.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Attempted to log in without both a username and a password.
    #[error("no credentials provided")]
    MissingCredentials,

    /// The login form was rejected with a client or server error status.
    #[error("login failed with status {status}, body: {body}")]
    LoginFailed {
        /// Status code of the login response.
        status: StatusCode,
        /// Body of the login response.
        body: String,
    },

    /// A vote or unvote was not answered with `303 See Other`.
    #[error("vote failed with status {status}, cookies: {cookies}, body: {body}")]
    VoteFailed {
        /// Status code of the vote response.
        status: StatusCode,
        /// Cookies held by the session when the request was sent.
        cookies: String,
        /// Body of the vote response.
        body: String,
    },

    /// The base URL, or a URL derived from it, is not a valid absolute URL.
    #[error("invalid URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// A configured value cannot be sent as an HTTP header.
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// An error while encoding a form body.
    #[error("form encode error: {0}")]
    Form(#[from] serde_urlencoded::ser::Error),

    /// An HTTP transport error (timeouts, connection failures, and the like).
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
}
