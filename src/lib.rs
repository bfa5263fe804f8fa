//! votar votes for packages on the [Arch User Repository](https://aur.archlinux.org) by
//! driving its web login form, the way a browser would.
//!
//! ```no_run
//! use votar::Client;
//!
//! # async fn f() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = Client::new()?;
//! client.set_credentials("user", "hunter2");
//!
//! // Logs in on first use, then reuses the session cookie
//! client.vote("votar").await?;
//! client.unvote("yay-bin").await?;
//! # Ok(())
//! # }
//! ```
//!
//! Every call returns a [`Error`] on failure and nothing is retried; when voting for a list of
//! packages, decide per package what to do with a failure.

#![deny(elided_lifetimes_in_paths)]
#![warn(clippy::pedantic, missing_docs)]
#![allow(clippy::missing_errors_doc)]

mod client;
mod error;
#[cfg(test)]
mod mock;
mod session;
mod transport;

pub use crate::client::{Action, Client, ClientBuilder, Credentials};
pub use crate::error::Error;
pub use crate::session::SessionStore;
pub use crate::transport::Transport;
