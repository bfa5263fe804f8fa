#![deny(elided_lifetimes_in_paths)]
#![warn(clippy::pedantic)]

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use votar::Client;

/// Vote for and unvote AUR packages.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Packages to vote for
    #[arg(short, long = "vote", value_name = "PKG")]
    vote: Vec<String>,
    /// Packages to remove the vote from
    #[arg(short, long = "unvote", value_name = "PKG")]
    unvote: Vec<String>,
    /// AUR account name
    #[arg(long, env = "AUR_USER", default_value = "")]
    user: String,
    /// AUR account password
    #[arg(long, env = "AUR_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,
    /// AUR base URL
    #[arg(long, env = "AUR_URL")]
    url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    if args.vote.is_empty() && args.unvote.is_empty() {
        tracing::info!("nothing to do");
        return Ok(());
    }

    let mut builder = Client::builder();
    if let Some(url) = args.url {
        builder = builder.base_url(url);
    }
    let mut client = builder.build().context("failed to create client")?;
    client.set_credentials(args.user, args.password);

    for pkgbase in &args.vote {
        if let Err(err) = client.vote(pkgbase).await {
            tracing::error!(pkgbase = %pkgbase, %err, "unable to vote");
        }
    }
    for pkgbase in &args.unvote {
        if let Err(err) = client.unvote(pkgbase).await {
            tracing::error!(pkgbase = %pkgbase, %err, "unable to unvote");
        }
    }

    Ok(())
}
