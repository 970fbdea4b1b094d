//! Authentication and session lifecycle
//!
//! Two login strategies exist behind one surface: OTP (email + one-time
//! code) and direct name login. Which one a deployment uses is config,
//! not a fork. The session token is persisted in the config file and
//! attached to every call; it is cleared on logout and on any failure
//! while restoring a session.

use anyhow::{bail, Context, Result};
use std::io::Write;

use crate::api::DeskClient;
use crate::config::{AuthStrategy, Config};
use crate::state::Snapshot;

/// Authenticate against the server and persist the token.
pub async fn login(email: Option<String>, name: Option<String>) -> Result<()> {
    let mut config = Config::load()?;
    let client = DeskClient::new(&config)?;

    let auth = match config.auth {
        AuthStrategy::Otp => {
            let email = match email.as_deref().map(str::trim) {
                Some(e) if !e.is_empty() => e.to_string(),
                _ => bail!("Email is required (--email) for OTP login"),
            };
            client.request_otp(&email).await?;
            println!("OTP requested. Check your email or the server log.");
            let code = prompt("Enter code: ")?;
            if code.is_empty() {
                bail!("Code is required");
            }
            client.verify_otp(&email, &code).await?
        }
        AuthStrategy::Name => {
            let name = match name.as_deref().map(str::trim) {
                Some(n) if !n.is_empty() => n.to_string(),
                _ => bail!("Name is required (--name) for direct login"),
            };
            client.login_name(&name).await?
        }
    };

    config.set_token(auth.token);
    config.save()?;
    tracing::info!("Logged in as {}", auth.user.identity());
    println!("Logged in as {} ({})", auth.user.identity(), auth.user.role());
    Ok(())
}

/// Invalidate the session server-side (best effort) and drop the token.
pub async fn logout() -> Result<()> {
    let mut config = Config::load()?;

    if config.token.is_some() {
        let client = DeskClient::new(&config)?;
        if let Err(e) = client.logout().await {
            tracing::debug!("Server-side logout failed (ignored): {}", e);
        }
    }

    config.clear_token();
    config.save()?;
    println!("Logged out");
    Ok(())
}

/// Show whether a stored session is still valid.
pub async fn status() -> Result<()> {
    match restore().await {
        Ok((_, _, snapshot)) => {
            println!("Logged in: {} | {}", snapshot.me.identity(), snapshot.me.role());
            Ok(())
        }
        Err(e) => {
            println!("Not logged in ({:#})", e);
            Ok(())
        }
    }
}

/// Restore the stored session and fetch a fresh snapshot.
///
/// Any failure here clears the stored token: a stale token must not leave
/// the user stuck in a broken authenticated-looking state.
pub async fn restore() -> Result<(Config, DeskClient, Snapshot)> {
    let mut config = Config::load()?;
    if config.token.is_none() {
        bail!("Not logged in. Run 'desk-cli login'.");
    }

    let client = DeskClient::new(&config)?;
    match Snapshot::fetch(&client).await {
        Ok(snapshot) => Ok((config, client, snapshot)),
        Err(e) => {
            config.clear_token();
            config.save()?;
            bail!("Session restore failed ({}). Run 'desk-cli login'.", e);
        }
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok(line.trim().to_string())
}
