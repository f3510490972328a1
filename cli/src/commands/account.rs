use crate::app::App;
use crate::args::Credentials;
use crate::output;
use anyhow::{anyhow, bail, Context, Result};
use serde_json::json;
use std::io::{self, IsTerminal};
use ventasimple_session::auth;

const PASSWORD_ENV: &str = "VENTASIMPLE_PASSWORD";

pub async fn login(app: &App, creds: &Credentials) -> Result<()> {
    let password = password(creds)?;
    auth::login(&app.client, &app.session, &creds.email, &password)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    eprintln!("Signed in as {}.", creds.email.trim());
    Ok(())
}

pub async fn register(app: &App, creds: &Credentials) -> Result<()> {
    let password = password(creds)?;
    auth::register_and_login(&app.client, &app.session, &creds.email, &password)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    eprintln!("Account created. Signed in as {}.", creds.email.trim());
    Ok(())
}

fn password(creds: &Credentials) -> Result<String> {
    resolve_password(creds.password.clone(), io::stdin().is_terminal(), || {
        rpassword::prompt_password("Password: ")
    })
}

/// A given password wins; otherwise prompt, but only on a terminal.
fn resolve_password(
    given: Option<String>,
    interactive: bool,
    prompt: impl FnOnce() -> io::Result<String>,
) -> Result<String> {
    let password = match given {
        Some(password) => password,
        None if interactive => prompt().context("failed to read password")?,
        None => bail!("no password given; pass --password or set {PASSWORD_ENV}"),
    };
    if password.is_empty() {
        bail!("password cannot be empty");
    }
    Ok(password)
}

pub fn logout(app: &App) -> Result<()> {
    auth::logout(&app.session);
    eprintln!("Signed out.");
    Ok(())
}

pub async fn whoami(app: &App) -> Result<()> {
    let signed_in = app.session.is_signed_in();
    let license = if signed_in {
        app.synchronizer().load().await
    } else {
        None
    };
    let email = license.as_ref().and_then(|l| l.user_email.clone());
    let attached = license
        .as_ref()
        .is_some_and(|l| l.has_device(app.device_id.as_str()));

    let record = json!({
        "signedIn": signed_in,
        "email": email,
        "deviceId": app.device_id.as_str(),
        "deviceAttached": attached,
        "api": app.client.gateway().base_url(),
    });
    output::emit(app.json, &record, |_| {
        match (signed_in, &email) {
            (false, _) => println!("Not signed in."),
            (true, Some(email)) => println!("Signed in as {email}."),
            (true, None) => println!("Signed in."),
        }
        let linked = if attached { "linked" } else { "not linked" };
        println!("Device:  {} ({linked})", app.device_id.short());
        println!("Backend: {}", app.client.gateway().base_url());
    })
}
