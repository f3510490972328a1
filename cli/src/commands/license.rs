use crate::app::App;
use crate::args::LicenseCommand;
use crate::output::{self, confirm, or_dash, settle};
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::fmt::Write;
use ventasimple_license::{Action, LicenseSynchronizer};
use ventasimple_types::{DeviceId, License, LicensePlan};

pub async fn run(app: &App, command: LicenseCommand) -> Result<()> {
    let sync = app.synchronizer();
    if !matches!(command, LicenseCommand::Plans) {
        app.token()?;
        // Guards read the cached status, so load it before acting.
        sync.load().await;
    }

    match command {
        LicenseCommand::Plans => return plans(app),
        LicenseCommand::Show => {}
        LicenseCommand::Refresh => {
            settle(Action::Refresh, sync.refresh().await)?;
        }
        LicenseCommand::Attach => {
            settle(Action::Attach, sync.attach_this_device().await)?;
        }
        LicenseCommand::Detach { device_id } => {
            settle(Action::Detach, sync.detach(&device_id).await)?;
        }
        LicenseCommand::Pause => {
            settle(Action::Pause, sync.pause().await)?;
        }
        LicenseCommand::Resume => {
            settle(Action::Resume, sync.resume().await)?;
        }
        LicenseCommand::Cancel { yes } => {
            confirm(yes, "cancel the subscription")?;
            settle(Action::Cancel, sync.cancel().await)?;
        }
        LicenseCommand::ChangeMethod { mp_email, plan } => {
            let outcome = sync.change_payment_method(mp_email.as_deref(), plan).await;
            if let Some(url) = settle(Action::ChangePaymentMethod, outcome)? {
                return checkout(app, &url);
            }
            return Ok(());
        }
        LicenseCommand::Subscribe { plan, mp_email } => {
            let outcome = sync.subscribe(plan, mp_email.as_deref()).await;
            if let Some(url) = settle(Action::Subscribe, outcome)? {
                return checkout(app, &url);
            }
            return Ok(());
        }
    }

    show(app, &sync)
}

fn show(app: &App, sync: &LicenseSynchronizer) -> Result<()> {
    let Some(license) = sync.license() else {
        bail!("could not load the license");
    };
    output::emit(app.json, &license, |license| print_license(app, license))
}

fn print_license(app: &App, license: &License) {
    print!("{}", render_license(license, &app.device_id, Utc::now()));
}

fn render_license(license: &License, this_device: &DeviceId, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Status:  {}", license.status.label());
    let _ = writeln!(
        out,
        "Plan:    {} (up to {} devices)",
        license.effective_plan(),
        license.device_limit()
    );
    if let Some(email) = &license.user_email {
        let _ = writeln!(out, "Owner:   {email}");
    }
    match (license.expires_at, license.days_left(now)) {
        (Some(end), Some(days)) => {
            let _ = writeln!(out, "Expires: {} ({days} days left)", end.format("%Y-%m-%d"));
        }
        _ => {
            let _ = writeln!(out, "Expires: -");
        }
    }
    // The point-of-sale app is activated with this token.
    let _ = writeln!(out, "Token:   {}", or_dash(license.token.as_deref()));
    let _ = writeln!(
        out,
        "Devices: {}/{}",
        license.devices.len(),
        license.device_limit()
    );
    for device in &license.devices {
        let marker = if device == this_device.as_str() {
            " (this device)"
        } else {
            ""
        };
        let _ = writeln!(out, "  {device}{marker}");
    }
    out
}

fn checkout(app: &App, url: &str) -> Result<()> {
    output::emit(app.json, &json!({ "checkoutUrl": url }), |_| {
        println!("Complete the payment at:");
        println!("{url}");
    })
}

fn plans(app: &App) -> Result<()> {
    let rows: Vec<_> = LicensePlan::ALL
        .iter()
        .map(|plan| {
            json!({
                "plan": plan.as_str(),
                "maxDevices": plan.max_devices(),
                "price": plan.monthly_price(),
            })
        })
        .collect();
    output::emit(app.json, &rows, |_| {
        for plan in LicensePlan::ALL {
            println!(
                "{:<8} {:>2} device(s)  {}",
                plan.as_str(),
                plan.max_devices(),
                plan.monthly_price()
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn license_listing_shows_token_and_this_device() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let license = License {
            status: ventasimple_types::LicenseStatus::Active,
            plan: Some(LicensePlan::Multi),
            expires_at: Some(Utc.with_ymd_and_hms(2026, 3, 11, 0, 0, 0).unwrap()),
            devices: vec!["dev-a".to_string(), "dev-b".to_string()],
            token: Some("LIC-123".to_string()),
            user_email: Some("owner@example.com".to_string()),
        };

        let text = render_license(&license, &DeviceId::from_string("dev-b"), now);
        assert_eq!(
            text,
            "Status:  ACTIVE\n\
             Plan:    multi (up to 3 devices)\n\
             Owner:   owner@example.com\n\
             Expires: 2026-03-11 (10 days left)\n\
             Token:   LIC-123\n\
             Devices: 2/3\n  \
             dev-a\n  \
             dev-b (this device)\n"
        );
    }

    #[test]
    fn missing_token_prints_a_dash() {
        let text = render_license(&License::default(), &DeviceId::generate(), Utc::now());
        assert!(text.contains("Token:   -\n"));
    }
}
