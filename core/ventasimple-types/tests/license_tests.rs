use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;
use ventasimple_types::{License, LicensePlan, LicenseStatus};

// ── Status normalization ─────────────────────────────────────────

#[test]
fn canonical_spellings_map_to_themselves() {
    for status in LicenseStatus::ALL {
        assert_eq!(LicenseStatus::normalize(status.as_str()), status);
    }
}

#[test]
fn aliases_fold_into_closed_set() {
    let cases = [
        ("canceled", LicenseStatus::Cancelled),
        ("past-due", LicenseStatus::PastDue),
        ("trialing", LicenseStatus::Trial),
        ("trial_period", LicenseStatus::Trial),
        ("onhold", LicenseStatus::OnHold),
        ("on-hold", LicenseStatus::OnHold),
        ("authorized", LicenseStatus::Active),
        ("  Paused ", LicenseStatus::Paused),
    ];
    for (raw, expected) in cases {
        assert_eq!(LicenseStatus::normalize(raw), expected, "input {raw:?}");
    }
}

#[test]
fn unrecognized_status_is_unknown() {
    assert_eq!(LicenseStatus::normalize(""), LicenseStatus::Unknown);
    assert_eq!(LicenseStatus::normalize("???"), LicenseStatus::Unknown);
    assert_eq!(LicenseStatus::normalize("suspended"), LicenseStatus::Unknown);
}

fn case_variant(base: &'static str) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<bool>(), base.len()).prop_map(move |mask| {
        base.chars()
            .zip(mask)
            .map(|(c, upper)| if upper { c.to_ascii_uppercase() } else { c })
            .collect()
    })
}

proptest! {
    #[test]
    fn past_due_case_variants_normalize(
        raw in prop_oneof![case_variant("past-due"), case_variant("past_due")],
    ) {
        prop_assert_eq!(LicenseStatus::normalize(&raw), LicenseStatus::PastDue);
    }

    #[test]
    fn normalize_is_total(raw in ".{0,40}") {
        let status = LicenseStatus::normalize(&raw);
        prop_assert!(LicenseStatus::ALL.contains(&status));
    }
}

// ── Plans ────────────────────────────────────────────────────────

#[test]
fn plan_device_limits() {
    assert_eq!(LicensePlan::Single.max_devices(), 1);
    assert_eq!(LicensePlan::Multi.max_devices(), 3);
}

#[test]
fn plan_from_str() {
    assert_eq!("MULTI".parse::<LicensePlan>().unwrap(), LicensePlan::Multi);
    assert!("family".parse::<LicensePlan>().is_err());
}

// ── License decoding ─────────────────────────────────────────────

#[test]
fn license_decodes_backend_record() {
    let license: License = serde_json::from_value(json!({
        "status": "Past-Due",
        "plan": "multi",
        "expiresAt": "2026-11-01T00:00:00Z",
        "devices": ["dev-a", "dev-b"],
        "token": "lic_123",
        "userEmail": "owner@example.com"
    }))
    .unwrap();

    assert_eq!(license.status, LicenseStatus::PastDue);
    assert_eq!(license.plan, Some(LicensePlan::Multi));
    assert_eq!(license.device_limit(), 3);
    assert!(license.has_device("dev-b"));
    assert!(license.has_free_seat());
    assert_eq!(license.token.as_deref(), Some("lic_123"));
}

#[test]
fn license_tolerates_malformed_fields() {
    let license: License = serde_json::from_value(json!({
        "status": 7,
        "plan": "enterprise",
        "expiresAt": "not a date",
        "devices": "dev-a"
    }))
    .unwrap();

    assert_eq!(license.status, LicenseStatus::Unknown);
    assert_eq!(license.plan, None);
    assert_eq!(license.expires_at, None);
    assert!(license.devices.is_empty());
    assert_eq!(license.device_limit(), 1);
}

#[test]
fn empty_body_is_default_license() {
    let license: License = serde_json::from_value(json!({})).unwrap();
    assert_eq!(license, License::default());
}

#[test]
fn status_serializes_canonically() {
    let license = License {
        status: LicenseStatus::OnHold,
        ..Default::default()
    };
    let value = serde_json::to_value(&license).unwrap();
    assert_eq!(value["status"], "on_hold");
}

#[test]
fn single_plan_with_one_device_has_no_free_seat() {
    let license = License {
        plan: Some(LicensePlan::Single),
        devices: vec!["dev-a".into()],
        ..Default::default()
    };
    assert!(!license.has_free_seat());
}

#[test]
fn days_left_rounds_up() {
    let now = Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap();
    let license = License {
        expires_at: Some(now + Duration::hours(25)),
        ..Default::default()
    };
    assert_eq!(license.days_left(now), Some(2));
    assert_eq!(License::default().days_left(now), None);
}
