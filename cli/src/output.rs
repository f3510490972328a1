//! Printing helpers. Records go to stdout, notices to stderr.

use anyhow::{bail, Result};
use serde::Serialize;
use ventasimple_license::{Action, ActionOutcome};
use ventasimple_types::{Notice, NoticeKind};

pub fn notice(notice: &Notice) {
    match notice.kind {
        NoticeKind::Error => eprintln!("error: {}", notice.message),
        NoticeKind::Success | NoticeKind::Info => eprintln!("{}", notice.message),
    }
}

/// Prints `value` as pretty JSON when `json` is set, otherwise runs `human`.
pub fn emit<T: Serialize>(json: bool, value: &T, human: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human(value);
    }
    Ok(())
}

/// Refuses destructive commands unless `--yes` was passed.
pub fn confirm(yes: bool, what: &str) -> Result<()> {
    if !yes {
        bail!("refusing to {what} without --yes");
    }
    Ok(())
}

/// Maps a license action outcome to the process result.
///
/// A rejection is an error; its notice has already been printed. An inert
/// action is not: nothing was sent, so there is nothing to fail.
pub fn settle<T>(action: Action, outcome: ActionOutcome<T>) -> Result<Option<T>> {
    match outcome {
        ActionOutcome::Applied(value) => Ok(Some(value)),
        ActionOutcome::Rejected(_) => bail!("{action} failed"),
        ActionOutcome::Inert(reason) => {
            eprintln!("{action}: skipped, {reason}");
            Ok(None)
        }
    }
}

pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}
