//! Per-action busy flags.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// A license action that can be in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// `POST /license/refresh`.
    Refresh,
    /// Pause the subscription.
    Pause,
    /// Resume the subscription.
    Resume,
    /// Cancel the subscription.
    Cancel,
    /// Start a checkout for a new payment method.
    ChangePaymentMethod,
    /// Link this device.
    Attach,
    /// Unlink a device.
    Detach,
    /// Start a subscription checkout.
    Subscribe,
}

impl Action {
    /// Short name used in logs and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Refresh => "refresh",
            Action::Pause => "pause",
            Action::Resume => "resume",
            Action::Cancel => "cancel",
            Action::ChangePaymentMethod => "change-method",
            Action::Attach => "attach",
            Action::Detach => "detach",
            Action::Subscribe => "subscribe",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions currently in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusySnapshot(HashSet<Action>);

impl BusySnapshot {
    /// Returns true while `action` is in flight.
    pub fn is_busy(&self, action: Action) -> bool {
        self.0.contains(&action)
    }

    /// Returns true while any action is in flight.
    pub fn any(&self) -> bool {
        !self.0.is_empty()
    }
}

#[derive(Debug, Default)]
pub(crate) struct BusyFlags {
    active: Mutex<HashSet<Action>>,
}

impl BusyFlags {
    /// Marks `action` busy. `None` if it already is.
    pub(crate) fn begin(&self, action: Action) -> Option<BusyGuard<'_>> {
        let inserted = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(action);
        inserted.then(|| BusyGuard { flags: self, action })
    }

    pub(crate) fn snapshot(&self) -> BusySnapshot {
        BusySnapshot(
            self.active
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        )
    }
}

/// Clears its action's flag when dropped.
pub(crate) struct BusyGuard<'a> {
    flags: &'a BusyFlags,
    action: Action,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flags
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_blocks_reentry_until_dropped() {
        let flags = BusyFlags::default();
        let guard = flags.begin(Action::Pause).unwrap();
        assert!(flags.begin(Action::Pause).is_none());
        assert!(flags.begin(Action::Cancel).is_some());
        assert!(flags.snapshot().is_busy(Action::Pause));

        drop(guard);
        assert!(!flags.snapshot().any());
    }

    #[test]
    fn refused_begin_leaves_the_flag_set() {
        let flags = BusyFlags::default();
        let _guard = flags.begin(Action::Pause).unwrap();
        assert!(flags.begin(Action::Pause).is_none());
        assert!(flags.begin(Action::Pause).is_none());
        assert!(flags.snapshot().is_busy(Action::Pause));
    }
}
