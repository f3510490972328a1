//! Results of license actions.

use std::fmt;

/// How a license action ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome<T = ()> {
    /// The backend accepted the action and the cache was re-fetched.
    Applied(T),
    /// The backend refused or the call failed. Carries the notice text.
    Rejected(String),
    /// A guard prevented the call; nothing was sent.
    Inert(InertReason),
}

impl<T> ActionOutcome<T> {
    /// Returns true if the backend accepted the action.
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied(_))
    }

    /// Returns true if a guard stopped the action before any call.
    pub fn is_inert(&self) -> bool {
        matches!(self, ActionOutcome::Inert(_))
    }

    /// The applied value, if any.
    pub fn applied(self) -> Option<T> {
        match self {
            ActionOutcome::Applied(value) => Some(value),
            _ => None,
        }
    }
}

/// Why an action was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InertReason {
    /// The session holds no token.
    NotSignedIn,
    /// The same action is already in flight.
    Busy,
    /// The subscription is already cancelled.
    AlreadyCancelled,
    /// The subscription is already paused.
    AlreadyPaused,
    /// Every seat of the plan is taken.
    DeviceLimitReached { limit: usize },
    /// This device is already linked.
    AlreadyAttached,
    /// No device id was given.
    EmptyDeviceId,
}

impl fmt::Display for InertReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InertReason::NotSignedIn => f.write_str("not signed in"),
            InertReason::Busy => f.write_str("already in progress"),
            InertReason::AlreadyCancelled => f.write_str("the subscription is cancelled"),
            InertReason::AlreadyPaused => f.write_str("the subscription is already paused"),
            InertReason::DeviceLimitReached { limit } => {
                write!(f, "device limit reached ({limit} for this plan)")
            }
            InertReason::AlreadyAttached => f.write_str("this device is already linked"),
            InertReason::EmptyDeviceId => f.write_str("no device id given"),
        }
    }
}
