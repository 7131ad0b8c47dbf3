//! Reservation status state machine
//!
//! `Pending` is the initial state set at creation. `Confirmed` and
//! `Cancelled` are terminal. `Unspecified` only exists on the wire as a
//! placeholder for unknown values and must never be persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Status of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    /// Wire-only placeholder for unknown/unset; never stored
    Unspecified,
    /// Initial state, set at creation
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    /// The storage string for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unspecified => "UNSPECIFIED",
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Parse a storage string; unrecognized values map to `Unspecified`
    pub fn parse(s: &str) -> Self {
        match s {
            "PENDING" => Self::Pending,
            "CONFIRMED" => Self::Confirmed,
            "CANCELLED" => Self::Cancelled,
            _ => Self::Unspecified,
        }
    }

    /// Whether no further transitions are allowed from this state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Cancelled)
    }

    /// Whether moving from this state to `target` is allowed
    ///
    /// Only `Pending -> Confirmed` and `Pending -> Cancelled` are valid.
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Confirmed) | (Self::Pending, Self::Cancelled)
        )
    }

    /// Validate a transition, returning an error that performs no write
    pub fn ensure_transition(&self, target: Self) -> Result<()> {
        if !self.can_transition_to(target) {
            return Err(Error::InvalidTransition {
                from: *self,
                to: target,
            });
        }
        Ok(())
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_strings_round_trip() {
        for status in [
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::Cancelled,
            ReservationStatus::Unspecified,
        ] {
            assert_eq!(ReservationStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn unknown_string_parses_to_unspecified() {
        assert_eq!(
            ReservationStatus::parse("COMPLETED"),
            ReservationStatus::Unspecified
        );
        assert_eq!(ReservationStatus::parse(""), ReservationStatus::Unspecified);
    }

    #[test]
    fn pending_can_confirm_or_cancel() {
        assert!(ReservationStatus::Pending.can_transition_to(ReservationStatus::Confirmed));
        assert!(ReservationStatus::Pending.can_transition_to(ReservationStatus::Cancelled));
    }

    #[test]
    fn terminal_states_allow_nothing() {
        for from in [ReservationStatus::Confirmed, ReservationStatus::Cancelled] {
            assert!(from.is_terminal());
            for to in [
                ReservationStatus::Pending,
                ReservationStatus::Confirmed,
                ReservationStatus::Cancelled,
                ReservationStatus::Unspecified,
            ] {
                assert!(!from.can_transition_to(to));
            }
        }
    }

    #[test]
    fn confirmed_to_pending_is_rejected() {
        let err = ReservationStatus::Confirmed
            .ensure_transition(ReservationStatus::Pending)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));
    }

    #[test]
    fn unspecified_target_is_rejected() {
        let err = ReservationStatus::Pending
            .ensure_transition(ReservationStatus::Unspecified)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));
    }

    #[test]
    fn pending_is_the_default() {
        assert_eq!(ReservationStatus::default(), ReservationStatus::Pending);
    }
}
