//! Reservation status wire mapping
//!
//! The wire enum maps bijectively onto the storage values; anything
//! unrecognized decodes to `Unspecified`, which the service layer rejects
//! before it can reach the repository.

use super::pb;
use crate::entity::ReservationStatus;

/// Map a storage status onto the wire enum
pub fn to_wire(status: ReservationStatus) -> pb::ReservationStatus {
    match status {
        ReservationStatus::Pending => pb::ReservationStatus::Pending,
        ReservationStatus::Confirmed => pb::ReservationStatus::Confirmed,
        ReservationStatus::Cancelled => pb::ReservationStatus::Cancelled,
        ReservationStatus::Unspecified => pb::ReservationStatus::Unspecified,
    }
}

/// Map a wire enum value onto the storage status
pub fn from_wire(status: pb::ReservationStatus) -> ReservationStatus {
    match status {
        pb::ReservationStatus::Pending => ReservationStatus::Pending,
        pb::ReservationStatus::Confirmed => ReservationStatus::Confirmed,
        pb::ReservationStatus::Cancelled => ReservationStatus::Cancelled,
        pb::ReservationStatus::Unspecified => ReservationStatus::Unspecified,
    }
}

/// Decode a raw wire code; unknown codes map to `Unspecified`
pub fn from_wire_code(code: i32) -> ReservationStatus {
    pb::ReservationStatus::try_from(code)
        .map(from_wire)
        .unwrap_or(ReservationStatus::Unspecified)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_is_bijective() {
        for status in [
            ReservationStatus::Unspecified,
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::Cancelled,
        ] {
            assert_eq!(from_wire(to_wire(status)), status);
        }
    }

    #[test]
    fn known_codes_decode() {
        assert_eq!(
            from_wire_code(pb::ReservationStatus::Confirmed as i32),
            ReservationStatus::Confirmed
        );
    }

    #[test]
    fn unknown_code_decodes_to_unspecified() {
        assert_eq!(from_wire_code(99), ReservationStatus::Unspecified);
        assert_eq!(from_wire_code(-1), ReservationStatus::Unspecified);
    }
}
