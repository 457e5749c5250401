use chrono::NaiveDate;

use super::request::RequestStatus;

/// Errors raised at the boundary where untrusted values become domain types.
///
/// The matching functions themselves are total over well-typed inputs, so
/// every variant here describes a value that could not be constructed.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The text does not name one of the eight ABO/Rh blood types.
    #[error("Invalid blood type '{0}': expected one of O-, O+, A-, A+, B-, B+, AB-, AB+")]
    InvalidBloodType(String),

    /// A minimum donation interval was negative.
    #[error("Invalid donation interval: {0} days (must not be negative)")]
    InvalidInterval(i64),

    /// A latitude/longitude pair is not a point on the globe.
    #[error("Invalid position ({latitude}, {longitude}): latitude must be within ±90 and longitude within ±180")]
    InvalidPosition {
        /// Latitude in decimal degrees.
        latitude: f64,
        /// Longitude in decimal degrees.
        longitude: f64,
    },

    /// The request status cannot move between these two states.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// The current status.
        from: RequestStatus,
        /// The requested status.
        to: RequestStatus,
    },

    /// A search radius was negative or not finite.
    #[error("Invalid radius: {0} km (must be a non-negative number)")]
    InvalidRadius(f64),

    /// The text does not name a role.
    #[error("Invalid role '{0}': expected one of donor, recipient, hospital, admin")]
    InvalidRole(String),

    /// A donor's `last_donation` is older than their newest recorded donation.
    #[error("Last donation {recorded} predates the recorded donation on {latest}")]
    StaleLastDonation {
        /// The stated last donation date.
        recorded: NaiveDate,
        /// The newest date in the donation history.
        latest: NaiveDate,
    },

    /// Stock thresholds where the critical level is above the low level.
    #[error(
        "Invalid stock thresholds: critical_below ({critical_below}) must not exceed low_below ({low_below})"
    )]
    InvalidThresholds {
        /// Units below which stock is critical.
        critical_below: u32,
        /// Units below which stock is low.
        low_below: u32,
    },

    /// An identifier was empty.
    #[error("Identifier must not be empty")]
    EmptyId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let error = Error::InvalidBloodType("C+".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid blood type 'C+': expected one of O-, O+, A-, A+, B-, B+, AB-, AB+"
        );

        let error = Error::InvalidInterval(-1);
        assert_eq!(
            error.to_string(),
            "Invalid donation interval: -1 days (must not be negative)"
        );

        let error = Error::InvalidTransition {
            from: RequestStatus::Fulfilled,
            to: RequestStatus::Pending,
        };
        assert_eq!(
            error.to_string(),
            "Invalid status transition: fulfilled -> pending"
        );
    }
}
