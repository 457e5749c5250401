//! Minimum inter-donation interval.

use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{DonorRecord, Error};

/// The minimum number of whole days that must separate two donations.
///
/// Policy varies by jurisdiction, so this is configuration rather than a
/// constant. The default is 90 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct MinInterval(u32);

impl MinInterval {
    /// The default interval of 90 days.
    pub const DEFAULT: Self = Self(90);

    /// Creates an interval of `days` days.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInterval`] if `days` is negative (or too large
    /// to represent).
    pub fn new(days: i64) -> Result<Self, Error> {
        u32::try_from(days)
            .map(Self)
            .map_err(|_| Error::InvalidInterval(days))
    }

    /// The interval in days.
    #[must_use]
    pub const fn days(self) -> u32 {
        self.0
    }
}

impl Default for MinInterval {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for MinInterval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} days", self.0)
    }
}

impl TryFrom<i64> for MinInterval {
    type Error = Error;

    fn try_from(days: i64) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<MinInterval> for i64 {
    fn from(interval: MinInterval) -> Self {
        Self::from(interval.0)
    }
}

/// Whether `donor` may donate on `reference`.
///
/// - An unavailable donor is never eligible.
/// - A donor who has never donated is eligible.
/// - Otherwise at least `interval` whole days must have elapsed since the last
///   donation; exactly `interval` days counts. A last donation dated after
///   `reference` never satisfies the interval.
#[must_use]
pub fn is_eligible(donor: &DonorRecord, reference: NaiveDate, interval: MinInterval) -> bool {
    if !donor.available {
        return false;
    }

    donor.last_donation.is_none_or(|last| {
        let elapsed = reference.signed_duration_since(last).num_days();
        elapsed >= i64::from(interval.days())
    })
}

/// The first date on which `donor` satisfies the interval again.
///
/// Returns `None` if the donor has never donated (they are not waiting on
/// anything). Availability is not considered.
#[must_use]
pub fn next_eligible_date(donor: &DonorRecord, interval: MinInterval) -> Option<NaiveDate> {
    donor
        .last_donation
        .and_then(|last| last.checked_add_days(Days::new(u64::from(interval.days()))))
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::{BloodType, DonorId, Position};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn donor() -> DonorRecord {
        DonorRecord::new(
            DonorId::new("d-1").unwrap(),
            BloodType::OPos,
            Position::new(0.0, 0.0).unwrap(),
        )
    }

    #[test_case(90, true; "exactly the interval")]
    #[test_case(89, false; "one day short")]
    #[test_case(91, true; "one day past")]
    #[test_case(10, false; "recent donation")]
    #[test_case(0, false; "donated today")]
    fn interval_boundary(days_ago: u64, expected: bool) {
        let now = date("2024-06-01");
        let last = now.checked_sub_days(Days::new(days_ago)).unwrap();
        let donor = donor().with_last_donation(last);

        assert_eq!(is_eligible(&donor, now, MinInterval::DEFAULT), expected);
    }

    #[test]
    fn never_donated_is_eligible() {
        assert!(is_eligible(&donor(), date("2024-06-01"), MinInterval::DEFAULT));
    }

    #[test]
    fn unavailable_is_never_eligible() {
        let donor = donor().with_availability(false);
        assert!(!is_eligible(&donor, date("2024-06-01"), MinInterval::DEFAULT));
    }

    #[test]
    fn zero_interval_admits_same_day() {
        let now = date("2024-06-01");
        let donor = donor().with_last_donation(now);
        assert!(is_eligible(&donor, now, MinInterval::new(0).unwrap()));
    }

    #[test]
    fn future_donation_is_not_eligible() {
        let donor = donor().with_last_donation(date("2024-06-10"));
        assert!(!is_eligible(&donor, date("2024-06-01"), MinInterval::DEFAULT));
    }

    #[test]
    fn negative_interval_is_rejected() {
        assert_eq!(MinInterval::new(-1), Err(Error::InvalidInterval(-1)));
        assert_eq!(MinInterval::new(56).map(MinInterval::days), Ok(56));
    }

    #[test]
    fn next_eligible_date_adds_interval() {
        let donor = donor().with_last_donation(date("2023-12-15"));
        assert_eq!(
            next_eligible_date(&donor, MinInterval::DEFAULT),
            Some(date("2024-03-14"))
        );
        assert_eq!(next_eligible_date(&self::donor(), MinInterval::DEFAULT), None);
    }

    #[test]
    fn eligible_on_next_eligible_date() {
        let donor = donor().with_last_donation(date("2023-12-15"));
        let next = next_eligible_date(&donor, MinInterval::DEFAULT).unwrap();
        assert!(is_eligible(&donor, next, MinInterval::DEFAULT));
        assert!(!is_eligible(&donor, next.pred_opt().unwrap(), MinInterval::DEFAULT));
    }
}
