//! Ordering eligible donors for a request.

use std::cmp::Ordering;

use chrono::NaiveDate;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;
use tracing::{debug, trace};

use super::{MinInterval, can_donate, is_eligible};
use crate::domain::{BloodRequest, DonorRecord, Position, Radius};

/// A donor considered for a particular request.
///
/// Computed per query and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate<'a> {
    /// The donor.
    pub donor: &'a DonorRecord,
    /// Great-circle distance from the donor to the request, in kilometres.
    pub distance_km: f64,
    /// Whether the donor passed the eligibility gate.
    pub eligible: bool,
    /// 1-based position in the ranked output.
    pub rank: usize,
}

impl Candidate<'_> {
    /// Nearest first, then longest since last donation (never-donated first),
    /// then donor id.
    fn cmp_rank(&self, other: &Self) -> Ordering {
        self.distance_km
            .total_cmp(&other.distance_km)
            .then_with(|| idle_order(self.donor.last_donation, other.donor.last_donation))
            .then_with(|| self.donor.id.cmp(&other.donor.id))
    }
}

/// Donors idle longest sort first; never having donated is idlest of all.
fn idle_order(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    // `None < Some(_)` and earlier dates are smaller, which is exactly
    // longest-idle-first.
    a.cmp(&b)
}

/// Ranks the donors who could serve `request` on `reference`.
///
/// A donor survives if their blood type is compatible with the request and
/// they pass [`is_eligible`]. Survivors are ordered by distance to the
/// request, then by time since their last donation (longest first), then by
/// id. The full ranked set is returned; an empty vector means nobody
/// qualifies.
#[must_use]
pub fn rank<'a>(
    request: &BloodRequest,
    donors: &'a [DonorRecord],
    reference: NaiveDate,
    interval: MinInterval,
) -> Vec<Candidate<'a>> {
    let mut candidates: Vec<Candidate<'a>> = donors
        .par_iter()
        .filter(|donor| {
            let keep = can_donate(donor.blood_type, request.blood_type)
                && is_eligible(donor, reference, interval);
            trace!(donor = %donor.id, keep, "screened donor");
            keep
        })
        .map(|donor| Candidate {
            donor,
            distance_km: donor.position.distance_km(&request.position),
            eligible: true,
            rank: 0,
        })
        .collect();

    candidates.sort_by(Candidate::cmp_rank);
    for (i, candidate) in candidates.iter_mut().enumerate() {
        candidate.rank = i + 1;
    }

    debug!(
        request = %request.id,
        pool = donors.len(),
        ranked = candidates.len(),
        "ranked donors"
    );
    candidates
}

/// The ranked donors within `radius` of the request.
///
/// This is the recipient list of an emergency alert: a prefix of [`rank`].
#[must_use]
pub fn broadcast<'a>(
    request: &BloodRequest,
    donors: &'a [DonorRecord],
    reference: NaiveDate,
    interval: MinInterval,
    radius: Radius,
) -> Vec<Candidate<'a>> {
    let mut candidates = rank(request, donors, reference, interval);
    let within = candidates.partition_point(|candidate| radius.contains(candidate.distance_km));
    candidates.truncate(within);
    candidates
}

/// Every donor within `radius` of `position`, nearest first.
///
/// Unlike [`rank`] this ignores blood type and eligibility; it backs the map
/// and "nearby donors" views.
#[must_use]
pub fn nearby<'a>(
    position: &Position,
    donors: &'a [DonorRecord],
    radius: Radius,
) -> Vec<(&'a DonorRecord, f64)> {
    let mut found: Vec<_> = donors
        .iter()
        .map(|donor| (donor, donor.position.distance_km(position)))
        .filter(|&(_, distance)| radius.contains(distance))
        .collect();

    found.sort_by(|(a, da), (b, db)| da.total_cmp(db).then_with(|| a.id.cmp(&b.id)));
    found
}
