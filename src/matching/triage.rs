//! Ordering the queue of open requests for review.

use tracing::debug;

use crate::domain::BloodRequest;

/// The pending requests in `requests`, in the order they should be served.
///
/// Emergencies come before normal requests; within an urgency the oldest
/// request comes first. Requests with equal urgency and creation time keep
/// their input order. Requests in any other status are left out of the
/// result (the input is untouched).
#[must_use]
pub fn triage(requests: &[BloodRequest]) -> Vec<&BloodRequest> {
    let mut queue: Vec<&BloodRequest> = requests.iter().filter(|r| r.is_pending()).collect();

    // `sort_by_key` is stable
    queue.sort_by_key(|request| (request.urgency, request.created));

    debug!(
        total = requests.len(),
        pending = queue.len(),
        "triaged requests"
    );
    queue
}
