//! Donor–request matching.
//!
//! Every function here is pure over borrowed snapshots: no I/O, no shared
//! state, safe to call concurrently.

mod compatibility;
pub use compatibility::{can_donate, compatible_donor_types, compatible_recipient_types};

mod eligibility;
pub use eligibility::{MinInterval, is_eligible, next_eligible_date};

mod ranking;
pub use ranking::{Candidate, broadcast, nearby, rank};

mod triage;
pub use triage::triage;
