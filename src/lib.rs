//! Blood donor matching and request triage
//!
//! Donor pools and request lists are supplied as read-only snapshots; the
//! matching functions decide who can give to whom, who may donate today, who
//! should be asked first and which request should be served next.

pub mod domain;
pub use domain::{
    BloodRequest, BloodType, Config, Donation, DonorId, DonorRecord, Error, Position, Radius,
    RequestId, RequestStatus, Role, Urgency,
};

pub mod matching;
pub use matching::{
    Candidate, MinInterval, can_donate, compatible_donor_types, is_eligible, rank, triage,
};

/// Snapshot loading for the donor pool, requests and stock.
pub mod storage;
pub use storage::Snapshot;
