use std::{fmt, num::NonZeroU32};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BloodType, Error, Position, RequestId};

/// How urgently a request must be served.
///
/// Emergencies sort before normal requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Needed immediately.
    Emergency,
    /// Routine request.
    Normal,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self {
            Self::Emergency => "emergency",
            Self::Normal => "normal",
        })
    }
}

/// Lifecycle state of a blood request.
///
/// ```text
/// pending ──► approved ──► fulfilled
///    │            │
///    └──► cancelled ◄┘
/// ```
///
/// `fulfilled` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Awaiting review.
    Pending,
    /// Accepted by the hospital, awaiting donors.
    Approved,
    /// All units delivered.
    Fulfilled,
    /// Withdrawn.
    Cancelled,
}

impl RequestStatus {
    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Fulfilled | Self::Cancelled)
    }

    /// Whether the lifecycle permits moving from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved | Self::Cancelled)
                | (Self::Approved, Self::Fulfilled | Self::Cancelled)
        )
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Fulfilled => "fulfilled",
            Self::Cancelled => "cancelled",
        })
    }
}

/// A hospital's or recipient's request for blood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodRequest {
    /// Stable identifier.
    pub id: RequestId,

    /// The recipient's blood type.
    pub blood_type: BloodType,

    /// Units needed.
    pub units: NonZeroU32,

    /// How urgently the units are needed.
    pub urgency: Urgency,

    /// Name of the requesting hospital.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital: Option<String>,

    /// Where the units are needed.
    pub position: Position,

    /// When the request was raised.
    pub created: DateTime<Utc>,

    /// Current lifecycle state.
    pub status: RequestStatus,
}

impl BloodRequest {
    /// Moves the request to `next`, enforcing the lifecycle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] if the lifecycle does not permit
    /// the move. The status is left unchanged.
    pub fn transition(&mut self, next: RequestStatus) -> Result<(), Error> {
        if !self.status.can_transition_to(next) {
            return Err(Error::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        tracing::debug!(request = %self.id, from = %self.status, to = %next, "request status changed");
        self.status = next;
        Ok(())
    }

    /// Whether the request is waiting for review.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}
