use std::num::NonZeroU32;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BloodType, DonorId, Error, Position};

/// People helped per donated unit, as reported on the donor dashboard.
pub const LIVES_PER_UNIT: u32 = 3;

/// One completed donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    /// Day of the donation.
    pub date: NaiveDate,

    /// Where the donation was made.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Units given.
    #[serde(default = "one_unit")]
    pub units: NonZeroU32,
}

const fn one_unit() -> NonZeroU32 {
    NonZeroU32::MIN
}

impl Donation {
    /// A single-unit donation on `date`.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self {
            date,
            location: None,
            units: NonZeroU32::MIN,
        }
    }

    /// Sets where the donation was made.
    #[must_use]
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// A read-only snapshot of a registered donor.
///
/// `last_donation` may be given on its own (the history is optional). When
/// only a history is given it is derived from the latest entry; when both are
/// given it must not predate the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DonorData")]
pub struct DonorRecord {
    /// Stable identifier within the donor pool.
    pub id: DonorId,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The donor's blood type.
    pub blood_type: BloodType,

    /// Where the donor is located.
    pub position: Position,

    /// Date of the most recent donation; `None` if the donor has never
    /// donated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_donation: Option<NaiveDate>,

    /// Availability flag set by the donor.
    pub available: bool,

    /// Recorded donations, most recent first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub donations: Vec<Donation>,
}

/// Wire form of a [`DonorRecord`], checked on conversion.
#[derive(Deserialize)]
struct DonorData {
    id: DonorId,
    #[serde(default)]
    name: Option<String>,
    blood_type: BloodType,
    position: Position,
    #[serde(default)]
    last_donation: Option<NaiveDate>,
    #[serde(default = "available_by_default")]
    available: bool,
    #[serde(default)]
    donations: Vec<Donation>,
}

const fn available_by_default() -> bool {
    true
}

impl TryFrom<DonorData> for DonorRecord {
    type Error = Error;

    fn try_from(data: DonorData) -> Result<Self, Self::Error> {
        let mut donations = data.donations;
        donations.sort_by(|a, b| b.date.cmp(&a.date));
        let latest = donations.first().map(|donation| donation.date);

        let last_donation = match (data.last_donation, latest) {
            (Some(recorded), Some(latest)) if recorded < latest => {
                return Err(Error::StaleLastDonation { recorded, latest });
            }
            (recorded, latest) => recorded.or(latest),
        };

        Ok(Self {
            id: data.id,
            name: data.name,
            blood_type: data.blood_type,
            position: data.position,
            last_donation,
            available: data.available,
            donations,
        })
    }
}

impl DonorRecord {
    /// Creates an available donor who has never donated.
    #[must_use]
    pub const fn new(id: DonorId, blood_type: BloodType, position: Position) -> Self {
        Self {
            id,
            name: None,
            blood_type,
            position,
            last_donation: None,
            available: true,
            donations: Vec::new(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the date of the most recent donation.
    #[must_use]
    pub fn with_last_donation(mut self, date: NaiveDate) -> Self {
        self.last_donation = Some(date);
        self
    }

    /// Records a donation, moving `last_donation` forward if it is newer.
    #[must_use]
    pub fn with_donation(mut self, donation: Donation) -> Self {
        self.last_donation = self.last_donation.max(Some(donation.date));
        let at = self
            .donations
            .partition_point(|existing| existing.date >= donation.date);
        self.donations.insert(at, donation);
        self
    }

    /// Sets the availability flag.
    #[must_use]
    pub fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// The display name, falling back to the identifier.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.id.as_str())
    }

    /// Units given across the recorded history.
    #[must_use]
    pub fn total_units(&self) -> u32 {
        self.donations
            .iter()
            .map(|donation| donation.units.get())
            .fold(0, u32::saturating_add)
    }

    /// People helped by the recorded donations.
    #[must_use]
    pub fn lives_impacted(&self) -> u32 {
        self.total_units().saturating_mul(LIVES_PER_UNIT)
    }
}
