//! ABO/Rh red-cell compatibility.

use std::collections::BTreeSet;

use crate::domain::BloodType;

/// `TABLE[donor][recipient]`, both indexed in [`BloodType::ALL`] order
/// (O-, O+, A-, A+, B-, B+, AB-, AB+).
const TABLE: [[bool; 8]; 8] = [
    // O- donates to everyone
    [true, true, true, true, true, true, true, true],
    // O+
    [false, true, false, true, false, true, false, true],
    // A-
    [false, false, true, true, false, false, true, true],
    // A+
    [false, false, false, true, false, false, false, true],
    // B-
    [false, false, false, false, true, true, true, true],
    // B+
    [false, false, false, false, false, true, false, true],
    // AB-
    [false, false, false, false, false, false, true, true],
    // AB+ donates only to AB+
    [false, false, false, false, false, false, false, true],
];

/// Whether blood from `donor` may be transfused into `recipient`.
#[must_use]
pub const fn can_donate(donor: BloodType, recipient: BloodType) -> bool {
    TABLE[donor.index()][recipient.index()]
}

/// The donor types whose blood a `recipient` may receive.
///
/// Never empty: every type can receive from O-.
#[must_use]
pub fn compatible_donor_types(recipient: BloodType) -> BTreeSet<BloodType> {
    BloodType::ALL
        .into_iter()
        .filter(|&donor| can_donate(donor, recipient))
        .collect()
}

/// The recipient types that can receive blood from a `donor`.
#[must_use]
pub fn compatible_recipient_types(donor: BloodType) -> BTreeSet<BloodType> {
    BloodType::ALL
        .into_iter()
        .filter(|&recipient| can_donate(donor, recipient))
        .collect()
}
