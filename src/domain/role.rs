use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::Error;

/// The kind of account a user holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Gives blood.
    Donor,
    /// Needs blood.
    Recipient,
    /// Manages stock and raises requests.
    Hospital,
    /// Operates the service.
    Admin,
}

/// A section of a role's dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    /// Overview panel.
    Dashboard,
    /// The donor's own profile.
    Profile,
    /// Past donations.
    History,
    /// Raise a blood request.
    Request,
    /// Donors near the user.
    Nearby,
    /// Broadcast an emergency alert.
    Emergency,
    /// Blood stock levels.
    Inventory,
    /// Service-wide statistics.
    Analytics,
    /// Account management.
    Users,
    /// Exported reports.
    Reports,
}

impl Tab {
    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Profile => "My Profile",
            Self::History => "Donation History",
            Self::Request => "Request Blood",
            Self::Nearby => "Nearby Donors",
            Self::Emergency => "Emergency Alert",
            Self::Inventory => "Blood Inventory",
            Self::Analytics => "Analytics",
            Self::Users => "User Management",
            Self::Reports => "Reports",
        }
    }
}

/// An action gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Mark oneself available or unavailable to donate.
    ToggleAvailability,
    /// Raise a blood request.
    CreateRequest,
    /// See donors near a location.
    ViewNearbyDonors,
    /// Alert nearby donors about an emergency request.
    BroadcastEmergency,
    /// Update blood stock.
    ManageInventory,
    /// Review the queue of pending requests.
    TriageRequests,
    /// Manage registered donors on their behalf.
    ManageUsers,
    /// Read service-wide reports.
    ViewReports,
}

impl Capability {
    /// All capabilities.
    pub const ALL: [Self; 8] = [
        Self::ToggleAvailability,
        Self::CreateRequest,
        Self::ViewNearbyDonors,
        Self::BroadcastEmergency,
        Self::ManageInventory,
        Self::TriageRequests,
        Self::ManageUsers,
        Self::ViewReports,
    ];
}

impl Role {
    /// All roles.
    pub const ALL: [Self; 4] = [Self::Donor, Self::Recipient, Self::Hospital, Self::Admin];

    /// Menu entries, in display order.
    #[must_use]
    pub const fn tabs(self) -> &'static [Tab] {
        match self {
            Self::Donor => &[Tab::Dashboard, Tab::Profile, Tab::History],
            Self::Recipient => &[Tab::Dashboard, Tab::Request, Tab::Nearby],
            Self::Hospital => &[Tab::Dashboard, Tab::Emergency, Tab::Inventory],
            Self::Admin => &[Tab::Analytics, Tab::Users, Tab::Reports],
        }
    }

    /// The tab shown on login.
    #[must_use]
    pub const fn home(self) -> Tab {
        self.tabs()[0]
    }

    /// Whether this role may perform `capability`.
    #[must_use]
    pub const fn can(self, capability: Capability) -> bool {
        use Capability::{
            BroadcastEmergency, CreateRequest, ManageInventory, ManageUsers, ToggleAvailability,
            TriageRequests, ViewNearbyDonors, ViewReports,
        };

        match self {
            Self::Donor => matches!(capability, ToggleAvailability),
            Self::Recipient => matches!(capability, CreateRequest | ViewNearbyDonors),
            Self::Hospital => matches!(
                capability,
                BroadcastEmergency | ManageInventory | TriageRequests | CreateRequest
            ),
            Self::Admin => matches!(capability, TriageRequests | ManageUsers | ViewReports),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self {
            Self::Donor => "donor",
            Self::Recipient => "recipient",
            Self::Hospital => "hospital",
            Self::Admin => "admin",
        })
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Hospital".parse::<Role>(), Ok(Role::Hospital));
        assert_eq!(
            "nurse".parse::<Role>(),
            Err(Error::InvalidRole("nurse".to_string()))
        );
    }

    #[test]
    fn every_role_has_three_tabs() {
        for role in Role::ALL {
            assert_eq!(role.tabs().len(), 3, "{role}");
        }
    }

    #[test]
    fn admin_lands_on_analytics() {
        assert_eq!(Role::Admin.home(), Tab::Analytics);
        assert_eq!(Role::Donor.home(), Tab::Dashboard);
    }

    #[test]
    fn only_hospitals_broadcast() {
        let broadcasters: Vec<_> = Role::ALL
            .into_iter()
            .filter(|role| role.can(Capability::BroadcastEmergency))
            .collect();
        assert_eq!(broadcasters, vec![Role::Hospital]);
    }

    #[test]
    fn triage_is_for_hospitals_and_admins() {
        assert!(Role::Hospital.can(Capability::TriageRequests));
        assert!(Role::Admin.can(Capability::TriageRequests));
        assert!(!Role::Donor.can(Capability::TriageRequests));
        assert!(!Role::Recipient.can(Capability::TriageRequests));
    }

    #[test]
    fn donors_only_toggle_availability() {
        assert!(Role::Donor.can(Capability::ToggleAvailability));
        assert!(!Role::Donor.can(Capability::CreateRequest));
        assert!(!Role::Donor.can(Capability::ViewNearbyDonors));
    }
}
