//! Domain models for blood donation coordination.
//!
//! This module contains the value types the matching functions operate on:
//! blood types, donors, requests, stock, roles and configuration.

mod blood_type;
pub use blood_type::BloodType;

mod config;
pub use config::Config;

mod donor;
pub use donor::{Donation, DonorRecord, LIVES_PER_UNIT};

mod error;
pub use error::Error;

mod id;
pub use id::{DonorId, RequestId};

/// Blood stock levels.
pub mod inventory;
pub use inventory::{InventoryEntry, InventoryThresholds, StockLevel};

mod position;
pub use position::{EARTH_RADIUS_KM, Position, Radius};

mod request;
pub use request::{BloodRequest, RequestStatus, Urgency};

/// Roles and the views and actions each may use.
pub mod role;
pub use role::{Capability, Role, Tab};
