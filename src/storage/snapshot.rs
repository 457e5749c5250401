//! Point-in-time copies of the donor pool, request list and blood stock.
//!
//! The system of record lives elsewhere; a [`Snapshot`] is what it hands to
//! the matching functions. Snapshots are read from YAML or JSON files.

use std::{
    collections::HashSet,
    fs,
    hash::Hash,
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::{BloodRequest, DonorId, DonorRecord, InventoryEntry, RequestId};

/// The file formats a snapshot can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML (`.yaml`, `.yml`).
    Yaml,
    /// JSON (`.json`).
    Json,
}

impl Format {
    /// Infers the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Errors that can occur when loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The snapshot file was not found.
    #[error("snapshot not found: {}", .0.display())]
    NotFound(PathBuf),
    /// An I/O error occurred.
    #[error("failed to read snapshot")]
    Io(#[from] io::Error),
    /// The YAML could not be parsed.
    #[error("invalid snapshot YAML")]
    Yaml(#[from] serde_yaml::Error),
    /// The JSON could not be parsed.
    #[error("invalid snapshot JSON")]
    Json(#[from] serde_json::Error),
    /// The file extension is not one of `.yaml`, `.yml` or `.json`.
    #[error("unsupported snapshot format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    /// Two records share an identifier.
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId {
        /// `"donor"` or `"request"`.
        kind: &'static str,
        /// The repeated identifier.
        id: String,
    },
}

/// A consistent copy of everything the matching functions read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Registered donors.
    #[serde(default)]
    pub donors: Vec<DonorRecord>,
    /// Blood requests in any status.
    #[serde(default)]
    pub requests: Vec<BloodRequest>,
    /// Units in stock per blood type.
    #[serde(default)]
    pub inventory: Vec<InventoryEntry>,
}

impl Snapshot {
    /// Reads a snapshot from `path`, choosing the parser by file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read, has an
    /// unsupported extension, does not parse, or repeats a donor or request
    /// id.
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let format =
            Format::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))?;

        let content = fs::read_to_string(path).map_err(|io_error| match io_error.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
            _ => LoadError::Io(io_error),
        })?;

        let snapshot = Self::parse(&content, format)?;
        tracing::info!(
            donors = snapshot.donors.len(),
            requests = snapshot.requests.len(),
            inventory = snapshot.inventory.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Parses a snapshot from a string in the given format.
    ///
    /// # Errors
    ///
    /// Returns an error if the content does not parse or repeats a donor or
    /// request id.
    pub fn parse(content: &str, format: Format) -> Result<Self, LoadError> {
        let snapshot: Self = match format {
            Format::Yaml => serde_yaml::from_str(content)?,
            Format::Json => serde_json::from_str(content)?,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Writes the snapshot to `path` in the format implied by its extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is unsupported, serialization fails
    /// or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), LoadError> {
        let content = match Format::from_path(path) {
            Some(Format::Yaml) => serde_yaml::to_string(self)?,
            Some(Format::Json) => serde_json::to_string_pretty(self)?,
            None => return Err(LoadError::UnsupportedFormat(path.to_path_buf())),
        };
        fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), LoadError> {
        if let Some(id) = first_duplicate(self.donors.iter().map(|d| &d.id)) {
            return Err(LoadError::DuplicateId {
                kind: "donor",
                id: id.to_string(),
            });
        }
        if let Some(id) = first_duplicate(self.requests.iter().map(|r| &r.id)) {
            return Err(LoadError::DuplicateId {
                kind: "request",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Finds a donor by id.
    #[must_use]
    pub fn donor(&self, id: &DonorId) -> Option<&DonorRecord> {
        self.donors.iter().find(|donor| &donor.id == id)
    }

    /// Finds a request by id.
    #[must_use]
    pub fn request(&self, id: &RequestId) -> Option<&BloodRequest> {
        self.requests.iter().find(|request| &request.id == id)
    }

    /// Finds a donor by id for editing.
    pub fn donor_mut(&mut self, id: &DonorId) -> Option<&mut DonorRecord> {
        self.donors.iter_mut().find(|donor| &donor.id == id)
    }

    /// Finds a request by id for editing.
    pub fn request_mut(&mut self, id: &RequestId) -> Option<&mut BloodRequest> {
        self.requests.iter_mut().find(|request| &request.id == id)
    }
}

fn first_duplicate<'a, T: Eq + Hash + 'a>(ids: impl Iterator<Item = &'a T>) -> Option<&'a T> {
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use test_case::test_case;

    use super::*;
    use crate::domain::{BloodType, Donation, RequestStatus};

    const YAML: &str = "\
donors:
  - id: d-1
    name: Sarah Wilson
    blood_type: O+
    position: { lat: 40.71, lng: -74.00 }
    last_donation: 2024-01-20
  - id: d-2
    blood_type: A-
    position: { lat: 40.73, lng: -73.99 }
    available: false
requests:
  - id: r-1
    blood_type: O+
    units: 2
    urgency: emergency
    hospital: City General
    position: { lat: 40.72, lng: -74.01 }
    created: 2024-03-12T08:30:00Z
    status: pending
inventory:
  - { blood_type: O+, units: 45 }
";

    fn write(extension: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(extension)
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_yaml() {
        let file = write(".yaml", YAML);
        let snapshot = Snapshot::load(file.path()).unwrap();

        assert_eq!(snapshot.donors.len(), 2);
        assert_eq!(snapshot.requests.len(), 1);
        assert_eq!(snapshot.inventory[0].units, 45);

        let donor = snapshot.donor(&DonorId::new("d-2").unwrap()).unwrap();
        assert_eq!(donor.blood_type, BloodType::ANeg);
        assert!(!donor.available);

        let request = snapshot.request(&RequestId::new("r-1").unwrap()).unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
    }

    #[test]
    fn yaml_and_json_agree() {
        let from_yaml = Snapshot::parse(YAML, Format::Yaml).unwrap();
        let json = serde_json::to_string(&from_yaml).unwrap();
        let file = write(".json", &json);

        assert_eq!(Snapshot::load(file.path()).unwrap(), from_yaml);
    }

    #[test]
    fn empty_document_is_empty_snapshot() {
        let snapshot = Snapshot::parse("{}", Format::Json).unwrap();
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let result = Snapshot::load(&tmp.path().join("snapshot.yaml"));
        assert!(matches!(result, Err(LoadError::NotFound(_))));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = write(".csv", "id,blood_type\n");
        assert!(matches!(
            Snapshot::load(file.path()),
            Err(LoadError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn invalid_blood_type_is_rejected() {
        let yaml = YAML.replace("blood_type: A-", "blood_type: Q-");
        let error = Snapshot::parse(&yaml, Format::Yaml).unwrap_err();
        assert!(matches!(error, LoadError::Yaml(_)));
        let source = std::error::Error::source(&error).unwrap().to_string();
        assert!(source.contains("Invalid blood type 'Q-'"), "{source}");
    }

    #[test]
    fn duplicate_donor_id_is_rejected() {
        let yaml = YAML.replace("id: d-2", "id: d-1");
        let error = Snapshot::parse(&yaml, Format::Yaml).unwrap_err();
        assert!(matches!(
            error,
            LoadError::DuplicateId { kind: "donor", ref id } if id == "d-1"
        ));
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("copy.yml");
        let snapshot = Snapshot::parse(YAML, Format::Yaml).unwrap();

        snapshot.save(&path).unwrap();
        assert_eq!(Snapshot::load(&path).unwrap(), snapshot);
    }

    #[test]
    fn edits_persist() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("snapshot.yaml");
        let mut snapshot = Snapshot::parse(YAML, Format::Yaml).unwrap();

        let id = RequestId::new("r-1").unwrap();
        snapshot
            .request_mut(&id)
            .unwrap()
            .transition(RequestStatus::Approved)
            .unwrap();
        snapshot
            .donor_mut(&DonorId::new("d-2").unwrap())
            .unwrap()
            .available = true;
        snapshot.save(&path).unwrap();

        let reloaded = Snapshot::load(&path).unwrap();
        assert_eq!(reloaded.request(&id).unwrap().status, RequestStatus::Approved);
        assert!(reloaded.donors.iter().all(|donor| donor.available));
        assert!(snapshot.request_mut(&RequestId::new("r-9").unwrap()).is_none());
    }

    #[test_case("snapshot.yaml"; "yaml")]
    #[test_case("snapshot.json"; "json")]
    fn donation_history_survives_save(file: &str) {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(file);
        let mut snapshot = Snapshot::parse(YAML, Format::Yaml).unwrap();

        let id = DonorId::new("d-1").unwrap();
        let donor = snapshot.donor_mut(&id).unwrap();
        *donor = donor
            .clone()
            .with_donation(Donation::new("2023-08-20".parse().unwrap()).at("Red Cross Center"))
            .with_donation(Donation::new("2024-01-05".parse().unwrap()));
        snapshot.save(&path).unwrap();

        let reloaded = Snapshot::load(&path).unwrap();
        let donor = reloaded.donor(&id).unwrap();
        assert_eq!(donor.donations.len(), 2);
        assert_eq!(donor.donations[1].location.as_deref(), Some("Red Cross Center"));
        assert_eq!(donor.last_donation, "2024-01-20".parse().ok());
        assert_eq!(reloaded, snapshot);
    }

    #[test]
    fn format_from_path() {
        assert_eq!(Format::from_path(Path::new("a.YML")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("a.json")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("a")), None);
    }
}
