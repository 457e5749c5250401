use std::{fs, path::Path};

use bloodlink::{Config, Snapshot, storage::Format};
use tracing::instrument;

use super::{CONFIG_DIR, config_path};

/// Sample data mirroring a small city service: a handful of donors around
/// two hospitals, three requests and four stocked types.
const SAMPLE_SNAPSHOT: &str = "\
donors:
  - id: d-001
    name: Sarah Wilson
    blood_type: O+
    position: { lat: 40.7150, lng: -74.0020 }
    donations:
      - { date: 2023-12-15, location: City General Hospital }
      - { date: 2023-08-20, location: Red Cross Center }
      - { date: 2023-04-10, location: Community Clinic }
  - { id: d-002, name: Michael Chen, blood_type: O+, position: { lat: 40.7210, lng: -73.9980 }, last_donation: 2023-10-02 }
  - { id: d-003, name: Emma Davis, blood_type: A-, position: { lat: 40.7350, lng: -73.9900 }, last_donation: 2024-02-10, available: false }
  - { id: d-004, name: James Miller, blood_type: O+, position: { lat: 40.7400, lng: -74.0300 }, last_donation: 2024-01-05 }
  - { id: d-005, name: Priya Nair, blood_type: O-, position: { lat: 40.7080, lng: -74.0110 } }
  - { id: d-006, name: Tomas Ortega, blood_type: B+, position: { lat: 40.7500, lng: -73.9800 } }
requests:
  - { id: r-001, blood_type: O+, units: 2, urgency: emergency, hospital: City General, position: { lat: 40.7128, lng: -74.0060 }, created: 2024-03-12T08:30:00Z, status: pending }
  - { id: r-002, blood_type: A-, units: 1, urgency: normal, hospital: St. Mary Hospital, position: { lat: 40.7306, lng: -73.9866 }, created: 2024-03-10T14:00:00Z, status: approved }
  - { id: r-003, blood_type: O+, units: 3, urgency: emergency, hospital: Community Clinic, position: { lat: 40.7420, lng: -74.0000 }, created: 2024-02-28T09:15:00Z, status: fulfilled }
inventory:
  - { blood_type: O+, units: 45 }
  - { blood_type: A+, units: 12 }
  - { blood_type: B+, units: 8 }
  - { blood_type: O-, units: 5 }
";

#[derive(Debug, clap::Parser)]
pub struct Init {
    /// Also write a sample `snapshot.yaml` to try the other commands on
    #[arg(long)]
    sample: bool,
}

impl Init {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let config_dir = root.join(CONFIG_DIR);
        if config_dir.exists() {
            anyhow::bail!("Already initialized (found existing {CONFIG_DIR} directory)");
        }

        let snapshot_path = root.join("snapshot.yaml");
        if self.sample && snapshot_path.exists() {
            anyhow::bail!("Refusing to overwrite existing {}", snapshot_path.display());
        }

        fs::create_dir_all(&config_dir)
            .map_err(|e| anyhow::anyhow!("Failed to create {CONFIG_DIR} directory: {e}"))?;

        Config::default()
            .save(&config_path(root))
            .map_err(|e| anyhow::anyhow!("Failed to create config.toml: {e}"))?;

        println!("Initialized bloodlink in {}", root.display());
        println!("  Created: {CONFIG_DIR}/config.toml");

        if self.sample {
            Snapshot::parse(SAMPLE_SNAPSHOT, Format::Yaml)?;
            fs::write(&snapshot_path, SAMPLE_SNAPSHOT)
                .map_err(|e| anyhow::anyhow!("Failed to create snapshot.yaml: {e}"))?;
            println!("  Created: snapshot.yaml (sample data)");
        }

        println!();
        println!("Next steps:");
        if self.sample {
            println!("  bloodlink triage --on 2024-03-12");
            println!("  bloodlink rank r-001 --on 2024-03-12");
        } else {
            println!("  Export your donor pool and requests to snapshot.yaml");
            println!("  bloodlink status");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bloodlink::DonorId;

    use super::*;

    #[test]
    fn sample_snapshot_is_valid() {
        let snapshot = Snapshot::parse(SAMPLE_SNAPSHOT, Format::Yaml).unwrap();
        assert_eq!(snapshot.donors.len(), 6);
        assert_eq!(snapshot.requests.len(), 3);
        assert_eq!(snapshot.inventory.len(), 4);

        let sarah = snapshot.donor(&DonorId::new("d-001").unwrap()).unwrap();
        assert_eq!(sarah.last_donation, "2023-12-15".parse().ok());
        assert_eq!(sarah.donations.len(), 3);
    }

    #[test]
    fn init_creates_config_and_sample() {
        let tmp = tempfile::tempdir().unwrap();

        Init { sample: true }.run(tmp.path()).unwrap();

        assert_eq!(
            Config::load(&config_path(tmp.path())).unwrap(),
            Config::default()
        );
        assert!(Snapshot::load(&tmp.path().join("snapshot.yaml")).is_ok());
    }

    #[test]
    fn init_refuses_twice() {
        let tmp = tempfile::tempdir().unwrap();

        Init { sample: false }.run(tmp.path()).unwrap();
        let error = Init { sample: false }.run(tmp.path()).unwrap_err();

        assert!(error.to_string().starts_with("Already initialized"));
    }
}
