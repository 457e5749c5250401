use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Error, InventoryThresholds, Radius};
use crate::matching::MinInterval;

/// Matching policy configuration.
///
/// This struct holds the tunable parameters of the matching functions: the
/// minimum donation interval, the emergency broadcast radius and the stock
/// thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Versions", into = "Versions")]
pub struct Config {
    /// Minimum whole days between two donations by the same donor.
    ///
    /// Defaults to 90. Jurisdictions differ (e.g. 56 days for whole blood in
    /// some countries).
    min_interval: MinInterval,

    /// How far from the hospital an emergency alert reaches.
    pub broadcast_radius: Radius,

    /// Unit counts at which stock is reported as low or critical.
    pub inventory: InventoryThresholds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_interval: MinInterval::DEFAULT,
            broadcast_radius: Radius::default(),
            inventory: InventoryThresholds::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads the configuration if the file exists, otherwise returns the
    /// default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, String> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the minimum donation interval.
    #[must_use]
    pub const fn min_interval(&self) -> MinInterval {
        self.min_interval
    }

    /// Sets the minimum donation interval in days.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInterval`] if `days` is negative.
    pub fn set_min_interval_days(&mut self, days: i64) -> Result<(), Error> {
        self.min_interval = MinInterval::new(days)?;
        Ok(())
    }
}

const fn default_broadcast_radius_km() -> f64 {
    5.0
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        /// Minimum whole days between donations.
        #[serde(default)]
        min_interval_days: MinInterval,

        /// Emergency broadcast radius in kilometres.
        #[serde(default = "default_broadcast_radius_km")]
        broadcast_radius_km: f64,

        #[serde(default)]
        inventory: InventoryThresholds,
    },
}

impl TryFrom<Versions> for Config {
    type Error = Error;

    fn try_from(versions: Versions) -> Result<Self, Self::Error> {
        match versions {
            Versions::V1 {
                min_interval_days,
                broadcast_radius_km,
                inventory,
            } => Ok(Self {
                min_interval: min_interval_days,
                broadcast_radius: Radius::new(broadcast_radius_km)?,
                inventory: inventory.validated()?,
            }),
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            min_interval_days: config.min_interval,
            broadcast_radius_km: config.broadcast_radius.km(),
            inventory: config.inventory,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nmin_interval_days = 56\nbroadcast_radius_km = 12.5\n\n[inventory]\ncritical_below = 5\nlow_below = 15\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.min_interval().days(), 56);
        assert_eq!(config.broadcast_radius.km(), 12.5);
        assert_eq!(
            config.inventory,
            InventoryThresholds {
                critical_below: 5,
                low_below: 15
            }
        );
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        assert_eq!(Config::load_or_default(&missing).unwrap(), Config::default());
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nmin_interval_days = \"ninety\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn negative_interval_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nmin_interval_days = -3\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.contains("Invalid donation interval: -3 days"), "{error}");
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\n\n[inventory]\ncritical_below = 25\nlow_below = 20\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(
            error.contains("critical_below (25) must not exceed low_below (20)"),
            "{error}"
        );
    }

    #[test]
    fn empty_file_returns_default() {
        // Tests that deserialising an empty file returns the default configuration.
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let mut config = Config::default();
        config.set_min_interval_days(120).unwrap();
        config.broadcast_radius = Radius::new(2.0).unwrap();
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn set_min_interval_rejects_negative() {
        let mut config = Config::default();
        assert_eq!(
            config.set_min_interval_days(-1),
            Err(Error::InvalidInterval(-1))
        );
        assert_eq!(config.min_interval(), MinInterval::DEFAULT);
    }
}
