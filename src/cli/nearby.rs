use bloodlink::{DonorRecord, Position, Radius, is_eligible, matching};
use clap::Parser;
use serde::Serialize;
use tracing::instrument;

use super::{Context, OutputFormat, print_json, terminal};

#[derive(Debug, Parser)]
#[command(about = "List donors near a location")]
pub struct Nearby {
    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,

    /// Search radius in kilometres (defaults to the configured radius)
    #[arg(long, value_name = "KM")]
    radius: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

#[derive(Debug, Serialize)]
struct Found<'a> {
    donor: &'a DonorRecord,
    distance_km: f64,
    eligible: bool,
}

impl Nearby {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let config = context.load_config()?;
        let snapshot = context.load_snapshot()?;

        let position = Position::new(self.lat, self.lon)?;
        let radius = match self.radius {
            Some(km) => Radius::new(km)?,
            None => config.broadcast_radius,
        };

        let found: Vec<_> = matching::nearby(&position, &snapshot.donors, radius)
            .into_iter()
            .map(|(donor, distance_km)| Found {
                donor,
                distance_km,
                eligible: is_eligible(donor, context.reference(), config.min_interval()),
            })
            .collect();

        match self.output {
            OutputFormat::Json => print_json(&found)?,
            OutputFormat::Table => print_found(&found, radius),
        }
        Ok(())
    }
}

fn print_found(found: &[Found<'_>], radius: Radius) {
    if found.is_empty() {
        println!("No donors within {} km.", radius.km());
        return;
    }

    println!(
        "{:<10} {:<20} {:<4} {:>9}  Status",
        "Donor", "Name", "Type", "Distance"
    );
    for entry in found {
        let donor = entry.donor;
        println!(
            "{:<10} {:<20} {:<4} {:>6.1} km  {}",
            donor.id,
            donor.name.as_deref().unwrap_or("-"),
            donor.blood_type,
            entry.distance_km,
            terminal::eligibility(entry.eligible)
        );
    }
    println!("{} donors within {} km", found.len(), radius.km());
}
