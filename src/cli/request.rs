use std::num::NonZeroU32;

use bloodlink::{BloodRequest, BloodType, Position, RequestId, RequestStatus, Urgency};
use clap::Parser;
use tracing::instrument;

use super::{Context, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Raise a new blood request")]
pub struct Request {
    /// The recipient's blood type
    #[arg(long = "type", value_name = "TYPE")]
    blood_type: BloodType,

    /// Units needed
    #[arg(long)]
    units: NonZeroU32,

    /// How urgently the units are needed
    #[arg(long, value_enum, default_value_t = Priority::Normal)]
    urgency: Priority,

    /// Name of the requesting hospital
    #[arg(long)]
    hospital: Option<String>,

    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,

    /// Identifier for the request (defaults to the next free `r-NNN`)
    #[arg(long)]
    id: Option<RequestId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Priority {
    Emergency,
    Normal,
}

impl From<Priority> for Urgency {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Emergency => Self::Emergency,
            Priority::Normal => Self::Normal,
        }
    }
}

impl Request {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let mut snapshot = context.load_snapshot()?;

        let position = Position::new(self.lat, self.lon)?;
        let id = match self.id {
            Some(id) if snapshot.request(&id).is_some() => {
                anyhow::bail!("Request {id} already exists");
            }
            Some(id) => id,
            None => next_id(&snapshot.requests)?,
        };

        let request = BloodRequest {
            id: id.clone(),
            blood_type: self.blood_type,
            units: self.units,
            urgency: self.urgency.into(),
            hospital: self.hospital,
            position,
            created: context.now(),
            status: RequestStatus::Pending,
        };
        let urgency = request.urgency;
        snapshot.requests.push(request);

        context.save_snapshot(&snapshot)?;
        tracing::info!(request = %id, %urgency, "request created");

        println!(
            "{}: {} × {}, {urgency}, {}",
            id,
            self.units,
            self.blood_type,
            RequestStatus::Pending.to_string().success()
        );
        Ok(())
    }
}

/// One past the highest `r-NNN` number in use.
fn next_id(requests: &[BloodRequest]) -> anyhow::Result<RequestId> {
    let next = requests
        .iter()
        .filter_map(|request| request.id.as_str().strip_prefix("r-")?.parse::<u32>().ok())
        .max()
        .map_or(1, |highest| highest.saturating_add(1));
    Ok(RequestId::new(format!("r-{next:03}"))?)
}
