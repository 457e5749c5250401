use bloodlink::DonorId;
use clap::Parser;
use tracing::instrument;

use super::{Context, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Switch a donor's availability on or off")]
pub struct Availability {
    /// The donor's identifier
    donor: DonorId,

    /// Mark the donor unavailable instead of available
    #[arg(long)]
    off: bool,
}

impl Availability {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let mut snapshot = context.load_snapshot()?;

        let Some(donor) = snapshot.donor_mut(&self.donor) else {
            anyhow::bail!("Donor {} not found", self.donor);
        };
        let available = !self.off;
        if donor.available == available {
            println!("{} is already {}", donor.label(), label(available));
            return Ok(());
        }
        donor.available = available;
        let name = donor.label().to_string();

        context.save_snapshot(&snapshot)?;
        tracing::info!(donor = %self.donor, available, "availability changed");

        println!("{name} is now {}", label(available));
        Ok(())
    }
}

fn label(available: bool) -> String {
    if available {
        "available".to_string()
    } else {
        "unavailable".dim()
    }
}
