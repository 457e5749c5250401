use bloodlink::{Candidate, RequestId, matching};
use clap::Parser;
use tracing::instrument;

use super::{Context, OutputFormat, print_json, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Rank eligible donors for a blood request")]
pub struct Rank {
    /// The request to find donors for
    request: RequestId,

    /// Show at most this many donors
    #[arg(long, short = 'n')]
    limit: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Rank {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let config = context.load_config()?;
        let snapshot = context.load_snapshot()?;

        let Some(request) = snapshot.request(&self.request) else {
            anyhow::bail!("Request {} not found", self.request);
        };
        if !request.is_pending() {
            tracing::warn!(request = %request.id, status = %request.status, "ranking a request that is not pending");
        }

        let mut candidates = matching::rank(
            request,
            &snapshot.donors,
            context.reference(),
            config.min_interval(),
        );
        let total = candidates.len();
        if let Some(limit) = self.limit {
            candidates.truncate(limit);
        }

        match self.output {
            OutputFormat::Json => print_json(&candidates)?,
            OutputFormat::Table => {
                println!(
                    "Donors for {} ({} × {}, {})",
                    request.id,
                    request.units,
                    request.blood_type,
                    request.hospital.as_deref().unwrap_or("unknown hospital")
                );
                if !candidates.is_empty() {
                    print_candidates(&candidates);
                }
                match footer(candidates.len(), total) {
                    Footer::NoDonors => {
                        println!("{}", "No eligible compatible donors.".warning());
                    }
                    Footer::More(hidden) => {
                        println!("{}", format!("... and {hidden} more").dim());
                    }
                    Footer::Complete => {}
                }
            }
        }

        Ok(())
    }
}

/// What follows the candidate table.
#[derive(Debug, PartialEq, Eq)]
enum Footer {
    /// Nobody qualifies at all.
    NoDonors,
    /// `--limit` hid this many ranked donors.
    More(usize),
    Complete,
}

const fn footer(shown: usize, total: usize) -> Footer {
    if total == 0 {
        Footer::NoDonors
    } else if shown < total {
        Footer::More(total - shown)
    } else {
        Footer::Complete
    }
}

/// Table of ranked candidates, shared with `broadcast`.
pub fn print_candidates(candidates: &[Candidate<'_>]) {
    println!(
        "{:>3}  {:<10} {:<20} {:<4} {:>9}  Last donation",
        "#", "Donor", "Name", "Type", "Distance"
    );
    for candidate in candidates {
        let donor = candidate.donor;
        println!(
            "{:>3}  {:<10} {:<20} {:<4} {:>6.1} km  {}",
            candidate.rank,
            donor.id,
            donor.name.as_deref().unwrap_or("-"),
            donor.blood_type,
            candidate.distance_km,
            donor
                .last_donation
                .map_or_else(|| "never".dim(), |date| date.to_string())
        );
    }
}
