use bloodlink::{BloodRequest, triage};
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing::instrument;

use super::{Context, OutputFormat, print_json, terminal};

#[derive(Debug, Parser)]
#[command(about = "Show pending requests in the order they should be served")]
pub struct Triage {
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Triage {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let snapshot = context.load_snapshot()?;
        let queue = triage(&snapshot.requests);

        match self.output {
            OutputFormat::Json => print_json(&queue)?,
            OutputFormat::Table => {
                if queue.is_empty() {
                    println!("No pending requests.");
                } else {
                    print_queue(&queue, context.now());
                }
            }
        }

        Ok(())
    }
}

/// Table of triaged requests with their waiting time as of `now`.
fn print_queue(queue: &[&BloodRequest], now: DateTime<Utc>) {
    println!(
        "{:>3}  {:<10} {:<10} {:<4} {:>5}  {:<20} Waiting",
        "#", "Request", "Urgency", "Type", "Units", "Hospital"
    );
    for (i, request) in queue.iter().enumerate() {
        println!(
            "{:>3}  {:<10} {} {:<4} {:>5}  {:<20} {}",
            i + 1,
            request.id,
            terminal::urgency(request.urgency, 10),
            request.blood_type,
            request.units,
            request.hospital.as_deref().unwrap_or("-"),
            age(now - request.created),
        );
    }
}

/// Coarse human-readable duration, e.g. `3d` or `5h`.
fn age(elapsed: chrono::TimeDelta) -> String {
    if elapsed.num_days() > 0 {
        format!("{}d", elapsed.num_days())
    } else if elapsed.num_hours() > 0 {
        format!("{}h", elapsed.num_hours())
    } else if elapsed.num_minutes() >= 0 {
        format!("{}m", elapsed.num_minutes())
    } else {
        "-".to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use test_case::test_case;

    use super::*;

    #[test_case(TimeDelta::days(3) + TimeDelta::hours(4), "3d"; "days")]
    #[test_case(TimeDelta::hours(5), "5h"; "hours")]
    #[test_case(TimeDelta::minutes(12), "12m"; "minutes")]
    #[test_case(TimeDelta::minutes(-12), "-"; "created in the future")]
    fn formats_age(elapsed: TimeDelta, expected: &str) {
        assert_eq!(age(elapsed), expected);
    }
}
