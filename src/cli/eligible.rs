use bloodlink::{DonorId, DonorRecord, MinInterval, is_eligible, matching::next_eligible_date};
use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;
use tracing::instrument;

use super::{Context, OutputFormat, print_json, terminal};

#[derive(Debug, Parser)]
#[command(about = "Check whether a donor may donate")]
pub struct Eligible {
    /// The donor's identifier
    donor: DonorId,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

/// Why a donor can or cannot donate on the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Never donated before.
    FirstDonation,
    /// The interval has elapsed.
    Rested,
    /// The donor has switched availability off.
    Unavailable,
    /// Still inside the minimum interval.
    TooSoon,
}

impl Verdict {
    /// Explains the outcome of [`is_eligible`] for display.
    pub fn of(donor: &DonorRecord, reference: NaiveDate, interval: MinInterval) -> Self {
        if !donor.available {
            Self::Unavailable
        } else if is_eligible(donor, reference, interval) {
            if donor.last_donation.is_none() {
                Self::FirstDonation
            } else {
                Self::Rested
            }
        } else {
            Self::TooSoon
        }
    }

    /// Whether the verdict allows a donation.
    pub const fn eligible(self) -> bool {
        matches!(self, Self::FirstDonation | Self::Rested)
    }
}

#[derive(Debug, Serialize)]
struct EligibleOutput<'a> {
    donor: &'a DonorRecord,
    on: NaiveDate,
    eligible: bool,
    verdict: Verdict,
    next_eligible: Option<NaiveDate>,
}

impl Eligible {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let config = context.load_config()?;
        let snapshot = context.load_snapshot()?;

        let Some(donor) = snapshot.donor(&self.donor) else {
            anyhow::bail!("Donor {} not found", self.donor);
        };

        let reference = context.reference();
        let interval = config.min_interval();
        let verdict = Verdict::of(donor, reference, interval);
        let next_eligible = next_eligible_date(donor, interval);

        match self.output {
            OutputFormat::Json => print_json(&EligibleOutput {
                donor,
                on: reference,
                eligible: verdict.eligible(),
                verdict,
                next_eligible,
            })?,
            OutputFormat::Table => {
                println!(
                    "{} ({}) on {reference}: {}",
                    donor.label(),
                    donor.blood_type,
                    terminal::eligibility(verdict.eligible())
                );
                match verdict {
                    Verdict::FirstDonation => println!("  No previous donation on record"),
                    Verdict::Rested => {
                        if let Some(last) = donor.last_donation {
                            println!("  Last donated {last} ({interval} minimum)");
                        }
                    }
                    Verdict::Unavailable => println!("  Donor has marked themselves unavailable"),
                    Verdict::TooSoon => {
                        if let Some(next) = next_eligible {
                            println!("  Next eligible on {next}");
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bloodlink::{BloodType, Position};

    use super::*;

    fn donor() -> DonorRecord {
        DonorRecord::new(
            DonorId::new("d-1").unwrap(),
            BloodType::BNeg,
            Position::new(0.0, 0.0).unwrap(),
        )
    }

    #[test]
    fn verdicts() {
        let on: NaiveDate = "2024-06-01".parse().unwrap();
        let interval = MinInterval::DEFAULT;

        assert_eq!(Verdict::of(&donor(), on, interval), Verdict::FirstDonation);
        assert_eq!(
            Verdict::of(&donor().with_availability(false), on, interval),
            Verdict::Unavailable
        );
        assert_eq!(
            Verdict::of(
                &donor().with_last_donation("2024-05-01".parse().unwrap()),
                on,
                interval
            ),
            Verdict::TooSoon
        );
        assert_eq!(
            Verdict::of(
                &donor().with_last_donation("2024-01-01".parse().unwrap()),
                on,
                interval
            ),
            Verdict::Rested
        );
    }

    #[test]
    fn verdict_agrees_with_gate() {
        let on: NaiveDate = "2024-06-01".parse().unwrap();
        for days_ago in 0..200_i64 {
            let last = on - chrono::Duration::days(days_ago);
            let donor = donor().with_last_donation(last);
            assert_eq!(
                Verdict::of(&donor, on, MinInterval::DEFAULT).eligible(),
                is_eligible(&donor, on, MinInterval::DEFAULT)
            );
        }
    }
}
