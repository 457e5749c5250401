use bloodlink::{BloodType, matching};
use clap::Parser;
use serde::Serialize;
use tracing::instrument;

use super::{OutputFormat, print_json, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Show which blood types are compatible")]
pub struct Compat {
    /// The blood type to look up (e.g. O-, AB+)
    blood_type: BloodType,

    /// Treat the type as the donor and list who can receive it
    #[arg(long)]
    donor: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

#[derive(Debug, Serialize)]
struct CompatOutput {
    blood_type: BloodType,
    role: &'static str,
    compatible: Vec<BloodType>,
}

impl Compat {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let (role, compatible) = if self.donor {
            ("donor", matching::compatible_recipient_types(self.blood_type))
        } else {
            ("recipient", matching::compatible_donor_types(self.blood_type))
        };
        let compatible: Vec<_> = compatible.into_iter().collect();

        match self.output {
            OutputFormat::Json => {
                print_json(&CompatOutput {
                    blood_type: self.blood_type,
                    role,
                    compatible,
                })?;
            }
            OutputFormat::Table => {
                let listed = compatible
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                if self.donor {
                    println!("{} can donate to: {listed}", self.blood_type.to_string().info());
                } else {
                    println!("{} can receive from: {listed}", self.blood_type.to_string().info());
                }
                println!(
                    "{}",
                    format!("{} of {} types", compatible.len(), BloodType::ALL.len()).dim()
                );
            }
        }
        Ok(())
    }
}
