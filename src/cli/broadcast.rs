use bloodlink::{Radius, RequestId, Urgency, matching};
use clap::Parser;
use tracing::instrument;

use super::{Context, OutputFormat, print_json, rank::print_candidates, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "List the donors an emergency alert would reach")]
pub struct Broadcast {
    /// The emergency request to broadcast
    request: RequestId,

    /// Alert radius in kilometres (defaults to the configured radius)
    #[arg(long, value_name = "KM")]
    radius: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Broadcast {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let config = context.load_config()?;
        let snapshot = context.load_snapshot()?;

        let Some(request) = snapshot.request(&self.request) else {
            anyhow::bail!("Request {} not found", self.request);
        };
        if request.urgency != Urgency::Emergency {
            anyhow::bail!(
                "Request {} is not an emergency; use 'bloodlink rank' instead",
                request.id
            );
        }
        if !request.is_pending() {
            anyhow::bail!("Request {} is {}, not pending", request.id, request.status);
        }

        let radius = match self.radius {
            Some(km) => Radius::new(km)?,
            None => config.broadcast_radius,
        };

        let alerted = matching::broadcast(
            request,
            &snapshot.donors,
            context.reference(),
            config.min_interval(),
            radius,
        );
        tracing::info!(request = %request.id, alerted = alerted.len(), radius_km = radius.km(), "broadcast");

        match self.output {
            OutputFormat::Json => print_json(&alerted)?,
            OutputFormat::Table => {
                let hospital = request.hospital.as_deref().unwrap_or("the hospital");
                if alerted.is_empty() {
                    println!(
                        "{}",
                        format!(
                            "No eligible {}-compatible donors within {} km of {hospital}.",
                            request.blood_type,
                            radius.km()
                        )
                        .danger()
                    );
                    println!("{}", "Try a larger --radius.".dim());
                } else {
                    println!(
                        "🚨 Alerting {} donors within {} km of {hospital} ({} × {})",
                        alerted.len(),
                        radius.km(),
                        request.units,
                        request.blood_type
                    );
                    print_candidates(&alerted);
                }
            }
        }

        Ok(())
    }
}
