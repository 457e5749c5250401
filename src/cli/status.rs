use std::{collections::BTreeMap, process};

use bloodlink::{
    BloodType, MinInterval, Snapshot, Urgency,
    domain::{InventoryThresholds, StockLevel},
    is_eligible, triage,
};
use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;
use tracing::instrument;

use super::{
    Context, OutputFormat, print_json,
    terminal::{Colorize, is_narrow},
};

#[derive(Debug, Parser, Default)]
#[command(about = "Show donor pool, request queue and stock totals")]
pub struct Status {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", value_enum, default_value_t)]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    donors: usize,
    available: usize,
    eligible: usize,
    donors_by_type: BTreeMap<BloodType, usize>,
    pending_emergency: usize,
    pending_normal: usize,
    stock_critical: Vec<BloodType>,
    stock_low: Vec<BloodType>,
}

impl Summary {
    fn collect(
        snapshot: &Snapshot,
        reference: NaiveDate,
        interval: MinInterval,
        thresholds: &InventoryThresholds,
    ) -> Self {
        let mut summary = Self {
            donors: snapshot.donors.len(),
            ..Self::default()
        };

        for donor in &snapshot.donors {
            *summary.donors_by_type.entry(donor.blood_type).or_insert(0) += 1;
            summary.available += usize::from(donor.available);
            summary.eligible += usize::from(is_eligible(donor, reference, interval));
        }

        for request in triage(&snapshot.requests) {
            match request.urgency {
                Urgency::Emergency => summary.pending_emergency += 1,
                Urgency::Normal => summary.pending_normal += 1,
            }
        }

        for entry in &snapshot.inventory {
            match thresholds.classify(entry.units) {
                StockLevel::Critical => summary.stock_critical.push(entry.blood_type),
                StockLevel::Low => summary.stock_low.push(entry.blood_type),
                StockLevel::Stable => {}
            }
        }

        summary
    }
}

impl Status {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let config = context.load_config()?;
        let snapshot = context.load_snapshot()?;

        if snapshot == Snapshot::default() {
            println!("Snapshot is empty. Add donors, requests or inventory to get started.");
            return Ok(());
        }

        let summary = Summary::collect(
            &snapshot,
            context.reference(),
            config.min_interval(),
            &config.inventory,
        );

        match self.output {
            OutputFormat::Json => print_json(&summary)?,
            OutputFormat::Table => {
                if self.quiet {
                    Self::output_quiet(&summary);
                } else {
                    Self::output_table(&summary, context.reference());
                }
            }
        }

        // Exit with a non-zero code when the service needs attention.
        let mut exit_code = 0;
        if summary.pending_emergency > 0 {
            exit_code = exit_code.max(2);
        }
        if !summary.stock_critical.is_empty() {
            exit_code = exit_code.max(3);
        }

        if exit_code != 0 {
            process::exit(exit_code);
        }

        Ok(())
    }

    fn output_quiet(summary: &Summary) {
        println!(
            "donors={} eligible={} emergency={} normal={} critical={}",
            summary.donors,
            summary.eligible,
            summary.pending_emergency,
            summary.pending_normal,
            summary.stock_critical.len()
        );
    }

    fn output_table(summary: &Summary, reference: NaiveDate) {
        println!("Donor pool");
        println!("{}", "──────────".dim());

        if is_narrow() {
            for (blood_type, count) in &summary.donors_by_type {
                println!("{blood_type}: {count}");
            }
        } else {
            println!("{:<6} Donors", "Type");
            for (blood_type, count) in &summary.donors_by_type {
                println!("{blood_type:<6} {count}");
            }
        }
        println!("Total  {}", summary.donors);
        println!(
            "{}",
            format!(
                "{} available, {} eligible on {reference}",
                summary.available, summary.eligible
            )
            .dim()
        );

        println!();

        if summary.pending_emergency == 0 {
            println!("Pending emergencies: {} ✅", "0".success());
        } else {
            println!(
                "Pending emergencies: {} 🚨",
                summary.pending_emergency.to_string().danger()
            );
            println!("{}", "Run 'bloodlink triage' to review the queue.".dim());
        }
        println!("Pending requests:    {}", summary.pending_normal);

        println!();

        if summary.stock_critical.is_empty() && summary.stock_low.is_empty() {
            println!("Stock: {} ✅", "stable".success());
        } else {
            if !summary.stock_critical.is_empty() {
                println!("Critical stock: {}", join(&summary.stock_critical).danger());
            }
            if !summary.stock_low.is_empty() {
                println!("Low stock:      {}", join(&summary.stock_low).warning());
            }
            println!("{}", "Run 'bloodlink inventory' for details.".dim());
        }
    }
}

fn join(types: &[BloodType]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
