use bloodlink::{
    BloodType, compatible_donor_types,
    domain::{InventoryEntry, InventoryThresholds, StockLevel, inventory::usable_units},
};
use clap::Parser;
use serde::Serialize;
use tracing::instrument;

use super::{Context, OutputFormat, print_json, terminal};

#[derive(Debug, Parser)]
#[command(about = "Show blood stock levels")]
pub struct Inventory {
    /// Show how many stocked units a recipient of this type could receive
    #[arg(long = "for", value_name = "TYPE")]
    recipient: Option<BloodType>,

    /// Record the units on hand for a type, e.g. `--set O+=12` (repeatable)
    #[arg(long = "set", value_name = "TYPE=UNITS", value_parser = parse_stock)]
    set: Vec<InventoryEntry>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

#[derive(Debug, Serialize)]
struct Level {
    blood_type: BloodType,
    units: u32,
    level: StockLevel,
}

#[derive(Debug, Serialize)]
struct Usable {
    recipient: BloodType,
    units: u32,
    from: Vec<InventoryEntry>,
}

impl Inventory {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let config = context.load_config()?;
        let mut snapshot = context.load_snapshot()?;

        if !self.set.is_empty() {
            for entry in self.set {
                set_stock(&mut snapshot.inventory, entry);
                tracing::info!(blood_type = %entry.blood_type, units = entry.units, "stock updated");
            }
            context.save_snapshot(&snapshot)?;
        }

        match self.recipient {
            Some(recipient) => Self::usable(recipient, &snapshot.inventory, self.output),
            None => Self::levels(&snapshot.inventory, &config.inventory, self.output),
        }
    }

    fn levels(
        inventory: &[InventoryEntry],
        thresholds: &InventoryThresholds,
        output: OutputFormat,
    ) -> anyhow::Result<()> {
        let levels = classify_all(inventory, thresholds);

        match output {
            OutputFormat::Json => print_json(&levels)?,
            OutputFormat::Table => {
                if levels.is_empty() {
                    println!("No stock recorded.");
                    return Ok(());
                }
                println!("{:<5} {:>6}  Level", "Type", "Units");
                for level in &levels {
                    println!(
                        "{:<5} {:>6}  {}",
                        level.blood_type,
                        level.units,
                        terminal::stock_level(level.level, 8)
                    );
                }
            }
        }
        Ok(())
    }

    fn usable(
        recipient: BloodType,
        inventory: &[InventoryEntry],
        output: OutputFormat,
    ) -> anyhow::Result<()> {
        let donors = compatible_donor_types(recipient);
        let usable = Usable {
            recipient,
            units: usable_units(recipient, inventory),
            from: inventory
                .iter()
                .filter(|entry| donors.contains(&entry.blood_type) && entry.units > 0)
                .copied()
                .collect(),
        };

        match output {
            OutputFormat::Json => print_json(&usable)?,
            OutputFormat::Table => {
                println!("{} units usable for a {recipient} recipient", usable.units);
                for entry in &usable.from {
                    println!("  {:<4} {:>6}", entry.blood_type, entry.units);
                }
            }
        }
        Ok(())
    }
}

fn parse_stock(s: &str) -> Result<InventoryEntry, String> {
    let (blood_type, units) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TYPE=UNITS, got '{s}'"))?;
    Ok(InventoryEntry {
        blood_type: blood_type.parse().map_err(|e: bloodlink::Error| e.to_string())?,
        units: units
            .trim()
            .parse()
            .map_err(|_| format!("invalid unit count '{units}'"))?,
    })
}

/// Replaces the stock for `entry.blood_type`, adding it if the type is new.
fn set_stock(inventory: &mut Vec<InventoryEntry>, entry: InventoryEntry) {
    match inventory
        .iter_mut()
        .find(|existing| existing.blood_type == entry.blood_type)
    {
        Some(existing) => existing.units = entry.units,
        None => inventory.push(entry),
    }
}

/// Stock per type with its level, most urgent first.
fn classify_all(inventory: &[InventoryEntry], thresholds: &InventoryThresholds) -> Vec<Level> {
    let mut levels: Vec<_> = inventory
        .iter()
        .map(|entry| Level {
            blood_type: entry.blood_type,
            units: entry.units,
            level: thresholds.classify(entry.units),
        })
        .collect();
    levels.sort_by_key(|level| (level.level, level.units, level.blood_type));
    levels
}
