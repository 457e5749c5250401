use std::collections::BTreeSet;

use bloodlink::{
    BloodRequest, Config, DonorId, DonorRecord, MinInterval, RequestStatus, Role, Snapshot,
    Urgency, can_donate,
    domain::{Capability, StockLevel},
    matching, triage,
};
use chrono::NaiveDate;
use clap::Parser;
use tracing::instrument;

use super::{
    Context,
    eligible::Verdict,
    terminal::{self, Colorize},
};

#[derive(Debug, Parser)]
#[command(about = "Show the dashboard for a role")]
pub struct Dashboard {
    /// The role to show the dashboard for
    #[arg(long)]
    role: Role,

    /// The donor whose dashboard to show (donor role only)
    #[arg(long, required_if_eq("role", "donor"))]
    donor: Option<DonorId>,
}

/// Commands unlocked by each capability, in menu order.
const ACTIONS: &[(Capability, &str)] = &[
    (Capability::ToggleAvailability, "bloodlink availability <DONOR> [--off]"),
    (Capability::ViewNearbyDonors, "bloodlink nearby --lat <LAT> --lon <LON>"),
    (Capability::BroadcastEmergency, "bloodlink broadcast <REQUEST>"),
    (
        Capability::CreateRequest,
        "bloodlink request --type <TYPE> --units <N> --lat <LAT> --lon <LON>",
    ),
    (Capability::ManageInventory, "bloodlink inventory --set <TYPE>=<UNITS>"),
    (Capability::TriageRequests, "bloodlink triage"),
    (Capability::TriageRequests, "bloodlink mark <REQUEST> <STATUS>"),
    (Capability::ManageUsers, "bloodlink availability <DONOR> [--off]"),
    (Capability::ViewReports, "bloodlink status"),
];

fn actions(role: Role) -> impl Iterator<Item = &'static str> {
    ACTIONS
        .iter()
        .filter(move |(capability, _)| role.can(*capability))
        .map(|(_, command)| *command)
}

impl Dashboard {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let config = context.load_config()?;
        let snapshot = context.load_snapshot()?;
        let reference = context.reference();

        let tabs: Vec<_> = self
            .role
            .tabs()
            .iter()
            .map(|tab| {
                if *tab == self.role.home() {
                    format!("[{}]", tab.label()).info()
                } else {
                    tab.label().to_string()
                }
            })
            .collect();
        println!("{} | {}", self.role.to_string().to_uppercase(), tabs.join(" | "));
        println!();

        match self.role {
            Role::Donor => {
                let Some(id) = &self.donor else {
                    anyhow::bail!("--donor is required for the donor dashboard");
                };
                let Some(donor) = snapshot.donor(id) else {
                    anyhow::bail!("Donor {id} not found");
                };
                donor_panel(donor, &snapshot, reference, config.min_interval());
            }
            Role::Recipient => recipient_panel(&snapshot, context, &config),
            Role::Hospital => hospital_panel(&snapshot, context, &config),
            Role::Admin => admin_panel(&snapshot),
        }

        let actions: Vec<_> = actions(self.role).collect();
        if !actions.is_empty() {
            println!();
            println!("{}", "Actions".dim());
            for action in actions {
                println!("  {action}");
            }
        }
        Ok(())
    }
}

fn donor_panel(
    donor: &DonorRecord,
    snapshot: &Snapshot,
    reference: NaiveDate,
    interval: MinInterval,
) {
    let verdict = Verdict::of(donor, reference, interval);
    println!("{} ({})", donor.label(), donor.blood_type.to_string().info());
    println!(
        "  Last donation: {}",
        donor
            .last_donation
            .map_or_else(|| "never".to_string(), |date| date.to_string())
    );
    println!("  Status:        {}", terminal::eligibility(verdict.eligible()));
    if verdict == Verdict::TooSoon {
        if let Some(next) = matching::next_eligible_date(donor, interval) {
            println!("  Next donation possible on {next}");
        }
    }
    let recipients = matching::compatible_recipient_types(donor.blood_type)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    println!("  Can give to:   {recipients}");

    println!();
    println!(
        "Total donations {} units, lives impacted {}",
        donor.total_units(),
        donor.lives_impacted()
    );
    for donation in &donor.donations {
        println!(
            "  {}  {:<24} {:>2} unit{}  {}",
            donation.date,
            donation.location.as_deref().unwrap_or("-"),
            donation.units,
            if donation.units.get() == 1 { "" } else { "s" },
            "Completed".success()
        );
    }

    println!();
    let needs: Vec<_> = triage(&snapshot.requests)
        .into_iter()
        .filter(|request| can_donate(donor.blood_type, request.blood_type))
        .collect();
    if needs.is_empty() {
        println!("No pending requests match your blood type.");
        return;
    }
    println!("Requests you could help with");
    for request in needs {
        println!(
            "  {} {:<4} {:>6.1} km  {}",
            terminal::urgency(request.urgency, 10),
            request.blood_type,
            donor.position.distance_km(&request.position),
            request.hospital.as_deref().unwrap_or("-")
        );
    }
}

fn recipient_panel(snapshot: &Snapshot, context: &Context, config: &Config) {
    let counts = StatusCounts::of(&snapshot.requests);
    println!(
        "Pending {}  Approved {}  Fulfilled {}",
        counts.pending, counts.approved, counts.fulfilled
    );
    println!();

    if snapshot.requests.is_empty() {
        println!("No blood requests yet.");
        return;
    }
    println!(
        "{:<10} {:<4} {:>5}  {:<20} {:<10} Status",
        "Request", "Type", "Units", "Hospital", "Priority"
    );
    for request in &snapshot.requests {
        println!(
            "{:<10} {:<4} {:>5}  {:<20} {} {}",
            request.id,
            request.blood_type,
            request.units,
            request.hospital.as_deref().unwrap_or("-"),
            terminal::urgency(request.urgency, 10),
            request.status
        );
    }

    // Nearby donors are shown around the most urgent open request.
    let Some(first) = triage(&snapshot.requests).into_iter().next() else {
        return;
    };
    let radius = config.broadcast_radius;
    let nearby = matching::nearby(&first.position, &snapshot.donors, radius);
    let ready = nearby
        .iter()
        .filter(|(donor, _)| {
            can_donate(donor.blood_type, first.blood_type)
                && bloodlink::is_eligible(donor, context.reference(), config.min_interval())
        })
        .count();
    println!();
    println!(
        "{} donors within {} km of {}, {ready} compatible and eligible",
        nearby.len(),
        radius.km(),
        first.id
    );
}

fn hospital_panel(snapshot: &Snapshot, context: &Context, config: &Config) {
    println!("Stock");
    for entry in &snapshot.inventory {
        let level = config.inventory.classify(entry.units);
        println!(
            "  {:<4} {:>5}  {}",
            entry.blood_type,
            entry.units,
            terminal::stock_level(level, 8)
        );
    }
    let short = snapshot
        .inventory
        .iter()
        .filter(|entry| config.inventory.classify(entry.units) != StockLevel::Stable)
        .count();
    if short > 0 {
        println!("{}", format!("  {short} types below target").warning());
    }

    println!();
    let emergencies: Vec<_> = triage(&snapshot.requests)
        .into_iter()
        .filter(|request| request.urgency == Urgency::Emergency)
        .collect();
    if emergencies.is_empty() {
        println!("No pending emergencies.");
        return;
    }
    println!("Emergencies");
    for request in emergencies {
        let reachable = matching::broadcast(
            request,
            &snapshot.donors,
            context.reference(),
            config.min_interval(),
            config.broadcast_radius,
        );
        let summary = format!(
            "  {:<10} {} × {:<4} {:>3} donors within {} km",
            request.id,
            request.units,
            request.blood_type,
            reachable.len(),
            config.broadcast_radius.km()
        );
        if reachable.is_empty() {
            println!("{}", summary.danger());
        } else {
            println!("{summary}");
        }
    }
}

fn admin_panel(snapshot: &Snapshot) {
    let report = Report::of(snapshot);
    println!("Total donors     {}", report.donors);
    println!("Active requests  {}", report.active_requests);
    println!("Hospitals        {}", report.hospitals);
    println!(
        "Success rate     {}",
        report
            .success_rate()
            .map_or_else(|| "-".to_string(), |rate| format!("{:.0}%", rate * 100.0))
    );
}

#[derive(Debug, Default, PartialEq, Eq)]
struct StatusCounts {
    pending: usize,
    approved: usize,
    fulfilled: usize,
    cancelled: usize,
}

impl StatusCounts {
    fn of(requests: &[BloodRequest]) -> Self {
        let mut counts = Self::default();
        for request in requests {
            match request.status {
                RequestStatus::Pending => counts.pending += 1,
                RequestStatus::Approved => counts.approved += 1,
                RequestStatus::Fulfilled => counts.fulfilled += 1,
                RequestStatus::Cancelled => counts.cancelled += 1,
            }
        }
        counts
    }
}

/// Service-wide figures for the admin dashboard.
#[derive(Debug, PartialEq, Eq)]
struct Report {
    donors: usize,
    active_requests: usize,
    hospitals: usize,
    requests: StatusCounts,
}

impl Report {
    fn of(snapshot: &Snapshot) -> Self {
        let requests = StatusCounts::of(&snapshot.requests);
        Self {
            donors: snapshot.donors.len(),
            active_requests: requests.pending + requests.approved,
            hospitals: snapshot
                .requests
                .iter()
                .filter_map(|request| request.hospital.as_deref())
                .collect::<BTreeSet<_>>()
                .len(),
            requests,
        }
    }

    /// Share of closed requests that were fulfilled rather than cancelled.
    #[allow(clippy::cast_precision_loss)]
    fn success_rate(&self) -> Option<f64> {
        let closed = self.requests.fulfilled + self.requests.cancelled;
        if closed == 0 {
            return None;
        }
        Some(self.requests.fulfilled as f64 / closed as f64)
    }
}
