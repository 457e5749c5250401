use std::path::{Path, PathBuf};

mod availability;
mod broadcast;
mod compat;
mod dashboard;
mod eligible;
mod init;
mod inventory;
mod mark;
mod nearby;
mod rank;
mod request;
mod status;
mod terminal;
mod triage;

use anyhow::Context as _;
use availability::Availability;
use bloodlink::{Config, Snapshot};
use broadcast::Broadcast;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::ArgAction;
use compat::Compat;
use dashboard::Dashboard;
use eligible::Eligible;
use inventory::Inventory;
use mark::Mark;
use nearby::Nearby;
use rank::Rank;
use request::Request;
use status::Status;
use triage::Triage;

/// Directory under the root holding local settings.
const CONFIG_DIR: &str = ".bloodlink";

fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR).join("config.toml")
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The working directory holding `.bloodlink/config.toml`
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// Snapshot of donors, requests and stock (YAML or JSON).
    ///
    /// Defaults to `snapshot.yaml` in the root directory.
    #[arg(short, long, global = true, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Evaluate eligibility as of this date (YYYY-MM-DD, default today)
    #[arg(long, global = true, value_name = "DATE")]
    on: Option<NaiveDate>,

    /// Override the configured minimum days between donations
    #[arg(long, global = true, value_name = "DAYS", allow_negative_numbers = true)]
    min_interval_days: Option<i64>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let context = Context {
            snapshot: self
                .snapshot
                .unwrap_or_else(|| self.root.join("snapshot.yaml")),
            root: self.root,
            now: clock(self.on),
            min_interval_days: self.min_interval_days,
        };
        tracing::debug!(?context, "resolved context");

        self.command
            .unwrap_or_else(|| Command::Status(Status::default()))
            .run(&context)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// The wall clock, unless `--on` pins evaluation to a past or future day.
fn clock(on: Option<NaiveDate>) -> DateTime<Utc> {
    on.map_or_else(Utc::now, end_of_day)
}

/// The last second of `date`, so every request created that day has waited
/// a non-negative time.
fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
        .and_utc()
}

/// Everything a command needs besides its own arguments.
#[derive(Debug)]
pub struct Context {
    root: PathBuf,
    snapshot: PathBuf,
    now: DateTime<Utc>,
    min_interval_days: Option<i64>,
}

impl Context {
    fn root(&self) -> &Path {
        &self.root
    }

    /// Loads the snapshot named on the command line.
    fn load_snapshot(&self) -> anyhow::Result<Snapshot> {
        Snapshot::load(&self.snapshot)
            .with_context(|| format!("Failed to load snapshot {}", self.snapshot.display()))
    }

    /// Writes an edited snapshot back to where it was loaded from.
    fn save_snapshot(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        snapshot
            .save(&self.snapshot)
            .with_context(|| format!("Failed to write snapshot {}", self.snapshot.display()))
    }

    /// Loads `.bloodlink/config.toml` (or the defaults), applying any
    /// command-line override.
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config =
            Config::load_or_default(&config_path(&self.root)).map_err(anyhow::Error::msg)?;
        if let Some(days) = self.min_interval_days {
            config.set_min_interval_days(days)?;
        }
        Ok(config)
    }

    /// The date eligibility is evaluated on.
    fn reference(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// The instant waiting times are measured to: the wall clock, or the end
    /// of the `--on` day.
    const fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show pool, queue and stock totals (default)
    Status(Status),

    /// Create a `.bloodlink` directory with default settings
    Init(init::Init),

    /// Show which blood types are compatible
    Compat(Compat),

    /// Check whether a donor may donate
    Eligible(Eligible),

    /// Rank eligible donors for a request
    Rank(Rank),

    /// List the donors an emergency alert would reach
    Broadcast(Broadcast),

    /// Show pending requests in service order
    Triage(Triage),

    /// Raise a new blood request
    Request(Request),

    /// Move a request to a new status
    Mark(Mark),

    /// Switch a donor's availability on or off
    Availability(Availability),

    /// Show blood stock levels
    Inventory(Inventory),

    /// List donors near a location
    Nearby(Nearby),

    /// Show the dashboard for a role
    Dashboard(Dashboard),
}

impl Command {
    fn run(self, context: &Context) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(context)?,
            Self::Init(command) => command.run(context.root())?,
            Self::Compat(command) => command.run()?,
            Self::Eligible(command) => command.run(context)?,
            Self::Rank(command) => command.run(context)?,
            Self::Broadcast(command) => command.run(context)?,
            Self::Triage(command) => command.run(context)?,
            Self::Request(command) => command.run(context)?,
            Self::Mark(command) => command.run(context)?,
            Self::Availability(command) => command.run(context)?,
            Self::Inventory(command) => command.run(context)?,
            Self::Nearby(command) => command.run(context)?,
            Self::Dashboard(command) => command.run(context)?,
        }
        Ok(())
    }
}

/// Output formats shared by the listing commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn status_is_the_default_command() {
        let cli = Cli::try_parse_from(["bloodlink"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.root, PathBuf::from("."));
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "bloodlink",
            "rank",
            "r-1",
            "--on",
            "2024-03-12",
            "--snapshot",
            "pool.json",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.on, NaiveDate::from_ymd_opt(2024, 3, 12));
        assert_eq!(cli.snapshot, Some(PathBuf::from("pool.json")));
        assert!(matches!(cli.command, Some(Command::Rank(_))));
    }

    #[test]
    fn rejects_unknown_blood_type() {
        let result = Cli::try_parse_from(["bloodlink", "compat", "C+"]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_malformed_date() {
        let result = Cli::try_parse_from(["bloodlink", "--on", "12/03/2024"]);
        assert!(result.is_err());
    }

    #[test]
    fn mark_takes_a_known_status() {
        let cli = Cli::try_parse_from(["bloodlink", "mark", "r-1", "approved"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Mark(_))));

        assert!(Cli::try_parse_from(["bloodlink", "mark", "r-1", "pending"]).is_err());
    }

    #[test]
    fn on_date_fixes_the_clock_at_end_of_day() {
        let now = clock("2024-03-12".parse().ok());
        assert_eq!(now.to_rfc3339(), "2024-03-12T23:59:59+00:00");
    }

    #[test]
    fn clock_is_live_without_on_date() {
        let before = Utc::now();
        let now = clock(None);
        assert!(now >= before);
        assert!(now <= Utc::now());
    }

    #[test]
    fn request_needs_type_units_and_position() {
        let cli = Cli::try_parse_from([
            "bloodlink", "request", "--type", "AB-", "--units", "2", "--urgency", "emergency",
            "--lat", "40.7", "--lon", "-74.0",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Command::Request(_))));

        assert!(Cli::try_parse_from(["bloodlink", "request", "--type", "AB-"]).is_err());
        assert!(
            Cli::try_parse_from([
                "bloodlink", "request", "--type", "AB-", "--units", "0", "--lat", "0", "--lon", "0",
            ])
            .is_err()
        );
    }

    #[test]
    fn config_lives_under_dot_directory() {
        assert_eq!(
            config_path(Path::new("/srv")),
            PathBuf::from("/srv/.bloodlink/config.toml")
        );
    }
}
