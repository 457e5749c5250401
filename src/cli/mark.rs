use bloodlink::{RequestId, RequestStatus};
use clap::Parser;
use tracing::instrument;

use super::{Context, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Move a request to a new status")]
pub struct Mark {
    /// The request to update
    request: RequestId,

    /// The new status
    #[arg(value_enum)]
    status: Target,
}

/// Statuses a request can be moved into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Target {
    Approved,
    Fulfilled,
    Cancelled,
}

impl From<Target> for RequestStatus {
    fn from(target: Target) -> Self {
        match target {
            Target::Approved => Self::Approved,
            Target::Fulfilled => Self::Fulfilled,
            Target::Cancelled => Self::Cancelled,
        }
    }
}

impl Mark {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let mut snapshot = context.load_snapshot()?;

        let Some(request) = snapshot.request_mut(&self.request) else {
            anyhow::bail!("Request {} not found", self.request);
        };
        let previous = request.status;
        request.transition(self.status.into())?;
        let current = request.status;

        context.save_snapshot(&snapshot)?;
        tracing::info!(request = %self.request, %previous, %current, "request updated");

        println!(
            "{}: {previous} -> {}",
            self.request,
            current.to_string().success()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use bloodlink::Snapshot;

    use super::*;

    const SNAPSHOT: &str = "\
requests:
  - { id: r-1, blood_type: O+, units: 2, urgency: emergency, position: { lat: 0, lng: 0 }, created: 2024-03-12T08:00:00Z, status: pending }
";

    fn context(root: &Path) -> Context {
        let snapshot = root.join("snapshot.yaml");
        fs::write(&snapshot, SNAPSHOT).unwrap();
        Context {
            root: root.to_path_buf(),
            snapshot,
            now: "2024-03-12T12:00:00Z".parse().unwrap(),
            min_interval_days: None,
        }
    }

    fn mark(context: &Context, status: Target) -> anyhow::Result<()> {
        Mark {
            request: RequestId::new("r-1").unwrap(),
            status,
        }
        .run(context)
    }

    fn status_on_disk(context: &Context) -> RequestStatus {
        let snapshot = Snapshot::load(&context.snapshot).unwrap();
        snapshot.requests[0].status
    }

    #[test]
    fn walks_the_lifecycle() {
        let tmp = tempfile::tempdir().unwrap();
        let context = context(tmp.path());

        mark(&context, Target::Approved).unwrap();
        assert_eq!(status_on_disk(&context), RequestStatus::Approved);

        mark(&context, Target::Fulfilled).unwrap();
        assert_eq!(status_on_disk(&context), RequestStatus::Fulfilled);
    }

    #[test]
    fn rejected_transition_leaves_file_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let context = context(tmp.path());

        let error = mark(&context, Target::Fulfilled).unwrap_err();

        assert_eq!(
            error.to_string(),
            "Invalid status transition: pending -> fulfilled"
        );
        assert_eq!(fs::read_to_string(&context.snapshot).unwrap(), SNAPSHOT);
    }

    #[test]
    fn unknown_request_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let context = context(tmp.path());

        let error = Mark {
            request: RequestId::new("r-9").unwrap(),
            status: Target::Cancelled,
        }
        .run(&context)
        .unwrap_err();

        assert_eq!(error.to_string(), "Request r-9 not found");
    }
}
