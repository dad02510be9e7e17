use chrono::{DateTime, Utc};
use clap::Args;
use slotwise_core::{ConflictDescriptor, ConflictDetector};

use super::{range, Context};

#[derive(Args)]
pub struct ConflictsArgs {
    /// Candidate start (RFC 3339)
    #[arg(long, required_unless_present = "all", requires = "end")]
    pub start: Option<DateTime<Utc>>,
    /// Candidate end (RFC 3339)
    #[arg(long, required_unless_present = "all", requires = "start")]
    pub end: Option<DateTime<Utc>>,
    /// Report every pairwise conflict inside the event set instead
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub all: bool,
}

pub fn run(ctx: &Context, args: ConflictsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let events = ctx.load_events()?;

    let conflicts = match (args.all, args.start, args.end) {
        (true, _, _) => ConflictDetector::detect_all(&events),
        (false, Some(start), Some(end)) => {
            let candidate = range(start, end)?;
            let prefs = ctx.load_prefs()?;
            ConflictDetector::detect(&candidate, &events, &prefs)
        }
        _ => return Err("either --all or both --start and --end are required".into()),
    };

    ctx.emit(&conflicts, || print_conflicts(&conflicts))
}

fn print_conflicts(conflicts: &[ConflictDescriptor]) {
    if conflicts.is_empty() {
        println!("no conflicts");
        return;
    }
    for conflict in conflicts {
        println!(
            "[{}] {}: {}",
            conflict.severity.as_str(),
            conflict.kind.as_str(),
            conflict.description
        );
    }
}
