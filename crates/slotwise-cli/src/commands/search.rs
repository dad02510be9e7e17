use chrono::{DateTime, Utc};
use clap::Args;
use slotwise_core::{SearchConfig, SlotSearch, TimeSlot};

use super::{format_interval, range, Context};

#[derive(Args)]
pub struct SearchArgs {
    /// Meeting length in minutes (default: preferred duration)
    #[arg(long)]
    pub duration: Option<i64>,
    /// Start of the search range (RFC 3339)
    #[arg(long)]
    pub from: DateTime<Utc>,
    /// End of the search range (RFC 3339)
    #[arg(long)]
    pub to: DateTime<Utc>,
    /// Invited attendee (repeatable)
    #[arg(long = "attendee", value_name = "ID")]
    pub attendees: Vec<String>,
    /// Maximum number of slots
    #[arg(long, default_value_t = 10)]
    pub top: usize,
    /// Only consider slots inside working hours
    #[arg(long)]
    pub working_hours_only: bool,
    /// Skip days that already hold the maximum number of meetings
    #[arg(long)]
    pub daily_limit: bool,
}

pub fn run(ctx: &Context, args: SearchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let window = range(args.from, args.to)?;
    let prefs = ctx.load_prefs()?;
    let events = ctx.load_events()?;
    let duration = args.duration.unwrap_or(prefs.preferred_duration_minutes());

    let search = SlotSearch::with_config(SearchConfig {
        top_n: args.top,
        working_hours_only: args.working_hours_only,
        enforce_daily_limit: args.daily_limit,
        ..SearchConfig::default()
    });
    let slots = search.search(duration, &events, &window, &prefs, &args.attendees);

    ctx.emit(&slots, || print_slots(&slots))
}

fn print_slots(slots: &[TimeSlot]) {
    if slots.is_empty() {
        println!("no viable slots");
        return;
    }
    for slot in slots {
        println!(
            "{:.2}  {}  {}",
            slot.score(),
            format_interval(slot.interval()),
            slot.reasons().join("; ")
        );
    }
}
