use chrono::{DateTime, Utc};
use clap::Args;
use slotwise_core::{Suggestion, SuggestionGenerator};

use super::{format_interval, range, Context};

#[derive(Args)]
pub struct SuggestArgs {
    /// Start of the range (RFC 3339)
    #[arg(long)]
    pub from: DateTime<Utc>,
    /// End of the range (RFC 3339)
    #[arg(long)]
    pub to: DateTime<Utc>,
    /// Only suggest the best time for a new meeting
    #[arg(long)]
    pub optimal: bool,
    /// Meeting length in minutes for --optimal (default: preferred duration)
    #[arg(long, requires = "optimal")]
    pub duration: Option<i64>,
    /// Invited attendee for --optimal (repeatable)
    #[arg(long = "attendee", value_name = "ID", requires = "optimal")]
    pub attendees: Vec<String>,
}

pub fn run(ctx: &Context, args: SuggestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let window = range(args.from, args.to)?;
    let prefs = ctx.load_prefs()?;
    let events = ctx.load_events()?;
    let generator = SuggestionGenerator::new();

    let suggestions: Vec<Suggestion> = if args.optimal {
        let duration = args.duration.unwrap_or(prefs.preferred_duration_minutes());
        generator
            .optimal_time(duration, &events, &window, &prefs, &args.attendees)
            .into_iter()
            .collect()
    } else {
        generator.generate(&events, &window, &prefs)
    };

    ctx.emit(&suggestions, || print_suggestions(&suggestions))
}

fn print_suggestions(suggestions: &[Suggestion]) {
    if suggestions.is_empty() {
        println!("no suggestions");
        return;
    }
    for suggestion in suggestions {
        println!(
            "[{:.2}] {}: {}",
            suggestion.confidence, suggestion.kind, suggestion.title
        );
        println!("       {}", format_interval(suggestion.target_slot.interval()));
        println!("       {}", suggestion.description);
    }
}
