use chrono::{DateTime, Utc};
use clap::Args;
use slotwise_core::layout_span;

use super::{format_interval, range, Context};

#[derive(Args)]
pub struct LayoutArgs {
    /// Start of the visible span (RFC 3339)
    #[arg(long)]
    pub from: DateTime<Utc>,
    /// End of the visible span (RFC 3339)
    #[arg(long)]
    pub to: DateTime<Utc>,
}

pub fn run(ctx: &Context, args: LayoutArgs) -> Result<(), Box<dyn std::error::Error>> {
    let span = range(args.from, args.to)?;
    let events = ctx.load_events()?;
    let layout = layout_span(&events, &span);

    ctx.emit(&layout, || {
        println!("{} ({} lanes)", format_interval(&span), layout.lane_count);
        for (id, lane) in &layout.lanes {
            println!("  {lane}  {id}");
        }
    })
}
