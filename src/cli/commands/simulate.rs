//! Headless download simulation

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::catalog::{GameId, Variant};
use crate::cli::output::{OutputFormat, print_formatted, print_success};
use crate::config::Config;
use crate::library::LibraryState;
use crate::simulator::{RandomSpeed, SpeedSource};
use crate::view::{self, CardAction, CardView};

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Game id from the built-in catalog
    pub id: GameId,

    /// Number of ticks to apply
    #[arg(long, default_value_t = 100)]
    pub ticks: u32,

    /// Cancel after this many ticks
    #[arg(long)]
    pub cancel_after: Option<u32>,

    /// Seed for the speed samples
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

#[derive(Debug, Serialize)]
struct SimulationResult {
    ticks_applied: u32,
    cancelled: bool,
    card: CardView,
}

pub async fn run(args: SimulateArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let config = Config::load()?;
    let (min_speed, max_speed) = config.simulator.speed_range();
    let mut speeds = RandomSpeed::seeded(min_speed, max_speed, args.seed);

    let result = simulate(&args, &mut speeds)?;
    if result.cancelled {
        print_success(
            &format!("Cancelled after {} ticks", result.ticks_applied),
            quiet || format == OutputFormat::Json,
        );
    }
    print_formatted(&result, format, |r| format_card_text(&r.card));
    Ok(())
}

fn simulate(args: &SimulateArgs, speeds: &mut dyn SpeedSource) -> Result<SimulationResult> {
    let mut state = LibraryState::for_variant(Variant::Simulated);
    let Some(record) = state.record(args.id) else {
        anyhow::bail!("No game with id {} in the built-in catalog", args.id);
    };
    if record.locked {
        tracing::warn!("{} is locked; nothing to simulate", record.title);
    }

    state = state.start(args.id, speeds);

    let mut ticks_applied = 0;
    let mut cancelled = false;
    for _ in 0..args.ticks {
        if args.cancel_after == Some(ticks_applied) {
            state = state.cancel(args.id);
            cancelled = true;
            break;
        }
        if !state.is_in_flight(args.id) {
            break;
        }
        state = state.tick(args.id, speeds);
        ticks_applied += 1;
    }
    if !cancelled && args.cancel_after == Some(ticks_applied) && state.is_in_flight(args.id) {
        state = state.cancel(args.id);
        cancelled = true;
    }

    let view = view::build(&state);
    let Some(card) = view.cards.into_iter().find(|c| c.id == args.id) else {
        anyhow::bail!("Game {} disappeared from the catalog", args.id);
    };

    Ok(SimulationResult {
        ticks_applied,
        cancelled,
        card,
    })
}

fn format_card_text(card: &CardView) -> String {
    let status = match &card.action {
        CardAction::Downloading {
            progress,
            speed,
            remaining,
        } => {
            let mut text = format!("Downloading {}% at {}", progress, view::speed_label(*speed));
            if let Some(remaining) = remaining {
                text.push_str(&format!(", {} remaining", remaining));
            }
            text
        }
        other => other.label().to_string(),
    };
    format!("{} ({}): {}", card.title, card.size, status)
}
