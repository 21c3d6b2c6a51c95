//! Runs a dining table until Ctrl-C.

use clap::Parser;
use dining_table::config::{TableConfig, DEFAULT_SEATS};
use dining_table::lifecycle::{setup_tracing, Table, TableError};
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "dining-table")]
#[command(about = "Dining philosophers with resource-ordered fork acquisition", long_about = None)]
struct Args {
    /// Number of philosophers (and forks), at least 2
    #[arg(short, long, default_value_t = DEFAULT_SEATS)]
    seats: usize,

    /// Length of one tick in milliseconds; eating lasts 1-4 ticks
    #[arg(short, long, value_name = "MS", default_value_t = 1000)]
    tick_ms: u64,

    /// Pause between picking up the first and second fork
    #[arg(long, value_name = "MS", default_value_t = 0)]
    pickup_delay_ms: u64,

    /// Warn when a single fork wait exceeds this
    #[arg(long, value_name = "MS", default_value_t = 30_000)]
    stall_after_ms: u64,

    /// Make SEAT acquire its forks high-index first (fault injection)
    #[arg(long = "reverse", value_name = "SEAT")]
    reversed_seats: Vec<usize>,
}

impl From<Args> for TableConfig {
    fn from(args: Args) -> Self {
        TableConfig {
            seats: args.seats,
            tick: Duration::from_millis(args.tick_ms),
            pickup_delay: Duration::from_millis(args.pickup_delay_ms),
            stall_after: Duration::from_millis(args.stall_after_ms),
            reversed_seats: args.reversed_seats,
            ..TableConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), TableError> {
    setup_tracing();

    let config = TableConfig::from(Args::parse());
    info!(seats = config.seats, "Setting the table");

    let table = Table::open(config, None).await?;
    let summary = table.run_until_ctrl_c().await?;

    for meals in &summary.meals {
        info!(seat = meals.seat, meals = meals.meals, "Meals eaten");
    }
    info!(total = summary.total_meals(), "Dinner is over");
    Ok(())
}
