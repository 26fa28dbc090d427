mod commands;
mod render;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tourplan-cli")]
#[command(about = "Plan, review and save a trip itinerary")]
struct Cli {
    /// Logged-in user id. Without it every change is refused.
    #[arg(long, env = "TOURPLAN_USER_ID", global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the itinerary grouped by day
    Show,
    /// Add a state to the itinerary
    AddState {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Add a city to the itinerary
    AddCity {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        state_id: Option<String>,
        /// State display name
        #[arg(long)]
        state: Option<String>,
    },
    /// Add a place to the itinerary
    AddPlace(PlaceArgs),
    /// Remove an item by its key, e.g. `city:c1`
    Remove { item_id: String },
    /// Change the day, date or notes of an item
    Update(UpdateArgs),
    /// Replace the trip note
    Note { text: String },
    /// Remove every item and the trip note, locally and remotely
    Clear,
}

#[derive(Debug, Args)]
struct PlaceArgs {
    #[arg(long)]
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    city_id: Option<String>,
    #[arg(long)]
    state_id: Option<String>,
    #[arg(long)]
    city_name: Option<String>,
    #[arg(long)]
    state_name: Option<String>,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    item_id: String,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(tourplan_core::MAX_DAYS)))]
    day: Option<u32>,
    /// Calendar date as yyyy-mm-dd
    #[arg(long, conflicts_with = "clear_date")]
    date: Option<chrono::NaiveDate>,
    #[arg(long)]
    clear_date: bool,
    #[arg(long, conflicts_with = "clear_notes")]
    notes: Option<String>,
    #[arg(long)]
    clear_notes: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("tourplan-cli: pass a subcommand, or --help for the list");
        return Ok(());
    };

    let config = tourplan_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    commands::run(&config, cli.user.as_deref(), command).await
}

#[cfg(test)]
mod tests;
