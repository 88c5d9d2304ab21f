mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pokedex_lib::pokeapi::DEFAULT_BASE_URL;
use pokedex_lib::view::ErrorPanel;
use pokedex_lib::{CachedClient, PokedexError, QueryCache, RetryPolicy};

use crate::output::{print_error_panel, OutputFormat};

#[derive(Parser)]
#[command(name = "pokedex")]
#[command(about = "Browse the Pokémon catalog from PokéAPI")]
struct Cli {
    /// Output format: table or json
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// API root URL
    #[arg(long, default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one listing page
    List(commands::list::ListArgs),
    /// Show a single Pokémon
    Show(commands::show::ShowArgs),
    /// Scroll through the catalog, loading pages as the end comes into view
    Browse(commands::browse::BrowseArgs),
    /// Open a route such as `/` or `/pokemon/25`
    Open(commands::open::OpenArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pokedex=info".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };

    let client = CachedClient::with_base_url(&cli.base_url, QueryCache::new())?
        .with_retry_policy(RetryPolicy::from_env());

    // Top-level boundary: a failed run is reported and run once more.
    if let Err(err) = dispatch(&cli.command, &client, &format).await {
        print_error_panel(&panel_for(&err));
        if is_invalid_input(&err) {
            return Err(err);
        }
        tracing::info!("Retrying once");
        if let Err(err) = dispatch(&cli.command, &client, &format).await {
            print_error_panel(&panel_for(&err));
            return Err(err);
        }
    }

    Ok(())
}

async fn dispatch(command: &Commands, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    match command {
        Commands::List(args) => commands::list::run(args, client, format).await,
        Commands::Show(args) => commands::show::run(args, client, format).await,
        Commands::Browse(args) => commands::browse::run(args, client, format).await,
        Commands::Open(args) => commands::open::run(args, client, format).await,
    }
}

fn panel_for(err: &anyhow::Error) -> ErrorPanel {
    match err.downcast_ref::<PokedexError>() {
        Some(e) => ErrorPanel::load_failed(e),
        None => ErrorPanel::boundary(&err.to_string()),
    }
}

/// Bad arguments fail the same way on every run.
fn is_invalid_input(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<PokedexError>(),
        Some(PokedexError::InvalidInput(_))
    )
}
