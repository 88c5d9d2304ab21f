use anyhow::Result;
use clap::Args;
use pokedex_lib::{validation, CachedClient};

use crate::output::{print_detail, print_json, OutputFormat};

#[derive(Args)]
pub struct ShowArgs {
    /// Pokédex number, e.g. 25
    pub id: String,
}

pub async fn run(args: &ShowArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    let id = validation::parse_id(&args.id)?;
    show(id, client, format).await
}

/// Renders one detail record. Shared with route opening.
pub async fn show(id: u32, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    let detail = client.get_detail(id).await?;

    match format {
        OutputFormat::Table => print_detail(&detail),
        OutputFormat::Json => print_json(&detail),
    }

    Ok(())
}
