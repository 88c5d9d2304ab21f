use anyhow::Result;
use clap::Args;
use pokedex_lib::view::PaginationControls;
use pokedex_lib::{validation, CachedClient};

use crate::output::{print_json, print_pagination, print_pokemon_table, OutputFormat};

#[derive(Args)]
pub struct ListArgs {
    /// Page number (1-indexed)
    #[arg(long, default_value = "1")]
    pub page: i64,

    /// View mode: pagination or infinite
    #[arg(long, default_value = "pagination")]
    pub mode: String,
}

pub async fn run(args: &ListArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    let page = validation::validate_page(args.page)?;
    let mode = validation::parse_mode(&args.mode)?;

    let resp = client.get_list(page, mode).await?;
    let controls = PaginationControls::new(&resp.pagination, false);

    eprintln!("{}", controls.summary());

    match format {
        OutputFormat::Table => {
            print_pokemon_table(&resp.items);
            print_pagination(&controls);
        }
        OutputFormat::Json => print_json(&resp),
    }

    Ok(())
}
