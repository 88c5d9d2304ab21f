use anyhow::Result;
use clap::Args;
use pokedex_lib::view::NOT_FOUND;
use pokedex_lib::{CachedClient, Route};

use super::list::{self, ListArgs};
use super::show;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct OpenArgs {
    /// Route path: `/` for the listing, `/pokemon/{id}` for a detail page
    pub path: String,
}

pub async fn run(args: &OpenArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    match Route::parse(&args.path) {
        Route::Home => {
            let home = ListArgs {
                page: 1,
                mode: "pagination".to_string(),
            };
            list::run(&home, client, format).await
        }
        Route::Detail(id) => show::show(id, client, format).await,
        Route::NotFound => {
            eprintln!("{}: {}", NOT_FOUND, args.path);
            Ok(())
        }
    }
}
