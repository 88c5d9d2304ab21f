use anyhow::Result;
use clap::Args;
use pokedex_lib::config::DEFAULT_SCROLL_MARGIN_PX;
use pokedex_lib::view::{load_more_label, ErrorPanel, PaginationControls, END_OF_LIST};
use pokedex_lib::{
    validation, BrowseSession, CachedClient, PageOutcome, PokedexError, ProximityObserver,
    RetryControl, ViewMode, Viewport,
};

use crate::output::{
    print_error_panel, print_json, print_pagination, print_pokemon_table, OutputFormat,
};

/// Simulated layout used to place the end-of-list sentinel.
const ROW_HEIGHT_PX: f64 = 120.0;
const VIEWPORT_HEIGHT_PX: f64 = 800.0;
const SENTINEL_HEIGHT_PX: f64 = 16.0;

#[derive(Args)]
pub struct BrowseArgs {
    /// View mode: infinite or pagination
    #[arg(long, default_value = "infinite")]
    pub mode: String,

    /// Number of pages to load before stopping
    #[arg(long, default_value = "3")]
    pub pages: u32,

    /// Distance in pixels from the viewport at which the next page starts loading
    #[arg(long, default_value_t = DEFAULT_SCROLL_MARGIN_PX)]
    pub margin: f64,
}

pub async fn run(args: &BrowseArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    match validation::parse_mode(&args.mode)? {
        ViewMode::InfiniteScroll => scroll(args, client, format).await,
        ViewMode::Pagination => page_through(args, client, format).await,
    }
}

async fn scroll(args: &BrowseArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    let connectivity = client.connectivity().clone();
    let probe = connectivity.spawn_probe(client.catalog().base_url())?;

    let mut session = BrowseSession::new(
        client.clone(),
        ViewMode::InfiniteScroll,
        connectivity.subscribe(),
    )
    .with_observer(ProximityObserver::new(args.margin));

    let result = scroll_pages(&mut session, args.pages).await;
    probe.abort();
    result?;

    match format {
        OutputFormat::Table => {
            print_pokemon_table(session.items());
            if session.has_more() {
                println!("{}", load_more_label(true, false));
            } else {
                println!("{}", END_OF_LIST);
            }
        }
        OutputFormat::Json => print_json(&session.items()),
    }

    Ok(())
}

/// Scrolls to the bottom after every page until `pages` pages are in or the
/// catalog is exhausted.
async fn scroll_pages(
    session: &mut BrowseSession<CachedClient>,
    pages: u32,
) -> Result<(), PokedexError> {
    let mut loaded = 0;
    let mut next = session.start().await;
    loop {
        let outcome = match next {
            Ok(outcome) => outcome,
            Err(err) => {
                print_error_panel(&ErrorPanel::load_more(&err, session.is_online()));
                recover(session).await?
            }
        };
        match outcome {
            PageOutcome::Loaded { page, added } => {
                loaded += 1;
                eprintln!(
                    "Loaded page {} (+{}, {} total)",
                    page,
                    added,
                    session.items().len()
                );
            }
            PageOutcome::Skipped => break,
        }
        if loaded >= pages || !session.has_more() {
            break;
        }

        let content_height = session.items().len() as f64 * ROW_HEIGHT_PX;
        let viewport = Viewport::at_bottom_of(content_height, VIEWPORT_HEIGHT_PX);
        next = session
            .on_scroll(viewport, content_height, SENTINEL_HEIGHT_PX)
            .await;
    }
    Ok(())
}

/// One "Try Again" when online; otherwise waits for the connection to come
/// back and lets the session retry on its own.
async fn recover(session: &mut BrowseSession<CachedClient>) -> Result<PageOutcome, PokedexError> {
    if session.is_online() {
        return session.retry().await;
    }
    eprintln!("{}", RetryControl::WAITING_FOR_CONNECTION.label);
    loop {
        match session.next_connectivity_change().await {
            Some(Ok(PageOutcome::Skipped)) => continue,
            Some(result) => return result,
            None => {
                return Err(PokedexError::Network(
                    "connectivity monitor stopped".to_string(),
                ))
            }
        }
    }
}

async fn page_through(args: &BrowseArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    let mut page = 1;
    for _ in 0..args.pages {
        let resp = client.get_list(page, ViewMode::Pagination).await?;
        let controls = PaginationControls::new(&resp.pagination, false);

        match format {
            OutputFormat::Table => {
                print_pokemon_table(&resp.items);
                print_pagination(&controls);
            }
            OutputFormat::Json => print_json(&resp),
        }

        if !controls.next_enabled {
            break;
        }
        page += 1;
    }
    Ok(())
}
