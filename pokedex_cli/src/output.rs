use pokedex_lib::view::{
    format_id, format_stat_name, stat_bar, ErrorKind, ErrorPanel, PaginationControls,
};
use pokedex_lib::{DetailItem, ListItem};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Width of a stat bar in the detail view, in cells.
const STAT_BAR_WIDTH: usize = 20;

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Tabled, Serialize)]
struct PokemonRow {
    #[tabled(rename = "#")]
    #[serde(rename = "#")]
    number: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Types")]
    #[serde(rename = "Types")]
    types: String,
    #[tabled(rename = "Sprite")]
    #[serde(rename = "Sprite")]
    sprite: String,
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Stat")]
    name: String,
    #[tabled(rename = "Value")]
    value: u32,
    #[tabled(rename = "")]
    bar: String,
}

// -- Row builders --

fn build_pokemon_rows(items: &[ListItem]) -> Vec<PokemonRow> {
    items
        .iter()
        .map(|p| PokemonRow {
            number: format_id(p.id),
            name: p.name.clone(),
            types: p.categories.join(", "),
            sprite: p.image_ref.clone(),
        })
        .collect()
}

fn build_stat_rows(detail: &DetailItem) -> Vec<StatRow> {
    detail
        .stats
        .iter()
        .map(|s| StatRow {
            name: format_stat_name(&s.name),
            value: s.value,
            bar: stat_bar(s.value, STAT_BAR_WIDTH),
        })
        .collect()
}

// -- Text rendering --

fn render_detail(detail: &DetailItem) -> String {
    let mut out = format!(
        "{} {}\nTypes:  {}\nHeight: {} m\nWeight: {} kg\n",
        format_id(detail.id),
        detail.name,
        detail.categories.join(", "),
        detail.height,
        detail.weight,
    );
    if !detail.large_image_ref.is_empty() {
        out.push_str(&format!("Image:  {}\n", detail.large_image_ref));
    }
    if !detail.stats.is_empty() {
        let mut table = Table::new(build_stat_rows(detail));
        table.with(Style::rounded());
        out.push('\n');
        out.push_str(&table.to_string());
        out.push('\n');
    }
    out
}

fn render_pagination(controls: &PaginationControls) -> String {
    let previous = if controls.previous_enabled { "< Previous" } else { "" };
    let next = if controls.next_enabled { "Next >" } else { "" };
    let range = if controls.is_empty() {
        "0".to_string()
    } else {
        format!("{}-{}", controls.start_item, controls.end_item)
    };
    format!(
        "{}\nShowing {}   {}   {}   {}",
        controls.summary(),
        range,
        previous,
        controls.strip(),
        next
    )
    .trim_end()
    .to_string()
}

fn render_error_panel(panel: &ErrorPanel) -> String {
    let marker = match panel.kind {
        ErrorKind::Offline => "[offline]",
        ErrorKind::ConnectionError => "[connection error]",
        ErrorKind::LoadFailed | ErrorKind::Boundary => "[error]",
    };
    let action = if panel.retry.enabled {
        format!("[ {} ]", panel.retry.label)
    } else {
        format!("( {} )", panel.retry.label)
    };
    format!("{} {}\n{}\n{}", marker, panel.title, panel.message, action)
}

// -- Table output --

pub fn print_pokemon_table(items: &[ListItem]) {
    println!("{}", Table::new(build_pokemon_rows(items)));
}

pub fn print_detail(detail: &DetailItem) {
    print!("{}", render_detail(detail));
}

pub fn print_pagination(controls: &PaginationControls) {
    println!("{}", render_pagination(controls));
}

/// Error panels go to stderr so JSON on stdout stays parseable.
pub fn print_error_panel(panel: &ErrorPanel) {
    eprintln!("{}", render_error_panel(panel));
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
