use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use itertools::Itertools;
use paddock::{
    AppConfig, DriverDataSource, ErrorReporter, FlagTable, LogReporter, PaddockError,
    card::{self, Crumb, DriverCard, Portrait},
    table::{self, ColumnDescriptor, RaceRow, TableState},
};
use tokio::runtime::Runtime;

/// Fetches a driver's season and prints the card and the results table.
pub(crate) fn print_driver(
    runtime: &Runtime,
    source: &dyn DriverDataSource,
    flags: &FlagTable,
    config: &AppConfig,
    driver_id: &str,
    table_state: &TableState,
) -> Result<(), PaddockError> {
    let profile = runtime
        .block_on(source.fetch_driver(&config.season, driver_id))
        .inspect_err(|e| LogReporter.report(driver_id, e))?;

    let card = DriverCard::build(&profile.standing, flags, config.asset_dir.as_deref());
    println!("{}", render_breadcrumbs(&card::breadcrumbs(&profile.standing)));
    println!();
    println!("{}", render_card(&card));
    println!();

    let rows = table::project_rows(&profile.races, flags);
    let columns = table::columns(&profile.races);
    println!("{}", render_table(&columns, &table_state.visible_rows(&rows)));
    Ok(())
}

fn render_breadcrumbs(crumbs: &[Crumb]) -> String {
    crumbs.iter().map(|crumb| crumb.label.as_str()).join(" / ")
}

fn render_card(card: &DriverCard) -> String {
    let mut lines = vec![
        "Driver Details".to_string(),
        format!(
            "Name: {} [{}]",
            card.full_name,
            card.flag_code.as_deref().unwrap_or("--")
        ),
        format!("Team: {}", card.team.as_deref().unwrap_or("-")),
        format!("Birth: {}", card.date_of_birth),
    ];
    if let Some(position) = card.championship_position {
        lines.push(format!(
            "Championship: P{} with {} points and {} wins",
            position, card.points, card.wins
        ));
    }
    if !card.biography_url.is_empty() {
        lines.push(format!("Biography: {}", card.biography_url));
    }
    if let Portrait::File(path) = &card.portrait {
        lines.push(format!("Portrait: {}", path.display()));
    }
    lines.join("\n")
}

fn render_table(columns: &[ColumnDescriptor], rows: &[&RaceRow]) -> Table {
    let mut results = Table::new();
    results
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(columns.iter().map(|c| c.title).collect_vec());

    for row in rows {
        let (r, g, b) = row.position_color().rgb();
        let grand_prix = match &row.flag_code {
            Some(code) => format!("[{}] {}", code, row.race_name),
            None => row.race_name.clone(),
        };
        results.add_row(vec![
            Cell::new(row.round),
            Cell::new(grand_prix),
            Cell::new(&row.team),
            Cell::new(row.grid),
            Cell::new(&row.position)
                .bg(Color::Rgb { r, g, b })
                .fg(Color::White),
        ]);
    }
    results
}
