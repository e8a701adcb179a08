use egui::{Align, Color32, CornerRadius, Frame, Layout, Margin, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use paddock::{
    FlagTable, RaceResult,
    table::{self, ColumnDescriptor, ColumnKey, RaceRow, SortOrder, TableState},
};

use super::flag_badge;

const ROW_HEIGHT: f32 = 30.;
const HEADER_HEIGHT: f32 = 26.;
const ROW_FLAG_SIZE: f32 = 40.;
const MIN_GRAND_PRIX_WIDTH: f32 = 220.;

pub(crate) fn show(ui: &mut Ui, races: &[RaceResult], flags: &FlagTable, state: &mut TableState) {
    let rows = table::project_rows(races, flags);
    let columns = table::columns(races);
    let visible = state.visible_rows(&rows);
    let available_width = ui.available_width();

    let mut builder = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center));
    for column in &columns {
        builder = builder.column(match column.width {
            Some(share) => Column::initial(available_width * share).at_least(MIN_GRAND_PRIX_WIDTH),
            None if column.key == ColumnKey::RacePosition => Column::remainder(),
            None => Column::auto().at_least(60.),
        });
    }

    builder
        .header(HEADER_HEIGHT, |mut header| {
            for column in &columns {
                header.col(|ui| header_cell(ui, column, state));
            }
        })
        .body(|mut body| {
            for row in &visible {
                body.row(ROW_HEIGHT, |mut table_row| {
                    for column in &columns {
                        table_row.col(|ui| body_cell(ui, column.key, row));
                    }
                });
            }
        });

    if let Some(message) = state.empty_message(&rows) {
        ui.add_space(10.);
        ui.label(RichText::new(message).color(Color32::GRAY));
    }
}

fn header_cell(ui: &mut Ui, column: &ColumnDescriptor, state: &mut TableState) {
    if column.sortable {
        let arrow = match state.sort {
            None => "⬍",
            Some(SortOrder::Ascending) => "⬆",
            Some(SortOrder::Descending) => "⬇",
        };
        if ui
            .button(RichText::new(format!("{} {}", column.title, arrow)).strong())
            .clicked()
        {
            state.cycle_sort();
        }
        return;
    }

    ui.label(RichText::new(column.title).strong());
    if !column.filters.is_empty() {
        let active = state.selected_filters.len();
        let label = if active > 0 {
            format!("Filter ({active})")
        } else {
            "Filter".to_string()
        };
        ui.menu_button(label, |ui| filter_menu(ui, column, state));
    }
}

fn filter_menu(ui: &mut Ui, column: &ColumnDescriptor, state: &mut TableState) {
    if column.filter_search {
        ui.add(
            egui::TextEdit::singleline(&mut state.filter_search)
                .hint_text("Search in filters")
                .desired_width(200.),
        );
        ui.separator();
    }
    egui::ScrollArea::vertical()
        .max_height(300.)
        .show(ui, |ui| {
            for option in table::search_filters(&column.filters, &state.filter_search) {
                let mut checked = state.selected_filters.contains(&option.value);
                if ui.checkbox(&mut checked, option.text.as_str()).changed() {
                    state.toggle_filter(&option.value);
                }
            }
        });
    ui.separator();
    if ui.button("Reset").clicked() {
        state.clear_filters();
        ui.close();
    }
}

fn body_cell(ui: &mut Ui, key: ColumnKey, row: &RaceRow) {
    match key {
        ColumnKey::Round => {
            ui.label(row.round.to_string());
        }
        ColumnKey::GrandPrix => {
            flag_badge(ui, ROW_FLAG_SIZE, row.flag_code.as_deref());
            ui.add_space(5.);
            ui.label(row.race_name.as_str());
        }
        ColumnKey::Team => {
            ui.label(row.team.as_str());
        }
        ColumnKey::Grid => {
            ui.label(row.grid.to_string());
        }
        ColumnKey::RacePosition => {
            let (r, g, b) = row.position_color().rgb();
            Frame::new()
                .fill(Color32::from_rgb(r, g, b))
                .corner_radius(CornerRadius::same(4))
                .inner_margin(Margin::symmetric(10, 2))
                .show(ui, |ui| {
                    ui.label(
                        RichText::new(row.position.to_string())
                            .color(Color32::WHITE)
                            .strong(),
                    );
                });
        }
    }
}
