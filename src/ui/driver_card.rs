use egui::{Color32, CornerRadius, Frame, Image, Layout, Margin, RichText, Ui};
use paddock::{
    AppConfig, DriverStanding, FlagTable,
    card::{DriverCard, Portrait},
};

use super::{FLAG_SIZE, PALETTE_BROWN, flag_badge};

const PORTRAIT_WIDTH: f32 = 220.;

pub(crate) fn show(ui: &mut Ui, standing: &DriverStanding, flags: &FlagTable, config: &AppConfig) {
    let card = DriverCard::build(standing, flags, config.asset_dir.as_deref());

    Frame::new()
        .fill(PALETTE_BROWN)
        .corner_radius(CornerRadius::same(8))
        .inner_margin(Margin::same(12))
        .show(ui, |ui| {
            ui.label(
                RichText::new("Driver Details")
                    .color(Color32::WHITE)
                    .size(18.)
                    .strong(),
            );
            ui.separator();
            ui.with_layout(Layout::left_to_right(egui::Align::Min), |ui| {
                portrait(ui, &card.portrait);
                ui.add_space(16.);
                ui.vertical(|ui| details(ui, &card));
            });
        });
}

fn portrait(ui: &mut Ui, portrait: &Portrait) {
    let image = match portrait {
        Portrait::File(path) => Image::new(format!("file://{}", path.display())),
        Portrait::Placeholder => Image::new(egui::include_image!("../../assets/driver-placeholder.svg")),
    };
    ui.add(image.max_width(PORTRAIT_WIDTH).corner_radius(CornerRadius::same(8)));
}

fn details(ui: &mut Ui, card: &DriverCard) {
    flag_badge(ui, FLAG_SIZE, card.flag_code.as_deref());
    ui.add_space(6.);
    ui.label(white(format!("Name: {}", card.full_name)));
    ui.label(white(format!("Team: {}", card.team.as_deref().unwrap_or("-"))));
    ui.label(white(format!("Birth: {}", card.date_of_birth)));
    if let Some(position) = card.championship_position {
        ui.label(white(format!(
            "Championship: P{} ({} pts, {} wins)",
            position, card.points, card.wins
        )));
    }
    if !card.biography_url.is_empty() {
        ui.add_space(6.);
        ui.hyperlink_to("🔍 Biography", &card.biography_url);
    }
}

fn white(text: String) -> RichText {
    RichText::new(text).color(Color32::WHITE)
}
