mod driver_card;
mod results_table;

use egui::{Color32, CornerRadius, Frame, Key, Margin, RichText, Ui, Visuals, style::Widgets};
use log::{error, info};
use paddock::{
    AppConfig, FlagTable, StoredConfig, ViewController, ViewState,
    card::{self, Crumb, DRIVERS_LINK},
    table::TableState,
};

pub(crate) const PALETTE_BLACK: Color32 = Color32::from_rgb(12, 12, 12);
pub(crate) const PALETTE_BROWN: Color32 = Color32::from_rgb(72, 30, 20);
pub(crate) const PALETTE_MAROON: Color32 = Color32::from_rgb(155, 57, 34);
pub(crate) const PALETTE_ORANGE: Color32 = Color32::from_rgb(242, 97, 63);

const DEFAULT_CORNER_RADIUS: u8 = 4;
pub(crate) const FLAG_SIZE: f32 = 50.;
const LOADER_SIZE: f32 = 64.;

/// `DriverApp` shows one driver's season: a details card and the race results table.
///
/// The driver id field in the top bar plays the role of the route parameter,
/// changing it reloads the whole view.
pub struct DriverApp {
    controller: ViewController,
    flags: FlagTable,
    config: AppConfig,
    stored_config: StoredConfig,
    driver_input: String,
    focus_driver_input: bool,
    table_state: TableState,
}

impl DriverApp {
    pub fn new(
        mut controller: ViewController,
        flags: FlagTable,
        config: AppConfig,
        stored_config: StoredConfig,
        driver_id: &str,
        cc: &eframe::CreationContext<'_>,
    ) -> Self {
        // This gives us image support:
        egui_extras::install_image_loaders(&cc.egui_ctx);

        cc.egui_ctx.set_visuals(Visuals {
            dark_mode: true,
            hyperlink_color: PALETTE_ORANGE,
            faint_bg_color: PALETTE_BROWN,
            extreme_bg_color: PALETTE_BLACK,
            panel_fill: PALETTE_BLACK,
            window_fill: PALETTE_BLACK,
            widgets: Widgets::dark(),
            striped: true,
            ..Default::default()
        });

        let ctx = cc.egui_ctx.clone();
        controller.set_repaint_hook(move || ctx.request_repaint());
        controller.load(driver_id);

        Self {
            controller,
            flags,
            config,
            stored_config,
            driver_input: driver_id.to_string(),
            focus_driver_input: false,
            table_state: TableState::default(),
        }
    }

    fn load_driver(&mut self) {
        let driver_id = self.driver_input.trim().to_lowercase();
        if driver_id.is_empty() {
            return;
        }
        if self.controller.request(&driver_id) {
            info!("Loading driver {}", driver_id);
            self.table_state = TableState::default();
        }
    }

    fn driver_bar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Paddock").color(PALETTE_ORANGE).strong());
            ui.separator();
            ui.label(format!("Season {}", self.controller.season()));
            ui.separator();
            ui.label("Driver:");
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.driver_input)
                    .hint_text("driver id, e.g. hamilton")
                    .desired_width(180.),
            );
            if self.focus_driver_input {
                response.request_focus();
                self.focus_driver_input = false;
            }
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
            if ui.button("Load").clicked() || submitted {
                self.load_driver();
            }
        });
    }

    fn failed_view(&mut self, ui: &mut Ui, driver_id: &str, reason: &str) {
        ui.vertical_centered(|ui| {
            ui.add_space(60.);
            ui.label(
                RichText::new(format!("Could not load {driver_id}"))
                    .color(PALETTE_MAROON)
                    .size(22.)
                    .strong(),
            );
            ui.label(reason);
            ui.add_space(10.);
            if ui.button("Retry").clicked() {
                self.controller.retry();
            }
        });
    }
}

impl eframe::App for DriverApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if !self.stored_config.writable {
            info!("Leaving the unreadable config file untouched");
            return;
        }
        let stored = &mut self.stored_config.config;
        stored.window_width = self.config.window_width;
        stored.window_height = self.config.window_height;
        if let Err(e) = stored.save() {
            error!("Error while saving config file: {}", e);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.poll();
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.config.window_width = rect.width();
            self.config.window_height = rect.height();
        }

        egui::TopBottomPanel::top("driver_bar")
            .min_height(32.)
            .show(ctx, |ui| self.driver_bar(ui));

        let state = self.controller.state().clone();
        egui::CentralPanel::default().show(ctx, |ui| match &state {
            ViewState::Loading { .. } => loader(ui),
            ViewState::Failed { driver_id, reason } => self.failed_view(ui, driver_id, reason),
            ViewState::Ready { profile, .. } => {
                if let Some(link) = breadcrumb_bar(ui, &card::breadcrumbs(&profile.standing))
                    && link == DRIVERS_LINK
                {
                    self.focus_driver_input = true;
                }
                ui.separator();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    driver_card::show(ui, &profile.standing, &self.flags, &self.config);
                    ui.add_space(20.);
                    results_table::show(ui, &profile.races, &self.flags, &mut self.table_state);
                });
            }
        });
    }
}

/// Renders the breadcrumb trail and returns the link of a clicked crumb.
pub(crate) fn breadcrumb_bar(ui: &mut Ui, crumbs: &[Crumb]) -> Option<String> {
    let mut clicked = None;
    ui.horizontal(|ui| {
        for (i, crumb) in crumbs.iter().enumerate() {
            if i > 0 {
                ui.label(RichText::new("/").color(Color32::GRAY));
            }
            match &crumb.link {
                Some(link) => {
                    if ui.link(crumb.label.as_str()).clicked() {
                        clicked = Some(link.clone());
                    }
                }
                None => {
                    ui.label(RichText::new(&crumb.label).color(Color32::WHITE));
                }
            }
        }
    });
    clicked
}

/// Placeholder shown while a fetch is in flight.
pub(crate) fn loader(ui: &mut Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(80.);
        ui.add(egui::Spinner::new().size(LOADER_SIZE).color(PALETTE_ORANGE));
        ui.label(RichText::new("Loading...").color(Color32::WHITE));
    });
}

/// Country badge of roughly `size` points width. Unknown countries get a neutral badge.
pub(crate) fn flag_badge(ui: &mut Ui, size: f32, code: Option<&str>) {
    Frame::new()
        .fill(if code.is_some() { PALETTE_MAROON } else { PALETTE_BROWN })
        .corner_radius(CornerRadius::same(DEFAULT_CORNER_RADIUS))
        .inner_margin(Margin::symmetric(6, 2))
        .show(ui, |ui| {
            ui.set_min_width(size * 0.6);
            ui.label(
                RichText::new(code.unwrap_or("--"))
                    .monospace()
                    .size(size * 0.3)
                    .color(Color32::WHITE),
            );
        });
}
