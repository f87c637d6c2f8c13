#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::{
    fs,
    path::PathBuf,
    time::{Duration, Instant},
};

use controllers::peer_list::PeerListController;
use eframe::egui;
use egui::{Align, Layout, Vec2};
use egui_toast::Toasts;
use engine::{simulated::SimulatedEngine, PeerEngine};
use flags::FlagIcons;
use models::{message::PeerListAction, settings::PeerListSettings};
use resolver::{ReverseResolver, SystemLookup};
use views::{
    dialogs::{AddPeerDialog, SpeedLimitDialog},
    peers::{PeersWidget, COLUMNS},
};

mod bytes;
pub mod controllers;
mod engine;
mod flags;
pub mod models;
mod peer_table;
mod reconcile;
mod resolver;
mod toasts;
mod views;

const ENGINE_TICK: Duration = Duration::from_secs(1);

fn prepare_data_dir() -> PathBuf {
    let data_dir = dirs::data_dir()
        .expect("Failed to get the data dir.")
        .join("peerlist");
    fs::create_dir_all(data_dir.join("flags")).expect("Failed to create the flags dir.");

    data_dir
}

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).
    log::info!("Application started");

    let data_dir = prepare_data_dir();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 500.0])
            .with_maximize_button(true),
        ..Default::default()
    };
    eframe::run_native(
        "Peers",
        options,
        Box::new(move |cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(AppState::new(cc, data_dir)))
        }),
    )
}

struct AppState {
    engine: SimulatedEngine,
    last_tick: Instant,
    controller: PeerListController,
    settings: PeerListSettings,
    column_widths: Vec<f32>,
    action: Option<PeerListAction>,
    add_peer_dialog: AddPeerDialog,
    speed_limit_dialog: SpeedLimitDialog,
    toasts: Toasts,
}

impl AppState {
    fn new(cc: &eframe::CreationContext<'_>, data_dir: PathBuf) -> Self {
        let settings = cc
            .storage
            .map(|storage| PeerListSettings::load(storage))
            .unwrap_or_default();
        let column_widths = (0..COLUMNS.len())
            .map(|column| settings.column_width(column).unwrap_or(0.0))
            .collect();

        let controller = PeerListController::new(
            Box::new(FlagIcons::new(data_dir.join("flags"))),
            Box::new(|| ReverseResolver::start(SystemLookup)),
            &settings.preferences,
        );

        Self {
            engine: SimulatedEngine::new(rand::random(), 12),
            last_tick: Instant::now(),
            controller,
            settings,
            column_widths,
            action: None,
            add_peer_dialog: AddPeerDialog::default(),
            speed_limit_dialog: SpeedLimitDialog::default(),
            toasts: toasts::area(),
        }
    }

    fn dispatch(&mut self, action: PeerListAction) {
        match action {
            PeerListAction::PromptAddPeer => self.add_peer_dialog.open(),
            PeerListAction::PromptLimit(direction, addresses) => {
                self.speed_limit_dialog.open(direction, addresses)
            }
            action => self
                .controller
                .process(&mut self.engine, action, &mut self.toasts),
        }
    }

    fn preferences_bar(&mut self, ui: &mut egui::Ui) {
        let preferences = &mut self.settings.preferences;
        ui.horizontal(|ui| {
            if ui
                .checkbox(&mut preferences.resolve_hostnames, "Resolve peer host names")
                .changed()
            {
                self.controller
                    .set_resolve_hostnames(preferences.resolve_hostnames);
            }
            if ui
                .checkbox(&mut preferences.resolve_countries, "Resolve peer countries")
                .changed()
            {
                self.controller
                    .set_display_flags(preferences.resolve_countries);
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let mut checking = !self.engine.accepts_new_peers();
                if ui.checkbox(&mut checking, "Torrent is checking").changed() {
                    self.engine.set_accepts_new_peers(!checking);
                }
            });
        });
    }
}

impl eframe::App for AppState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.last_tick.elapsed() >= ENGINE_TICK {
            self.engine.tick();
            self.last_tick = Instant::now();
        }
        self.controller.update(&self.engine);

        egui::TopBottomPanel::top("preferences").show(ctx, |ui| {
            ui.add_space(5.0);
            self.preferences_bar(ui);
            ui.add_space(5.0);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(format!(
                "{} peers • {} selected",
                self.controller.table.len(),
                self.controller.selected.len()
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                // Force the scroll area to expand horizontally
                ui.allocate_at_least(
                    Vec2::new(ui.available_width(), 0.0),
                    egui::Sense::focusable_noninteractive(),
                );
                ui.add(PeersWidget::new(
                    &self.controller.table,
                    &mut self.controller.selected,
                    &mut self.column_widths,
                    self.engine.accepts_new_peers(),
                    &mut self.action,
                ));
            });
        });

        if let Some(action) = self.add_peer_dialog.show(ctx) {
            self.action = Some(action);
        }
        if let Some(action) = self.speed_limit_dialog.show(ctx) {
            self.action = Some(action);
        }
        if let Some(action) = self.action.take() {
            self.dispatch(action);
        }

        self.toasts.show(ctx);
        ctx.request_repaint_after_secs(1.0);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.settings.set_column_widths(&self.column_widths);
        self.settings.save(storage);
        log::debug!("Saved peer list settings");
    }
}
