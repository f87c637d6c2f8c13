use std::collections::HashSet;

use egui::{Image, Response, RichText, Sense, Ui, Vec2, Widget};
use egui_extras::{Column, TableBuilder};

use crate::{
    format_bytes,
    models::{
        message::{LimitDirection, PeerListAction},
        peer::PeerRow,
    },
    peer_table::PeerTable,
};

pub const COLUMNS: [(&str, f32); 7] = [
    ("IP", 180.0),
    ("Client", 160.0),
    ("Progress", 70.0),
    ("Down Speed", 90.0),
    ("Up Speed", 90.0),
    ("Downloaded", 90.0),
    ("Uploaded", 90.0),
];

pub struct PeersWidget<'a> {
    table: &'a PeerTable,
    selected: &'a mut HashSet<String>,
    column_widths: &'a mut Vec<f32>,
    accepts_new_peers: bool,
    action: &'a mut Option<PeerListAction>,
}

impl<'a> PeersWidget<'a> {
    pub fn new(
        table: &'a PeerTable,
        selected: &'a mut HashSet<String>,
        column_widths: &'a mut Vec<f32>,
        accepts_new_peers: bool,
        action: &'a mut Option<PeerListAction>,
    ) -> Self {
        Self {
            table,
            selected,
            column_widths,
            accepts_new_peers,
            action,
        }
    }
}

fn context_menu(
    ui: &mut Ui,
    accepts_new_peers: bool,
    selection: &[String],
    action: &mut Option<PeerListAction>,
) {
    if accepts_new_peers && ui.button("➕ Add a new peer").clicked() {
        *action = Some(PeerListAction::PromptAddPeer);
        ui.close_menu();
    }
    if !selection.is_empty() {
        if ui.button("⬆ Limit upload rate").clicked() {
            *action = Some(PeerListAction::PromptLimit(
                LimitDirection::Upload,
                selection.to_vec(),
            ));
            ui.close_menu();
        }
        if ui.button("⬇ Limit download rate").clicked() {
            *action = Some(PeerListAction::PromptLimit(
                LimitDirection::Download,
                selection.to_vec(),
            ));
            ui.close_menu();
        }
    }
}

fn address_cell(ui: &mut Ui, row: &PeerRow) {
    ui.horizontal(|ui| {
        if let Some(uri) = &row.flag {
            ui.add(Image::new(uri.as_str()).fit_to_exact_size(Vec2::new(16.0, 11.0)));
        }
        ui.label(row.display_name())
            .on_hover_text(row.endpoint().to_string());
    });
}

impl<'a> Widget for PeersWidget<'a> {
    fn ui(self, ui: &mut Ui) -> Response {
        let PeersWidget {
            table,
            selected,
            column_widths,
            accepts_new_peers,
            action,
        } = self;

        // Rows are registered after this and take their own clicks first.
        let background = ui.interact(
            ui.available_rect_before_wrap().intersect(ui.clip_rect()),
            ui.id().with("peers_background"),
            Sense::click(),
        );

        if table.is_empty() {
            ui.horizontal(|ui| {
                ui.label("No peers are connected.");
                if accepts_new_peers && ui.button("➕ Add a new peer").clicked() {
                    *action = Some(PeerListAction::PromptAddPeer);
                }
            });
        }

        let command = ui.input(|i| i.modifiers.command);
        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .auto_shrink(true)
            .vscroll(false)
            .sense(Sense::click());
        for (index, (_, default_width)) in COLUMNS.iter().enumerate() {
            let width = column_widths
                .get(index)
                .copied()
                .filter(|w| *w > 0.0)
                .unwrap_or(*default_width);
            builder = builder.column(Column::initial(width).at_least(40.0).resizable(true));
        }

        let mut rendered_widths = Vec::with_capacity(COLUMNS.len());
        builder
            .header(20.0, |mut header| {
                for (title, _) in COLUMNS {
                    header.col(|ui| {
                        // The cell spans the whole column, the label only its text.
                        rendered_widths.push(ui.max_rect().width());
                        ui.label(RichText::new(title).strong());
                    });
                }
            })
            .body(|mut body| {
                let selection = table.selected_in_order(selected);

                for peer in table.rows() {
                    body.row(24.0, |mut row| {
                        row.set_selected(selected.contains(&peer.address));
                        row.col(|ui| address_cell(ui, peer));
                        row.col(|ui| {
                            ui.label(peer.record.client.clone());
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.1}%", peer.record.progress * 100.0));
                        });
                        row.col(|ui| {
                            ui.label(format_bytes!(peer.record.download_rate, "/s"));
                        });
                        row.col(|ui| {
                            ui.label(format_bytes!(peer.record.upload_rate, "/s"));
                        });
                        row.col(|ui| {
                            ui.label(format_bytes!(peer.record.total_download));
                        });
                        row.col(|ui| {
                            ui.label(format_bytes!(peer.record.total_upload));
                        });

                        let response = row.response();
                        if response.clicked() {
                            if command {
                                if !selected.remove(&peer.address) {
                                    selected.insert(peer.address.clone());
                                }
                            } else {
                                selected.clear();
                                selected.insert(peer.address.clone());
                            }
                        }
                        if response.secondary_clicked() && !selected.contains(&peer.address) {
                            selected.clear();
                            selected.insert(peer.address.clone());
                        }

                        // Right click on an unselected row targets that row alone.
                        let targets = if selection.contains(&peer.address) {
                            selection.clone()
                        } else {
                            vec![peer.address.clone()]
                        };
                        response.context_menu(|ui| {
                            context_menu(ui, accepts_new_peers, &targets, action);
                        });
                    });
                }
            });

        if rendered_widths.len() == COLUMNS.len() {
            *column_widths = rendered_widths;
        }

        let selection = table.selected_in_order(selected);
        background.context_menu(|ui| {
            context_menu(ui, accepts_new_peers, &selection, action);
        });
        background
    }
}
