use std::net::{IpAddr, SocketAddr};

use egui::{Align2, Context, DragValue, Window};

use crate::models::message::{LimitDirection, PeerListAction};

/// Parses the add-peer dialog fields. An empty port lets the IP field carry
/// a full `ip:port` / `[ipv6]:port` endpoint.
pub fn parse_endpoint(ip: &str, port: &str) -> Result<SocketAddr, String> {
    let ip = ip.trim();
    let port = port.trim();

    let endpoint = if port.is_empty() {
        ip.parse::<SocketAddr>()
            .map_err(|_| format!("\"{}\" is not a valid IP:port endpoint.", ip))?
    } else {
        let ip = ip
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .map_err(|_| format!("\"{}\" is not a valid IP address.", ip))?;
        let port = port
            .parse::<u16>()
            .map_err(|_| format!("\"{}\" is not a valid port.", port))?;
        SocketAddr::new(ip, port)
    };

    if endpoint.port() == 0 {
        return Err("The port must be between 1 and 65535.".to_string());
    }
    Ok(endpoint)
}

/// Bytes per second for a limit entered in KiB/s; unlimited is -1.
pub fn limit_from_kib(kib_per_sec: u32, unlimited: bool) -> i64 {
    if unlimited || kib_per_sec == 0 {
        -1
    } else {
        kib_per_sec as i64 * 1024
    }
}

#[derive(Default)]
pub struct AddPeerDialog {
    open: bool,
    ip: String,
    port: String,
    error: Option<String>,
}

impl AddPeerDialog {
    pub fn open(&mut self) {
        *self = Self {
            open: true,
            ..Default::default()
        };
    }

    pub fn show(&mut self, ctx: &Context) -> Option<PeerListAction> {
        if !self.open {
            return None;
        }

        let mut action = None;
        let mut close = false;
        Window::new("Peer addition")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Grid::new("add_peer").num_columns(2).show(ui, |ui| {
                    ui.label("IP: ");
                    ui.text_edit_singleline(&mut self.ip);
                    ui.end_row();

                    ui.label("Port: ");
                    ui.text_edit_singleline(&mut self.port);
                    ui.end_row();
                });
                if let Some(error) = &self.error {
                    let color = ui.visuals().error_fg_color;
                    ui.colored_label(color, error.as_str());
                }
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        match parse_endpoint(&self.ip, &self.port) {
                            Ok(endpoint) => {
                                action = Some(PeerListAction::AddPeer(endpoint));
                                close = true;
                            }
                            Err(error) => self.error = Some(error),
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        log::debug!("No peer was added");
                        close = true;
                    }
                });
            });

        if close {
            self.open = false;
        }
        action
    }
}

pub struct SpeedLimitDialog {
    target: Option<(LimitDirection, Vec<String>)>,
    kib_per_sec: u32,
    unlimited: bool,
}

impl Default for SpeedLimitDialog {
    fn default() -> Self {
        Self {
            target: None,
            kib_per_sec: 100,
            unlimited: true,
        }
    }
}

impl SpeedLimitDialog {
    pub fn open(&mut self, direction: LimitDirection, addresses: Vec<String>) {
        self.target = Some((direction, addresses));
    }

    /// Yields a `Limit` action once the dialog is closed, with `None` as the
    /// rate when it was cancelled.
    pub fn show(&mut self, ctx: &Context) -> Option<PeerListAction> {
        let (direction, _) = self.target.as_ref()?;
        let title = match direction {
            LimitDirection::Upload => "Upload rate limiting",
            LimitDirection::Download => "Download rate limiting",
        };

        let mut result: Option<Option<i64>> = None;
        Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.checkbox(&mut self.unlimited, "Unlimited");
                ui.add_enabled_ui(!self.unlimited, |ui| {
                    ui.horizontal(|ui| {
                        ui.add(DragValue::new(&mut self.kib_per_sec).range(1..=1_000_000));
                        ui.label("KiB/s");
                    });
                });
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        result = Some(Some(limit_from_kib(self.kib_per_sec, self.unlimited)));
                    }
                    if ui.button("Cancel").clicked() {
                        result = Some(None);
                    }
                });
            });

        let limit = result?;
        let (direction, addresses) = self.target.take()?;
        Some(PeerListAction::Limit(direction, addresses, limit))
    }
}
