use serde::{Deserialize, Serialize};

pub const COLUMN_WIDTHS_KEY: &str = "TorrentProperties/Peers/peersColsWidth";
pub const PREFERENCES_KEY: &str = "Preferences/Peers";

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
pub struct Preferences {
    pub resolve_hostnames: bool,
    pub resolve_countries: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            resolve_hostnames: false,
            resolve_countries: true,
        }
    }
}

#[derive(PartialEq, Clone, Debug, Default)]
pub struct PeerListSettings {
    /// One entry per column, in display order. Empty means "use defaults".
    pub column_widths: Vec<u32>,
    pub preferences: Preferences,
}

impl PeerListSettings {
    pub fn load(storage: &dyn eframe::Storage) -> Self {
        let column_widths: Vec<u32> =
            eframe::get_value(storage, COLUMN_WIDTHS_KEY).unwrap_or_default();
        let preferences: Preferences =
            eframe::get_value(storage, PREFERENCES_KEY).unwrap_or_default();
        log::debug!(
            "Loaded {} column widths and {:?}",
            column_widths.len(),
            preferences
        );

        Self {
            column_widths,
            preferences,
        }
    }

    pub fn save(&self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, COLUMN_WIDTHS_KEY, &self.column_widths);
        eframe::set_value(storage, PREFERENCES_KEY, &self.preferences);
    }

    /// Width of the given column, if one was saved.
    pub fn column_width(&self, column: usize) -> Option<f32> {
        self.column_widths
            .get(column)
            .filter(|width| **width > 0)
            .map(|width| *width as f32)
    }

    pub fn set_column_widths(&mut self, widths: &[f32]) {
        self.column_widths = widths.iter().map(|w| w.round().max(0.0) as u32).collect();
    }
}
