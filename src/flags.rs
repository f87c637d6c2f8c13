use std::{collections::HashMap, path::PathBuf};

/// Maps an ISO 3166 country code to an image URI egui can load.
pub trait FlagProvider {
    fn flag_uri(&mut self, country_code: &str) -> Option<String>;
}

/// Flags stored as `<code>.svg` files, e.g. `flags/de.svg`.
pub struct FlagIcons {
    dir: PathBuf,
    cache: HashMap<String, Option<String>>,
}

impl FlagIcons {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            cache: HashMap::new(),
        }
    }
}

impl FlagProvider for FlagIcons {
    fn flag_uri(&mut self, country_code: &str) -> Option<String> {
        let code = country_code.trim().to_lowercase();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }

        let dir = &self.dir;
        self.cache
            .entry(code.clone())
            .or_insert_with(|| {
                let path = dir.join(format!("{}.svg", code));
                if path.is_file() {
                    Some(format!("file://{}", path.display()))
                } else {
                    log::debug!("No flag icon for country code {}", code);
                    None
                }
            })
            .clone()
    }
}
