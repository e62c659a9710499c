// novade-system/src/desktop_entry.rs

//! Icon lookup in installed `.desktop` files, following the XDG base
//! directory layout.

use std::fs;
use std::path::PathBuf;

use novade_core::utils::paths::get_data_base_dir;
use novade_domain::notifications::DesktopEntryLookup;

const DEFAULT_DATA_DIRS: &str = "/usr/local/share:/usr/share";
const DESKTOP_SUFFIX: &str = ".desktop";

/// Finds desktop entries under `<data dir>/applications/`.
#[derive(Debug, Clone)]
pub struct XdgDesktopEntryLookup {
    search_dirs: Vec<PathBuf>,
}

impl XdgDesktopEntryLookup {
    /// Searches `$XDG_DATA_HOME` first, then each `$XDG_DATA_DIRS` entry.
    pub fn from_env() -> Self {
        let mut data_dirs = Vec::new();
        match get_data_base_dir() {
            Ok(dir) => data_dirs.push(dir),
            Err(e) => tracing::warn!("No user data directory for desktop entries: {}", e),
        }
        let system_dirs = std::env::var("XDG_DATA_DIRS")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIRS.to_string());
        data_dirs.extend(
            system_dirs
                .split(':')
                .filter(|d| !d.is_empty())
                .map(PathBuf::from),
        );
        Self::with_data_dirs(data_dirs)
    }

    /// Searches `applications/` under each of `data_dirs`, in order.
    pub fn with_data_dirs<I: IntoIterator<Item = PathBuf>>(data_dirs: I) -> Self {
        let search_dirs: Vec<PathBuf> = data_dirs.into_iter().map(|d| d.join("applications")).collect();
        tracing::debug!("Desktop entry search path: {:?}", search_dirs);
        Self { search_dirs }
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    fn find_file(&self, desktop_entry: &str) -> Option<PathBuf> {
        let stem = desktop_entry.strip_suffix(DESKTOP_SUFFIX).unwrap_or(desktop_entry);
        if stem.is_empty() || stem.contains('/') {
            return None;
        }
        let file_name = format!("{}{}", stem, DESKTOP_SUFFIX);
        self.search_dirs
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|candidate| candidate.is_file())
    }
}

impl DesktopEntryLookup for XdgDesktopEntryLookup {
    fn icon_name(&self, desktop_entry: &str) -> Option<String> {
        let path = self.find_file(desktop_entry)?;
        match fs::read_to_string(&path) {
            Ok(contents) => icon_from_desktop_file(&contents),
            Err(e) => {
                tracing::warn!("Cannot read desktop entry {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// `Icon=` of the `[Desktop Entry]` group. Localized keys (`Icon[de]=`) and
/// other groups are ignored.
fn icon_from_desktop_file(contents: &str) -> Option<String> {
    let mut in_main_group = false;
    for line in contents.lines().map(str::trim) {
        if line.starts_with('[') {
            in_main_group = line == "[Desktop Entry]";
            continue;
        }
        if !in_main_group || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            if key.trim() == "Icon" {
                let value = value.trim();
                return (!value.is_empty()).then(|| value.to_string());
            }
        }
    }
    None
}
