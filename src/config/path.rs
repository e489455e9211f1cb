//! Module for searching for padnav config files

use std::path::PathBuf;

/// Base system fallback path to use if one cannot be found with XDG
const FALLBACK_BASE_PATH: &str = "/usr/share/padnav";

const BINDINGS_FILE: &str = "bindings.yaml";
const PREFERENCES_FILE: &str = "preferences.yaml";

/// Returns a list of paths in load order to search for the given config file.
/// E.g. ["~/.config/padnav/bindings.yaml", "/etc/xdg/padnav/bindings.yaml",
/// "/usr/share/padnav/bindings.yaml"]
pub fn get_search_paths(file_name: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    match xdg::BaseDirectories::with_prefix("padnav") {
        Ok(base_dirs) => {
            paths.push(base_dirs.get_config_home().join(file_name));
            for dir in base_dirs.get_config_dirs() {
                paths.push(dir.join(file_name));
            }
        }
        Err(e) => {
            log::warn!("Unable to determine config base path: {e}. Using fallback path.");
        }
    }
    paths.push(PathBuf::from(FALLBACK_BASE_PATH).join(file_name));

    paths
}

/// Returns the first existing file of the given name in the search paths
pub fn find_config_file(file_name: &str) -> Option<PathBuf> {
    get_search_paths(file_name).into_iter().find(|path| {
        log::trace!("Checking {path:?} for config");
        path.is_file()
    })
}

/// Returns the path to the user's bindings file if one exists
pub fn find_bindings_file() -> Option<PathBuf> {
    find_config_file(BINDINGS_FILE)
}

/// Returns the path to the user's preferences file if one exists
pub fn find_preferences_file() -> Option<PathBuf> {
    find_config_file(PREFERENCES_FILE)
}
