//! Platform-specific directory paths.

use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "datagrid";
const APPLICATION: &str = "datagrid-demo";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory, where the log file lives.
///
/// - Linux: `$XDG_CACHE_HOME/datagrid-demo` or `~/.cache/datagrid-demo`
/// - macOS: `~/Library/Caches/dev.datagrid.datagrid-demo`
/// - Windows: `C:\Users\<User>\AppData\Local\datagrid\datagrid-demo\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the config directory for `options.json`.
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the latest log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("latest.log"))
}

/// Get the path to the grid options file.
pub fn options_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("options.json"))
}
