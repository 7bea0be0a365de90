use directories::ProjectDirs;
use std::{env, fs, path};

fn get_project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "arbint")
}

fn get_config_dir() -> Option<path::PathBuf> {
    // first try $ARBINT_CONFIG_DIR
    if let Some(env_var_config_dir) = env::var_os("ARBINT_CONFIG_DIR") {
        return Some(path::PathBuf::from(env_var_config_dir));
    }

    // otherwise use the platform default:
    // Linux: $XDG_CONFIG_HOME/arbint or $HOME/.config/arbint
    // macOS: $HOME/Library/Application Support/arbint
    // Windows: {FOLDERID_RoamingAppData}\arbint\config
    get_project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

pub fn get_config_file_location() -> Option<path::PathBuf> {
    let mut config_path = get_config_dir()?;
    config_path.push("config.toml");
    Some(config_path)
}

fn get_history_dir() -> Option<path::PathBuf> {
    // first try $ARBINT_STATE_DIR
    if let Some(env_var_history_dir) = env::var_os("ARBINT_STATE_DIR") {
        return Some(path::PathBuf::from(env_var_history_dir));
    }

    // otherwise the platform state dir, falling back to the local data dir
    // on platforms without one
    let dirs = get_project_dirs()?;
    Some(
        dirs.state_dir()
            .unwrap_or_else(|| dirs.data_local_dir())
            .to_path_buf(),
    )
}

pub fn get_history_file_location() -> Option<path::PathBuf> {
    let mut history_path = get_history_dir()?;
    history_path.push("history");
    Some(history_path)
}

/// Like [`get_history_file_location`], but also creates the containing
/// directory so the file can be written.
pub fn get_writable_history_file_location() -> Option<path::PathBuf> {
    let history_dir = get_history_dir()?;
    fs::create_dir_all(&history_dir).ok()?;
    Some(history_dir.join("history"))
}
