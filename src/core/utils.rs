use dirs::{data_dir, home_dir};
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".moneydesk";
const APP_DIR_NAME: &str = "moneydesk";
const USERS_DIR: &str = "users";
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the data root.
pub const HOME_ENV: &str = "MONEYDESK_HOME";

/// Resolves where persisted data lives.
pub struct PathResolver;

impl PathResolver {
    /// Explicit root first, then `MONEYDESK_HOME`, then the platform data dir, then `~/.moneydesk`.
    pub fn resolve_base(explicit: Option<PathBuf>) -> PathBuf {
        if let Some(root) = explicit {
            return root;
        }
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        if let Some(data) = data_dir() {
            return data.join(APP_DIR_NAME);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn users_dir_in(root: &Path) -> PathBuf {
        root.join(USERS_DIR)
    }

    pub fn config_file_in(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
