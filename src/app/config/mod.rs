use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

pub mod persistence;
pub mod user;

pub use persistence::PersistentState;
pub use user::UserConfig;

/// Locations of everything the client keeps on disk.
#[derive(Debug, Clone)]
pub struct AppConfig {
    config_dir: PathBuf,
}

impl AppConfig {
    /// `config_dir` overrides the default `~/.config/gallery`.
    pub fn new(config_dir: Option<PathBuf>) -> Self {
        let config_dir = config_dir.unwrap_or_else(Self::default_config_dir);

        // Ensure it exists
        if !config_dir.exists() {
            let _ = fs::create_dir_all(&config_dir);
        }

        Self { config_dir }
    }

    fn default_config_dir() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config").join("gallery")
    }

    pub fn get_config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn get_config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn get_state_path(&self) -> PathBuf {
        self.config_dir.join("state.toml")
    }

    pub fn get_lock_path(&self) -> PathBuf {
        self.config_dir.join("state.lock")
    }

    pub fn get_log_dir(&self) -> PathBuf {
        self.config_dir.join("logs")
    }

    /// Load both files. A missing `config.toml` is written out with the
    /// defaults; anything unreadable falls back to defaults.
    pub fn load(&self) -> (UserConfig, PersistentState) {
        let config_path = self.get_config_path();

        let user_config = if config_path.exists() {
            match fs::read_to_string(&config_path) {
                Ok(content) => toml::from_str(&content).unwrap_or_else(|err| {
                    warn!("{} is invalid, using defaults: {}", config_path.display(), err);
                    UserConfig::default()
                }),
                Err(_) => UserConfig::default(),
            }
        } else {
            let c = UserConfig::default();
            if let Ok(content) = toml::to_string_pretty(&c) {
                let _ = fs::write(&config_path, content);
            }
            c
        };

        let state = PersistentState::load(&self.get_state_path());

        (user_config, state)
    }
}
