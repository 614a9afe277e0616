use crate::game::stats_manager::{JsonFileStorage, StatsManager};
use crate::game::sudoku_session::MAX_HINTS;
use crate::model::{RecallDifficulty, RecallStats, SudokuDifficulty, SudokuStats, Theme};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SEED_ENV_VAR: &str = "MINDGAMES_SEED";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub(crate) version: u32,

    #[serde(default)]
    pub sudoku_difficulty: SudokuDifficulty,

    #[serde(default)]
    pub recall_difficulty: RecallDifficulty,

    #[serde(default)]
    pub recall_theme: Theme,

    #[serde(default = "default_max_hints")]
    pub max_hints: u32,

    /// Overrides the platform data directory for stats files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_version() -> u32 {
    1
}
fn default_max_hints() -> u32 {
    MAX_HINTS
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: 1,
            sudoku_difficulty: SudokuDifficulty::default(),
            recall_difficulty: RecallDifficulty::default(),
            recall_theme: Theme::default(),
            max_hints: MAX_HINTS,
            data_dir: None,
        }
    }
}

impl Settings {
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn load() -> Self {
        let path = Self::settings_path();
        let settings = Self::load_from(&path);
        if !path.exists() {
            if let Err(e) = settings.save_to(&path) {
                log::warn!(target: "settings", "Could not write default settings: {}", e);
            }
        }
        settings
    }

    /// Unreadable or invalid files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(contents) = fs::read_to_string(path) {
            match serde_json::from_str::<Settings>(&contents) {
                Ok(mut settings) => {
                    settings.migrate();
                    return settings;
                }
                Err(e) => {
                    log::warn!(target: "settings", "Ignoring invalid settings file: {}", e);
                }
            }
        }
        Settings::default()
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&Self::settings_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        // Ensure the directory exists
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
    }

    pub fn settings_path() -> PathBuf {
        JsonFileStorage::default_data_dir().join("settings.json")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(JsonFileStorage::default_data_dir)
    }

    pub fn sudoku_stats_path(&self) -> PathBuf {
        self.data_dir().join("sudoku_stats.json")
    }

    pub fn recall_stats_path(&self) -> PathBuf {
        self.data_dir().join("recall_stats.json")
    }

    pub fn open_sudoku_stats(&self) -> StatsManager<SudokuStats> {
        StatsManager::from_file(self.sudoku_stats_path())
    }

    pub fn open_recall_stats(&self) -> StatsManager<RecallStats> {
        StatsManager::from_file(self.recall_stats_path())
    }

    fn migrate(&mut self) {
        if self.version == 0 {
            self.version = 1;
        }
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    /// Fixed generator seed for reproducible games. Values that are not a
    /// `u64` are ignored.
    pub fn seed_from_env() -> Option<u64> {
        let value = std::env::var(SEED_ENV_VAR).ok()?;
        match value.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                log::warn!(target: "settings", "Ignoring {}={:?}", SEED_ENV_VAR, value);
                None
            }
        }
    }
}
