use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DB_PATH: &str = "weather.db";
pub const DEFAULT_ICON_BASE_URL: &str = "https://www.jma.go.jp/bosai/forecast/img";
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for opening a forecast store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path of the database file; created on first open.
    pub db_path: PathBuf,

    /// Base URL weather icons are derived from.
    pub icon_base_url: String,

    /// How long a connection waits on a locked database before giving up.
    pub busy_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            icon_base_url: DEFAULT_ICON_BASE_URL.to_string(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Self::default()
        }
    }

    pub fn with_icon_base_url(mut self, url: impl Into<String>) -> Self {
        self.icon_base_url = url.into();
        self
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }
}
