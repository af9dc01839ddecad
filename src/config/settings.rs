use std::path::PathBuf;
use std::time::Duration;

use super::browsers::get_local_browser_paths;

pub struct BrowserSettings {
    pub headless: bool,
    pub user_agent: &'static str,
    pub window_size: (u32, u32),
    /// Where the managed Chromium build is downloaded to
    pub download_dir: PathBuf,
    pub local_paths: Vec<PathBuf>,
    pub launch_timeout_secs: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            window_size: (1920, 1080),
            download_dir: default_download_dir(),
            local_paths: get_local_browser_paths(),
            launch_timeout_secs: 30,
        }
    }
}

fn default_download_dir() -> PathBuf {
    std::env::temp_dir().join("uschess_scrape").join("chromium")
}

/// Per call-site wait bounds
pub struct WaitSettings {
    pub input_secs: u64,
    pub button_secs: u64,
    pub results_secs: u64,
    pub cell_text_secs: u64,
    pub cards_secs: u64,
    pub profile_secs: u64,
    pub settle_bound_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            input_secs: 10,
            button_secs: 10,
            results_secs: 15,
            cell_text_secs: 10,
            cards_secs: 8,
            profile_secs: 10,
            settle_bound_secs: 5,
            poll_interval_ms: 250,
        }
    }
}

impl WaitSettings {
    pub fn input_timeout(&self) -> Duration {
        Duration::from_secs(self.input_secs)
    }

    pub fn button_timeout(&self) -> Duration {
        Duration::from_secs(self.button_secs)
    }

    /// Bound on the first result row appearing after a form submit
    pub fn results_timeout(&self) -> Duration {
        Duration::from_secs(self.results_secs)
    }

    pub fn cell_text_timeout(&self) -> Duration {
        Duration::from_secs(self.cell_text_secs)
    }

    pub fn cards_timeout(&self) -> Duration {
        Duration::from_secs(self.cards_secs)
    }

    pub fn profile_timeout(&self) -> Duration {
        Duration::from_secs(self.profile_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn settle_bound(&self) -> Duration {
        Duration::from_secs(self.settle_bound_secs)
    }
}

pub struct SourceSettings {
    pub form_base_url: &'static str,
    pub ratings_base_url: &'static str,
    pub msa_base_url: &'static str,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            form_base_url: "https://new.uschess.org",
            ratings_base_url: "https://beta-ratings.uschess.org",
            msa_base_url: "https://www.uschess.org",
        }
    }
}

pub struct BatchSettings {
    pub record_delay_ms: u64,
    pub default_member_id: &'static str,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            record_delay_ms: 2000,
            default_member_id: "14970943",
        }
    }
}

pub struct StorageSettings {
    pub database_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "chess_tournaments.db".to_string()),
        }
    }
}

pub struct AppConfig {
    pub browser: BrowserSettings,
    pub waits: WaitSettings,
    pub sources: SourceSettings,
    pub batch: BatchSettings,
    pub storage: StorageSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            browser: BrowserSettings::default(),
            waits: WaitSettings::default(),
            sources: SourceSettings::default(),
            batch: BatchSettings::default(),
            storage: StorageSettings::default(),
        }
    }

    pub fn with_database_path(mut self, path: Option<String>) -> Self {
        if let Some(path) = path {
            self.storage.database_path = path;
        }
        self
    }

    pub fn with_head(mut self, headful: bool) -> Self {
        self.browser.headless = !headful;
        self
    }
}
