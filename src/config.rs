use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Configuration for a broken-link check run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// URL to start crawling from
    pub seed_url: String,

    /// Maximum number of pages whose content is crawled for links
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Upper bound for a single navigation, in milliseconds
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,

    /// Minimum spacing between page crawls, in milliseconds
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Identity of the rendering provider
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Region the rendering session should be allocated in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Lifetime of the rendering session, in minutes
    #[serde(default = "default_session_timeout_minutes")]
    pub session_timeout_minutes: u64,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// WebDriver URLs tried in order when `webdriver_url` refuses a session
    #[serde(default = "default_fallback_webdriver_urls")]
    pub fallback_webdriver_urls: Vec<String>,

    /// User agent the browser presents
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whether the browser runs without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Regex patterns for internal URLs that are never checked
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Drop `#fragment` parts before deduplicating URLs
    #[serde(default)]
    pub strip_fragments: bool,
}

fn default_max_pages() -> usize {
    50
}

fn default_navigation_timeout_ms() -> u64 {
    60_000
}

fn default_page_delay_ms() -> u64 {
    1_000
}

fn default_provider() -> String {
    "webdriver".to_string()
}

fn default_session_timeout_minutes() -> u64 {
    10
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_fallback_webdriver_urls() -> Vec<String> {
    vec![
        "http://localhost:9515".to_string(), // ChromeDriver default
        "http://localhost:4723".to_string(), // Appium default
        "http://localhost:9222".to_string(), // Chrome debug port default
        "http://127.0.0.1:4444".to_string(),
    ]
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_headless() -> bool {
    true
}

impl CheckerConfig {
    /// Create a new configuration with default values
    pub fn new(seed_url: &str) -> Self {
        Self {
            seed_url: seed_url.to_string(),
            max_pages: default_max_pages(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
            page_delay_ms: default_page_delay_ms(),
            provider: default_provider(),
            region: None,
            session_timeout_minutes: default_session_timeout_minutes(),
            webdriver_url: default_webdriver_url(),
            fallback_webdriver_urls: default_fallback_webdriver_urls(),
            user_agent: default_user_agent(),
            headless: default_headless(),
            exclude_patterns: Vec::new(),
            strip_fragments: false,
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Override the WebDriver URL with `WEBDRIVER_URL` if it is set
    pub fn apply_env(&mut self) {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    /// Build the settings handed to the renderer when a session is opened
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            provider: self.provider.clone(),
            region: self.region.clone(),
            session_timeout: Duration::from_secs(self.session_timeout_minutes.saturating_mul(60)),
            navigation_timeout: self.navigation_timeout(),
            user_agent: self.user_agent.clone(),
            headless: self.headless,
        }
    }
}

/// Settings for allocating one rendering session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub provider: String,
    pub region: Option<String>,
    /// How long the session may live
    pub session_timeout: Duration,
    pub navigation_timeout: Duration,
    pub user_agent: String,
    pub headless: bool,
}
