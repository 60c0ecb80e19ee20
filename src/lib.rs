//! Finds broken links on a website by crawling it in a real browser.
//!
//! Pages are rendered through a [`renderer::PageRenderer`], crawled breadth
//! first from a seed URL, and every internal link found is navigated to once.

pub mod config;
pub mod crawlers;
pub mod error;
pub mod extract;
pub mod filter;
pub mod renderer;
pub mod report;
pub mod results;

// Re-export commonly used types for convenience
pub use config::CheckerConfig;
pub use crawlers::CrawlEngine;
pub use error::CheckError;
pub use renderer::{PageRenderer, RenderSession, WebDriverRenderer};
pub use results::{CrawlRun, CrawlState, LinkResult, Outcome};

use error::ConfigError;
use tokio::sync::watch;

/// Builder for a single link check run
pub struct LinkChecker {
    config: CheckerConfig,
    cancel: Option<watch::Receiver<bool>>,
}

impl LinkChecker {
    /// Create a new checker for the given seed URL with default settings
    pub fn new(seed_url: &str) -> Self {
        Self::with_config(CheckerConfig::new(seed_url))
    }

    /// Start from a full configuration
    pub fn with_config(config: CheckerConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Load configuration from a file
    pub fn with_config_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        Ok(Self::with_config(CheckerConfig::from_file(path)?))
    }

    /// Load configuration from a JSON string
    pub fn with_config_str(json: &str) -> Result<Self, ConfigError> {
        Ok(Self::with_config(CheckerConfig::from_json(json)?))
    }

    /// Set the maximum number of pages crawled for links
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    /// Set the session lifetime, in minutes
    pub fn with_session_timeout(mut self, minutes: u64) -> Self {
        self.config.session_timeout_minutes = minutes;
        self
    }

    /// Set the spacing between page crawls, in milliseconds
    pub fn with_page_delay(mut self, millis: u64) -> Self {
        self.config.page_delay_ms = millis;
        self
    }

    pub fn with_webdriver_url(mut self, webdriver_url: &str) -> Self {
        self.config.webdriver_url = webdriver_url.to_string();
        self
    }

    pub fn with_provider(mut self, provider: &str, region: Option<String>) -> Self {
        self.config.provider = provider.to_string();
        self.config.region = region;
        self
    }

    /// Stop the run once `true` is sent on the channel
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Run against a WebDriver browser as configured
    pub async fn run(self) -> CrawlRun {
        let renderer = WebDriverRenderer::from_config(&self.config);
        self.run_with(renderer).await
    }

    /// Run against any renderer
    pub async fn run_with<R: PageRenderer>(self, renderer: R) -> CrawlRun {
        let mut engine = CrawlEngine::new(renderer, self.config);
        if let Some(cancel) = self.cancel {
            engine = engine.with_cancellation(cancel);
        }
        engine.run().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawlers::tests::mock::MockSite;

    #[test]
    fn test_builder_overrides() {
        let checker = LinkChecker::new("https://example.com")
            .with_max_pages(5)
            .with_session_timeout(3)
            .with_page_delay(0)
            .with_webdriver_url("http://grid:4444")
            .with_provider("alibaba", Some("cn-hangzhou".to_string()));

        let config = checker.config();
        assert_eq!(config.max_pages, 5);
        assert_eq!(config.session_timeout_minutes, 3);
        assert_eq!(config.page_delay_ms, 0);
        assert_eq!(config.webdriver_url, "http://grid:4444");
        assert_eq!(config.provider, "alibaba");
        assert_eq!(config.region.as_deref(), Some("cn-hangzhou"));
    }

    #[test]
    fn test_config_str() {
        let checker =
            LinkChecker::with_config_str(r#"{"seed_url": "https://example.com", "max_pages": 7}"#)
                .unwrap();
        assert_eq!(checker.config().max_pages, 7);
        assert!(LinkChecker::with_config_str("{").is_err());
    }

    #[tokio::test]
    async fn test_run_with_renderer() {
        let site = MockSite::new().links("https://example.com/", &["/a"]);
        let run = LinkChecker::new("https://example.com")
            .with_page_delay(0)
            .run_with(site.renderer())
            .await;

        assert_eq!(run.state, CrawlState::Completed);
        assert_eq!(run.seed_url, "https://example.com/");
        assert_eq!(run.results.len(), 1);
        assert_eq!(run.results[0].url, "https://example.com/a");
    }
}
