use clap::Parser;
use probe_links::CheckerConfig;
use probe_links::error::ConfigError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "probe-links")]
#[command(about = "Crawls a website in a real browser and reports broken links")]
#[command(version)]
pub struct Args {
    /// URL of the website to check (https:// is assumed when no scheme is given)
    pub url: String,

    /// Browser session lifetime in minutes [default: 10]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Maximum number of pages to crawl for links [default: 50]
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Write the report to this file instead of printing it
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// JSON configuration file; flags given on the command line win
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver endpoint (also read from WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Rendering provider name
    #[arg(long)]
    pub provider: Option<String>,

    /// Region to allocate the browser session in
    #[arg(long)]
    pub region: Option<String>,

    /// Minimum delay between page crawls in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Print the results as JSON instead of the text report
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Merge the configuration file (if any), environment and flags
    pub fn to_config(&self, seed_url: &str) -> Result<CheckerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = CheckerConfig::from_file(path)?;
                config.seed_url = seed_url.to_string();
                config
            }
            None => CheckerConfig::new(seed_url),
        };
        config.apply_env();

        if let Some(minutes) = self.timeout {
            config.session_timeout_minutes = minutes;
        }
        if let Some(max_pages) = self.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(webdriver_url) = &self.webdriver_url {
            config.webdriver_url = webdriver_url.clone();
        }
        if let Some(provider) = &self.provider {
            config.provider = provider.clone();
        }
        if self.region.is_some() {
            config.region = self.region.clone();
        }
        if let Some(delay_ms) = self.delay_ms {
            config.page_delay_ms = delay_ms;
        }
        Ok(config)
    }
}
