use super::{PageRenderer, RenderSession};
use crate::config::{CheckerConfig, SessionConfig};
use crate::error::{NavigationError, SessionError};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use serde_json::{Map, Value, json};
use std::time::Duration;
use tokio::time::timeout;

/// Renders pages in a browser driven over the WebDriver protocol
#[derive(Debug, Clone)]
pub struct WebDriverRenderer {
    webdriver_url: String,
    fallback_urls: Vec<String>,
}

impl WebDriverRenderer {
    pub fn new(webdriver_url: &str) -> Self {
        Self {
            webdriver_url: webdriver_url.to_string(),
            fallback_urls: Vec::new(),
        }
    }

    /// WebDriver URLs tried, in order, when the primary one refuses a session
    pub fn with_fallbacks(mut self, fallback_urls: Vec<String>) -> Self {
        self.fallback_urls = fallback_urls;
        self
    }

    pub fn from_config(config: &CheckerConfig) -> Self {
        Self::new(&config.webdriver_url).with_fallbacks(config.fallback_webdriver_urls.clone())
    }

    fn endpoints(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.webdriver_url.as_str()).chain(
            self.fallback_urls
                .iter()
                .map(String::as_str)
                .filter(|url| *url != self.webdriver_url),
        )
    }
}

#[async_trait]
impl PageRenderer for WebDriverRenderer {
    async fn open_session(
        &self,
        config: &SessionConfig,
    ) -> Result<Box<dyn RenderSession>, SessionError> {
        let capabilities = capabilities(config);
        ::log::info!(
            "Creating browser session (provider: {}, region: {})",
            config.provider,
            config.region.as_deref().unwrap_or("default")
        );

        let mut last_error = String::from("no WebDriver endpoints configured");
        for endpoint in self.endpoints() {
            match connect(endpoint, &capabilities).await {
                Ok(client) => {
                    ::log::info!("Browser session created at {}", endpoint);
                    return Ok(Box::new(WebDriverSession {
                        client: Some(client),
                        endpoint: endpoint.to_string(),
                        capabilities,
                    }));
                }
                Err(e) => {
                    ::log::debug!("Failed to connect to WebDriver at {}: {}", endpoint, e);
                    last_error = format!("{endpoint}: {e}");
                }
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(SessionError::Unavailable(last_error))
    }
}

async fn connect(
    endpoint: &str,
    capabilities: &Map<String, Value>,
) -> Result<Client, fantoccini::error::NewSessionError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities.clone());
    builder.connect(endpoint).await
}

/// Capabilities requested for every session
fn capabilities(config: &SessionConfig) -> Map<String, Value> {
    let mut args = vec![format!("--user-agent={}", config.user_agent)];
    if config.headless {
        args.push("--headless=new".to_string());
    }

    let mut caps = Map::new();
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps.insert(
        "timeouts".to_string(),
        json!({ "pageLoad": config.navigation_timeout.as_millis() as u64 }),
    );
    caps.insert(
        "probe:options".to_string(),
        json!({
            "provider": config.provider,
            "region": config.region,
            "sessionTimeoutMinutes": config.session_timeout.as_secs() / 60,
        }),
    );
    caps
}

/// A single WebDriver browser session
pub struct WebDriverSession {
    client: Option<Client>,
    endpoint: String,
    capabilities: Map<String, Value>,
}

impl WebDriverSession {
    /// Replace a session the server no longer knows about
    async fn reconnect(&mut self) -> bool {
        ::log::warn!("Attempting to reconnect WebDriver session at {}", self.endpoint);
        match connect(&self.endpoint, &self.capabilities).await {
            Ok(client) => {
                self.client = Some(client);
                ::log::info!("Successfully reconnected to WebDriver");
                true
            }
            Err(e) => {
                ::log::error!("Failed to reconnect to WebDriver: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl RenderSession for WebDriverSession {
    async fn navigate(&mut self, url: &str, limit: Duration) -> Result<String, NavigationError> {
        let Some(client) = self.client.clone() else {
            return Err(NavigationError::new("browser session is closed"));
        };

        match load(&client, url, limit).await {
            Err(e) if is_session_lost(&e.message) => {
                ::log::warn!("Lost session while accessing {}", url);
                if !self.reconnect().await {
                    return Err(e);
                }
                match self.client.clone() {
                    Some(client) => load(&client, url, limit).await,
                    None => Err(e),
                }
            }
            result => result,
        }
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        let Some(client) = self.client.take() else {
            return Ok(());
        };
        client
            .close()
            .await
            .map_err(|e| SessionError::Close(e.to_string()))?;
        ::log::info!("Browser session closed");
        Ok(())
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        // Dropped without close(), e.g. on panic: close in the background
        if let Some(client) = self.client.take() {
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(async move {
                    if let Err(e) = client.close().await {
                        ::log::warn!("Failed to close dropped browser session: {}", e);
                    }
                });
            }
        }
    }
}

/// Navigate and fetch the rendered source, bounded by `limit`
async fn load(client: &Client, url: &str, limit: Duration) -> Result<String, NavigationError> {
    let render = async {
        client.goto(url).await?;
        client.source().await
    };

    match timeout(limit, render).await {
        Ok(Ok(html)) => Ok(html),
        Ok(Err(e)) => Err(NavigationError::new(e.to_string())),
        Err(_) => Err(NavigationError::new(format!(
            "Timeout {}ms exceeded navigating to {}",
            limit.as_millis(),
            url
        ))),
    }
}

fn is_session_lost(message: &str) -> bool {
    message.contains("Unable to find session") || message.contains("invalid session id")
}
