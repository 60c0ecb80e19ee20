use crate::config::{CheckerConfig, SessionConfig};
use crate::error::{NavigationError, SessionError};
use crate::renderer::{PageRenderer, RenderSession};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
enum MockPage {
    Html(String),
    Fail(String),
    Hang,
}

#[derive(Debug, Default)]
struct MockStats {
    opened: AtomicUsize,
    closed: AtomicUsize,
    navigations: Mutex<Vec<String>>,
}

/// Scripted site served by [`MockRenderer`]
///
/// Unknown URLs render as an empty page.
#[derive(Debug, Clone, Default)]
pub struct MockSite {
    pages: HashMap<String, MockPage>,
    unavailable: bool,
    stats: Arc<MockStats>,
}

impl MockSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), MockPage::Html(html.to_string()));
        self
    }

    /// Page whose body is just anchors to `hrefs`
    pub fn links(self, url: &str, hrefs: &[&str]) -> Self {
        let anchors = hrefs
            .iter()
            .map(|href| format!(r#"<a href="{href}">{href}</a>"#))
            .collect::<Vec<_>>()
            .join("\n");
        self.page(url, &format!("<html><body>{anchors}</body></html>"))
    }

    pub fn failing(mut self, url: &str, message: &str) -> Self {
        self.pages.insert(url.to_string(), MockPage::Fail(message.to_string()));
        self
    }

    pub fn hanging(mut self, url: &str) -> Self {
        self.pages.insert(url.to_string(), MockPage::Hang);
        self
    }

    /// Refuse to hand out sessions
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn renderer(&self) -> MockRenderer {
        MockRenderer { site: self.clone() }
    }

    pub fn session_config(&self) -> SessionConfig {
        CheckerConfig::new("https://example.com/").session_config()
    }

    pub fn opened(&self) -> usize {
        self.stats.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.stats.closed.load(Ordering::SeqCst)
    }

    /// Every URL navigated to, in order
    pub fn navigations(&self) -> Vec<String> {
        self.stats.navigations.lock().unwrap().clone()
    }
}

#[derive(Debug, Clone)]
pub struct MockRenderer {
    site: MockSite,
}

#[async_trait]
impl PageRenderer for MockRenderer {
    async fn open_session(
        &self,
        _config: &SessionConfig,
    ) -> Result<Box<dyn RenderSession>, SessionError> {
        if self.site.unavailable {
            return Err(SessionError::Unavailable("no browser sessions available".into()));
        }
        self.site.stats.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession {
            site: self.site.clone(),
            closed: false,
        }))
    }
}

struct MockSession {
    site: MockSite,
    closed: bool,
}

#[async_trait]
impl RenderSession for MockSession {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<String, NavigationError> {
        self.site.stats.navigations.lock().unwrap().push(url.to_string());
        match self.site.pages.get(url).cloned() {
            Some(MockPage::Html(html)) => Ok(html),
            Some(MockPage::Fail(message)) => Err(NavigationError::new(message)),
            Some(MockPage::Hang) => std::future::pending().await,
            None => Ok("<html><body></body></html>".to_string()),
        }
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        if !self.closed {
            self.closed = true;
            self.site.stats.closed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
