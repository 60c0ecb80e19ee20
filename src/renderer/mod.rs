//! Boundary to whatever actually loads and renders pages.
//!
//! The crawl engine only ever talks to a [`PageRenderer`]; it never builds
//! one itself. [`webdriver::WebDriverRenderer`] drives a real browser, tests
//! plug in a scripted one.

pub mod webdriver;

use crate::config::SessionConfig;
use crate::error::{NavigationError, SessionError};
use async_trait::async_trait;
use std::time::Duration;

pub use webdriver::WebDriverRenderer;

/// Something that can hand out rendering sessions
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Allocate a session, failing with [`SessionError::Unavailable`] when the
    /// backend has none to give
    async fn open_session(
        &self,
        config: &SessionConfig,
    ) -> Result<Box<dyn RenderSession>, SessionError>;
}

/// A live, closable browsing context
#[async_trait]
pub trait RenderSession: Send {
    /// Load `url` and return the rendered markup
    ///
    /// Any failure to load, including exceeding `timeout`, is a
    /// [`NavigationError`].
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<String, NavigationError>;

    /// Tear the session down. Calling this more than once is a no-op.
    async fn close(&mut self) -> Result<(), SessionError>;
}
