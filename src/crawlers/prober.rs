use crate::error::NavigationError;
use crate::renderer::RenderSession;
use crate::results::LinkResult;
use std::time::Duration;
use tokio::time::timeout;

/// Navigate to `url` and return its rendered markup, giving up after `limit`
///
/// The bound holds even if the renderer ignores the timeout it is handed.
pub async fn render(
    session: &mut dyn RenderSession,
    url: &str,
    limit: Duration,
) -> Result<String, NavigationError> {
    match timeout(limit, session.navigate(url, limit)).await {
        Ok(result) => result,
        Err(_) => Err(NavigationError::new(format!(
            "Timeout {}ms exceeded navigating to {}",
            limit.as_millis(),
            url
        ))),
    }
}

/// Navigate to `url` once and record whether it loaded
///
/// Every navigation failure becomes an unreachable result; nothing is
/// propagated. A navigation that completes is reachable no matter what the
/// page says, since the renderer exposes no status code.
pub async fn probe(
    session: &mut dyn RenderSession,
    url: &str,
    parent_page: &str,
    limit: Duration,
) -> LinkResult {
    ::log::debug!("Checking: {}", url);

    match render(session, url, limit).await {
        Ok(_) => {
            ::log::info!("OK: {}", url);
            LinkResult::reachable(url.to_string(), parent_page.to_string())
        }
        Err(e) => {
            ::log::warn!("BROKEN: {} (from {}): {}", url, parent_page, e);
            LinkResult::unreachable(url.to_string(), parent_page.to_string(), e.message)
        }
    }
}
