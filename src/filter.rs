use crate::config::CheckerConfig;
use crate::error::{CheckError, ConfigError};
use regex::Regex;
use url::Url;

/// Resolve an href found on `current_page` into an absolute URL
///
/// Returns `None` when the href cannot be resolved at all; such links are
/// skipped rather than reported.
pub fn resolve(href: &str, current_page: &Url) -> Option<Url> {
    current_page.join(href).ok()
}

/// A URL is internal when its host equals `base_host` or it has no host
///
/// Only the host string is compared, so `http://x` and `https://x` count as
/// the same site.
pub fn is_internal(url: &Url, base_host: &str) -> bool {
    match url.host_str() {
        Some(host) => host == base_host,
        None => true,
    }
}

/// Whether a URL can be navigated to and checked at all
fn is_checkable(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.host_str().is_some()
}

/// Parse a seed URL, requiring an http(s) scheme and a host
pub fn parse_seed(raw: &str) -> Result<Url, CheckError> {
    let malformed = |reason: &str| CheckError::MalformedSeedUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let mut url = Url::parse(raw).map_err(|e| malformed(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(malformed("scheme must be http or https"));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(malformed("URL has no host"));
    }
    // Same page as its fragment-less form
    url.set_fragment(None);
    Ok(url)
}

/// Like [`parse_seed`], but assumes `https://` when the input has no scheme
pub fn normalize_seed(raw: &str) -> Result<Url, CheckError> {
    let raw = raw.trim();
    if raw.contains("://") {
        parse_seed(raw)
    } else {
        parse_seed(&format!("https://{raw}"))
    }
}

/// Decides which links found on a page are internal crawl targets
#[derive(Debug)]
pub struct UrlFilter {
    base_host: String,
    exclude_regexes: Vec<Regex>,
    strip_fragments: bool,
}

impl UrlFilter {
    /// Create a filter scoped to the host of `seed`
    pub fn new(seed: &Url, config: &CheckerConfig) -> Result<Self, ConfigError> {
        let mut exclude_regexes = Vec::with_capacity(config.exclude_patterns.len());
        for pattern in &config.exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            base_host: seed.host_str().unwrap_or_default().to_string(),
            exclude_regexes,
            strip_fragments: config.strip_fragments,
        })
    }

    pub fn base_host(&self) -> &str {
        &self.base_host
    }

    /// Resolve `href` against `current_page` and return it if it should be checked
    pub fn crawl_target(&self, href: &str, current_page: &Url) -> Option<Url> {
        let resolved = resolve(href, current_page)?;

        if !is_checkable(&resolved) {
            ::log::trace!("Skipping non-navigable link: {}", resolved);
            return None;
        }
        if !is_internal(&resolved, &self.base_host) {
            ::log::trace!("Skipping external link: {}", resolved);
            return None;
        }
        if self.is_excluded(&resolved) {
            ::log::debug!("URL filter rejected: {}", resolved);
            return None;
        }

        Some(self.normalize_url(resolved))
    }

    fn is_excluded(&self, url: &Url) -> bool {
        let url_str = url.as_str();
        self.exclude_regexes.iter().any(|regex| regex.is_match(url_str))
    }

    fn normalize_url(&self, mut url: Url) -> Url {
        if self.strip_fragments {
            url.set_fragment(None);
        }
        url
    }
}
