use crate::error::CheckError;
use serde::{Deserialize, Serialize};

/// Whether a probed link could be navigated to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Reachable,
    Unreachable,
}

/// Result of probing one discovered link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkResult {
    /// URL that was probed
    pub url: String,

    /// Page the link was first discovered on
    pub parent_page: String,

    pub outcome: Outcome,

    /// The renderer's failure message, only set for unreachable links
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl LinkResult {
    pub fn reachable(url: String, parent_page: String) -> Self {
        Self {
            url,
            parent_page,
            outcome: Outcome::Reachable,
            error_detail: None,
        }
    }

    pub fn unreachable(url: String, parent_page: String, error_detail: String) -> Self {
        Self {
            url,
            parent_page,
            outcome: Outcome::Unreachable,
            error_detail: Some(error_detail),
        }
    }

    pub fn is_broken(&self) -> bool {
        self.outcome == Outcome::Unreachable
    }
}

/// Lifecycle of a crawl engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

/// Everything a finished crawl run produced
///
/// An empty `results` list means nothing unless `state` is checked too: a
/// failed run and a site without links both have no results.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlRun {
    pub seed_url: String,
    pub provider: String,
    pub state: CrawlState,
    pub pages_crawled: usize,
    pub results: Vec<LinkResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<CheckError>,
}

impl CrawlRun {
    pub fn failed(seed_url: String, provider: String, failure: CheckError) -> Self {
        Self {
            seed_url,
            provider,
            state: CrawlState::Failed,
            pages_crawled: 0,
            results: Vec::new(),
            failure: Some(failure),
        }
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn working(&self) -> usize {
        self.results.iter().filter(|r| !r.is_broken()).count()
    }

    pub fn broken(&self) -> usize {
        self.results.iter().filter(|r| r.is_broken()).count()
    }

    /// Broken results in discovery order
    pub fn broken_links(&self) -> impl Iterator<Item = &LinkResult> {
        self.results.iter().filter(|r| r.is_broken())
    }

    /// Process exit code for this run
    pub fn exit_code(&self) -> i32 {
        match self.state {
            CrawlState::Completed => 0,
            CrawlState::Cancelled => 130,
            CrawlState::Idle | CrawlState::Running | CrawlState::Failed => 1,
        }
    }
}
