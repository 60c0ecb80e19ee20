use crate::results::{CrawlRun, CrawlState};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

const WIDTH: usize = 70;

/// Shown when a completed run found nothing broken
pub const SUCCESS_BANNER: &str = "No broken links found! ✓";

/// Render the plain-text report for a run
///
/// Broken links are listed in discovery order. A run that did not complete
/// never gets the success banner, even though it has no broken links.
pub fn build_report(run: &CrawlRun) -> String {
    let heavy = "=".repeat(WIDTH);
    let light = "-".repeat(WIDTH);

    let mut lines = vec![
        heavy.clone(),
        "BROKEN LINK CHECK REPORT".to_string(),
        heavy.clone(),
        format!("Base URL: {}", run.seed_url),
        format!("Provider: {}", run.provider),
        format!("Status: {}", state_label(run.state)),
        format!("Pages crawled: {}", run.pages_crawled),
        format!("Total links checked: {}", run.total()),
        format!("Working links: {}", run.working()),
        format!("Broken links: {}", run.broken()),
        String::new(),
    ];

    if run.broken() > 0 {
        lines.push("BROKEN LINKS:".to_string());
        lines.push(light.clone());
        for result in run.broken_links() {
            lines.push(format!("URL: {}", result.url));
            lines.push(format!("From: {}", result.parent_page));
            lines.push(format!(
                "Error: {}",
                result.error_detail.as_deref().unwrap_or_default()
            ));
            lines.push(light.clone());
        }
    }

    match (&run.failure, run.state) {
        (Some(failure), _) => lines.push(format!("Run failed: {failure}")),
        (None, CrawlState::Completed) if run.broken() == 0 => lines.push(SUCCESS_BANNER.to_string()),
        (None, CrawlState::Cancelled) => {
            lines.push("Run cancelled before the crawl finished".to_string())
        }
        _ => {}
    }

    lines.push(heavy);
    lines.join("\n")
}

/// Pretty JSON form of the whole run
pub fn build_json(run: &CrawlRun) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(run)
}

/// Write `report` verbatim to `path`
pub fn write_report(path: impl AsRef<Path>, report: &str) -> io::Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path)?;
    file.write_all(report.as_bytes())?;
    file.flush()?;
    ::log::info!("Report saved to {}", path.display());
    Ok(())
}

fn state_label(state: CrawlState) -> &'static str {
    match state {
        CrawlState::Idle => "idle",
        CrawlState::Running => "running",
        CrawlState::Completed => "completed",
        CrawlState::Cancelled => "cancelled",
        CrawlState::Failed => "failed",
    }
}
