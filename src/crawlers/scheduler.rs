use std::collections::{HashSet, VecDeque};

/// Breadth-first frontier plus the set of every URL ever discovered
///
/// A URL enters `visited` when it is discovered, before it is probed or
/// crawled, so it can never be queued or probed twice.
#[derive(Debug, Default)]
pub struct Scheduler {
    visited: HashSet<String>,
    frontier: VecDeque<String>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `url` and queue it for crawling; false if it was already seen
    pub fn enqueue_if_new(&mut self, url: &str) -> bool {
        if !self.visited.insert(url.to_string()) {
            ::log::trace!("Skipping already visited or queued link: {}", url);
            return false;
        }
        self.frontier.push_back(url.to_string());
        true
    }

    /// Next page to crawl, in discovery order
    pub fn dequeue_next(&mut self) -> Option<String> {
        self.frontier.pop_front()
    }

    pub fn should_stop(&self, pages_crawled: usize, page_budget: usize) -> bool {
        self.frontier.is_empty() || pages_crawled >= page_budget
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn pending_count(&self) -> usize {
        self.frontier.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enqueue_dedup() {
        let mut scheduler = Scheduler::new();
        assert!(scheduler.enqueue_if_new("https://example.com/a"));
        assert!(!scheduler.enqueue_if_new("https://example.com/a"));
        assert!(scheduler.enqueue_if_new("https://example.com/b"));
        assert_eq!(scheduler.visited_count(), 2);
        assert_eq!(scheduler.pending_count(), 2);
    }

    #[test]
    fn test_fifo_order() {
        let mut scheduler = Scheduler::new();
        for url in ["/1", "/2", "/3"] {
            scheduler.enqueue_if_new(url);
        }
        assert_eq!(scheduler.dequeue_next().as_deref(), Some("/1"));
        scheduler.enqueue_if_new("/4");
        assert_eq!(scheduler.dequeue_next().as_deref(), Some("/2"));
        assert_eq!(scheduler.dequeue_next().as_deref(), Some("/3"));
        assert_eq!(scheduler.dequeue_next().as_deref(), Some("/4"));
        assert_eq!(scheduler.dequeue_next(), None);
    }

    #[test]
    fn test_dequeued_urls_stay_visited() {
        let mut scheduler = Scheduler::new();
        scheduler.enqueue_if_new("/a");
        scheduler.dequeue_next();
        assert!(!scheduler.enqueue_if_new("/a"));
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_should_stop() {
        let mut scheduler = Scheduler::new();
        assert!(scheduler.should_stop(0, 10), "empty frontier stops");

        scheduler.enqueue_if_new("/a");
        assert!(!scheduler.should_stop(0, 10));
        assert!(!scheduler.should_stop(9, 10));
        assert!(scheduler.should_stop(10, 10), "budget reached stops");
        assert!(scheduler.should_stop(0, 0), "zero budget stops");
    }
}
