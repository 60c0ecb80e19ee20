pub mod engine;
pub mod prober;
pub mod rate_limit;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod tests;

pub use engine::CrawlEngine;
pub use rate_limit::{FixedInterval, RateLimiter, Unlimited};
pub use scheduler::Scheduler;
