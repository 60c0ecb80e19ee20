use super::prober::{self, probe};
use super::rate_limit::{FixedInterval, RateLimiter};
use super::scheduler::Scheduler;
use crate::config::CheckerConfig;
use crate::error::CheckError;
use crate::extract::extract_links;
use crate::filter::{UrlFilter, parse_seed};
use crate::renderer::{PageRenderer, RenderSession};
use crate::results::{CrawlRun, CrawlState, LinkResult};
use tokio::sync::watch;
use url::Url;

/// State owned by a single run and dropped when it ends
struct CrawlContext {
    seed: Url,
    filter: UrlFilter,
    scheduler: Scheduler,
    results: Vec<LinkResult>,
    pages_crawled: usize,
}

/// How the page loop ended
enum LoopExit {
    Finished,
    Cancelled,
    Failed(CheckError),
}

/// Breadth-first crawl of one site, probing every internal link once
///
/// The engine owns the rendering session for the whole run and closes it on
/// every exit path once it has been opened.
pub struct CrawlEngine<R> {
    renderer: R,
    config: CheckerConfig,
    limiter: Box<dyn RateLimiter>,
    cancel: Option<watch::Receiver<bool>>,
    state: CrawlState,
}

impl<R: PageRenderer> CrawlEngine<R> {
    pub fn new(renderer: R, config: CheckerConfig) -> Self {
        let limiter = Box::new(FixedInterval::new(config.page_delay()));
        Self {
            renderer,
            config,
            limiter,
            cancel: None,
            state: CrawlState::Idle,
        }
    }

    /// Replace the default fixed-interval spacing between page crawls
    pub fn with_rate_limiter(mut self, limiter: impl RateLimiter + 'static) -> Self {
        self.limiter = Box::new(limiter);
        self
    }

    /// Stop the run once `true` is sent on the channel
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Execute one complete run
    pub async fn run(&mut self) -> CrawlRun {
        self.state = CrawlState::Running;
        ::log::info!("Starting link check for: {}", self.config.seed_url);
        ::log::info!("Provider: {}", self.config.provider);
        ::log::info!("Max pages to check: {}", self.config.max_pages);

        let mut context = match self.prepare() {
            Ok(context) => context,
            Err(e) => return self.fail(self.config.seed_url.clone(), e),
        };
        let seed_url = context.seed.to_string();

        let mut session = match self
            .renderer
            .open_session(&self.config.session_config())
            .await
        {
            Ok(session) => session,
            Err(e) => {
                ::log::error!("Could not open a rendering session: {}", e);
                return self.fail(seed_url, e.into());
            }
        };

        let mut cancel = self.cancel.clone();
        let exit = self.crawl(session.as_mut(), &mut context, &mut cancel).await;

        match session.close().await {
            Ok(()) => ::log::info!("Rendering session released"),
            Err(e) => ::log::error!("Error releasing rendering session: {}", e),
        }

        let (state, results, failure) = match exit {
            LoopExit::Finished => (CrawlState::Completed, context.results, None),
            LoopExit::Cancelled => {
                ::log::warn!("Link check cancelled after {} pages", context.pages_crawled);
                (CrawlState::Cancelled, context.results, None)
            }
            LoopExit::Failed(e) => {
                ::log::error!("Link check failed: {}", e);
                (CrawlState::Failed, Vec::new(), Some(e))
            }
        };
        self.state = state;

        let run = CrawlRun {
            seed_url,
            provider: self.config.provider.clone(),
            state,
            pages_crawled: context.pages_crawled,
            results,
            failure,
        };
        ::log::info!(
            "Link check finished: {} pages crawled, {} links checked, {} broken",
            run.pages_crawled,
            run.total(),
            run.broken()
        );
        run
    }

    fn prepare(&self) -> Result<CrawlContext, CheckError> {
        let seed = parse_seed(&self.config.seed_url)?;
        let filter = UrlFilter::new(&seed, &self.config).map_err(|e| CheckError::InvalidConfig {
            message: e.to_string(),
        })?;

        ::log::debug!("Links on host {} are internal", filter.base_host());

        let mut scheduler = Scheduler::new();
        scheduler.enqueue_if_new(seed.as_str());

        Ok(CrawlContext {
            seed,
            filter,
            scheduler,
            results: Vec::new(),
            pages_crawled: 0,
        })
    }

    fn fail(&mut self, seed_url: String, failure: CheckError) -> CrawlRun {
        ::log::error!("Link check could not run: {}", failure);
        self.state = CrawlState::Failed;
        CrawlRun::failed(seed_url, self.config.provider.clone(), failure)
    }

    async fn crawl(
        &self,
        session: &mut dyn RenderSession,
        context: &mut CrawlContext,
        cancel: &mut Option<watch::Receiver<bool>>,
    ) -> LoopExit {
        let budget = self.config.max_pages;
        let limit = self.config.navigation_timeout();

        while !context.scheduler.should_stop(context.pages_crawled, budget) {
            if is_cancelled(cancel) {
                return LoopExit::Cancelled;
            }
            let Some(page) = context.scheduler.dequeue_next() else {
                break;
            };

            tokio::select! {
                _ = self.limiter.acquire() => {}
                _ = cancelled(cancel) => return LoopExit::Cancelled,
            }

            ::log::info!("Crawling: {}", page);
            let rendered = tokio::select! {
                rendered = prober::render(session, &page, limit) => rendered,
                _ = cancelled(cancel) => return LoopExit::Cancelled,
            };

            match rendered {
                Ok(html) => match Url::parse(&page) {
                    Ok(page_url) => {
                        for link in extract_links(&html, &page_url, &context.filter) {
                            if !context.scheduler.enqueue_if_new(link.as_str()) {
                                continue;
                            }
                            let result = tokio::select! {
                                result = probe(session, link.as_str(), &page, limit) => result,
                                _ = cancelled(cancel) => return LoopExit::Cancelled,
                            };
                            context.results.push(result);
                        }
                    }
                    Err(e) => ::log::warn!("Skipping unparseable page URL {}: {}", page, e),
                },
                Err(e) if context.pages_crawled == 0 && page == context.seed.as_str() => {
                    return LoopExit::Failed(CheckError::SeedUnreachable {
                        url: page,
                        message: e.message,
                    });
                }
                Err(e) => {
                    ::log::warn!("Could not load {} for link extraction: {}", page, e);
                }
            }

            context.pages_crawled += 1;
            ::log::info!(
                "Pages checked: {}/{} ({} queued, {} discovered)",
                context.pages_crawled,
                budget,
                context.scheduler.pending_count(),
                context.scheduler.visited_count()
            );
        }

        LoopExit::Finished
    }
}

fn is_cancelled(cancel: &Option<watch::Receiver<bool>>) -> bool {
    cancel.as_ref().is_some_and(|rx| *rx.borrow())
}

/// Resolves once cancellation is requested; never, without a channel
async fn cancelled(cancel: &mut Option<watch::Receiver<bool>>) {
    match cancel {
        Some(rx) => {
            if rx.wait_for(|stop| *stop).await.is_err() {
                // Sender gone: nobody can cancel any more
                std::future::pending::<()>().await;
            }
        }
        None => std::future::pending::<()>().await,
    }
}
