//! Settling waits after navigation.
//!
//! The registry renders results client-side, so a freshly navigated page is
//! empty for a moment. The default strategy polls for the element we are
//! about to read, bounded by a timeout; the fixed variant reproduces the
//! blind sleeps the site has historically tolerated.

use std::time::Duration;

use crate::browser::{Browser, Locator};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

const SEARCH_SETTLE: Duration = Duration::from_secs(10);
const RESULTS_SETTLE: Duration = Duration::from_secs(5);
const DETAIL_SETTLE: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStrategy {
    /// Sleep unconditionally for the full duration.
    Fixed(Duration),
    /// Poll for the probe element until present or `timeout` elapses.
    Poll { timeout: Duration, interval: Duration },
}

impl WaitStrategy {
    /// Waits for `probe` to appear on the current page. Best effort: a probe
    /// that never shows up ends the wait without error, and the following
    /// lookups degrade to their documented fallbacks.
    pub(crate) async fn settle<B: Browser>(&self, browser: &B, probe: &Locator) {
        match self {
            WaitStrategy::Fixed(delay) => tokio::time::sleep(*delay).await,
            WaitStrategy::Poll { timeout, interval } => {
                let deadline = tokio::time::Instant::now() + *timeout;
                loop {
                    match browser.find_all(probe).await {
                        Ok(found) if !found.is_empty() => return,
                        _ => {}
                    }
                    if tokio::time::Instant::now() >= deadline {
                        return;
                    }
                    tokio::time::sleep(*interval).await;
                }
            }
        }
    }
}

/// Per-stage settling configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// After submitting the query on the landing page.
    pub search: WaitStrategy,
    /// After navigating to each paginated results URL.
    pub results: WaitStrategy,
    /// After navigating to each study detail URL.
    pub detail: WaitStrategy,
}

impl WaitConfig {
    /// Bounded polling with the historical delays as upper bounds.
    pub fn polling() -> Self {
        let poll = |timeout| WaitStrategy::Poll {
            timeout,
            interval: POLL_INTERVAL,
        };
        Self {
            search: poll(SEARCH_SETTLE),
            results: poll(RESULTS_SETTLE),
            detail: poll(DETAIL_SETTLE),
        }
    }

    /// The original unconditional sleeps.
    pub fn fixed() -> Self {
        Self {
            search: WaitStrategy::Fixed(SEARCH_SETTLE),
            results: WaitStrategy::Fixed(RESULTS_SETTLE),
            detail: WaitStrategy::Fixed(DETAIL_SETTLE),
        }
    }

    /// Replaces per-stage bounds while keeping each stage's strategy kind:
    /// a polling stage keeps polling with the new timeout, a fixed stage
    /// sleeps for the new duration. `None` leaves a stage unchanged.
    pub fn with_bounds(
        mut self,
        search: Option<Duration>,
        results: Option<Duration>,
        detail: Option<Duration>,
    ) -> Self {
        fn rebound(strategy: WaitStrategy, bound: Option<Duration>) -> WaitStrategy {
            let Some(bound) = bound else {
                return strategy;
            };
            match strategy {
                WaitStrategy::Fixed(_) => WaitStrategy::Fixed(bound),
                WaitStrategy::Poll { interval, .. } => WaitStrategy::Poll {
                    timeout: bound,
                    interval,
                },
            }
        }
        self.search = rebound(self.search, search);
        self.results = rebound(self.results, results);
        self.detail = rebound(self.detail, detail);
        self
    }

    #[cfg(test)]
    pub(crate) fn immediate() -> Self {
        Self {
            search: WaitStrategy::Fixed(Duration::ZERO),
            results: WaitStrategy::Fixed(Duration::ZERO),
            detail: WaitStrategy::Fixed(Duration::ZERO),
        }
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self::polling()
    }
}
