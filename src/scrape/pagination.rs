//! The pagination controller: one full run from query to result set.
//!
//! Two phases, deliberately decoupled: identifiers are collected across all
//! result pages first, then every collected identifier's detail page is
//! visited in rank order. Identifiers are neither deduplicated nor reordered.

use std::borrow::Cow;
use std::time::Duration;

use tracing::{info, warn};

use crate::browser::{Browser, Element, ENTER};
use crate::error::ScrapeError;
use crate::progress::Progress;
use crate::record::TrialRecord;
use crate::scrape::collect::collect_identifiers;
use crate::scrape::extract::extract_fields;
use crate::scrape::wait::WaitConfig;
use crate::scrape::{
    detail_url, page_count, parse_total_studies, registry_base, results_summary, search_input,
    search_url,
};

const SEARCH_INPUT_TIMEOUT: Duration = Duration::from_secs(10);

/// Drives one browser session through search, pagination, and extraction.
pub struct Scraper<B: Browser> {
    browser: B,
    waits: WaitConfig,
    base: Cow<'static, str>,
}

impl<B: Browser> Scraper<B> {
    pub fn new(browser: B) -> Self {
        Self {
            browser,
            waits: WaitConfig::default(),
            base: registry_base(),
        }
    }

    pub fn with_waits(mut self, waits: WaitConfig) -> Self {
        self.waits = waits;
        self
    }

    /// Points the scraper at a different registry root, overriding the
    /// `CTGOV_BASE` environment fallback.
    pub fn with_base(mut self, base: &str) -> Self {
        self.base = Cow::Owned(base.trim_end_matches('/').to_string());
        self
    }

    /// Runs the whole pipeline for `query`, invoking `progress` after each
    /// extracted record.
    ///
    /// An unreadable results summary degrades the run to zero expected pages;
    /// session-level failures propagate. The caller owns the session and is
    /// responsible for closing it whichever way this returns.
    pub async fn run<F>(
        &self,
        query: &str,
        mut progress: F,
    ) -> Result<Vec<TrialRecord>, ScrapeError>
    where
        F: FnMut(Progress) + Send,
    {
        self.submit_query(query).await?;

        let total = match self.read_total().await {
            Some(total) => total,
            None => {
                warn!("results summary unreadable; assuming zero studies");
                0
            }
        };
        info!(total, "parsed study count");

        let identifiers = self.collect_all(query, total).await?;
        if identifiers.is_empty() {
            return Ok(Vec::new());
        }

        let total_ids = identifiers.len();
        let mut records = Vec::with_capacity(total_ids);
        for (index, nct_id) in identifiers.into_iter().enumerate() {
            let rank = index as u64 + 1;
            let url = detail_url(&self.base, &nct_id, query, rank);
            let fields = extract_fields(&self.browser, &url, &self.waits.detail).await?;
            records.push(TrialRecord::new(nct_id, url, fields));
            progress(Progress {
                completed: index + 1,
                total: total_ids,
            });
        }
        Ok(records)
    }

    /// Opens the registry landing page and submits the query through the
    /// search input, landing on the default result view.
    async fn submit_query(&self, query: &str) -> Result<(), ScrapeError> {
        self.browser.navigate(&format!("{}/", self.base)).await?;
        let input = self
            .browser
            .wait_until_clickable(&search_input(), SEARCH_INPUT_TIMEOUT)
            .await?;
        input.send_keys(&format!("{query}{ENTER}")).await?;
        self.waits.search.settle(&self.browser, &results_summary()).await;
        Ok(())
    }

    /// Reads the study total from the results summary. `None` covers both a
    /// missing summary element and an unmatched summary text.
    async fn read_total(&self) -> Option<u64> {
        let element = self.browser.find(&results_summary()).await.ok()?;
        let text = element.text().await.ok()?;
        parse_total_studies(&text)
    }

    /// Phase one: walk every result page and accumulate identifiers in
    /// page order, then DOM order within a page.
    async fn collect_all(&self, query: &str, total: u64) -> Result<Vec<String>, ScrapeError> {
        let mut identifiers = Vec::new();
        for page_index in 0..page_count(total) {
            self.browser
                .navigate(&search_url(&self.base, query, page_index))
                .await?;
            let page_ids = collect_identifiers(&self.browser, &self.waits.results).await?;
            identifiers.extend(page_ids);
        }
        Ok(identifiers)
    }
}
