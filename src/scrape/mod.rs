//! The pagination-and-extraction pipeline against the registry site.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

use crate::browser::Locator;

pub(crate) mod collect;
pub(crate) mod extract;
pub(crate) mod pagination;
pub(crate) mod wait;

pub use pagination::Scraper;
pub use wait::WaitConfig;

const REGISTRY_BASE: &str = "https://clinicaltrials.gov";
const REGISTRY_BASE_ENV: &str = "CTGOV_BASE";

/// The site serves results in fixed pages of 100.
pub(crate) const PAGE_SIZE: u64 = 100;

pub(crate) fn registry_base() -> Cow<'static, str> {
    std::env::var(REGISTRY_BASE_ENV)
        .ok()
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .map(Cow::Owned)
        .unwrap_or(Cow::Borrowed(REGISTRY_BASE))
}

/// The search input on the registry landing page.
pub(crate) fn search_input() -> Locator {
    Locator::name("advcond")
}

/// The "1 to 100 out of N studies" summary line above the result list.
pub(crate) fn results_summary() -> Locator {
    Locator::css("p.shown-range.font-body-md.ng-star-inserted")
}

/// The badge showing a trial's registry ID on a results page.
pub(crate) fn identifier_badge() -> Locator {
    Locator::css("div.nct-id")
}

pub(crate) fn search_url(base: &str, query: &str, page_index: u64) -> String {
    format!(
        "{base}/search?cond={}&limit={PAGE_SIZE}&rank={}",
        urlencoding::encode(query),
        page_index * PAGE_SIZE + 1
    )
}

pub(crate) fn detail_url(base: &str, nct_id: &str, query: &str, rank: u64) -> String {
    format!(
        "{base}/study/{nct_id}?cond={}&limit={PAGE_SIZE}&rank={rank}",
        urlencoding::encode(query)
    )
}

/// Parses the study total out of the results summary, tolerating thousands
/// separators. `None` means the summary did not match; the caller treats that
/// as zero studies, not as a failure.
pub(crate) fn parse_total_studies(summary: &str) -> Option<u64> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"out of ([\d,]+) studies").expect("valid regex"));
    let captured = pattern.captures(summary)?.get(1)?.as_str().replace(',', "");
    captured.parse().ok()
}

/// Number of result pages to walk for `total` studies.
///
/// Kept as the site-observed `total / 100 + 1`: an exact multiple of 100
/// produces one trailing page whose badge list is empty, which the collector
/// absorbs. Zero studies still walk one page.
pub(crate) fn page_count(total: u64) -> u64 {
    (total / PAGE_SIZE) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_total_with_thousands_separator() {
        let summary = "Viewing 1-100 out of 1,432 studies";
        assert_eq!(parse_total_studies(summary), Some(1_432));
    }

    #[test]
    fn parses_total_of_250() {
        assert_eq!(
            parse_total_studies("Viewing 1-100 out of 250 studies"),
            Some(250)
        );
    }

    #[test]
    fn unmatched_summary_yields_none() {
        assert_eq!(parse_total_studies("Showing results"), None);
        assert_eq!(parse_total_studies(""), None);
    }

    #[test]
    fn page_count_for_250_is_3() {
        assert_eq!(page_count(250), 3);
    }

    #[test]
    fn page_count_is_at_least_one_even_for_zero() {
        assert_eq!(page_count(0), 1);
    }

    #[test]
    fn page_count_for_exact_multiple_includes_trailing_page() {
        // Deliberate: the trailing page carries no badges and adds nothing.
        assert_eq!(page_count(100), 2);
    }

    #[test]
    fn search_url_embeds_encoded_query_and_rank_offset() {
        let url = search_url(REGISTRY_BASE, "lung cancer", 2);
        assert_eq!(
            url,
            "https://clinicaltrials.gov/search?cond=lung%20cancer&limit=100&rank=201"
        );
    }

    #[test]
    fn detail_url_embeds_identifier_query_and_rank() {
        let url = detail_url(REGISTRY_BASE, "NCT04267848", "asthma", 7);
        assert_eq!(
            url,
            "https://clinicaltrials.gov/study/NCT04267848?cond=asthma&limit=100&rank=7"
        );
    }
}
