//! Identifier collection from a loaded results page.

use crate::browser::{Browser, Element};
use crate::error::ScrapeError;
use crate::scrape::identifier_badge;
use crate::scrape::wait::WaitStrategy;

/// Reads every identifier badge on the current page, in DOM order.
///
/// A page with no badges yields an empty list. Errors here mean the session
/// itself is broken and are fatal to the run.
pub(crate) async fn collect_identifiers<B: Browser>(
    browser: &B,
    settle: &WaitStrategy,
) -> Result<Vec<String>, ScrapeError> {
    let badge = identifier_badge();
    settle.settle(browser, &badge).await;

    let elements = browser.find_all(&badge).await?;
    let mut identifiers = Vec::with_capacity(elements.len());
    for element in &elements {
        identifiers.push(element.text().await?);
    }
    Ok(identifiers)
}
