//! Browser automation port and its WebDriver-backed implementation.
//!
//! The scraping pipeline is written against the [`Browser`] and [`Element`]
//! traits only; the concrete [`webdriver`] client speaks the W3C wire protocol
//! to a local driver such as chromedriver.

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScrapeError;

pub(crate) mod webdriver;

#[cfg(test)]
pub(crate) mod fake;

/// The WebDriver key code for the Enter key, appended to a query to submit
/// the search form.
pub(crate) const ENTER: &str = "\u{E007}";

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// How to find an element on the current page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// A named form field, e.g. the search input.
    Name(String),
    /// A CSS selector.
    Css(String),
    /// An XPath query, used for label-anchored value lookups.
    XPath(String),
}

impl Locator {
    pub fn name(value: impl Into<String>) -> Self {
        Locator::Name(value.into())
    }

    pub fn css(value: impl Into<String>) -> Self {
        Locator::Css(value.into())
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Locator::XPath(value.into())
    }

    /// The W3C location strategy and selector for this locator. Named fields
    /// have no strategy of their own and are lowered to a CSS attribute
    /// selector.
    pub(crate) fn strategy(&self) -> (&'static str, Cow<'_, str>) {
        match self {
            Locator::Name(name) => ("css selector", Cow::Owned(format!("[name='{name}']"))),
            Locator::Css(selector) => ("css selector", Cow::Borrowed(selector)),
            Locator::XPath(query) => ("xpath", Cow::Borrowed(query)),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Name(name) => write!(f, "name {name}"),
            Locator::Css(selector) => write!(f, "css {selector}"),
            Locator::XPath(query) => write!(f, "xpath {query}"),
        }
    }
}

/// A handle to an element on the currently loaded page.
#[async_trait]
pub trait Element: Send + Sync {
    /// The rendered text content of the element.
    async fn text(&self) -> Result<String, ScrapeError>;

    /// Sends keystrokes to the element.
    async fn send_keys(&self, keys: &str) -> Result<(), ScrapeError>;
}

/// The browser automation capability the pipeline is written against.
///
/// One implementor drives one browser session; all calls are sequential.
#[async_trait]
pub trait Browser: Send + Sync {
    type Element: Element;

    /// Loads `url` in the session, replacing the current page.
    async fn navigate(&self, url: &str) -> Result<(), ScrapeError>;

    /// Finds the first element matching `locator`, or fails with
    /// [`ScrapeError::NoSuchElement`].
    async fn find(&self, locator: &Locator) -> Result<Self::Element, ScrapeError>;

    /// Finds all elements matching `locator`, in DOM order. An empty result
    /// is not an error.
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Element>, ScrapeError>;

    /// Polls for `locator` until it is present or `timeout` elapses.
    async fn wait_until_clickable(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Self::Element, ScrapeError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            match self.find(locator).await {
                Ok(element) => return Ok(element),
                Err(ScrapeError::NoSuchElement { .. }) => {}
                Err(err) => return Err(err),
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(ScrapeError::Timeout {
                    locator: locator.to_string(),
                    secs: timeout.as_secs(),
                });
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL.min(timeout)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Locator;

    #[test]
    fn name_locator_lowers_to_css_attribute_selector() {
        let locator = Locator::name("advcond");
        let (strategy, selector) = locator.strategy();
        assert_eq!(strategy, "css selector");
        assert_eq!(selector, "[name='advcond']");
    }

    #[test]
    fn xpath_locator_keeps_strategy_and_query() {
        let query = "//div[contains(text(), 'Phase')]/following-sibling::span";
        let locator = Locator::xpath(query);
        let (strategy, selector) = locator.strategy();
        assert_eq!(strategy, "xpath");
        assert_eq!(selector, query);
    }

    #[test]
    fn display_names_the_strategy() {
        assert_eq!(Locator::css("div.nct-id").to_string(), "css div.nct-id");
        assert_eq!(Locator::name("advcond").to_string(), "name advcond");
    }
}
