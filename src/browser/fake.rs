//! In-memory [`Browser`] used by pipeline tests.
//!
//! Pages are keyed by URL and hold element text keyed by locator. Sending
//! keys to any element "submits" and lands the session on a designated page,
//! mirroring the search form on the live site.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::browser::{Browser, Element, Locator};
use crate::error::ScrapeError;

#[derive(Debug, Clone, Default)]
pub(crate) struct FakePage {
    elements: HashMap<Locator, Vec<String>>,
}

impl FakePage {
    pub(crate) fn with(mut self, locator: Locator, texts: &[&str]) -> Self {
        self.elements
            .insert(locator, texts.iter().map(|t| t.to_string()).collect());
        self
    }
}

#[derive(Debug, Default)]
struct FakeState {
    pages: HashMap<String, FakePage>,
    submit_lands_on: Option<String>,
    current: Mutex<String>,
    keys_sent: Mutex<Vec<String>>,
    visited: Mutex<Vec<String>>,
}

#[derive(Clone, Default)]
pub(crate) struct FakeBrowser {
    state: Arc<FakeState>,
}

pub(crate) struct FakeBrowserBuilder {
    pages: HashMap<String, FakePage>,
    submit_lands_on: Option<String>,
}

impl FakeBrowser {
    pub(crate) fn builder() -> FakeBrowserBuilder {
        FakeBrowserBuilder {
            pages: HashMap::new(),
            submit_lands_on: None,
        }
    }

    pub(crate) fn keys_sent(&self) -> Vec<String> {
        self.state.keys_sent.lock().expect("lock").clone()
    }

    pub(crate) fn visited(&self) -> Vec<String> {
        self.state.visited.lock().expect("lock").clone()
    }
}

impl FakeBrowserBuilder {
    pub(crate) fn page(mut self, url: &str, page: FakePage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    /// The page the session lands on after keys are sent to any element.
    pub(crate) fn submit_lands_on(mut self, url: &str) -> Self {
        self.submit_lands_on = Some(url.to_string());
        self
    }

    pub(crate) fn build(self) -> FakeBrowser {
        FakeBrowser {
            state: Arc::new(FakeState {
                pages: self.pages,
                submit_lands_on: self.submit_lands_on,
                current: Mutex::new(String::new()),
                keys_sent: Mutex::new(Vec::new()),
                visited: Mutex::new(Vec::new()),
            }),
        }
    }
}

pub(crate) struct FakeElement {
    state: Arc<FakeState>,
    text: String,
}

#[async_trait]
impl Element for FakeElement {
    async fn text(&self) -> Result<String, ScrapeError> {
        Ok(self.text.clone())
    }

    async fn send_keys(&self, keys: &str) -> Result<(), ScrapeError> {
        self.state.keys_sent.lock().expect("lock").push(keys.to_string());
        if let Some(landing) = &self.state.submit_lands_on {
            *self.state.current.lock().expect("lock") = landing.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    type Element = FakeElement;

    // Unknown URLs load as blank pages: lookups on them miss, they do not
    // fail navigation. That matches how a dead page behaves in a real session.
    async fn navigate(&self, url: &str) -> Result<(), ScrapeError> {
        *self.state.current.lock().expect("lock") = url.to_string();
        self.state.visited.lock().expect("lock").push(url.to_string());
        Ok(())
    }

    async fn find(&self, locator: &Locator) -> Result<Self::Element, ScrapeError> {
        let current = self.state.current.lock().expect("lock").clone();
        let text = self
            .state
            .pages
            .get(&current)
            .and_then(|page| page.elements.get(locator))
            .and_then(|texts| texts.first())
            .cloned();
        match text {
            Some(text) => Ok(FakeElement {
                state: Arc::clone(&self.state),
                text,
            }),
            None => Err(ScrapeError::NoSuchElement {
                locator: locator.to_string(),
            }),
        }
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Element>, ScrapeError> {
        let current = self.state.current.lock().expect("lock").clone();
        let texts = self
            .state
            .pages
            .get(&current)
            .and_then(|page| page.elements.get(locator))
            .cloned()
            .unwrap_or_default();
        Ok(texts
            .into_iter()
            .map(|text| FakeElement {
                state: Arc::clone(&self.state),
                text,
            })
            .collect())
    }
}
