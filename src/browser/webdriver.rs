//! W3C WebDriver wire client.
//!
//! Speaks JSON over HTTP to a locally running driver (chromedriver,
//! geckodriver). Only the handful of endpoints the pipeline needs are
//! implemented: session lifecycle, navigation, element lookup, text reads,
//! and keystrokes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::browser::{Browser, Element, Locator};
use crate::error::ScrapeError;

pub(crate) const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
const WEBDRIVER_URL_ENV: &str = "WEBDRIVER_URL";

const NO_SUCH_ELEMENT: &str = "no such element";

/// Resolves the driver endpoint: explicit flag, then `WEBDRIVER_URL`, then the
/// chromedriver default.
pub(crate) fn resolve_url(flag: Option<&str>) -> String {
    if let Some(url) = flag.map(str::trim).filter(|u| !u.is_empty()) {
        return url.to_string();
    }
    std::env::var(WEBDRIVER_URL_ENV)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_WEBDRIVER_URL.to_string())
}

#[derive(Deserialize)]
struct WireResponse<T> {
    value: T,
}

#[derive(Deserialize)]
struct WireError {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct NewSessionValue {
    #[serde(rename = "sessionId")]
    session_id: String,
}

#[derive(Deserialize)]
struct ElementRef {
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
    id: String,
}

#[derive(Debug)]
struct SessionInner {
    client: reqwest::Client,
    base: String,
    session_id: String,
}

impl SessionInner {
    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/session/{}/{}",
            self.base.trim_end_matches('/'),
            self.session_id,
            path.trim_start_matches('/')
        )
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, ScrapeError> {
        let url = self.endpoint(path);
        let resp = self.client.post(&url).json(&body).send().await?;
        decode(path, resp).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ScrapeError> {
        let url = self.endpoint(path);
        let resp = self.client.get(&url).send().await?;
        decode(path, resp).await
    }
}

async fn decode<T: DeserializeOwned>(
    endpoint: &str,
    resp: reqwest::Response,
) -> Result<T, ScrapeError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;

    if !status.is_success() {
        let wire: WireResponse<WireError> =
            serde_json::from_slice(&bytes).unwrap_or(WireResponse {
                value: WireError {
                    error: format!("HTTP {status}"),
                    message: String::from_utf8_lossy(&bytes).trim().to_string(),
                },
            });
        return Err(ScrapeError::WebDriver {
            endpoint: endpoint.to_string(),
            kind: wire.value.error,
            message: wire.value.message,
        });
    }

    let wire: WireResponse<T> = serde_json::from_slice(&bytes)?;
    Ok(wire.value)
}

fn http_client() -> Result<reqwest::Client, ScrapeError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("ctgov-scrape/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ScrapeError::HttpClientInit)
}

/// One live browser session.
///
/// Cloning is cheap and shares the session; [`WebDriverSession::close`]
/// deletes the session on the driver and must be called on every exit path,
/// success or failure.
#[derive(Clone)]
pub struct WebDriverSession {
    inner: Arc<SessionInner>,
}

impl WebDriverSession {
    /// Creates a new session against the driver at `base`.
    pub async fn start(base: &str) -> Result<Self, ScrapeError> {
        let client = http_client()?;
        let url = format!("{}/session", base.trim_end_matches('/'));
        let body = json!({ "capabilities": { "alwaysMatch": {} } });
        let resp = client.post(&url).json(&body).send().await?;
        let value: NewSessionValue = decode("/session", resp).await?;

        Ok(Self {
            inner: Arc::new(SessionInner {
                client,
                base: base.trim_end_matches('/').to_string(),
                session_id: value.session_id,
            }),
        })
    }

    /// Deletes the session on the driver, ending the browser run.
    pub async fn close(&self) -> Result<(), ScrapeError> {
        let url = format!(
            "{}/session/{}",
            self.inner.base, self.inner.session_id
        );
        let resp = self.inner.client.delete(&url).send().await?;
        decode::<serde_json::Value>("delete session", resp).await?;
        Ok(())
    }

    pub fn session_id(&self) -> &str {
        &self.inner.session_id
    }
}

/// A located element, valid while its page stays loaded.
#[derive(Clone, Debug)]
pub struct WebDriverElement {
    inner: Arc<SessionInner>,
    element_id: String,
}

#[async_trait]
impl Element for WebDriverElement {
    async fn text(&self) -> Result<String, ScrapeError> {
        self.inner
            .get(&format!("element/{}/text", self.element_id))
            .await
    }

    async fn send_keys(&self, keys: &str) -> Result<(), ScrapeError> {
        self.inner
            .post::<serde_json::Value>(
                &format!("element/{}/value", self.element_id),
                json!({ "text": keys }),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Browser for WebDriverSession {
    type Element = WebDriverElement;

    async fn navigate(&self, url: &str) -> Result<(), ScrapeError> {
        self.inner
            .post::<serde_json::Value>("url", json!({ "url": url }))
            .await?;
        Ok(())
    }

    async fn find(&self, locator: &Locator) -> Result<Self::Element, ScrapeError> {
        let (using, value) = locator.strategy();
        let body = json!({ "using": using, "value": value });
        match self.inner.post::<ElementRef>("element", body).await {
            Ok(element) => Ok(WebDriverElement {
                inner: Arc::clone(&self.inner),
                element_id: element.id,
            }),
            Err(ScrapeError::WebDriver { ref kind, .. }) if kind == NO_SUCH_ELEMENT => {
                Err(ScrapeError::NoSuchElement {
                    locator: locator.to_string(),
                })
            }
            Err(err) => Err(err),
        }
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Element>, ScrapeError> {
        let (using, value) = locator.strategy();
        let body = json!({ "using": using, "value": value });
        let refs: Vec<ElementRef> = self.inner.post("elements", body).await?;
        Ok(refs
            .into_iter()
            .map(|element| WebDriverElement {
                inner: Arc::clone(&self.inner),
                element_id: element.id,
            })
            .collect())
    }
}
