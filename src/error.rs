#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ScrapeError {
    #[error("HTTP client initialization failed: {0}")]
    HttpClientInit(reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebDriver error at {endpoint}: {kind}: {message}")]
    WebDriver {
        endpoint: String,
        kind: String,
        message: String,
    },

    #[error("No such element: {locator}")]
    NoSuchElement { locator: String },

    #[error("Timed out after {secs}s waiting for {locator}")]
    Timeout { locator: String, secs: u64 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Spreadsheet error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
