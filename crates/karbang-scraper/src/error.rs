use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("location lookup failed: {reason}")]
    Resolution { reason: String },

    #[error("unexpected HTTP status {status} from {url}")]
    PageFetch { status: u16, url: String },

    #[error("could not extract {context}: {reason}")]
    Extraction { context: String, reason: String },

    #[error("export failed: {reason}")]
    Export { reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
