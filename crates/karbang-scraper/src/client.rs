//! HTTP client for the karhanbang office directory.
//!
//! One `reqwest::Client` (one connection pool) is reused across every
//! request a scrape makes: combo-search lookups, listing pages, and detail
//! pages. The walk is strictly sequential — callers never issue two requests
//! concurrently through the same `DirectoryClient`.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::Client;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::ScrapeError;

/// Combo-search JSON payload: `{ "datMM": { "name": [...], "code": [...] } }`.
///
/// Both inner arrays are optional so their absence can be reported as a
/// resolution failure rather than a deserialization panic. Codes arrive as
/// either numbers or strings depending on the level, so they are normalized
/// to strings.
#[derive(Debug, Deserialize)]
pub struct ComboResponse {
    #[serde(rename = "datMM")]
    pub dat_mm: Option<ComboEntries>,
}

#[derive(Debug, Deserialize)]
pub struct ComboEntries {
    pub name: Option<Vec<String>>,
    pub code: Option<Vec<CodeValue>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CodeValue {
    Num(i64),
    Text(String),
}

impl CodeValue {
    fn into_string(self) -> String {
        match self {
            Self::Num(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

impl ComboResponse {
    /// Pulls the parallel name/code arrays out, failing with a resolution
    /// error when either is absent.
    pub(crate) fn into_entries(self, what: &str) -> Result<(Vec<String>, Vec<String>), ScrapeError> {
        let entries = self.dat_mm.ok_or_else(|| ScrapeError::Resolution {
            reason: format!("{what}: combo response missing datMM"),
        })?;
        let names = entries.name.ok_or_else(|| ScrapeError::Resolution {
            reason: format!("{what}: combo response missing name array"),
        })?;
        let codes = entries.code.ok_or_else(|| ScrapeError::Resolution {
            reason: format!("{what}: combo response missing code array"),
        })?;
        Ok((names, codes.into_iter().map(CodeValue::into_string).collect()))
    }
}

/// Resolved location codes for a listing request.
#[derive(Debug, Clone)]
pub struct FilterCodes {
    pub sido: u32,
    pub gugun: Option<String>,
    pub dong: Option<String>,
}

pub struct DirectoryClient {
    client: Client,
    base_url: String,
}

impl DirectoryClient {
    /// Builds a client with the directory's expected request profile
    /// (browser user agent, AJAX headers, referer).
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/javascript, */*; q=0.01"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7"),
        );
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
        if let Ok(referer) = HeaderValue::try_from(format!("{}/", config.base_url)) {
            headers.insert(REFERER, referer);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Calls `ajax_combo_search.asp`. `flag` is `"S"` for district lists and
    /// `"G"` for sub-district lists; `gugun` carries the district code for
    /// the latter.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::Resolution`] on a non-success status or a body that is
    /// not the expected JSON shape; [`ScrapeError::Http`] on network failure.
    pub async fn combo_search(
        &self,
        flag: &str,
        sido: u32,
        gugun: Option<&str>,
    ) -> Result<ComboResponse, ScrapeError> {
        let url = format!("{}/ajax_combo_search.asp", self.base_url);
        let params = [
            ("flag", flag.to_owned()),
            ("sel_sido", sido.to_string()),
            ("sel_gugun", gugun.unwrap_or("").to_owned()),
            ("sel_dong", String::new()),
            ("search", String::new()),
            // Cache-buster the site's own frontend sends.
            ("_", chrono::Utc::now().timestamp_millis().to_string()),
        ];

        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Resolution {
                reason: format!("combo search returned HTTP {}", status.as_u16()),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<ComboResponse>(&body).map_err(|e| ScrapeError::Resolution {
            reason: format!("combo response was not valid JSON: {e}"),
        })
    }

    /// Fetches one listing page (`office_list.asp`) as HTML.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::PageFetch`] on a non-success status,
    /// [`ScrapeError::Http`] on network failure.
    pub async fn listing_page(&self, codes: &FilterCodes, page: usize) -> Result<String, ScrapeError> {
        let url = format!("{}/office_list.asp", self.base_url);
        let mut params = vec![
            ("topM", "09".to_owned()),
            ("flag", "S".to_owned()),
            ("page", page.to_string()),
            ("search", String::new()),
            ("sel_sido", codes.sido.to_string()),
        ];
        if let Some(gugun) = &codes.gugun {
            params.push(("sel_gugun", gugun.clone()));
        }
        if let Some(dong) = &codes.dong {
            params.push(("sel_dong", dong.clone()));
        }

        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::PageFetch {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.text().await?)
    }

    /// Fetches the detail page (`office_detail.asp`) for one listing.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::PageFetch`] on a non-success status,
    /// [`ScrapeError::Http`] on network failure.
    pub async fn office_detail(&self, mem_no: &str) -> Result<String, ScrapeError> {
        let url = format!("{}/office_detail.asp", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("mem_no", mem_no)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::PageFetch {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.text().await?)
    }
}
