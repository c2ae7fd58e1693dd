/// Origin the directory lives under. Overridable so tests can point the
/// client at a local mock server.
pub const DEFAULT_BASE_URL: &str = "https://karhanbang.com/office";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Connection settings for [`crate::DirectoryClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the office directory, without a trailing slash.
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl ClientConfig {
    /// Config pointed at a different origin, keeping the default timeout and
    /// user agent.
    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            ..Self::default()
        }
    }
}
