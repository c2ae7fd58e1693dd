//! Page-level progress reporting contract.
//!
//! The scraper reports once with `current_page = 0` as soon as the total
//! page count is known, then once after every processed page. Reports are
//! synchronous on the scraping task; sink panics are caught at the call site
//! so a broken caller never aborts a crawl.

/// Snapshot of the page walk, produced at each page boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProgress {
    /// Page just processed; `0` for the pre-walk total-pages announcement.
    pub current_page: usize,
    pub total_pages: usize,
    /// Rows accumulated so far across all pages.
    pub accumulated: usize,
}

/// Receiver for [`PageProgress`] reports.
///
/// Implemented for any `Fn(PageProgress)` closure, so a host can pass
/// `|p| { ... }` directly.
pub trait ProgressSink {
    fn report(&self, progress: PageProgress);
}

impl<F> ProgressSink for F
where
    F: Fn(PageProgress),
{
    fn report(&self, progress: PageProgress) {
        self(progress);
    }
}
