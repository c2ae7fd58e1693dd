//! The sequential page walk: fetch, parse, enrich, report, advance.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::client::DirectoryClient;
use crate::error::ScrapeError;
use crate::pagination;
use crate::parse;
use crate::progress::{PageProgress, ProgressSink};
use crate::regions::RegionResolver;
use crate::types::{ListingRecord, SearchFilter};

/// Cooperative stop signal, observed between page boundaries only. An
/// in-flight request always completes (or times out) before the flag is
/// checked.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Scrapes every listing page matching `filter`, enriching rows that carry a
/// `mem_no` with phone numbers from their detail page.
///
/// The total page count is derived from the same document fetched for
/// page 1's rows, so page 1 is requested exactly once. The sink is called
/// with `current_page = 0` before any row work, then after each page.
///
/// Degradation rules: a failed page-1 fetch yields an empty result; a failed
/// fetch of a later page ends the walk with whatever was accumulated; a
/// failed detail fetch leaves the row with its listing-table phone. None of
/// these are errors to the caller.
///
/// # Errors
///
/// [`ScrapeError::Resolution`] when the filter's province or district cannot
/// be mapped to codes.
pub async fn search<P: ProgressSink>(
    client: &DirectoryClient,
    resolver: &mut RegionResolver,
    filter: &SearchFilter,
    progress: &P,
    cancel: &CancelFlag,
) -> Result<Vec<ListingRecord>, ScrapeError> {
    let codes = resolver.resolve_filter(client, filter).await?;

    let first_page = match client.listing_page(&codes, 1).await {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!(error = %e, "listing page 1 fetch failed; returning no results");
            return Ok(Vec::new());
        }
    };

    let total = pagination::total_pages(&first_page);
    tracing::info!(total_pages = total, "starting listing walk");
    report(progress, PageProgress {
        current_page: 0,
        total_pages: total,
        accumulated: 0,
    });

    let mut records: Vec<ListingRecord> = Vec::new();
    let mut first_page = Some(first_page);

    for page in 1..=total {
        let html = match first_page.take() {
            Some(html) => html,
            None => {
                if cancel.is_cancelled() {
                    tracing::info!(page, "scrape cancelled between pages");
                    break;
                }
                match client.listing_page(&codes, page).await {
                    Ok(html) => html,
                    Err(e) => {
                        tracing::warn!(page, error = %e, "page fetch failed; keeping accumulated rows");
                        break;
                    }
                }
            }
        };

        for raw in parse::parse_listing_rows(&html) {
            let mut record = ListingRecord {
                province: filter.province.clone(),
                district: filter.district.clone().unwrap_or_default(),
                sub_district: filter.sub_district.clone().unwrap_or_default(),
                region: raw.region,
                name: raw.name,
                representative: raw.representative,
                phone: raw.phone,
                mobile_phones: Vec::new(),
                address: raw.address,
                mem_no: raw.mem_no,
            };

            if let Some(mem_no) = record.mem_no.clone() {
                match client.office_detail(&mem_no).await {
                    Ok(detail) => record.mobile_phones = parse::extract_phone_numbers(&detail),
                    Err(e) => {
                        tracing::warn!(
                            mem_no = %mem_no,
                            error = %e,
                            "detail fetch failed; keeping listing-table phone"
                        );
                    }
                }
            }

            records.push(record);
        }

        tracing::info!(page, total_pages = total, rows = records.len(), "page processed");
        report(progress, PageProgress {
            current_page: page,
            total_pages: total,
            accumulated: records.len(),
        });
    }

    Ok(records)
}

/// Calls the sink behind an unwind boundary so a panicking caller cannot
/// take the scrape down with it.
fn report<P: ProgressSink>(sink: &P, progress: PageProgress) {
    if catch_unwind(AssertUnwindSafe(|| sink.report(progress))).is_err() {
        tracing::warn!(
            page = progress.current_page,
            "progress sink panicked; continuing scrape"
        );
    }
}
