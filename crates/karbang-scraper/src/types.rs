/// One brokerage entry from the listing table, optionally enriched with
/// phone numbers from its detail page.
///
/// `province` / `district` / `sub_district` reflect the caller's selection,
/// not the region text scraped from the row — that is kept in `region`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRecord {
    pub province: String,
    pub district: String,
    pub sub_district: String,
    /// Raw region text displayed in the first listing column.
    pub region: String,
    /// Business name (first line of the listing anchor text).
    pub name: String,
    pub representative: String,
    /// Phone number shown in the listing table.
    pub phone: String,
    /// Numbers found on the detail page, deduplicated in first-seen order.
    /// Empty when the record has no `mem_no` or enrichment failed.
    pub mobile_phones: Vec<String>,
    pub address: String,
    /// Numeric detail-page key. `None` means enrichment is skipped.
    pub mem_no: Option<String>,
}

/// Region selection driving a scrape. A missing district means a
/// province-wide search; a missing sub-district widens to the district.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub province: String,
    pub district: Option<String>,
    pub sub_district: Option<String>,
}

impl SearchFilter {
    #[must_use]
    pub fn province(name: &str) -> Self {
        Self {
            province: name.to_owned(),
            ..Self::default()
        }
    }
}
