//! Three-level region resolution: fixed province codes, and district /
//! sub-district name↔code maps fetched from the combo-search endpoint.
//!
//! Code caches are keyed by their parent code — a district map by the
//! province that produced it, a sub-district map by the district — so
//! switching provinces mid-session never invalidates earlier lookups.
//! Caches live for the resolver's lifetime and are never refreshed.

use std::collections::HashMap;

use crate::client::{DirectoryClient, FilterCodes};
use crate::error::ScrapeError;
use crate::types::SearchFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Province {
    pub name: &'static str,
    pub code: u32,
}

/// The 17 top-level administrative divisions, in the order the site lists
/// them. Codes are fixed by the site and never fetched.
pub const PROVINCES: [Province; 17] = [
    Province { name: "서울특별시", code: 1 },
    Province { name: "경기도", code: 2 },
    Province { name: "인천광역시", code: 3 },
    Province { name: "부산광역시", code: 4 },
    Province { name: "대구광역시", code: 5 },
    Province { name: "광주광역시", code: 6 },
    Province { name: "대전광역시", code: 7 },
    Province { name: "울산광역시", code: 8 },
    Province { name: "강원특별자치도", code: 9 },
    Province { name: "경상남도", code: 10 },
    Province { name: "경상북도", code: 11 },
    Province { name: "전라남도", code: 12 },
    Province { name: "전북특별자치도", code: 13 },
    Province { name: "충청남도", code: 14 },
    Province { name: "충청북도", code: 15 },
    Province { name: "세종특별자치시", code: 16 },
    Province { name: "제주특별자치도", code: 17 },
];

#[must_use]
pub fn provinces() -> &'static [Province] {
    &PROVINCES
}

/// Exact-match province name → code. No fuzzy matching.
#[must_use]
pub fn province_code(name: &str) -> Option<u32> {
    PROVINCES.iter().find(|p| p.name == name).map(|p| p.code)
}

/// Name/code cache for districts and sub-districts.
///
/// Owns its caches exclusively; not safe to share across concurrently
/// running scrapes. Entry order matches the combo-search response so the
/// caller sees the site's own ordering.
#[derive(Debug, Default)]
pub struct RegionResolver {
    /// province code → [(district name, district code)]
    district_codes: HashMap<u32, Vec<(String, String)>>,
    /// district code → [(sub-district name, sub-district code)]
    sub_district_codes: HashMap<String, Vec<(String, String)>>,
}

impl RegionResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// District names for a province, fetched once per province and served
    /// from cache afterwards.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::Resolution`] for an unknown province name, a
    /// non-success combo response, or a response missing the name/code
    /// arrays.
    pub async fn districts(
        &mut self,
        client: &DirectoryClient,
        province: &str,
    ) -> Result<Vec<String>, ScrapeError> {
        let sido = province_code(province).ok_or_else(|| ScrapeError::Resolution {
            reason: format!("unknown province: {province}"),
        })?;

        if let Some(cached) = self.district_codes.get(&sido) {
            return Ok(cached.iter().map(|(name, _)| name.clone()).collect());
        }

        let (names, codes) = client
            .combo_search("S", sido, None)
            .await?
            .into_entries("district list")?;
        let pairs = pair_names_with_codes(names, codes);
        tracing::info!(province, count = pairs.len(), "fetched district list");

        let out = pairs.iter().map(|(name, _)| name.clone()).collect();
        self.district_codes.insert(sido, pairs);
        Ok(out)
    }

    /// Sub-district names for a district, resolving the district code first
    /// (fetching the district list automatically when not yet cached).
    ///
    /// # Errors
    ///
    /// Everything [`Self::districts`] can return, plus
    /// [`ScrapeError::Resolution`] when the district name maps to no code.
    pub async fn sub_districts(
        &mut self,
        client: &DirectoryClient,
        province: &str,
        district: &str,
    ) -> Result<Vec<String>, ScrapeError> {
        let sido = province_code(province).ok_or_else(|| ScrapeError::Resolution {
            reason: format!("unknown province: {province}"),
        })?;

        if !self.district_codes.contains_key(&sido) {
            self.districts(client, province).await?;
        }
        let gugun = self
            .district_code(province, district)
            .ok_or_else(|| ScrapeError::Resolution {
                reason: format!("unknown district in {province}: {district}"),
            })?
            .to_owned();

        if let Some(cached) = self.sub_district_codes.get(&gugun) {
            return Ok(cached.iter().map(|(name, _)| name.clone()).collect());
        }

        let (names, codes) = client
            .combo_search("G", sido, Some(&gugun))
            .await?
            .into_entries("sub-district list")?;
        let pairs = pair_names_with_codes(names, codes);
        tracing::info!(province, district, count = pairs.len(), "fetched sub-district list");

        let out = pairs.iter().map(|(name, _)| name.clone()).collect();
        self.sub_district_codes.insert(gugun, pairs);
        Ok(out)
    }

    /// Cached district code lookup. Exact name match; `None` when the
    /// district list was never fetched or the name is unknown.
    #[must_use]
    pub fn district_code(&self, province: &str, district: &str) -> Option<&str> {
        let sido = province_code(province)?;
        self.district_codes
            .get(&sido)?
            .iter()
            .find(|(name, _)| name == district)
            .map(|(_, code)| code.as_str())
    }

    /// Cached sub-district code lookup, scoped by the parent district code.
    #[must_use]
    pub fn sub_district_code(&self, district_code: &str, sub_district: &str) -> Option<&str> {
        self.sub_district_codes
            .get(district_code)?
            .iter()
            .find(|(name, _)| name == sub_district)
            .map(|(_, code)| code.as_str())
    }

    /// Resolves a [`SearchFilter`] into request codes, fetching whatever
    /// name/code maps the filter needs.
    ///
    /// An unknown sub-district name widens the search to the district (the
    /// site treats an empty `sel_dong` as district-wide) rather than
    /// failing; unknown province or district names are hard errors.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::Resolution`] when the province or district cannot be
    /// mapped to a code.
    pub async fn resolve_filter(
        &mut self,
        client: &DirectoryClient,
        filter: &SearchFilter,
    ) -> Result<FilterCodes, ScrapeError> {
        let sido = province_code(&filter.province).ok_or_else(|| ScrapeError::Resolution {
            reason: format!("unknown province: {}", filter.province),
        })?;

        let mut gugun = None;
        let mut dong = None;
        if let Some(district) = &filter.district {
            self.districts(client, &filter.province).await?;
            let code = self
                .district_code(&filter.province, district)
                .ok_or_else(|| ScrapeError::Resolution {
                    reason: format!("unknown district in {}: {district}", filter.province),
                })?
                .to_owned();

            if let Some(sub) = &filter.sub_district {
                self.sub_districts(client, &filter.province, district).await?;
                match self.sub_district_code(&code, sub) {
                    Some(c) => dong = Some(c.to_owned()),
                    None => {
                        tracing::warn!(
                            sub_district = %sub,
                            "sub-district code not found; widening search to the district"
                        );
                    }
                }
            }
            gugun = Some(code);
        }

        Ok(FilterCodes { sido, gugun, dong })
    }
}

fn pair_names_with_codes(names: Vec<String>, codes: Vec<String>) -> Vec<(String, String)> {
    names
        .into_iter()
        .map(decode_escaped)
        .zip(codes)
        .collect()
}

/// Decodes literal `\uXXXX` sequences the endpoint sometimes leaves in
/// region names. Anything that is not a well-formed escape is kept verbatim.
fn decode_escaped(raw: String) -> String {
    if !raw.contains("\\u") {
        return raw;
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&'u') {
            let mut lookahead = chars.clone();
            lookahead.next(); // consume 'u'
            let hex: String = lookahead.by_ref().take(4).collect();
            if hex.len() == 4 {
                if let Some(decoded) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    out.push(decoded);
                    chars = lookahead;
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}
