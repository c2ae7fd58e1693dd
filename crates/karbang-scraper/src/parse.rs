//! Listing-table row extraction and phone-number scanning.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::ScrapeError;

/// One listing row as it appears in the table, before region labels and
/// detail enrichment are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub region: String,
    pub name: String,
    pub mem_no: Option<String>,
    pub representative: String,
    pub phone: String,
    pub address: String,
}

/// Parses every well-formed row out of a listing page.
///
/// The first table row is the header and is skipped. A malformed row (fewer
/// than 5 cells, or no business-name anchor) is logged and dropped — one bad
/// row never aborts the page.
#[must_use]
pub fn parse_listing_rows(html: &str) -> Vec<RawRow> {
    let document = Html::parse_document(html);
    let row_sel = Selector::parse("table tr").unwrap();
    let cell_sel = Selector::parse("td").unwrap();
    let anchor_sel = Selector::parse("a").unwrap();
    let mem_no_re = Regex::new(r"moveDetail\('(\d+)',").unwrap();

    let mut rows = Vec::new();
    for (index, row) in document.select(&row_sel).enumerate().skip(1) {
        let cells: Vec<ElementRef<'_>> = row.select(&cell_sel).collect();
        match parse_row(&cells, &anchor_sel, &mem_no_re) {
            Ok(parsed) => rows.push(parsed),
            Err(e) => tracing::debug!(row = index, error = %e, "skipping malformed listing row"),
        }
    }
    rows
}

fn parse_row(
    cells: &[ElementRef<'_>],
    anchor_sel: &Selector,
    mem_no_re: &Regex,
) -> Result<RawRow, ScrapeError> {
    if cells.len() < 5 {
        return Err(ScrapeError::Extraction {
            context: "listing row".to_owned(),
            reason: format!("expected at least 5 cells, found {}", cells.len()),
        });
    }

    let name_anchor = cells[1]
        .select(anchor_sel)
        .next()
        .ok_or_else(|| ScrapeError::Extraction {
            context: "listing row".to_owned(),
            reason: "business name anchor missing".to_owned(),
        })?;

    // Anchor text can span several lines; the business name is the first.
    let anchor_text = cell_text(&name_anchor);
    let name = anchor_text
        .lines()
        .next()
        .unwrap_or("")
        .trim()
        .to_owned();

    let mem_no = name_anchor
        .value()
        .attr("href")
        .and_then(|href| mem_no_re.captures(href))
        .map(|caps| caps[1].to_owned());

    let phone = cells[3]
        .select(anchor_sel)
        .next()
        .map(|a| cell_text(&a))
        .unwrap_or_default();

    Ok(RawRow {
        region: cell_text(&cells[0]),
        name,
        mem_no,
        representative: cell_text(&cells[2]),
        phone,
        address: cell_text(&cells[4]),
    })
}

fn cell_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

/// Scans a document wholesale for phone-number-shaped substrings
/// (`NN-NNNN-NNNN` landlines and `010-NNNN-NNNN` mobiles both match),
/// deduplicated in first-seen order.
#[must_use]
pub fn extract_phone_numbers(text: &str) -> Vec<String> {
    let phone_re = Regex::new(r"\d{2,3}-\d{3,4}-\d{4}").unwrap();

    let mut seen: Vec<String> = Vec::new();
    for found in phone_re.find_iter(text) {
        let number = found.as_str();
        if !seen.iter().any(|s| s == number) {
            seen.push(number.to_owned());
        }
    }
    seen
}
