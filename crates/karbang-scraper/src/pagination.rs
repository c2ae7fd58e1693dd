//! Total-page discovery from a rendered listing page.
//!
//! The listing markup carries a pagination block with numeric page links and
//! a "jump to last page" anchor (`>>` or `»`) whose href embeds the last
//! page number. The last-page anchor is authoritative when present; the
//! highest numeric link text is the fallback.
//!
//! Discovery never fails: a page with no pagination controls is a
//! single-page result, and anything unparseable defaults to 1. Callers must
//! tolerate an under-counted total.

use regex::Regex;
use scraper::{Html, Selector};

/// Extracts the total page count from a listing-page document. Always `>= 1`.
#[must_use]
pub fn total_pages(html: &str) -> usize {
    let document = Html::parse_document(html);
    let anchor_sel = Selector::parse(r#".pagination a, a[href*="page="]"#).unwrap();
    let page_param = Regex::new(r"page=(\d+)").unwrap();

    let mut max_numeric: Option<usize> = None;
    for anchor in document.select(&anchor_sel) {
        let text = anchor.text().collect::<String>();
        let text = text.trim();

        if text == ">>" || text == "»" {
            if let Some(last) = anchor
                .value()
                .attr("href")
                .and_then(|href| page_param.captures(href))
                .and_then(|caps| caps[1].parse::<usize>().ok())
            {
                return last.max(1);
            }
        }

        if let Ok(n) = text.parse::<usize>() {
            max_numeric = Some(max_numeric.map_or(n, |m| m.max(n)));
        }
    }

    max_numeric.unwrap_or(1).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_the_last_page_anchor_over_numeric_links() {
        let html = r##"
            <div class="pagination">
                <a href="office_list.asp?page=1">1</a>
                <a href="office_list.asp?page=2">2</a>
                <a href="office_list.asp?page=3">3</a>
                <a href="office_list.asp?page=27">&gt;&gt;</a>
            </div>"##;
        assert_eq!(total_pages(html), 27);
    }

    #[test]
    fn accepts_the_guillemet_variant_of_the_last_page_anchor() {
        let html = r##"<a href="?page=12">&raquo;</a>"##;
        assert_eq!(total_pages(html), 12);
    }

    #[test]
    fn falls_back_to_the_highest_numeric_link() {
        let html = r##"
            <div class="pagination">
                <a href="office_list.asp?page=1">1</a>
                <a href="office_list.asp?page=4">4</a>
                <a href="office_list.asp?page=2">2</a>
            </div>"##;
        assert_eq!(total_pages(html), 4);
    }

    #[test]
    fn last_page_anchor_without_page_param_falls_back_to_numerics() {
        let html = r##"
            <div class="pagination">
                <a href="office_list.asp?page=2">2</a>
                <a href="javascript:void(0)">&gt;&gt;</a>
            </div>"##;
        assert_eq!(total_pages(html), 2);
    }

    #[test]
    fn no_pagination_controls_means_one_page() {
        assert_eq!(total_pages("<html><body><table></table></body></html>"), 1);
        assert_eq!(total_pages(""), 1);
    }

    #[test]
    fn non_numeric_link_text_is_ignored() {
        let html = r##"<div class="pagination"><a href="?page=9">next</a></div>"##;
        assert_eq!(total_pages(html), 1);
    }
}
