//! CSV export of collected listings.
//!
//! Output is UTF-8 with a byte-order marker so spreadsheet tools open the
//! Korean text correctly. Exact full-row duplicates are dropped (the first
//! occurrence wins); rows that differ in any column are kept — the region
//! hierarchy can legitimately surface the same brokerage under overlapping
//! sub-regions.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ScrapeError;
use crate::types::ListingRecord;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Header row, in the fixed output order.
pub const OUTPUT_COLUMNS: [&str; 8] = [
    "시도",
    "시군구",
    "읍면동",
    "상호",
    "대표자명",
    "전화번호",
    "모바일전화번호",
    "주소",
];

/// Directory exports land in when the caller does not pick one.
#[must_use]
pub fn default_export_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("부동산_크롤링")
}

/// Writes `records` to a CSV file and returns its path.
///
/// `filename` defaults to a timestamped name, `directory` to
/// [`default_export_dir`]; the directory is created when absent and a
/// missing `.csv` extension is appended.
///
/// # Errors
///
/// [`ScrapeError::Export`] when no rows remain after cleaning, or the target
/// directory/file cannot be created or written.
pub fn export_csv(
    records: &[ListingRecord],
    filename: Option<&str>,
    directory: Option<&Path>,
) -> Result<PathBuf, ScrapeError> {
    let rows = clean_rows(records);
    if rows.is_empty() {
        return Err(ScrapeError::Export {
            reason: "no records to export".to_owned(),
        });
    }

    let dir = directory.map_or_else(default_export_dir, Path::to_path_buf);
    fs::create_dir_all(&dir).map_err(|e| ScrapeError::Export {
        reason: format!("could not create {}: {e}", dir.display()),
    })?;

    let mut name = filename.map_or_else(default_filename, str::to_owned);
    if !name.to_lowercase().ends_with(".csv") {
        name.push_str(".csv");
    }
    let path = dir.join(name);

    let mut file = File::create(&path).map_err(|e| ScrapeError::Export {
        reason: format!("could not create {}: {e}", path.display()),
    })?;
    file.write_all(UTF8_BOM).map_err(|e| ScrapeError::Export {
        reason: format!("could not write {}: {e}", path.display()),
    })?;

    let mut writer = csv::Writer::from_writer(file);
    let write_err = |e: csv::Error| ScrapeError::Export {
        reason: format!("could not write {}: {e}", path.display()),
    };
    writer.write_record(OUTPUT_COLUMNS).map_err(write_err)?;
    for row in &rows {
        writer.write_record(row).map_err(write_err)?;
    }
    writer.flush().map_err(|e| ScrapeError::Export {
        reason: format!("could not flush {}: {e}", path.display()),
    })?;

    tracing::info!(path = %path.display(), rows = rows.len(), "export complete");
    Ok(path)
}

/// Normalizes records into output rows (every column a plain string, empty
/// for missing) and removes exact full-row duplicates, keeping first-seen
/// order.
fn clean_rows(records: &[ListingRecord]) -> Vec<[String; 8]> {
    let mut seen: HashSet<[String; 8]> = HashSet::new();
    let mut rows = Vec::new();
    for record in records {
        let row = [
            record.province.clone(),
            record.district.clone(),
            record.sub_district.clone(),
            record.name.clone(),
            record.representative.clone(),
            record.phone.clone(),
            record.mobile_phones.join(", "),
            record.address.clone(),
        ];
        if seen.insert(row.clone()) {
            rows.push(row);
        }
    }
    rows
}

fn default_filename() -> String {
    format!(
        "부동산_중개사무소_{}.csv",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, address: &str) -> ListingRecord {
        ListingRecord {
            province: "서울특별시".to_owned(),
            district: "강남구".to_owned(),
            sub_district: "역삼동".to_owned(),
            region: "서울 강남구".to_owned(),
            name: name.to_owned(),
            representative: "홍길동".to_owned(),
            phone: "02-123-4567".to_owned(),
            mobile_phones: vec!["010-1234-5678".to_owned()],
            address: address.to_owned(),
            mem_no: Some("12345".to_owned()),
        }
    }

    #[test]
    fn exact_duplicates_collapse_but_partial_duplicates_survive() {
        let records = vec![
            record("테스트부동산", "역삼동 123-45"),
            record("테스트부동산", "역삼동 123-45"),
            record("테스트부동산", "역삼동 999-1"),
        ];
        let dir = tempfile::tempdir().unwrap();
        let path = export_csv(&records, Some("dup_test"), Some(dir.path())).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM), "file must start with a UTF-8 BOM");

        let body = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 3, "header plus exactly two distinct rows");
        assert_eq!(lines[0], OUTPUT_COLUMNS.join(","));
    }

    #[test]
    fn csv_extension_is_appended_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_csv(&[record("a", "b")], Some("plain_name"), Some(dir.path())).unwrap();
        assert_eq!(path.file_name().unwrap(), "plain_name.csv");
    }

    #[test]
    fn mobile_phones_are_joined_with_comma_space() {
        let mut rec = record("전화목록", "주소");
        rec.mobile_phones = vec!["02-123-4567".to_owned(), "010-1234-5678".to_owned()];
        let rows = clean_rows(&[rec]);
        assert_eq!(rows[0][6], "02-123-4567, 010-1234-5678");
    }

    #[test]
    fn empty_input_is_an_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = export_csv(&[], None, Some(dir.path()));
        assert!(matches!(result, Err(ScrapeError::Export { .. })));
    }

    #[test]
    fn missing_fields_become_empty_strings_not_gaps() {
        let mut rec = record("빈값", "주소");
        rec.phone = String::new();
        rec.mobile_phones = Vec::new();
        let rows = clean_rows(&[rec]);
        assert_eq!(rows[0][5], "");
        assert_eq!(rows[0][6], "");
        assert_eq!(rows[0].len(), 8, "output stays rectangular");
    }
}
