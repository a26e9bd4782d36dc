use rayon::prelude::*;
use tracing::debug;

use crate::table::{ColumnKey, Record};

/// Keeps records whose searchable text contains `keyword`.
///
/// Matching is a case sensitive, literal substring test. The image reference
/// is never searched.
pub fn keyword_filter(keyword: &str, records: &[Record]) -> Vec<Record> {
    let matches: Vec<Record> = records
        .par_iter()
        .filter(|r| r.search_text().contains(keyword))
        .cloned()
        .collect();
    debug!(
        "Keyword [{keyword}] matched {} of {} records",
        matches.len(),
        records.len()
    );
    matches
}

/// Keeps records whose `column` contains `keyword`.
///
/// Columns are resolved from a one or two part field path with
/// [`ColumnKey::from_path`], e.g. `["name", "first"]`.
pub fn column_filter(keyword: &str, records: &[Record], column: ColumnKey) -> Vec<Record> {
    let matches: Vec<Record> = records
        .iter()
        .filter(|r| r.column_text(column).contains(keyword))
        .cloned()
        .collect();
    debug!(
        "Keyword [{keyword}] in {} matched {} of {} records",
        column.selector(),
        matches.len(),
        records.len()
    );
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::{record, sample};

    #[test]
    fn keyword_filter_is_sound_and_complete() {
        let records = sample();
        for keyword in ["Kessler", "Key account", "Male", "@example.com", "zzz", "1"] {
            let found = keyword_filter(keyword, &records);
            assert!(found.iter().all(|r| r.search_text().contains(keyword)));
            let expected = records
                .iter()
                .filter(|r| r.search_text().contains(keyword))
                .count();
            assert_eq!(found.len(), expected);
        }
    }

    #[test]
    fn keyword_filter_keeps_order_and_input() {
        let records = sample();
        let before = records.clone();
        let found = keyword_filter("Kessler", &records);
        let ids: Vec<&str> = found.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "10", "18", "25"]);
        assert_eq!(records, before);
    }

    #[test]
    fn keyword_filter_is_case_sensitive_and_ignores_image() {
        let records = vec![record("1", "Ann", "Lee", &[])];
        assert!(keyword_filter("ann", &records).len() == 1); // email
        assert!(keyword_filter("LEE", &records).is_empty());
        assert!(keyword_filter("img.example.com", &records).is_empty());
    }

    #[test]
    fn keyword_filter_matches_across_joined_fields() {
        let records = vec![record("1", "Ann", "Lee", &["a", "b"])];
        assert_eq!(keyword_filter("Ann,Lee", &records).len(), 1);
        assert_eq!(keyword_filter("a,b", &records).len(), 1);
        assert!(keyword_filter("Ann Lee", &records).is_empty());
    }

    #[test]
    fn nested_path_only_looks_at_that_field() {
        let records = vec![
            record("1", "Lee", "Ann", &[]),
            record("2", "Ann", "Lee", &[]),
        ];
        let first = ColumnKey::from_path(&["name", "first"]).unwrap();
        let found = column_filter("Lee", &records, first);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "1");
        let last = ColumnKey::from_path(&["name", "last"]).unwrap();
        let found = column_filter("Lee", &records, last);
        assert_eq!(found[0].id, "2");
    }

    #[test]
    fn memo_is_matched_space_joined() {
        let records = vec![record("1", "Ann", "Lee", &["call", "back"])];
        assert_eq!(column_filter("call back", &records, ColumnKey::Memo).len(), 1);
        assert!(column_filter("call\nback", &records, ColumnKey::Memo).is_empty());
    }

    #[test]
    fn column_filter_is_sound_and_complete() {
        let records = sample();
        for (keyword, column) in [("Kessler", ColumnKey::LastName), ("Key", ColumnKey::Memo)] {
            let found = column_filter(keyword, &records, column);
            assert!(found.iter().all(|r| r.column_text(column).contains(keyword)));
            let expected = records
                .iter()
                .filter(|r| r.column_text(column).contains(keyword))
                .count();
            assert_eq!(found.len(), expected);
        }
    }
}
