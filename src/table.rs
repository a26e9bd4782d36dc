use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::domain::TableError;

/// Sample data set shown when no file is given on the command line.
pub const SAMPLE_RECORDS: &str = include_str!("../data/records.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub name: Name,
    pub email: String,
    pub gender: String,
    #[serde(default)]
    pub memo: Vec<String>,
    #[serde(default)]
    pub img: String,
}

// Ids show up as numbers in most exports but the editor hands them back as text.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

impl Record {
    /// Text the keyword filter looks at: every field but the image, space
    /// separated, with nested values joined by commas.
    pub fn search_text(&self) -> String {
        [
            self.id.clone(),
            format!("{},{}", self.name.first, self.name.last),
            self.email.clone(),
            self.gender.clone(),
            self.memo.join(","),
        ]
        .join(" ")
    }

    /// Text of a single column as it is matched by the column filter.
    pub fn column_text(&self, column: ColumnKey) -> String {
        match column {
            ColumnKey::Memo => self.memo.join(" "),
            _ => self.cell_text(column),
        }
    }

    /// Text of a single column as it is displayed.
    pub fn cell_text(&self, column: ColumnKey) -> String {
        match column {
            ColumnKey::Id => self.id.clone(),
            ColumnKey::FirstName => self.name.first.clone(),
            ColumnKey::LastName => self.name.last.clone(),
            ColumnKey::Email => self.email.clone(),
            ColumnKey::Gender => self.gender.clone(),
            ColumnKey::Memo => self.memo.join("\n"),
            ColumnKey::Img => self.img.clone(),
        }
    }

    /// Record as a single CSV line, quoting cells when needed.
    pub fn to_csv_line(&self) -> String {
        ColumnKey::ALL
            .iter()
            .map(|&c| wrap_cell_content(&self.column_text(c)))
            .collect::<Vec<String>>()
            .join(",")
    }
}

fn wrap_cell_content(c: &str) -> String {
    let needs_escaping = c.contains('"');
    let needs_wrapping = c.chars().any(|c| c == ' ' || c == '\t' || c == ',');
    let mut out = String::from(c);

    if needs_escaping {
        out = out.replace('"', "\"\"");
    }
    if needs_escaping || needs_wrapping {
        out = format!("\"{out}\"");
    }
    out
}

/// How a column's value is laid out in a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    NamePart,
    List,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnKey {
    Id,
    FirstName,
    LastName,
    Email,
    Gender,
    Memo,
    Img,
}

impl ColumnKey {
    pub const ALL: [ColumnKey; 7] = [
        ColumnKey::Id,
        ColumnKey::FirstName,
        ColumnKey::LastName,
        ColumnKey::Email,
        ColumnKey::Gender,
        ColumnKey::Memo,
        ColumnKey::Img,
    ];

    pub fn kind(&self) -> FieldKind {
        match self {
            ColumnKey::Id | ColumnKey::Email | ColumnKey::Gender => FieldKind::Text,
            ColumnKey::FirstName | ColumnKey::LastName => FieldKind::NamePart,
            ColumnKey::Memo => FieldKind::List,
            ColumnKey::Img => FieldKind::Image,
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            ColumnKey::Id => "ID",
            ColumnKey::FirstName => "FIRST NAME",
            ColumnKey::LastName => "LAST NAME",
            ColumnKey::Email => "EMAIL",
            ColumnKey::Gender => "GENDER",
            ColumnKey::Memo => "MEMO",
            ColumnKey::Img => "IMG",
        }
    }

    /// Visibility key, the header without spaces in lower case.
    pub fn key(&self) -> &'static str {
        match self {
            ColumnKey::Id => "id",
            ColumnKey::FirstName => "firstname",
            ColumnKey::LastName => "lastname",
            ColumnKey::Email => "email",
            ColumnKey::Gender => "gender",
            ColumnKey::Memo => "memo",
            ColumnKey::Img => "img",
        }
    }

    /// Selector used by the column filter, `-` separates nested fields.
    pub fn selector(&self) -> &'static str {
        match self {
            ColumnKey::FirstName => "name-first",
            ColumnKey::LastName => "name-last",
            _ => self.key(),
        }
    }

    pub fn from_key(key: &str) -> Option<ColumnKey> {
        ColumnKey::ALL.iter().copied().find(|c| c.key() == key)
    }

    /// Resolves a one or two part field path, e.g. `["name", "first"]`.
    pub fn from_path(path: &[&str]) -> Result<ColumnKey, TableError> {
        match path {
            ["id"] => Ok(ColumnKey::Id),
            ["name", "first"] => Ok(ColumnKey::FirstName),
            ["name", "last"] => Ok(ColumnKey::LastName),
            ["email"] => Ok(ColumnKey::Email),
            ["gender"] => Ok(ColumnKey::Gender),
            ["memo"] => Ok(ColumnKey::Memo),
            ["img"] => Ok(ColumnKey::Img),
            _ => Err(TableError::UnknownColumn(path.join("-"))),
        }
    }
}

/// Per column visibility flags, all visible by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    flags: [bool; 7],
}

impl Default for Visibility {
    fn default() -> Self {
        Self { flags: [true; 7] }
    }
}

impl Visibility {
    pub fn is_visible(&self, column: ColumnKey) -> bool {
        self.flags[column as usize]
    }

    pub fn set(&mut self, column: ColumnKey, visible: bool) {
        self.flags[column as usize] = visible;
    }

    pub fn visible(&self) -> impl Iterator<Item = ColumnKey> + '_ {
        ColumnKey::ALL.into_iter().filter(|&c| self.is_visible(c))
    }

    pub fn hidden(&self) -> impl Iterator<Item = ColumnKey> + '_ {
        ColumnKey::ALL.into_iter().filter(|&c| !self.is_visible(c))
    }
}

pub fn parse_records(json: &str) -> Result<Vec<Record>, TableError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_records(path: &Path) -> Result<Vec<Record>, TableError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => TableError::FileNotFound,
        ErrorKind::PermissionDenied => TableError::PermissionDenied,
        _ => TableError::IoError(e),
    })?;
    if !metadata.is_file() {
        return Err(TableError::LoadingFailed("Not a file!".into()));
    }

    let content = fs::read_to_string(path)?;
    let records = parse_records(&content)?;
    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    pub(crate) fn record(id: &str, first: &str, last: &str, memo: &[&str]) -> Record {
        Record {
            id: id.to_string(),
            name: Name {
                first: first.to_string(),
                last: last.to_string(),
            },
            email: format!("{}@example.com", first.to_lowercase()),
            gender: "Female".to_string(),
            memo: memo.iter().map(|s| s.to_string()).collect(),
            img: format!("http://img.example.com/{id}.png"),
        }
    }

    pub(crate) fn sample() -> Vec<Record> {
        parse_records(SAMPLE_RECORDS).unwrap()
    }

    #[test]
    fn sample_has_25_records() {
        let records = sample();
        assert_eq!(records.len(), 25);
        assert_eq!(records[0].id, "1");
    }

    #[test]
    fn numeric_and_text_ids_are_accepted() {
        let json = r#"[
            {"id": 7, "name": {"first": "A", "last": "B"}, "email": "a@b", "gender": "Male", "memo": ["x"], "img": "i"},
            {"id": "8", "name": {"first": "C", "last": "D"}, "email": "c@d", "gender": "Female", "memo": [], "img": "j"}
        ]"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records[0].id, "7");
        assert_eq!(records[1].id, "8");
    }

    #[test]
    fn search_text_skips_image_and_joins_nested_values() {
        let r = record("3", "Ann", "Lee", &["one", "two"]);
        assert_eq!(r.search_text(), "3 Ann,Lee ann@example.com Female one,two");
        assert!(!r.search_text().contains("img.example.com"));
    }

    #[test]
    fn memo_text_depends_on_use() {
        let r = record("3", "Ann", "Lee", &["one", "two"]);
        assert_eq!(r.column_text(ColumnKey::Memo), "one two");
        assert_eq!(r.cell_text(ColumnKey::Memo), "one\ntwo");
    }

    #[test]
    fn csv_line_quotes_cells_with_separators() {
        let r = record("3", "Ann", "Lee", &["one", "two"]);
        let line = r.to_csv_line();
        assert!(line.starts_with("3,Ann,Lee,ann@example.com,Female,\"one two\","));
    }

    #[test]
    fn paths_resolve_to_columns() {
        assert_eq!(ColumnKey::from_path(&["name", "first"]).unwrap(), ColumnKey::FirstName);
        assert_eq!(ColumnKey::from_path(&["memo"]).unwrap(), ColumnKey::Memo);
        assert!(matches!(
            ColumnKey::from_path(&["name", "middle"]),
            Err(TableError::UnknownColumn(name)) if name == "name-middle"
        ));
        for column in ColumnKey::ALL {
            let path: Vec<&str> = column.selector().split('-').collect();
            assert_eq!(ColumnKey::from_path(&path).unwrap(), column);
            assert_eq!(ColumnKey::from_key(column.key()), Some(column));
        }
    }

    #[test]
    fn visibility_lists_hidden_columns_in_order() {
        let mut visibility = Visibility::default();
        visibility.set(ColumnKey::Memo, false);
        visibility.set(ColumnKey::Id, false);
        let hidden: Vec<ColumnKey> = visibility.hidden().collect();
        assert_eq!(hidden, vec![ColumnKey::Id, ColumnKey::Memo]);
        assert_eq!(visibility.visible().count(), 5);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(load_records(&missing), Err(TableError::FileNotFound)));
        assert!(matches!(load_records(dir.path()), Err(TableError::LoadingFailed(_))));
    }

    #[test]
    fn load_reads_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_RECORDS.as_bytes()).unwrap();
        let records = load_records(file.path()).unwrap();
        assert_eq!(records, sample());
    }
}
