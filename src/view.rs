//! Pure presentation of the table state.
//!
//! `render` turns the state and the records of the current page into a
//! `TableView`. Nothing here touches the terminal, `ui.rs` draws the result.

use crate::state::{Reason, TableState};
use crate::table::{ColumnKey, FieldKind, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Keyword,
    Column,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    Highlight(String, Highlight),
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain(s) | Segment::Highlight(s, _) => s,
        }
    }

    fn with_text(&self, text: &str) -> Segment {
        match self {
            Segment::Plain(_) => Segment::Plain(text.to_string()),
            Segment::Highlight(_, h) => Segment::Highlight(text.to_string(), *h),
        }
    }
}

/// Wraps every occurrence of `keyword` in `text` into a highlighted segment.
pub fn highlight(text: &str, keyword: &str, kind: Highlight) -> Vec<Segment> {
    if keyword.is_empty() {
        return vec![Segment::Plain(text.to_string())];
    }
    let mut segments = Vec::new();
    let mut last = 0;
    for (start, matched) in text.match_indices(keyword) {
        if start > last {
            segments.push(Segment::Plain(text[last..start].to_string()));
        }
        segments.push(Segment::Highlight(matched.to_string(), kind));
        last = start + matched.len();
    }
    if last < text.len() || segments.is_empty() {
        segments.push(Segment::Plain(text[last..].to_string()));
    }
    segments
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
    pub column: ColumnKey,
    pub kind: FieldKind,
    pub segments: Vec<Segment>,
}

impl CellView {
    fn new(column: ColumnKey, text: String) -> Self {
        Self {
            column,
            kind: column.kind(),
            segments: vec![Segment::Plain(text)],
        }
    }

    pub fn text(&self) -> String {
        self.segments.iter().map(Segment::text).collect()
    }

    #[cfg(test)]
    pub fn is_highlighted(&self, kind: Highlight) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Highlight(_, h) if *h == kind))
    }

    /// Segments split at line breaks, a highlight spanning a break is split too.
    pub fn lines(&self) -> Vec<Vec<Segment>> {
        let mut lines = vec![Vec::new()];
        for segment in &self.segments {
            for (i, part) in segment.text().split('\n').enumerate() {
                if i > 0 {
                    lines.push(Vec::new());
                }
                if !part.is_empty()
                    && let Some(line) = lines.last_mut()
                {
                    line.push(segment.with_text(part));
                }
            }
        }
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// Position of the record within the current page.
    pub index: usize,
    pub cells: Vec<CellView>,
}

impl RowView {
    #[cfg(test)]
    pub fn cell(&self, column: ColumnKey) -> Option<&CellView> {
        self.cells.iter().find(|c| c.column == column)
    }

    pub fn height(&self) -> usize {
        self.cells.iter().map(|c| c.lines().len()).max().unwrap_or(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSelector {
    pub index: usize,
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    pub page_selectors: Vec<PageSelector>,
    /// One entry per hidden column, selecting it shows the column again.
    pub restore_controls: Vec<ColumnKey>,
    pub headers: Vec<ColumnKey>,
    pub rows: Vec<RowView>,
    pub has_data: bool,
}

fn render_row(index: usize, record: &Record, state: &TableState) -> RowView {
    let visibility = state.visibility();
    let mut cells = Vec::new();
    for column in ColumnKey::ALL {
        if !visibility.is_visible(column) {
            continue;
        }
        cells.push(CellView::new(column, record.cell_text(column)));
    }
    RowView { index, cells }
}

fn highlight_keyword(rows: &mut [RowView], keyword: &str) {
    for cell in rows.iter_mut().flat_map(|r| r.cells.iter_mut()) {
        if cell.kind != FieldKind::Image {
            cell.segments = highlight(&cell.text(), keyword, Highlight::Keyword);
        }
    }
}

fn highlight_column(rows: &mut [RowView], keyword: &str, column: ColumnKey) {
    for cell in rows
        .iter_mut()
        .flat_map(|r| r.cells.iter_mut())
        .filter(|c| c.column == column)
    {
        cell.segments = highlight(&cell.text(), keyword, Highlight::Column);
    }
}

/// Builds the view of `data` for the given state.
///
/// `reason` names the action that triggered the render and together with
/// `has_data` decides which keywords get highlighted.
pub fn render(data: &[Record], reason: Reason, has_data: bool, state: &TableState) -> TableView {
    let page_selectors = (0..state.pages().len())
        .map(|index| PageSelector {
            index,
            active: index == state.current_page(),
        })
        .collect();
    let restore_controls = state.visibility().hidden().collect();
    let headers = state.visibility().visible().collect();

    let mut rows: Vec<RowView> = data
        .iter()
        .enumerate()
        .map(|(index, record)| render_row(index, record, state))
        .collect();

    let keyword = state.keyword();
    if !keyword.is_empty()
        && matches!(reason, Reason::OverallFilter | Reason::PageChange)
        && has_data
    {
        highlight_keyword(&mut rows, keyword);
    }

    let column_keyword = state.column_keyword();
    if !column_keyword.is_empty()
        && matches!(reason, Reason::ColumnFilter | Reason::PageChange)
        && has_data
        && let Some(column) = state.column()
    {
        highlight_column(&mut rows, column_keyword, column);
    }

    TableView {
        page_selectors,
        restore_controls,
        headers,
        rows,
        has_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_wraps_every_occurrence() {
        let segments = highlight("abcab", "ab", Highlight::Keyword);
        assert_eq!(
            segments,
            vec![
                Segment::Highlight("ab".into(), Highlight::Keyword),
                Segment::Plain("c".into()),
                Segment::Highlight("ab".into(), Highlight::Keyword),
            ]
        );
    }

    #[test]
    fn highlight_without_match_is_plain() {
        assert_eq!(
            highlight("hello", "xyz", Highlight::Column),
            vec![Segment::Plain("hello".into())]
        );
        assert_eq!(
            highlight("", "xyz", Highlight::Column),
            vec![Segment::Plain("".into())]
        );
    }

    #[test]
    fn lines_split_highlights_at_breaks() {
        let cell = CellView {
            column: ColumnKey::Memo,
            kind: FieldKind::List,
            segments: highlight("one\ntwo one", "one", Highlight::Keyword),
        };
        let lines = cell.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            vec![Segment::Highlight("one".into(), Highlight::Keyword)]
        );
        assert_eq!(
            lines[1],
            vec![
                Segment::Plain("two ".into()),
                Segment::Highlight("one".into(), Highlight::Keyword)
            ]
        );
        assert_eq!(cell.text(), "one\ntwo one");
    }
}
