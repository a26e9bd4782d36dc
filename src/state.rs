//! Table state and its transitions.
//!
//! `TableState` is an owned value. Every `Command` consumes the current state
//! and returns the next one, re-paginating and re-rendering on the way, so a
//! caller always holds a state whose view matches its data.

use tracing::{trace, warn};

use crate::domain::DEFAULT_PAGE_SIZE;
use crate::filter::{column_filter, keyword_filter};
use crate::paging::{chunk, flatten};
use crate::table::{ColumnKey, Record, Visibility};
use crate::view::{TableView, render};

/// The action that led to a render, it only decides what gets highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    Initial,
    PageChange,
    FilterCleared,
    OverallFilter,
    ColumnFilter,
    ShowColumn,
    HideColumn,
    Reset,
    RowUpdated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ChangePage(usize),
    Filter(String),
    ColumnFilter { keyword: String, selector: String },
    ShowColumn(ColumnKey),
    HideColumn(ColumnKey),
    Reset,
    /// Replace the record at `index` of the flattened page set.
    UpdateRow { index: usize, record: Record },
}

#[derive(Debug, Clone)]
pub struct TableState {
    initial: Vec<Record>,
    current_data: Vec<Record>,
    current_page: usize,
    pages: Vec<Vec<Record>>,
    keyword: String,
    column_keyword: String,
    column: Option<ColumnKey>,
    visibility: Visibility,
    status: String,
    page_size: usize,
    view: TableView,
}

impl Default for TableState {
    fn default() -> Self {
        TableState::new(Vec::new(), DEFAULT_PAGE_SIZE)
    }
}

impl TableState {
    pub fn new(records: Vec<Record>, page_size: usize) -> Self {
        let state = Self {
            current_data: Vec::new(),
            initial: records,
            current_page: 0,
            pages: Vec::new(),
            keyword: String::new(),
            column_keyword: String::new(),
            column: None,
            visibility: Visibility::default(),
            status: String::new(),
            page_size: page_size.max(1),
            view: TableView::default(),
        };
        let data = state.initial.clone();
        state.paginate(data, Reason::Initial)
    }

    pub fn apply(self, command: Command) -> Self {
        trace!("Apply {command:?}");
        match command {
            Command::ChangePage(index) => self.change_page(index),
            Command::Filter(keyword) => self.filter(keyword),
            Command::ColumnFilter { keyword, selector } => self.column_filter(keyword, &selector),
            Command::ShowColumn(column) => self.set_visible(column, true),
            Command::HideColumn(column) => self.set_visible(column, false),
            Command::Reset => self.reset(),
            Command::UpdateRow { index, record } => self.update_row(index, record),
        }
    }

    fn paginate(mut self, data: Vec<Record>, reason: Reason) -> Self {
        if data.is_empty() {
            self.view = render(&self.current_data, reason, false, &self);
            return self;
        }
        self.pages = chunk(&data, self.page_size);
        self.current_page = self.current_page.min(self.pages.len() - 1);
        self.current_data = self.pages[self.current_page].clone();
        self.view = render(&self.current_data, reason, true, &self);
        self
    }

    fn all_rows(&self) -> Vec<Record> {
        flatten(&self.pages)
    }

    fn change_page(mut self, index: usize) -> Self {
        if index >= self.pages.len() {
            warn!("Ignoring change to page {index}, there are {} pages", self.pages.len());
            return self;
        }
        self.current_page = index;
        let data = self.all_rows();
        self.paginate(data, Reason::PageChange)
    }

    fn filter(mut self, keyword: String) -> Self {
        self.keyword = keyword;
        if self.keyword.is_empty() {
            self.current_page = 0;
            let data = self.initial.clone();
            return self.paginate(data, Reason::FilterCleared);
        }

        let scanned = self.all_rows();
        let filtered = keyword_filter(&self.keyword, &scanned);
        self.status = format!(
            "Filtered by keyword: [{}]\nFound {} records. (Filtered {} records.)",
            self.keyword,
            filtered.len(),
            scanned.len()
        );
        if !filtered.is_empty() {
            self.current_page = 0;
        }
        self.paginate(filtered, Reason::OverallFilter)
    }

    fn column_filter(mut self, keyword: String, selector: &str) -> Self {
        self.column_keyword = keyword;
        if self.column_keyword.is_empty() {
            return self;
        }

        let path: Vec<&str> = selector.split('-').collect();
        let column = match ColumnKey::from_path(&path) {
            Ok(column) => column,
            Err(e) => {
                warn!("Column filter failed: {e}");
                self.status = format!("Can not filter: {e}");
                self.column_keyword.clear();
                return self;
            }
        };

        let scanned = self.all_rows();
        let filtered = column_filter(&self.column_keyword, &scanned, column);
        self.column = Some(column);
        self.status = format!(
            "Filtered by keyword: [{}] in column: {}\nFound {} records (Filtered {} records.)",
            self.column_keyword,
            column.selector(),
            filtered.len(),
            scanned.len()
        );
        if !filtered.is_empty() {
            self.current_page = 0;
        }
        self.paginate(filtered, Reason::ColumnFilter)
    }

    fn set_visible(mut self, column: ColumnKey, visible: bool) -> Self {
        self.visibility.set(column, visible);
        let data = self.all_rows();
        let reason = if visible {
            Reason::ShowColumn
        } else {
            Reason::HideColumn
        };
        self.paginate(data, reason)
    }

    fn reset(mut self) -> Self {
        self.current_page = 0;
        self.keyword.clear();
        self.column_keyword.clear();
        self.status.clear();
        let data = self.initial.clone();
        self.paginate(data, Reason::Reset)
    }

    fn update_row(self, index: usize, record: Record) -> Self {
        let mut rows = self.all_rows();
        match rows.get_mut(index) {
            Some(row) => *row = record,
            None => {
                warn!("Ignoring update of row {index}, there are {} rows", rows.len());
                return self;
            }
        }
        self.paginate(rows, Reason::RowUpdated)
    }

    #[cfg(test)]
    pub fn initial(&self) -> &[Record] {
        &self.initial
    }

    pub fn current_data(&self) -> &[Record] {
        &self.current_data
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn pages(&self) -> &[Vec<Record>] {
        &self.pages
    }

    pub fn total_rows(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn column_keyword(&self) -> &str {
        &self.column_keyword
    }

    pub fn column(&self) -> Option<ColumnKey> {
        self.column
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn view(&self) -> &TableView {
        &self.view
    }
}
