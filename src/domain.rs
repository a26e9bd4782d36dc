use std::fmt;
use std::io::Error;

use derive_setters::Setters;
use ratatui::crossterm::event::KeyEvent;

pub const DEFAULT_PAGE_SIZE: usize = 10;

pub const HELP_TEXT: &str = "\
Navigation
  j / Down        next row
  k / Up          previous row
  l / Tab         next column
  h / BackTab     previous column
  0-9             go to page
  PageDown        next page
  PageUp          previous page

Filtering
  /               filter all columns by keyword
  f               filter selected column by keyword
  r               reset filters

Columns
  x               hide selected column
  s               show a hidden column

Records
  Enter           edit selected record
  y               copy selected record

In the editor
  Tab / Down      next field
  BackTab / Up    previous field
  Alt+Enter       new memo line
  Enter           save
  Esc             cancel

  ?               this help
  q               quit";

#[derive(Debug)]
pub enum TableError {
    IoError(Error),
    JsonError(serde_json::Error),
    LoadingFailed(String),
    FileNotFound,
    PermissionDenied,
    UnknownColumn(String),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::IoError(e) => write!(f, "io error: {e}"),
            TableError::JsonError(e) => write!(f, "invalid record data: {e}"),
            TableError::LoadingFailed(reason) => write!(f, "loading failed: {reason}"),
            TableError::FileNotFound => write!(f, "file not found"),
            TableError::PermissionDenied => write!(f, "permission denied"),
            TableError::UnknownColumn(name) => write!(f, "unknown column: {name}"),
        }
    }
}

impl std::error::Error for TableError {}

impl From<Error> for TableError {
    fn from(err: Error) -> Self {
        TableError::IoError(err)
    }
}

impl From<serde_json::Error> for TableError {
    fn from(err: serde_json::Error) -> Self {
        TableError::JsonError(err)
    }
}

#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct TableConfig {
    pub event_poll_time: u64,
    pub page_size: usize,
    pub max_column_width: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
            page_size: DEFAULT_PAGE_SIZE,
            max_column_width: 32,
        }
    }
}

/// What the prompt line is currently collecting input for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CMDMode {
    Filter,
    ColumnFilter,
    ShowColumn,
}

impl CMDMode {
    pub fn prompt(&self) -> &'static str {
        match self {
            CMDMode::Filter => "filter: ",
            CMDMode::ColumnFilter => "filter column: ",
            CMDMode::ShowColumn => "show column: ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Quit,
    Help,
    Exit,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    GotoPage(usize),
    PrevPage,
    NextPage,
    Filter,
    FilterColumn,
    ShowColumn,
    HideColumn,
    Reset,
    Enter,
    CopyRow,
    RawKey(KeyEvent),
    Resize(usize, usize),
}
