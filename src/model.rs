use arboard::Clipboard;
use ratatui::crossterm::event::KeyEvent;
use tracing::{debug, info, trace, warn};

use crate::domain::{CMDMode, Message, TableConfig, TableError};
use crate::editor::{EditorOutcome, RowEditor};
use crate::inputter::{InputResult, Inputter};
use crate::paging::absolute_index;
use crate::state::{Command, TableState};
use crate::table::{ColumnKey, Record};

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    TABLE,
    POPUP,
    CMDINPUT,
    EDITOR,
}

pub struct Model {
    config: TableConfig,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    table: TableState,
    curser_row: usize,
    curser_column: usize,
    input: Inputter,
    cmd_mode: Option<CMDMode>,
    cmd_column: Option<ColumnKey>,
    last_input: InputResult,
    editor: Option<RowEditor>,
    clipboard: Option<Clipboard>,
    notice: String,
    width: usize,
    height: usize,
}

impl Model {
    pub fn init(config: &TableConfig, records: Vec<Record>) -> Self {
        info!(
            "Showing {} records, {} per page",
            records.len(),
            config.page_size
        );
        Self {
            config: config.clone(),
            status: Status::READY,
            modus: Modus::TABLE,
            previous_modus: Modus::TABLE,
            table: TableState::new(records, config.page_size),
            curser_row: 0,
            curser_column: 0,
            input: Inputter::default(),
            cmd_mode: None,
            cmd_column: None,
            last_input: InputResult::default(),
            editor: None,
            clipboard: None,
            notice: String::new(),
            width: 0,
            height: 0,
        }
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), TableError> {
        let Some(msg) = message else {
            return Ok(());
        };
        if self.modus == Modus::TABLE && !matches!(msg, Message::Resize(..)) {
            self.notice.clear();
        }
        match self.modus {
            Modus::TABLE => match msg {
                Message::Quit => self.quit(),
                Message::MoveDown => self.move_row(1),
                Message::MoveUp => self.move_row(-1),
                Message::MoveRight => self.move_column(1),
                Message::MoveLeft => self.move_column(-1),
                Message::GotoPage(page) => self.goto_page(page),
                Message::NextPage => self.goto_page(self.table.current_page() + 1),
                Message::PrevPage => {
                    if self.table.current_page() > 0 {
                        self.goto_page(self.table.current_page() - 1)
                    }
                }
                Message::Filter => self.enter_cmd_mode(CMDMode::Filter),
                Message::FilterColumn => self.enter_cmd_mode(CMDMode::ColumnFilter),
                Message::ShowColumn => self.enter_cmd_mode(CMDMode::ShowColumn),
                Message::HideColumn => self.hide_selected_column(),
                Message::Reset => self.dispatch(Command::Reset),
                Message::Enter => self.open_editor(),
                Message::CopyRow => self.copy_row(),
                Message::Help => self.show_help(),
                Message::Resize(width, height) => self.ui_resize(width, height),
                _ => (),
            },
            Modus::POPUP => match msg {
                Message::Quit => self.quit(),
                Message::Exit | Message::Help => self.exit(),
                Message::Resize(width, height) => self.ui_resize(width, height),
                _ => (),
            },
            Modus::CMDINPUT => match msg {
                Message::RawKey(key) => self.raw_input(key),
                Message::Resize(width, height) => self.ui_resize(width, height),
                _ => (),
            },
            Modus::EDITOR => match msg {
                Message::RawKey(key) => self.editor_input(key),
                Message::Resize(width, height) => self.ui_resize(width, height),
                _ => (),
            },
        }
        Ok(())
    }

    /// Runs a state transition and keeps the cursor inside the new view.
    fn dispatch(&mut self, command: Command) {
        let table = std::mem::take(&mut self.table);
        self.table = table.apply(command);

        let view = self.table.view();
        self.curser_row = self.curser_row.min(view.rows.len().saturating_sub(1));
        self.curser_column = self
            .curser_column
            .min(view.headers.len().saturating_sub(1));
    }

    pub fn raw_keyevents(&self) -> bool {
        matches!(self.modus, Modus::CMDINPUT | Modus::EDITOR)
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    fn ui_resize(&mut self, width: usize, height: usize) {
        trace!(
            "UI was resized! w:{}->{}, h:{}->{}",
            self.width, width, self.height, height
        );
        self.width = width;
        self.height = height;
    }

    fn exit(&mut self) {
        trace!("Close popup ...");
        self.modus = self.previous_modus;
        self.previous_modus = Modus::POPUP;
    }

    fn show_help(&mut self) {
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
    }

    fn move_row(&mut self, step: isize) {
        let rows = self.table.view().rows.len();
        if rows > 0 {
            self.curser_row = self.curser_row.saturating_add_signed(step).min(rows - 1);
        }
    }

    fn move_column(&mut self, step: isize) {
        let columns = self.table.view().headers.len();
        if columns > 0 {
            self.curser_column = self
                .curser_column
                .saturating_add_signed(step)
                .min(columns - 1);
        }
    }

    fn goto_page(&mut self, page: usize) {
        if page < self.table.pages().len() {
            self.curser_row = 0;
            self.dispatch(Command::ChangePage(page));
        } else {
            trace!("No page {page}");
        }
    }

    pub fn selected_column(&self) -> Option<ColumnKey> {
        self.table.view().headers.get(self.curser_column).copied()
    }

    fn hide_selected_column(&mut self) {
        if let Some(column) = self.selected_column() {
            self.dispatch(Command::HideColumn(column));
        }
    }

    fn enter_cmd_mode(&mut self, mode: CMDMode) {
        trace!("Entering command mode {mode:?} ...");
        self.input.clear();
        match mode {
            CMDMode::Filter => self.input.set(self.table.keyword()),
            CMDMode::ColumnFilter => {
                let Some(column) = self.selected_column() else {
                    return;
                };
                self.cmd_column = Some(column);
                self.input.set(self.table.column_keyword());
            }
            CMDMode::ShowColumn => {
                if self.table.visibility().hidden().next().is_none() {
                    self.notice = "No hidden columns".to_string();
                    return;
                }
            }
        }
        self.previous_modus = self.modus;
        self.modus = Modus::CMDINPUT;
        self.cmd_mode = Some(mode);
        self.last_input = self.input.get();
    }

    fn raw_input(&mut self, key: KeyEvent) {
        self.last_input = self.input.read(key);
        if self.last_input.finished {
            self.handle_cmd_input();
        }
    }

    fn handle_cmd_input(&mut self) {
        trace!("Handle cmd input {}", self.last_input.input);
        self.modus = self.previous_modus;
        self.previous_modus = Modus::CMDINPUT;

        let cmd_mode = self.cmd_mode.take();
        if self.last_input.canceled {
            return;
        }
        let cmd_input = self.last_input.input.clone();
        match cmd_mode {
            Some(CMDMode::Filter) => self.dispatch(Command::Filter(cmd_input)),
            Some(CMDMode::ColumnFilter) => {
                if let Some(column) = self.cmd_column.take() {
                    self.dispatch(Command::ColumnFilter {
                        keyword: cmd_input,
                        selector: column.selector().to_string(),
                    });
                }
            }
            Some(CMDMode::ShowColumn) => match ColumnKey::from_key(cmd_input.trim()) {
                Some(column) => self.dispatch(Command::ShowColumn(column)),
                None => self.notice = format!("Unknown column: {cmd_input}"),
            },
            None => {
                info!("Cmd mode is none!")
            }
        }
    }

    fn open_editor(&mut self) {
        let Some(record) = self.table.current_data().get(self.curser_row) else {
            return;
        };
        let index = absolute_index(
            self.table.current_page(),
            self.table.page_size(),
            self.curser_row,
        );
        self.editor = Some(RowEditor::open(record, index));
        self.previous_modus = self.modus;
        self.modus = Modus::EDITOR;
    }

    fn close_editor(&mut self) {
        self.editor = None;
        self.modus = Modus::TABLE;
        self.previous_modus = Modus::EDITOR;
    }

    fn editor_input(&mut self, key: KeyEvent) {
        let Some(editor) = self.editor.as_mut() else {
            self.close_editor();
            return;
        };
        match editor.read(key) {
            EditorOutcome::Editing => {}
            EditorOutcome::Canceled => self.close_editor(),
            EditorOutcome::Submitted { index, record } => {
                debug!("Saving record {} at {index}", record.id);
                self.close_editor();
                self.dispatch(Command::UpdateRow { index, record });
            }
        }
    }

    fn copy_row(&mut self) {
        let Some(record) = self.table.current_data().get(self.curser_row) else {
            return;
        };
        let line = record.to_csv_line();
        trace!("Row content: {}", line);

        if self.clipboard.is_none() {
            match Clipboard::new() {
                Ok(clipboard) => self.clipboard = Some(clipboard),
                Err(e) => warn!("Clipboard not available: {:?}", e),
            }
        }
        let Some(clipboard) = self.clipboard.as_mut() else {
            self.notice = "Clipboard not available".to_string();
            return;
        };
        match clipboard.set_text(line) {
            Ok(_) => self.notice = format!("Copied record {}", record.id),
            Err(e) => warn!("Error copying to clipboard: {:?}", e),
        }
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn curser_row(&self) -> usize {
        self.curser_row
    }

    pub fn curser_column(&self) -> usize {
        self.curser_column
    }

    /// Prompt line contents while a command is being typed.
    pub fn prompt(&self) -> Option<(CMDMode, &InputResult)> {
        match (self.modus, self.cmd_mode) {
            (Modus::CMDINPUT, Some(mode)) => Some((mode, &self.last_input)),
            _ => None,
        }
    }

    pub fn editor(&self) -> Option<&RowEditor> {
        self.editor.as_ref()
    }

    pub fn show_popup(&self) -> bool {
        self.modus == Modus::POPUP
    }

    pub fn notice(&self) -> &str {
        &self.notice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::sample;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};

    fn model() -> Model {
        Model::init(&TableConfig::default(), sample())
    }

    fn send(model: &mut Model, message: Message) {
        model.update(Some(message)).unwrap();
    }

    fn type_line(model: &mut Model, s: &str) {
        for c in s.chars() {
            send(
                model,
                Message::RawKey(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)),
            );
        }
        send(
            model,
            Message::RawKey(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
        );
    }

    #[test]
    fn quit_sets_status() {
        let mut model = model();
        send(&mut model, Message::Quit);
        assert_eq!(model.status, Status::QUITTING);
    }

    #[test]
    fn filter_prompt_applies_keyword() {
        let mut model = model();
        send(&mut model, Message::Filter);
        assert!(model.raw_keyevents());
        assert_eq!(model.prompt().map(|(mode, _)| mode), Some(CMDMode::Filter));
        type_line(&mut model, "Kessler");
        assert!(!model.raw_keyevents());
        assert_eq!(model.table().total_rows(), 4);
        assert_eq!(model.table().view().page_selectors.len(), 1);
    }

    #[test]
    fn canceled_prompt_changes_nothing() {
        let mut model = model();
        send(&mut model, Message::Filter);
        send(
            &mut model,
            Message::RawKey(KeyEvent::new(KeyCode::Char('K'), KeyModifiers::SHIFT)),
        );
        send(
            &mut model,
            Message::RawKey(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
        );
        assert_eq!(model.table().total_rows(), 25);
        assert_eq!(model.table().keyword(), "");
    }

    #[test]
    fn column_filter_uses_selected_column() {
        let mut model = model();
        send(&mut model, Message::MoveRight);
        send(&mut model, Message::MoveRight);
        assert_eq!(model.selected_column(), Some(ColumnKey::LastName));
        send(&mut model, Message::FilterColumn);
        type_line(&mut model, "Kessler");
        assert_eq!(model.table().total_rows(), 4);
        assert_eq!(model.table().column(), Some(ColumnKey::LastName));
    }

    #[test]
    fn notice_clears_on_next_table_message() {
        let mut model = model();
        send(&mut model, Message::ShowColumn);
        assert_eq!(model.notice(), "No hidden columns");
        send(&mut model, Message::Resize(80, 24));
        assert_eq!(model.notice(), "No hidden columns");
        send(&mut model, Message::MoveDown);
        assert_eq!(model.notice(), "");
        assert_eq!(model.curser_row(), 1);
    }

    #[test]
    fn hide_then_show_column_by_key() {
        let mut model = model();
        send(&mut model, Message::ShowColumn);
        assert_eq!(model.notice(), "No hidden columns");
        assert!(!model.raw_keyevents());

        send(&mut model, Message::MoveRight);
        send(&mut model, Message::HideColumn);
        assert_eq!(
            model.table().view().restore_controls,
            vec![ColumnKey::FirstName]
        );
        send(&mut model, Message::ShowColumn);
        type_line(&mut model, "firstname");
        assert!(model.table().view().restore_controls.is_empty());
    }

    #[test]
    fn paging_keeps_cursor_in_range() {
        let mut model = model();
        for _ in 0..20 {
            send(&mut model, Message::MoveDown);
        }
        assert_eq!(model.curser_row(), 9);
        send(&mut model, Message::GotoPage(2));
        assert_eq!(model.curser_row(), 0);
        assert_eq!(model.table().current_page(), 2);
        send(&mut model, Message::NextPage);
        assert_eq!(model.table().current_page(), 2);
        send(&mut model, Message::PrevPage);
        assert_eq!(model.table().current_page(), 1);
        send(&mut model, Message::GotoPage(7));
        assert_eq!(model.table().current_page(), 1);
    }

    #[test]
    fn editor_updates_record_on_current_page() {
        let mut model = model();
        send(&mut model, Message::GotoPage(1));
        send(&mut model, Message::MoveDown);
        send(&mut model, Message::Enter);
        assert_eq!(model.editor().map(|e| e.index()), Some(11));

        // Jump to the email field and append to it.
        for _ in 0..3 {
            send(
                &mut model,
                Message::RawKey(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE)),
            );
        }
        type_line(&mut model, ".org");

        assert!(model.editor().is_none());
        let edited = &model.table().current_data()[1];
        assert_eq!(edited.email, "lorcan.doyle@example.com.org");
        assert_eq!(model.table().current_page(), 1);
        assert_eq!(model.table().total_rows(), 25);
    }

    #[test]
    fn editor_cancel_keeps_data() {
        let mut model = model();
        send(&mut model, Message::Enter);
        send(
            &mut model,
            Message::RawKey(KeyEvent::new(KeyCode::Char('z'), KeyModifiers::NONE)),
        );
        send(
            &mut model,
            Message::RawKey(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
        );
        assert!(model.editor().is_none());
        assert_eq!(model.table().current_data()[0], model.table().initial()[0]);
    }

    #[test]
    fn help_popup_opens_and_closes() {
        let mut model = model();
        send(&mut model, Message::Help);
        assert!(model.show_popup());
        send(&mut model, Message::MoveDown);
        assert_eq!(model.curser_row(), 0);
        send(&mut model, Message::Exit);
        assert!(!model.show_popup());
    }
}
