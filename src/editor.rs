use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, trace};

use crate::inputter::Inputter;
use crate::table::{Name, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Id,
    First,
    Last,
    Email,
    Gender,
    Memo,
}

impl EditorField {
    pub const ALL: [EditorField; 6] = [
        EditorField::Id,
        EditorField::First,
        EditorField::Last,
        EditorField::Email,
        EditorField::Gender,
        EditorField::Memo,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EditorField::Id => "id",
            EditorField::First => "first name",
            EditorField::Last => "last name",
            EditorField::Email => "email",
            EditorField::Gender => "gender",
            EditorField::Memo => "memo",
        }
    }

    fn value(&self, record: &Record) -> String {
        match self {
            EditorField::Id => record.id.clone(),
            EditorField::First => record.name.first.clone(),
            EditorField::Last => record.name.last.clone(),
            EditorField::Email => record.email.clone(),
            EditorField::Gender => record.gender.clone(),
            EditorField::Memo => record.memo.join("\n"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorOutcome {
    Editing,
    Submitted { index: usize, record: Record },
    Canceled,
}

/// Form holding one record while it is edited.
#[derive(Debug, Clone)]
pub struct RowEditor {
    /// Position of the record within the flattened page set.
    index: usize,
    inputs: Vec<Inputter>,
    focus: usize,
    img: String,
}

impl RowEditor {
    pub fn open(record: &Record, index: usize) -> Self {
        debug!("Editing record {} at {index}", record.id);
        let inputs = EditorField::ALL
            .iter()
            .map(|field| {
                let mut input = match field {
                    EditorField::Memo => Inputter::multiline(),
                    _ => Inputter::default(),
                };
                input.set(&field.value(record));
                input
            })
            .collect();
        Self {
            index,
            inputs,
            focus: 0,
            img: record.img.clone(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn img(&self) -> &str {
        &self.img
    }

    pub fn focused(&self) -> EditorField {
        EditorField::ALL[self.focus]
    }

    pub fn fields(&self) -> impl Iterator<Item = (EditorField, &Inputter)> {
        EditorField::ALL.iter().copied().zip(self.inputs.iter())
    }

    pub fn read(&mut self, key: KeyEvent) -> EditorOutcome {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => EditorOutcome::Canceled,
            (KeyCode::Enter, KeyModifiers::ALT) => {
                self.inputs[self.focus].read(key);
                EditorOutcome::Editing
            }
            (KeyCode::Enter, _) => EditorOutcome::Submitted {
                index: self.index,
                record: self.record(),
            },
            (KeyCode::Tab, _) | (KeyCode::Down, _) => {
                self.focus = (self.focus + 1) % self.inputs.len();
                EditorOutcome::Editing
            }
            (KeyCode::BackTab, _) | (KeyCode::Up, _) => {
                self.focus = (self.focus + self.inputs.len() - 1) % self.inputs.len();
                EditorOutcome::Editing
            }
            _ => {
                self.inputs[self.focus].read(key);
                trace!("{} => {:?}", self.focused().label(), self.inputs[self.focus].value());
                EditorOutcome::Editing
            }
        }
    }

    fn input(&self, field: EditorField) -> &str {
        self.inputs[field as usize].value()
    }

    /// The replacement record built from the current field values.
    pub fn record(&self) -> Record {
        Record {
            id: self.input(EditorField::Id).to_string(),
            name: Name {
                first: self.input(EditorField::First).to_string(),
                last: self.input(EditorField::Last).to_string(),
            },
            email: self.input(EditorField::Email).to_string(),
            gender: self.input(EditorField::Gender).to_string(),
            memo: self
                .input(EditorField::Memo)
                .split('\n')
                .map(str::to_string)
                .collect(),
            img: self.img.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::record;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn unchanged_form_gives_back_the_record() {
        let original = record("4", "Ann", "Lee", &["one", "two"]);
        let editor = RowEditor::open(&original, 14);
        assert_eq!(editor.record(), original);
        assert_eq!(editor.index(), 14);
    }

    #[test]
    fn edits_go_to_the_focused_field() {
        let original = record("4", "Ann", "Lee", &["one"]);
        let mut editor = RowEditor::open(&original, 0);
        editor.read(key(KeyCode::Tab));
        assert_eq!(editor.focused(), EditorField::First);
        editor.read(key(KeyCode::Char('a')));

        editor.read(key(KeyCode::BackTab));
        editor.read(key(KeyCode::BackTab));
        assert_eq!(editor.focused(), EditorField::Memo);
        editor.read(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));
        editor.read(key(KeyCode::Char('x')));

        match editor.read(key(KeyCode::Enter)) {
            EditorOutcome::Submitted { index, record } => {
                assert_eq!(index, 0);
                assert_eq!(record.name.first, "Anna");
                assert_eq!(record.memo, vec!["one".to_string(), "x".to_string()]);
                assert_eq!(record.img, original.img);
                assert_eq!(record.email, original.email);
            }
            other => panic!("expected submit, got {other:?}"),
        }
    }

    #[test]
    fn escape_cancels() {
        let mut editor = RowEditor::open(&record("4", "Ann", "Lee", &[]), 0);
        assert_eq!(editor.read(key(KeyCode::Esc)), EditorOutcome::Canceled);
    }
}
