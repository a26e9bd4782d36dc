use std::time::Duration;
use tracing::trace;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crate::domain::{Message, TableConfig, TableError};
use crate::model::Model;

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &TableConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, TableError> {
        if !event::poll(Duration::from_millis(self.event_poll_time))? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                if model.raw_keyevents() {
                    return Ok(Some(Message::RawKey(key)));
                }
                Ok(self.handle_key(key))
            }
            Event::Resize(width, height) => {
                Ok(Some(Message::Resize(width as usize, height as usize)))
            }
            _ => Ok(None),
        }
    }

    pub fn handle_key(&self, key: event::KeyEvent) -> Option<Message> {
        let message = match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Message::Quit),
            (KeyCode::Char('q'), _) => Some(Message::Quit),
            (KeyCode::Char('?'), _) => Some(Message::Help),
            (KeyCode::Esc, _) => Some(Message::Exit),
            (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(Message::MoveDown),
            (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(Message::MoveUp),
            (KeyCode::Char('l'), _) | (KeyCode::Right, _) | (KeyCode::Tab, _) => {
                Some(Message::MoveRight)
            }
            (KeyCode::Char('h'), _) | (KeyCode::Left, _) | (KeyCode::BackTab, _) => {
                Some(Message::MoveLeft)
            }
            (KeyCode::Char(c), _) if c.is_ascii_digit() => {
                c.to_digit(10).map(|d| Message::GotoPage(d as usize))
            }
            (KeyCode::PageDown, _) => Some(Message::NextPage),
            (KeyCode::PageUp, _) => Some(Message::PrevPage),
            (KeyCode::Char('/'), _) => Some(Message::Filter),
            (KeyCode::Char('f'), _) => Some(Message::FilterColumn),
            (KeyCode::Char('x'), _) => Some(Message::HideColumn),
            (KeyCode::Char('s'), _) => Some(Message::ShowColumn),
            (KeyCode::Char('r'), _) => Some(Message::Reset),
            (KeyCode::Char('y'), _) => Some(Message::CopyRow),
            (KeyCode::Enter, _) => Some(Message::Enter),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}
