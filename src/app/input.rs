use crossterm::event::{KeyCode, KeyEvent};

use crate::config::ControlsSettings;

use super::model::{App, UserCommand};

/// What a key press asks the event loop to do.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Command(UserCommand),
    ToggleFocus,
    Move(isize),
    Top,
    Bottom,
    CursorToActive,
    Activate,
    Quit,
    Nothing,
}

/// Two-key prefixes (`gg`, `zz`) waiting for their second key.
#[derive(Debug, Default)]
pub struct KeyState {
    pending_g: bool,
    pending_z: bool,
}

impl KeyState {
    pub fn map(&mut self, key: KeyEvent, app: &App, controls: &ControlsSettings) -> Action {
        let (was_g, was_z) = (self.pending_g, self.pending_z);
        self.pending_g = false;
        self.pending_z = false;

        match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Tab => Action::ToggleFocus,
            KeyCode::Char('j') | KeyCode::Down => Action::Move(1),
            KeyCode::Char('k') | KeyCode::Up => Action::Move(-1),
            KeyCode::Char('g') if was_g => Action::Top,
            KeyCode::Char('g') => {
                self.pending_g = true;
                Action::Nothing
            }
            KeyCode::Char('G') => Action::Bottom,
            KeyCode::Char('z') if was_z => Action::CursorToActive,
            KeyCode::Char('z') => {
                self.pending_z = true;
                Action::Nothing
            }
            KeyCode::Enter => Action::Activate,
            KeyCode::Char(' ') | KeyCode::Char('p') => {
                Action::Command(UserCommand::ActivatePrimaryTransport)
            }
            KeyCode::Char('l') => Action::Command(UserCommand::ActivateNext),
            KeyCode::Char('h') => Action::Command(UserCommand::ActivatePrevious),
            KeyCode::Char('L') => Action::Command(app.seek_by(controls.seek_step)),
            KeyCode::Char('H') => Action::Command(app.seek_by(-controls.seek_step)),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                Action::Command(app.volume_by(controls.volume_step))
            }
            KeyCode::Char('-') => Action::Command(app.volume_by(-controls.volume_step)),
            KeyCode::Char('m') => Action::Command(UserCommand::ToggleMute),
            KeyCode::Char(c @ '0'..='9') => {
                let tenths = c.to_digit(10).unwrap_or(0);
                Action::Command(UserCommand::SeekToFraction(f64::from(tenths) / 10.0))
            }
            _ => Action::Nothing,
        }
    }
}
