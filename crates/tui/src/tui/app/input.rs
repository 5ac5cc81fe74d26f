use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::buffer::TextBuffer;
use crate::tui::view::View;

use super::App;

/// Which input context receives keystrokes; exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyContext {
    Command,
    Navigate,
    Field,
}

impl KeyContext {
    fn of(view: &View) -> Self {
        match view {
            View::Filter { .. } | View::Project { .. } => Self::Command,
            View::Edit(editor) if editor.is_editing() => Self::Field,
            View::Edit(_) => Self::Navigate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavigateAction {
    Up,
    Down,
    Edit,
    Back,
}

impl NavigateAction {
    fn from_event(key: &KeyEvent) -> Option<Self> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Self::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(Self::Down),
            KeyCode::Enter => Some(Self::Edit),
            KeyCode::Esc => Some(Self::Back),
            _ => None,
        }
    }
}

impl App {
    pub(crate) async fn on_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Char('c')) && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match KeyContext::of(&self.view) {
            KeyContext::Command => self.handle_command_key(key).await,
            KeyContext::Navigate => self.handle_navigate_key(key),
            KeyContext::Field => self.handle_field_key(key).await,
        }
    }

    async fn handle_command_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_input().await,
            KeyCode::Esc => self.input.clear(),
            _ => edit_buffer(&mut self.input, key),
        }
    }

    fn handle_navigate_key(&mut self, key: KeyEvent) {
        let Some(action) = NavigateAction::from_event(&key) else {
            return;
        };
        if action == NavigateAction::Back {
            self.status = None;
            self.leave_edit();
            return;
        }
        let Some(editor) = self.view.editor_mut() else {
            return;
        };
        match action {
            NavigateAction::Up => editor.move_up(),
            NavigateAction::Down => editor.move_down(),
            NavigateAction::Edit => editor.begin_edit(),
            NavigateAction::Back => {}
        }
    }

    async fn handle_field_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_field().await,
            KeyCode::Esc => {
                if let Some(editor) = self.view.editor_mut() {
                    editor.cancel_edit();
                }
            }
            _ => {
                if let Some(buffer) = self.view.editor_mut().and_then(|e| e.buffer_mut()) {
                    edit_buffer(buffer, key);
                }
            }
        }
    }
}

fn edit_buffer(buffer: &mut TextBuffer, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) => buffer.insert_char(c),
        KeyCode::Backspace => buffer.backspace(),
        KeyCode::Delete => buffer.delete_char(),
        KeyCode::Left => buffer.move_left(),
        KeyCode::Right => buffer.move_right(),
        KeyCode::Home => buffer.move_home(),
        KeyCode::End => buffer.move_end(),
        _ => {}
    }
}
