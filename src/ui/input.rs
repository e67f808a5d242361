/// Keyboard handling during the show.
///
/// The scene plays on its own; the only controls are skipping ahead and
/// quitting. Events are drained without blocking once per frame and turned
/// into edge-triggered commands.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Jump to the next phase of the show.
    Skip,
    Quit,
}

/// Map one key event to a command. Releases never count.
pub fn command_for(key: &KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        return Some(Command::Quit);
    }
    match key.code {
        KeyCode::Char(' ') => Some(Command::Skip),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

#[derive(Default)]
pub struct InputState {
    /// Commands collected by the most recent `drain_events` call.
    commands: Vec<Command>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { commands: Vec::with_capacity(4) }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) {
        self.commands.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if let Some(cmd) = command_for(&key) {
                    self.commands.push(cmd);
                }
            }
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.commands.contains(&Command::Quit)
    }

    /// Number of skip presses this frame.
    pub fn skips(&self) -> usize {
        self.commands.iter().filter(|c| **c == Command::Skip).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent { code, modifiers, kind, state: KeyEventState::NONE }
    }

    fn press(code: KeyCode) -> KeyEvent {
        key(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    #[test]
    fn space_skips() {
        assert_eq!(command_for(&press(KeyCode::Char(' '))), Some(Command::Skip));
    }

    #[test]
    fn quit_keys() {
        assert_eq!(command_for(&press(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(command_for(&press(KeyCode::Esc)), Some(Command::Quit));
        let ctrl_c = key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press);
        assert_eq!(command_for(&ctrl_c), Some(Command::Quit));
    }

    #[test]
    fn plain_c_and_releases_do_nothing() {
        assert_eq!(command_for(&press(KeyCode::Char('c'))), None);
        let release = key(KeyCode::Char(' '), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(command_for(&release), None);
    }

    #[test]
    fn commands_are_counted() {
        let mut input = InputState::new();
        input.commands = vec![Command::Skip, Command::Skip];
        assert_eq!(input.skips(), 2);
        assert!(!input.quit_requested());
        input.commands.push(Command::Quit);
        assert!(input.quit_requested());
    }
}
