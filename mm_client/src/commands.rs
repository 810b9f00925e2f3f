use memory_match::{DECK_SIZE, entities::Position};
use ratatui::crossterm::event::{KeyCode, KeyModifiers};

/// Board columns in the terminal layout. Rows follow from the deck size.
pub const COLUMNS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Something the player asked for with a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    /// Flip the card under the cursor.
    Flip,
    Restart,
    ToggleHelp,
    ScrollUp,
    ScrollDown,
    ScrollToFirst,
    ScrollToLast,
    Quit,
}

/// Map a key press to a command.
///
/// # Examples
///
/// ```
/// use mm_client::commands::{Command, Direction, map_key};
/// use ratatui::crossterm::event::{KeyCode, KeyModifiers};
///
/// assert_eq!(map_key(KeyCode::Enter, KeyModifiers::NONE), Some(Command::Flip));
/// assert_eq!(
///     map_key(KeyCode::Char('h'), KeyModifiers::NONE),
///     Some(Command::Move(Direction::Left))
/// );
/// assert_eq!(map_key(KeyCode::F(5), KeyModifiers::NONE), None);
/// ```
pub fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
    match modifiers {
        KeyModifiers::CONTROL => match code {
            KeyCode::Home => Some(Command::ScrollToFirst),
            KeyCode::End => Some(Command::ScrollToLast),
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        },
        KeyModifiers::NONE | KeyModifiers::SHIFT => match code {
            KeyCode::Up | KeyCode::Char('k') => Some(Command::Move(Direction::Up)),
            KeyCode::Down | KeyCode::Char('j') => Some(Command::Move(Direction::Down)),
            KeyCode::Left | KeyCode::Char('h') => Some(Command::Move(Direction::Left)),
            KeyCode::Right | KeyCode::Char('l') => Some(Command::Move(Direction::Right)),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Command::Flip),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
            KeyCode::Tab => Some(Command::ToggleHelp),
            KeyCode::PageUp => Some(Command::ScrollUp),
            KeyCode::PageDown => Some(Command::ScrollDown),
            KeyCode::Esc | KeyCode::Char('q') => Some(Command::Quit),
            _ => None,
        },
        _ => None,
    }
}

/// Board position under the player's cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    position: Position,
    columns: usize,
    len: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new(COLUMNS, DECK_SIZE)
    }
}

impl Cursor {
    pub fn new(columns: usize, len: usize) -> Self {
        Self {
            position: 0,
            columns: columns.max(1),
            len,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn row(&self) -> usize {
        self.position / self.columns
    }

    pub fn column(&self) -> usize {
        self.position % self.columns
    }

    /// Move one cell, stopping at the board edges.
    pub fn step(&mut self, direction: Direction) {
        let target = match direction {
            Direction::Up => self.position.checked_sub(self.columns),
            Direction::Down => Some(self.position + self.columns),
            Direction::Left if self.column() > 0 => Some(self.position - 1),
            Direction::Right if self.column() + 1 < self.columns => Some(self.position + 1),
            _ => None,
        };
        if let Some(target) = target.filter(|&t| t < self.len) {
            self.position = target;
        }
    }
}
