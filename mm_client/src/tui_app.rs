//! TUI application for playing a memory match session.
//!
//! The app is the session's rendering surface: every game event the session
//! broadcasts is fed through [`apply_event`] into the [`RenderSurface`]
//! implementation below, and key presses are forwarded to the session
//! handle.

use anyhow::Result;
use chrono::{DateTime, Utc};
use memory_match::{
    CardState, CardView, DECK_SIZE, GameEvent, MAX_TRIES, Outcome, RenderSurface, apply_event,
    session::{SessionHandle, SessionResponse},
};
use ratatui::{
    DefaultTerminal, Frame,
    crossterm::event::{self, Event, KeyEvent, KeyEventKind},
    layout::{Alignment, Constraint, Flex, Layout, Margin, Rect},
    style::{Style, Stylize},
    symbols::scrollbar,
    text::{Line, Span},
    widgets::{
        Block, Clear, List, ListDirection, ListItem, Padding, Paragraph, Scrollbar,
        ScrollbarOrientation, block,
    },
};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::commands::{COLUMNS, Command, Cursor, map_key};

mod widgets;

use widgets::ScrollableList;

const HELP: &str = "\
arrows / h j k l
        Move the cursor around the board.
enter / space
        Flip the card under the cursor. Two flips make a turn.
r
        Deal a new round. Available once the round is over.
tab
        Show or hide this help.
page up / page down
        Scroll the history. ctrl+home and ctrl+end jump to either end.
esc / q
        Quit.
";
const MAX_LOG_RECORDS: usize = 1024;
const POLL_TIMEOUT: Duration = Duration::from_millis(50);

#[derive(Clone)]
enum RecordKind {
    Alert,
    Error,
    Game,
    You,
}

/// A timestamped terminal message with an importance label to help
/// direct user attention.
#[derive(Clone)]
struct Record {
    datetime: DateTime<Utc>,
    kind: RecordKind,
    content: String,
}

impl Record {
    fn new(kind: RecordKind, content: String) -> Self {
        Self {
            datetime: Utc::now(),
            kind,
            content,
        }
    }
}

impl From<Record> for ListItem<'_> {
    fn from(val: Record) -> Self {
        let repr = match val.kind {
            RecordKind::Alert => "ALERT".light_magenta(),
            RecordKind::Error => "ERROR".light_red(),
            RecordKind::Game => "GAME".light_yellow(),
            RecordKind::You => "YOU".light_green(),
        };

        let msg = vec![
            format!("[{} ", val.datetime.format("%H:%M:%S")).into(),
            Span::styled(format!("{repr:5}"), repr.style),
            format!("]: {}", val.content).into(),
        ];

        ListItem::new(Line::from(msg))
    }
}

fn make_card_line(card: &CardView) -> Line<'static> {
    match (&card.face, card.state) {
        (Some(face), CardState::Matched) => {
            Line::from(format!("{} {}", face.image, face.name)).light_green()
        }
        (Some(face), _) => Line::from(format!("{} {}", face.image, face.name)).bold().white(),
        (None, _) => Line::from("?").dark_gray(),
    }
}

/// TUI App state
pub struct TuiApp {
    session_name: String,
    /// What each board position currently shows
    cards: Vec<CardView>,
    tries: u8,
    /// Set while the restart affordance is visible
    restart: Option<Outcome>,
    cursor: Cursor,
    /// Whether to display the help menu window
    show_help_menu: bool,
    /// Helps scroll through the help menu window if the terminal is small
    help_handle: ScrollableList,
    /// History of recorded messages
    log_handle: ScrollableList,
}

impl RenderSurface for TuiApp {
    fn render(&mut self, card: &CardView) {
        if let Some(slot) = self.cards.get_mut(card.position) {
            *slot = card.clone();
        }
    }

    fn set_tries_display(&mut self, tries: u8) {
        self.tries = tries;
    }

    fn show_restart(&mut self, outcome: Outcome) {
        self.restart = Some(outcome);
        let message = match outcome {
            Outcome::Won => "You found every pair! Press r to play again.",
            Outcome::Lost => "Out of tries. Press r to play again.",
        };
        self.add_log(RecordKind::Alert, message.to_string());
    }

    fn hide_restart(&mut self) {
        self.restart = None;
    }
}

impl TuiApp {
    pub fn new(session_name: String) -> Self {
        // Fill help menu with help text lines
        let mut help_handle = ScrollableList::new(MAX_LOG_RECORDS);
        help_handle.push("".into());
        for line in HELP.lines() {
            help_handle.push(line.into());
        }
        help_handle.push("".into());
        help_handle.jump_to_first();

        Self {
            session_name,
            cards: (0..DECK_SIZE).map(CardView::face_down).collect(),
            tries: MAX_TRIES,
            restart: None,
            cursor: Cursor::default(),
            show_help_menu: false,
            help_handle,
            log_handle: ScrollableList::new(MAX_LOG_RECORDS),
        }
    }

    /// Add log message
    fn add_log(&mut self, kind: RecordKind, content: String) {
        let record = Record::new(kind, content);
        self.log_handle.push(record.into());
    }

    /// Apply a session event to the board and the history
    fn handle_event(&mut self, event: &GameEvent) {
        apply_event(self, event);
        match event {
            // Both halves of a pair arrive as separate events; log on the second
            GameEvent::CardStateChanged(card) if card.state == CardState::Matched => {
                if let Some(face) = &card.face
                    && self
                        .cards
                        .iter()
                        .filter(|c| c.state == CardState::Matched && c.face == card.face)
                        .count()
                        == 2
                {
                    self.add_log(RecordKind::Game, format!("Matched {face}"));
                }
            }
            GameEvent::CardStateChanged(_) | GameEvent::Won | GameEvent::Lost => {}
            other => self.add_log(RecordKind::Game, other.to_string()),
        }
    }

    /// Execute a player command. Returns `false` when the app should exit.
    async fn handle_command(&mut self, command: Command, handle: &SessionHandle) -> Result<bool> {
        match command {
            Command::Move(direction) => self.cursor.step(direction),
            Command::Flip => {
                let position = self.cursor.position();
                if let SessionResponse::Ignored(reason) = handle.select_card(position).await? {
                    self.add_log(RecordKind::Error, reason.to_string());
                }
            }
            Command::Restart => {
                if self.restart.is_some() {
                    self.add_log(RecordKind::You, "new round".to_string());
                    handle.restart().await?;
                } else {
                    self.add_log(
                        RecordKind::Error,
                        "A new round can be dealt once this one is over".to_string(),
                    );
                }
            }
            Command::ToggleHelp => self.show_help_menu = !self.show_help_menu,
            Command::ScrollUp => {
                if self.show_help_menu {
                    self.help_handle.move_up();
                } else {
                    self.log_handle.move_up();
                }
            }
            Command::ScrollDown => {
                if self.show_help_menu {
                    self.help_handle.move_down();
                } else {
                    self.log_handle.move_down();
                }
            }
            Command::ScrollToFirst => self.log_handle.jump_to_first(),
            Command::ScrollToLast => self.log_handle.jump_to_last(),
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Render the card grid
    fn draw_board(&self, frame: &mut Frame, area: Rect) {
        let rows = DECK_SIZE.div_ceil(COLUMNS);
        let outer = Block::bordered().title(format!(" {}  ", self.session_name));
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let row_areas = Layout::vertical(vec![Constraint::Fill(1); rows]).split(inner);
        for (row, row_area) in row_areas.iter().enumerate() {
            let cell_areas = Layout::horizontal(vec![Constraint::Fill(1); COLUMNS]).split(*row_area);
            for (column, cell_area) in cell_areas.iter().enumerate() {
                let position = row * COLUMNS + column;
                let Some(card) = self.cards.get(position) else {
                    continue;
                };

                let mut cell = Block::bordered().title(format!(" {} ", position + 1));
                if position == self.cursor.position() {
                    cell = cell.border_style(Style::default().light_yellow()).bold();
                }
                let face = Paragraph::new(make_card_line(card))
                    .alignment(Alignment::Center)
                    .block(cell.padding(Padding::vertical(1)));
                frame.render_widget(face, *cell_area);
            }
        }
    }

    /// Render tries and round status
    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let matched = self
            .cards
            .iter()
            .filter(|c| c.state == CardState::Matched)
            .count()
            / 2;

        let mut lines = vec![
            Line::from(vec!["tries: ".into(), format!("{}/{}", self.tries, MAX_TRIES).bold()]),
            Line::from(vec![
                "pairs: ".into(),
                format!("{}/{}", matched, DECK_SIZE / 2).bold(),
            ]),
            Line::from(""),
        ];
        match self.restart {
            Some(Outcome::Won) => lines.push(Line::from("You won!").light_green().bold()),
            Some(Outcome::Lost) => lines.push(Line::from("You lost.").light_red().bold()),
            None => {}
        }
        if self.restart.is_some() {
            lines.push(Line::from(vec![
                "press ".into(),
                "r".bold().white(),
                " to restart".into(),
            ]));
        }

        let status = Paragraph::new(lines).block(
            Block::bordered()
                .padding(Padding::uniform(1))
                .title(" status  "),
        );
        frame.render_widget(status, area);
    }

    /// Render the log/history window with scrollbar
    fn draw_log(&mut self, frame: &mut Frame, area: Rect) {
        let log_records = self.log_handle.list_items.clone();
        let log_records = List::new(log_records)
            .direction(ListDirection::BottomToTop)
            .block(block::Block::bordered().title(" history  "));
        frame.render_stateful_widget(log_records, area, &mut self.log_handle.list_state);

        // Render log window scrollbar
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .begin_symbol(None)
                .end_symbol(None),
            area.inner(Margin {
                vertical: 1,
                horizontal: 1,
            }),
            &mut self.log_handle.scroll_state,
        );
    }

    /// Render the help/status bar at the bottom
    fn draw_help_bar(&self, frame: &mut Frame, area: Rect) {
        let help_message = vec![
            "press ".into(),
            "Tab".bold().white(),
            " to view help, press ".into(),
            "Enter".bold().white(),
            " to flip a card, or press ".into(),
            "Esc".bold().white(),
            " to exit".into(),
        ];
        let help_message = Paragraph::new(Line::from(help_message));
        frame.render_widget(help_message, area);
    }

    /// Render the help menu overlay
    fn draw_help_menu(&mut self, frame: &mut Frame) {
        let vertical = Layout::vertical([Constraint::Max(19)]).flex(Flex::Center);
        let horizontal = Layout::horizontal([Constraint::Max(72)]).flex(Flex::Center);
        let [help_menu_area] = vertical.areas(frame.area());
        let [help_menu_area] = horizontal.areas(help_menu_area);
        frame.render_widget(Clear, help_menu_area);

        let help_items = self.help_handle.list_items.clone();
        let help_items = List::new(help_items)
            .direction(ListDirection::BottomToTop)
            .block(block::Block::bordered().title(" controls  "));
        frame.render_stateful_widget(
            help_items,
            help_menu_area,
            &mut self.help_handle.list_state,
        );
    }

    /// Main draw function - orchestrates rendering of all UI components
    fn draw(&mut self, frame: &mut Frame) {
        let window = Layout::vertical([
            Constraint::Min(6),    // Top area (board + log)
            Constraint::Length(1), // Help bar
        ]);
        let [top_area, help_area] = window.areas(frame.area());

        let [view_area, log_area] =
            Layout::vertical([Constraint::Percentage(70), Constraint::Percentage(30)])
                .areas(top_area);

        let [board_area, status_area] =
            Layout::horizontal([Constraint::Percentage(75), Constraint::Percentage(25)])
                .areas(view_area);

        self.draw_board(frame, board_area);
        self.draw_status(frame, status_area);
        self.draw_log(frame, log_area);
        self.draw_help_bar(frame, help_area);

        if self.show_help_menu {
            self.draw_help_menu(frame);
        }
    }

    /// Run the TUI application until the player quits or the session ends
    pub async fn run(
        mut self,
        handle: SessionHandle,
        mut events: mpsc::Receiver<GameEvent>,
        mut terminal: DefaultTerminal,
    ) -> Result<()> {
        self.add_log(
            RecordKind::Alert,
            "Find all six pairs before your tries run out.".to_string(),
        );

        loop {
            // Apply everything the session has broadcast since the last frame
            loop {
                match events.try_recv() {
                    Ok(event) => self.handle_event(&event),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        self.add_log(RecordKind::Error, "Session ended".to_string());
                        terminal.draw(|frame| self.draw(frame))?;
                        tokio::time::sleep(Duration::from_secs(2)).await;
                        return Ok(());
                    }
                }
            }

            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(POLL_TIMEOUT)?
                && let Event::Key(KeyEvent {
                    code,
                    modifiers,
                    kind,
                    ..
                }) = event::read()?
                && kind == KeyEventKind::Press
                && let Some(command) = map_key(code, modifiers)
                && !self.handle_command(command, &handle).await?
            {
                return Ok(());
            }
        }
    }
}
