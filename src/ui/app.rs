//! Main UI Application
//!
//! Turns key presses into `InputState` and draws whatever mode the game is in.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::entities::{Entity, EntityKind, MAX_HEALTH};
use crate::game::{Game, GameError, GameEvent, GameMode, MenuItem, PlayStatus, Session};
use crate::input::InputState;
use crate::world::Position;
use super::messages::MessageLog;

/// Lines reserved for the message panel
const MESSAGE_PANEL_HEIGHT: u16 = 8;
/// Width of the status sidebar
const SIDEBAR_WIDTH: u16 = 28;

const INSTRUCTIONS: [&str; 9] = [
    "Arrow keys or WASD move one cell per turn.",
    "Enter waits a turn in place.",
    "",
    "K  keys open doors. The last door leads deeper.",
    "Z  zombies fight back. Force soaks their blows.",
    "P  potions heal, poison or boost for a few turns.",
    "W  weapons add attack and force while wielded.",
    "X  traps hurt, F healers mend, G thieves steal keys.",
    "T  portals carry you to their twin.",
];

/// Main UI application
pub struct App {
    messages: MessageLog,
    /// Keys seen since the last frame
    pending: InputState,
}

impl App {
    pub fn new() -> Self {
        Self {
            messages: MessageLog::new(),
            pending: InputState::default(),
        }
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    /// Record a key press. Returns true when the player asked to quit.
    pub fn handle_input(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            return true;
        }

        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => self.pending.up = true,
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => self.pending.down = true,
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => self.pending.left = true,
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => self.pending.right = true,
            KeyCode::Enter | KeyCode::Char(' ') => self.pending.confirm = true,
            KeyCode::Esc | KeyCode::Backspace => self.pending.cancel = true,
            _ => {}
        }
        false
    }

    /// Hand over this frame's input and start collecting the next
    pub fn take_input(&mut self) -> InputState {
        std::mem::take(&mut self.pending)
    }

    pub fn record(&mut self, events: &[GameEvent]) {
        for event in events {
            self.messages.push(event.to_string());
        }
    }

    pub fn report_error(&mut self, error: &GameError) {
        log::warn!("{}", error);
        self.messages.push(format!("Error: {}", error));
    }

    /// Forget old messages, used when a new session starts
    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    pub fn render(&self, frame: &mut Frame, game: &Game) {
        frame.render_widget(Clear, frame.area());

        match game.mode() {
            GameMode::Init => self.render_splash(frame),
            GameMode::Menu => self.render_main_menu(frame, game.menu_selected()),
            GameMode::Pause => self.render_instructions(frame),
            GameMode::Idle => {}
            GameMode::Play => match game.session() {
                Some(session) => match session.status() {
                    PlayStatus::Active => self.render_playing(frame, session),
                    PlayStatus::Dead => self.render_game_over(frame, session),
                    PlayStatus::Won => self.render_victory(frame),
                },
                None => {}
            },
        }
    }

    fn render_splash(&self, frame: &mut Frame) {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "C R Y P T W A R D",
                Style::default().fg(Color::Rgb(160, 60, 200)).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Something stirs below the chapel floor...",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(Span::styled("Press any key", Style::default().fg(Color::Gray))),
        ];

        let para = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(para, centered_rect(60, 40, frame.area()));
    }

    fn render_main_menu(&self, frame: &mut Frame, selected: MenuItem) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(40),
                Constraint::Percentage(30),
            ])
            .split(frame.area());

        let title = Paragraph::new(Line::from(Span::styled(
            "CRYPTWARD",
            Style::default().fg(Color::Rgb(160, 60, 200)).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(title, chunks[0]);

        let mut menu = Vec::new();
        for item in MenuItem::ALL {
            menu.push(Line::from(""));
            let line = if item == selected {
                Span::styled(
                    format!("> {} <", item.label()),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(item.label().to_string(), Style::default().fg(Color::Gray))
            };
            menu.push(Line::from(line));
        }
        frame.render_widget(Paragraph::new(menu).alignment(Alignment::Center), chunks[1]);

        let version = Paragraph::new(format!("v{}", env!("CARGO_PKG_VERSION")))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(version, chunks[2]);
    }

    fn render_instructions(&self, frame: &mut Frame) {
        let mut text: Vec<Line> = INSTRUCTIONS.iter().map(|l| Line::from(*l)).collect();
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            "Press [Enter] or [Esc] to return",
            Style::default().fg(Color::Gray),
        )));

        let para = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title(" Instructions "));
        frame.render_widget(para, centered_rect(70, 60, frame.area()));
    }

    fn render_playing(&self, frame: &mut Frame, session: &Session) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(MESSAGE_PANEL_HEIGHT)])
            .split(frame.area());
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(SIDEBAR_WIDTH)])
            .split(rows[0]);

        self.render_map(frame, session, top[0]);
        self.render_sidebar(frame, session, top[1]);
        self.render_messages(frame, rows[1]);
    }

    fn render_map(&self, frame: &mut Frame, session: &Session, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", session.world().level_id()))
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);

        let viewport = session.viewport();
        let camera = session.camera();
        let left = camera.x / viewport.tile_size;
        let top = camera.y / viewport.tile_size;
        let cols = viewport.columns.min(inner.width as i32);
        let rows = viewport.rows.min(inner.height as i32);

        let world = session.world();
        let by_cell: HashMap<Position, &Entity> =
            world.entities().iter().map(|e| (e.position, e)).collect();
        let player = session.player().position;

        let mut lines = Vec::with_capacity(rows.max(0) as usize);
        for row in top..top + rows {
            let mut spans = Vec::with_capacity(cols.max(0) as usize);
            for col in left..left + cols {
                let pos = Position::new(row, col);
                let span = if pos == player {
                    Span::styled(
                        "@",
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    )
                } else if let Some(entity) = by_cell.get(&pos) {
                    Span::styled(entity.symbol.to_string(), Style::default().fg(entity_color(entity)))
                } else {
                    match world.grid().tile(pos) {
                        Some(tile) => {
                            let (r, g, b) = tile.fg_color();
                            Span::styled(tile.glyph().to_string(), Style::default().fg(Color::Rgb(r, g, b)))
                        }
                        None => Span::raw(" "),
                    }
                };
                spans.push(span);
            }
            lines.push(Line::from(spans));
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_sidebar(&self, frame: &mut Frame, session: &Session, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Status ")
            .border_style(Style::default().fg(Color::DarkGray));

        let player = session.player();
        let progression = session.progression();
        let health_color = if player.health() * 3 <= MAX_HEALTH { Color::Red } else { Color::Green };

        let mut lines = vec![
            Line::from(format!(
                "Level {}/{}",
                session.level_index() + 1,
                progression.level_count()
            )),
            Line::from(format!("Turn {}", session.turn())),
            Line::from(""),
            Line::from(Span::styled(
                format!("Health   {}/{}", player.health(), MAX_HEALTH),
                Style::default().fg(health_color),
            )),
            Line::from(format!("Strength {}", player.strength)),
            Line::from(format!("Force    {}/{}", player.force.current, player.force.max)),
            Line::from(format!(
                "Weapon   {}",
                player.weapon.as_ref().map(|w| w.name.as_str()).unwrap_or("none")
            )),
            Line::from(""),
            Line::from(Span::styled("Inventory", Style::default().add_modifier(Modifier::BOLD))),
        ];

        if player.inventory.is_empty() {
            lines.push(Line::from(Span::styled("  empty", Style::default().fg(Color::DarkGray))));
        }
        for (name, count) in player.inventory.iter() {
            lines.push(Line::from(format!("  {} x{}", name, count)));
        }

        if !session.effects().is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Effects", Style::default().add_modifier(Modifier::BOLD))));
            for effect in session.effects().effects() {
                lines.push(Line::from(Span::styled(
                    format!(
                        "  {} {} ({})",
                        effect.kind.name(),
                        effect.attribute.name(),
                        effect.remaining
                    ),
                    Style::default().fg(Color::Magenta),
                )));
            }
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_messages(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Messages ")
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);

        let lines: Vec<Line> = self
            .messages
            .recent(inner.height as usize)
            .map(|text| Line::from(Span::styled(text.to_string(), Style::default().fg(Color::Gray))))
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_game_over(&self, frame: &mut Frame, session: &Session) {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "YOU HAVE FALLEN",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("Reached level {}", session.level_index() + 1)),
            Line::from(format!("Survived {} turns", session.turn())),
            Line::from(""),
            Line::from(Span::styled("Press [Enter] to continue", Style::default().fg(Color::Gray))),
        ];

        let para = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(para, frame.area());
    }

    fn render_victory(&self, frame: &mut Frame) {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "VICTORY",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("You escaped the crypt!"),
            Line::from(""),
            Line::from(Span::styled("Press [Enter] to continue", Style::default().fg(Color::Gray))),
        ];

        let para = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(para, frame.area());
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

fn entity_color(entity: &Entity) -> Color {
    match entity.kind {
        EntityKind::Key => Color::Yellow,
        EntityKind::Door => Color::Rgb(150, 100, 50),
        EntityKind::Zombie(_) => Color::Green,
        EntityKind::Potion(_) => Color::Magenta,
        EntityKind::Weapon(_) => Color::Cyan,
        EntityKind::Teleport { .. } => Color::LightBlue,
        EntityKind::Trap => Color::Red,
        EntityKind::Healer => Color::LightGreen,
        EntityKind::Thief => Color::LightRed,
        EntityKind::Generic => Color::Gray,
    }
}

/// Create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use ratatui::{backend::TestBackend, Terminal};
    use crate::config::GameConfig;
    use crate::data::{LevelData, MemoryLevelSource, RawComponent};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    fn game_in_play() -> Game {
        let level = LevelData {
            id: String::new(),
            structure: vec!["#####".into(), "#...#".into(), "#####".into()],
            components: vec![RawComponent::new("H", 1, 1), RawComponent::new("K", 1, 2)],
        };
        let config = GameConfig { levels: vec!["one".into()], seed: Some(3), ..GameConfig::default() };
        let mut game = Game::new(config, MemoryLevelSource::new().with_level("one", level)).unwrap();
        game.tick(&InputState::confirm(), Duration::ZERO).unwrap();
        game.tick(&InputState::confirm(), Duration::ZERO).unwrap();
        game
    }

    #[test]
    fn test_keys_accumulate_until_taken() {
        let mut app = App::new();
        assert!(!app.handle_input(key(KeyCode::Left)));
        assert!(!app.handle_input(key(KeyCode::Enter)));
        let input = app.take_input();
        assert!(input.left && input.confirm);
        assert!(!app.take_input().any());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new();
        assert!(app.handle_input(key(KeyCode::Char('q'))));
        assert!(app.handle_input(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!app.handle_input(key(KeyCode::Esc)));
        assert!(app.take_input().cancel);
    }

    #[test]
    fn test_events_are_logged() {
        let mut app = App::new();
        app.record(&[GameEvent::KeyFound, GameEvent::AlreadyHealthy]);
        let lines: Vec<&str> = app.messages().recent(2).collect();
        assert_eq!(lines, vec!["Found a shiny new key", "You are already in perfect health"]);
    }

    #[test]
    fn test_menu_renders_items() {
        let mut game = Game::new(GameConfig::default(), MemoryLevelSource::new()).unwrap();
        game.tick(&InputState::confirm(), Duration::ZERO).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        let app = App::new();
        terminal.draw(|frame| app.render(frame, &game)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Start Game"));
        assert!(text.contains("Instructions"));
    }

    #[test]
    fn test_play_screen_shows_player_and_hud() {
        let game = game_in_play();
        assert_eq!(game.mode(), GameMode::Play);

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let app = App::new();
        terminal.draw(|frame| app.render(frame, &game)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("#@K.#"));
        assert!(text.contains("Health   10/10"));
    }
}
