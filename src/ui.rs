use std::io::stdout;

use color_eyre::eyre::{
    Result,
    eyre,
};
use crossterm::event::{
    self,
    Event,
    KeyCode,
    KeyEvent,
    KeyEventKind,
};
use crossterm::terminal::{
    disable_raw_mode,
    enable_raw_mode,
};
use itertools::Itertools;
use ratatui::prelude::*;
use ratatui::widgets::*;
use tokio::sync::mpsc;
use unicode_width::UnicodeWidthChar;

use crate::chat::{
    ChatMessage,
    Role,
};
use crate::games::creative::{
    CANVAS_HEIGHT,
    CANVAS_WIDTH,
    CreativeStudio,
    PALETTE,
};
use crate::games::fish::Species;
use crate::games::slots::Symbol;
use crate::session::GameView;

/// Headline game labels offered on the landing screen. The label is pure
/// identity; every session still starts in the lobby.
pub const LANDING_GAMES: &[&str] = &[
    "Ocean King",
    "Dragon Slots",
    "Nano Studio",
    "Red Hot Chili 7s",
    "Wild Buffalo",
];

pub enum UserEvent {
    Quit,
    Redraw,
    Login { username: String, game: String },
    SelectGame(GameView),
    GoBack,
    OpenChat,
    CloseChat,
    ChatChar(char),
    ChatBackspace,
    SendChat,
    SpinSlots,
    RaiseBet,
    LowerBet,
    AimUp,
    AimDown,
    Shoot,
    MoveCursor(isize, isize),
    Paint,
    CycleColor,
    ClearCanvas,
    ExportTranscript,
}

#[derive(Clone, Debug, Default)]
enum Mode {
    #[default]
    Normal,
    QuitModal,
}

#[derive(Clone, Debug)]
struct LandingForm {
    username: String,
    game_idx: usize,
}

pub struct UiState {
    mode: Mode,
    landing: LandingForm,
    terminal: Option<Terminal<CrosstermBackend<std::io::Stdout>>>,
}

impl UiState {
    /// `username` pre-fills the landing form; without one a guest name is
    /// suggested so a player can enter with a single keypress.
    pub fn new(username: Option<String>) -> Self {
        let username = username.unwrap_or_else(fakeit::name::first);
        Self {
            mode: Mode::Normal,
            landing: LandingForm {
                username,
                game_idx: 0,
            },
            terminal: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SlotsView {
    pub reels: [Symbol; 3],
    pub bet: u64,
    pub last_win: u64,
    pub spins: u64,
}

#[derive(Clone, Debug)]
pub struct FishView {
    pub lanes: Vec<Species>,
    pub aim: usize,
    pub shots: u64,
    pub caught_value: u64,
    pub last_result: Option<(Species, bool)>,
}

#[derive(Clone, Debug)]
pub struct StudioView {
    pub rows: Vec<String>,
    pub cursor: (usize, usize),
    pub color_name: &'static str,
    pub painted: usize,
}

impl StudioView {
    pub fn from_studio(studio: &CreativeStudio) -> Self {
        let rows = (0..CANVAS_HEIGHT)
            .map(|y| {
                (0..CANVAS_WIDTH)
                    .map(|x| match studio.cell(x, y) {
                        Some(color) => PALETTE[color as usize].1,
                        None => '.',
                    })
                    .collect()
            })
            .collect();
        Self {
            rows,
            cursor: studio.cursor,
            color_name: PALETTE[studio.color as usize].0,
            painted: studio.painted(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppSnapshot {
    pub has_entered: bool,
    pub username: String,
    pub selected_game: String,
    pub view: GameView,
    pub balance: u64,
    pub jackpot: u64,
    pub chat_open: bool,
    pub chat_input: String,
    pub assistant_busy: bool,
    pub messages: Vec<ChatMessage>,
    pub status: String,
    pub errors: Vec<String>,
    pub slots: SlotsView,
    pub fish: Option<FishView>,
    pub studio: StudioView,
}

pub fn terminal_enter(state: &mut UiState) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;
    // Create a single persistent Terminal to preserve buffers across draws
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    state.terminal = Some(terminal);
    Ok(())
}

pub fn terminal_exit() -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::event::DisableMouseCapture,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    Ok(())
}

pub type InputEventReceiver = mpsc::UnboundedReceiver<Event>;

/// Blocking crossterm reads happen on a dedicated thread; the loop selects
/// on the receiving end alongside the reply channel.
pub fn input_event_stream() -> InputEventReceiver {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
    rx
}

pub async fn next_raw_event(events: &mut InputEventReceiver) -> Result<Event> {
    events
        .recv()
        .await
        .ok_or_else(|| eyre!("input event stream closed"))
}

/// Maps a raw terminal event onto a user intent, given what is currently
/// on screen. Returns None for events the current screen ignores.
pub fn interpret_event(
    state: &mut UiState,
    snap: &AppSnapshot,
    raw: Event,
) -> Option<UserEvent> {
    let Event::Key(key) = raw else {
        return Some(UserEvent::Redraw);
    };
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if let Mode::QuitModal = state.mode {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(UserEvent::Quit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                state.mode = Mode::Normal;
                Some(UserEvent::Redraw)
            }
            _ => None,
        };
    }

    if !snap.has_entered {
        return interpret_landing(state, key);
    }

    if snap.chat_open {
        return match key.code {
            KeyCode::Esc => Some(UserEvent::CloseChat),
            KeyCode::Enter => Some(UserEvent::SendChat),
            KeyCode::Backspace => Some(UserEvent::ChatBackspace),
            KeyCode::Char(c) => Some(UserEvent::ChatChar(c)),
            _ => None,
        };
    }

    match snap.view {
        GameView::Lobby => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                state.mode = Mode::QuitModal;
                Some(UserEvent::Redraw)
            }
            KeyCode::Char('c') => Some(UserEvent::OpenChat),
            KeyCode::Char('1') => Some(UserEvent::SelectGame(GameView::Fish)),
            KeyCode::Char('2') => Some(UserEvent::SelectGame(GameView::Slots)),
            KeyCode::Char('3') => Some(UserEvent::SelectGame(GameView::Creative)),
            KeyCode::Char('e') => Some(UserEvent::ExportTranscript),
            _ => None,
        },
        GameView::Slots => match key.code {
            KeyCode::Esc | KeyCode::Backspace => Some(UserEvent::GoBack),
            KeyCode::Char('c') => Some(UserEvent::OpenChat),
            KeyCode::Char(' ') => Some(UserEvent::SpinSlots),
            KeyCode::Up | KeyCode::Char('+') => Some(UserEvent::RaiseBet),
            KeyCode::Down | KeyCode::Char('-') => Some(UserEvent::LowerBet),
            _ => None,
        },
        GameView::Fish => match key.code {
            KeyCode::Esc | KeyCode::Backspace => Some(UserEvent::GoBack),
            KeyCode::Char('c') => Some(UserEvent::OpenChat),
            KeyCode::Up => Some(UserEvent::AimUp),
            KeyCode::Down => Some(UserEvent::AimDown),
            KeyCode::Char(' ') => Some(UserEvent::Shoot),
            _ => None,
        },
        GameView::Creative => match key.code {
            KeyCode::Esc => Some(UserEvent::GoBack),
            KeyCode::Char('c') => Some(UserEvent::OpenChat),
            KeyCode::Up => Some(UserEvent::MoveCursor(0, -1)),
            KeyCode::Down => Some(UserEvent::MoveCursor(0, 1)),
            KeyCode::Left => Some(UserEvent::MoveCursor(-1, 0)),
            KeyCode::Right => Some(UserEvent::MoveCursor(1, 0)),
            KeyCode::Char(' ') => Some(UserEvent::Paint),
            KeyCode::Char('x') => Some(UserEvent::CycleColor),
            KeyCode::Char('r') => Some(UserEvent::ClearCanvas),
            _ => None,
        },
    }
}

fn interpret_landing(state: &mut UiState, key: KeyEvent) -> Option<UserEvent> {
    match key.code {
        KeyCode::Esc => Some(UserEvent::Quit),
        KeyCode::Up => {
            state.landing.game_idx = state.landing.game_idx.saturating_sub(1);
            Some(UserEvent::Redraw)
        }
        KeyCode::Down | KeyCode::Tab => {
            state.landing.game_idx = (state.landing.game_idx + 1) % LANDING_GAMES.len();
            Some(UserEvent::Redraw)
        }
        KeyCode::Backspace => {
            state.landing.username.pop();
            Some(UserEvent::Redraw)
        }
        KeyCode::Enter => {
            if state.landing.username.trim().is_empty() {
                return Some(UserEvent::Redraw);
            }
            let game = LANDING_GAMES[state.landing.game_idx];
            Some(UserEvent::Login {
                username: state.landing.username.trim().to_string(),
                game: game.to_string(),
            })
        }
        KeyCode::Char(c) => {
            state.landing.username.push(c);
            Some(UserEvent::Redraw)
        }
        _ => None,
    }
}

pub fn draw(state: &mut UiState, snap: &AppSnapshot) -> Result<()> {
    if let Some(mut term) = state.terminal.take() {
        term.draw(|f| ui(f, state, snap))?;
        state.terminal = Some(term);
    }
    Ok(())
}

fn ui(f: &mut Frame, state: &UiState, snap: &AppSnapshot) {
    f.render_widget(Clear, f.area());
    if !snap.has_entered {
        draw_landing(f, state);
        return;
    }
    match snap.view {
        GameView::Lobby => draw_lobby(f, snap),
        GameView::Fish => draw_fish(f, snap),
        GameView::Slots => draw_slots(f, snap),
        GameView::Creative => draw_creative(f, snap),
    }
    if snap.chat_open {
        draw_chat_overlay(f, snap);
    }
    if let Mode::QuitModal = state.mode {
        let area = centered_rect(40, 20, f.area());
        let block = Block::default().borders(Borders::ALL).title("Confirm Quit");
        let p = Paragraph::new("Leave the lobby? (Y/N)");
        f.render_widget(Clear, area);
        f.render_widget(block.clone(), area);
        f.render_widget(p, block.inner(area));
    }
}

fn draw_landing(f: &mut Frame, state: &UiState) {
    let area = centered_rect(50, 60, f.area());
    let block = Block::default()
        .borders(Borders::ALL)
        .title("RiverSweeps Lobby");
    let mut lines = vec![
        Line::from(""),
        Line::from(format!("Player name: {}_", state.landing.username)),
        Line::from(""),
        Line::from("Pick your game (Up/Down):"),
    ];
    for (i, label) in LANDING_GAMES.iter().enumerate() {
        let cur = if i == state.landing.game_idx { ">" } else { " " };
        if i == state.landing.game_idx {
            lines.push(Line::styled(
                format!("{cur} {label}"),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
        } else {
            lines.push(Line::from(format!("{cur} {label}")));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from("Enter=play  Esc=quit"));
    f.render_widget(Clear, area);
    f.render_widget(block.clone(), area);
    f.render_widget(Paragraph::new(lines), block.inner(area));
}

fn header_line(snap: &AppSnapshot) -> String {
    format!(
        "RiverSweeps | {} | Player: {} | Chips: {} | Jackpot: ${}",
        snap.selected_game,
        snap.username.to_uppercase(),
        snap.balance,
        snap.jackpot
    )
}

fn draw_frame_chrome(f: &mut Frame, snap: &AppSnapshot, help: &str) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(5),    // body
            Constraint::Length(3), // status
            Constraint::Length(3), // help
        ])
        .split(f.area());

    let header = Paragraph::new(header_line(snap))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(header, chunks[0]);

    let mut status_lines = vec![Line::from(snap.status.clone())];
    for e in &snap.errors {
        status_lines.push(Line::styled(e.clone(), Style::default().fg(Color::Red)));
    }
    let status = Paragraph::new(status_lines)
        .block(Block::default().borders(Borders::ALL).title("Last Action"));
    f.render_widget(status, chunks[2]);

    let help = Paragraph::new(help)
        .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(help, chunks[3]);

    chunks[1]
}

fn draw_lobby(f: &mut Frame, snap: &AppSnapshot) {
    let body = draw_frame_chrome(
        f,
        snap,
        "1 Ocean King | 2 Dragon Slots | 3 Nano Studio | c chat | e save transcript | q/Esc quit",
    );
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(body);

    let banner = Paragraph::new(vec![
        Line::from("LIVE PROGRESSIVE JACKPOT"),
        Line::styled(
            format!("${}", snap.jackpot),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(banner, rows[0]);

    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(rows[1]);
    let games = [
        ("1. Ocean King", "Fish hunt. Bounties up to 5000 chips."),
        ("2. Dragon Slots", "Triple sevens take the pot."),
        ("3. Nano Studio", "Paint something. The Boss is watching."),
    ];
    for (rect, (title, blurb)) in tiles.iter().zip(games) {
        let tile = Paragraph::new(blurb)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(tile, *rect);
    }
}

fn draw_slots(f: &mut Frame, snap: &AppSnapshot) {
    let body = draw_frame_chrome(
        f,
        snap,
        "Space spin | Up/+ raise bet | Down/- lower bet | c chat | Esc back to lobby",
    );
    let reels = snap.slots.reels.iter().map(|s| s.glyph()).join("  |  ");
    let lines = vec![
        Line::from(""),
        Line::styled(
            format!("[  {reels}  ]"),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!("Bet: {} chips", snap.slots.bet)),
        Line::from(format!("Last win: {}", snap.slots.last_win)),
        Line::from(format!("Spins: {}", snap.slots.spins)),
    ];
    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Dragon Slots"));
    f.render_widget(p, body);
}

fn draw_fish(f: &mut Frame, snap: &AppSnapshot) {
    let body = draw_frame_chrome(
        f,
        snap,
        "Up/Down aim | Space shoot (50 chips) | c chat | Esc back to lobby",
    );
    let mut lines = Vec::new();
    if let Some(fish) = &snap.fish {
        for (i, species) in fish.lanes.iter().enumerate() {
            let cur = if i == fish.aim { ">" } else { " " };
            let text = format!(
                "{cur} Lane {} | {:<10} | bounty {}",
                i + 1,
                species.label(),
                species.bounty()
            );
            if i == fish.aim {
                lines.push(Line::styled(
                    text,
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ));
            } else {
                lines.push(Line::from(text));
            }
        }
        lines.push(Line::from(""));
        lines.push(Line::from(format!(
            "Shots: {} | Bounty collected: {}",
            fish.shots, fish.caught_value
        )));
        if let Some((species, caught)) = fish.last_result {
            let verdict = if caught { "CAUGHT" } else { "missed" };
            lines.push(Line::from(format!("Last shot: {} {}", species.label(), verdict)));
        }
    } else {
        lines.push(Line::from("The tank is filling..."));
    }
    let p = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Ocean King"));
    f.render_widget(p, body);
}

fn draw_creative(f: &mut Frame, snap: &AppSnapshot) {
    let body = draw_frame_chrome(
        f,
        snap,
        "Arrows move | Space paint | x color | r clear | c chat | Esc back to lobby",
    );
    let mut lines = Vec::new();
    for (y, row) in snap.studio.rows.iter().enumerate() {
        if y == snap.studio.cursor.1 {
            // Mark the cursor cell inside the row.
            let x = snap.studio.cursor.0;
            let marked: String = row
                .chars()
                .enumerate()
                .map(|(i, c)| if i == x { '\u{25c6}' } else { c })
                .collect();
            lines.push(Line::styled(marked, Style::default().fg(Color::Cyan)));
        } else {
            lines.push(Line::from(row.clone()));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "Brush: {} | Painted: {}/{}",
        snap.studio.color_name,
        snap.studio.painted,
        CANVAS_WIDTH * CANVAS_HEIGHT
    )));
    let p = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Nano Studio"));
    f.render_widget(p, body);
}

fn draw_chat_overlay(f: &mut Frame, snap: &AppSnapshot) {
    let area = centered_rect(55, 70, f.area());
    let block = Block::default()
        .borders(Borders::ALL)
        .title("PIT BOSS * ONLINE");
    f.render_widget(Clear, area);
    f.render_widget(block.clone(), area);
    let inner = block.inner(area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(inner);

    let width = chunks[0].width.saturating_sub(2).max(10) as usize;
    let mut lines: Vec<Line> = Vec::new();
    for m in &snap.messages {
        let prefix = match m.role {
            Role::Player => "you",
            Role::Assistant => "boss",
        };
        for (i, piece) in wrap_text(&m.text, width.saturating_sub(6)).into_iter().enumerate() {
            let text = if i == 0 {
                format!("{prefix:>4}: {piece}")
            } else {
                format!("      {piece}")
            };
            match m.role {
                Role::Player => lines.push(Line::from(text)),
                Role::Assistant => {
                    lines.push(Line::styled(text, Style::default().fg(Color::Magenta)));
                }
            }
        }
    }
    if snap.assistant_busy {
        lines.push(Line::styled(
            "Typing...",
            Style::default().fg(Color::DarkGray),
        ));
    }
    // Keep the tail visible.
    let visible = chunks[0].height as usize;
    let skip = lines.len().saturating_sub(visible);
    let transcript = Paragraph::new(lines.into_iter().skip(skip).collect::<Vec<_>>());
    f.render_widget(transcript, chunks[0]);

    let input = Paragraph::new(format!("> {}_", snap.chat_input))
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(input, chunks[1]);
}

/// Greedy wrap on display width; long unbroken words are split hard.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(4);
    let mut out = Vec::new();
    let mut line = String::new();
    let mut line_w = 0usize;
    for word in text.split_whitespace() {
        let word_w: usize = word.chars().map(|c| c.width().unwrap_or(1)).sum();
        if line_w > 0 && line_w + 1 + word_w > width {
            out.push(std::mem::take(&mut line));
            line_w = 0;
        }
        if word_w > width {
            for c in word.chars() {
                let w = c.width().unwrap_or(1);
                if line_w + w > width {
                    out.push(std::mem::take(&mut line));
                    line_w = 0;
                }
                line.push(c);
                line_w += w;
            }
            continue;
        }
        if line_w > 0 {
            line.push(' ');
            line_w += 1;
        }
        line.push_str(word);
        line_w += word_w;
    }
    if !line.is_empty() {
        out.push(line);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

fn centered_rect(w_percent: u16, h_percent: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h_percent) / 2),
            Constraint::Percentage(h_percent),
            Constraint::Percentage((100 - h_percent) / 2),
        ])
        .split(r);

    let vertical = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w_percent) / 2),
            Constraint::Percentage(w_percent),
            Constraint::Percentage((100 - w_percent) / 2),
        ])
        .split(popup_layout[1]);

    vertical[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_text__respects_width_and_splits_long_words() {
        let wrapped = wrap_text("the pit boss never sleeps", 10);
        assert!(wrapped.iter().all(|l| l.chars().count() <= 10));
        let hard = wrap_text("aaaaaaaaaaaaaaaaaaaa", 8);
        assert!(hard.len() >= 3);
    }
}
