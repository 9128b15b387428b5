use std::io::{self, stdout, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        MouseButton, MouseEventKind, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen, SetTitle,
    },
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use blockfall::input::{key_to_command, KeyRepeat, SwipeTracker};
use blockfall::{
    App, BlockColor, CellState, Command, Game, GameConfig, GameEvent, InputSource, Renderer,
    ScoreSink, View, GRID_HEIGHT, GRID_WIDTH,
};

// ============================================================================
// Command Line
// ============================================================================

/// Falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "blockfall",
    version,
    about = "Falling-block puzzle in the terminal.",
    long_about = "Stack falling pieces and clear full rows for 100 points each.\n\n\
        CONTROLS:\n  Left/Right or h/l  Move      Up or k    Rotate\n  \
        Down or j          Soft drop Space      Hard drop\n  q / Esc            Quit\n\n\
        Dragging with the left mouse button works as a swipe: sideways moves, \
        down drops, up rotates."
)]
struct Args {
    /// Milliseconds between automatic drops.
    #[arg(long, default_value = "500", value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    drop_interval_ms: u64,

    /// Minimum delay between repeats of a held move key.
    #[arg(long, default_value = "100", value_name = "MS")]
    key_repeat_ms: u64,

    /// Render and input poll cadence.
    #[arg(long, default_value = "16", value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    frame_ms: u64,

    /// Seed for the piece generator (same seed, same pieces).
    #[arg(long)]
    seed: Option<u64>,

    /// Disable mouse-drag controls.
    #[arg(long)]
    no_mouse: bool,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            drop_interval_ms: self.drop_interval_ms,
            key_repeat_ms: self.key_repeat_ms,
            frame_ms: self.frame_ms,
            seed: self.seed,
            mouse: !self.no_mouse,
        }
    }
}

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const EMPTY_CHAR: &str = "  ";
const PREVIEW_SIZE: usize = 4;

fn block_color(color: BlockColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

fn event_label(event: &GameEvent) -> String {
    match event {
        GameEvent::PieceMoved => "moved".to_string(),
        GameEvent::PieceRotated => "rotated".to_string(),
        GameEvent::PieceLocked => "locked".to_string(),
        GameEvent::LinesCleared(n) => format!("{n} line(s)!"),
        GameEvent::PieceSpawned => "new piece".to_string(),
        GameEvent::GameOver => "game over".to_string(),
    }
}

// ============================================================================
// Rendering
// ============================================================================

struct TerminalRenderer {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Renderer for TerminalRenderer {
    fn draw(&mut self, view: &View<'_>) -> blockfall::Result<()> {
        self.terminal.draw(|frame| render(frame, view))?;
        Ok(())
    }
}

fn render(frame: &mut Frame, view: &View<'_>) {
    let area = frame.size();
    render_game(frame, view, area);
    if view.snapshot.game_over {
        render_game_over(frame, view, area);
    }
}

fn render_game(frame: &mut Frame, view: &View<'_>, area: Rect) {
    let grid_display_width = (GRID_WIDTH as u16 * CELL_WIDTH) + 2;
    let grid_display_height = GRID_HEIGHT as u16 + 2;
    let side_width = 16;
    let total_width = grid_display_width + side_width;
    let total_height = grid_display_height + 2;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);

    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(side_width),
    ])
    .split(vertical[0]);

    let side = Layout::vertical([Constraint::Length(6), Constraint::Fill(1)]).split(horizontal[1]);

    render_grid(frame, view, horizontal[0]);
    render_preview(frame, view, side[0]);
    render_info(frame, view, side[1]);

    let controls = Paragraph::new(Line::from("←→ Move | ↑ Rotate | ↓ Drop | Space Hard | Q Quit"))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(controls, vertical[1]);
}

fn render_grid(frame: &mut Frame, view: &View<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Blockfall ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = view
        .snapshot
        .render_grid()
        .iter()
        .map(|row| {
            Line::from(
                row.iter()
                    .map(|cell| match cell {
                        CellState::Empty => Span::raw(EMPTY_CHAR),
                        CellState::Filled(color) => {
                            Span::styled(BLOCK_CHAR, Style::default().fg(block_color(*color)))
                        }
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_preview(frame: &mut Frame, view: &View<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Next ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let next = view.snapshot.next_piece;
    let (offset_x, offset_y) = next.shape.preview_offset(PREVIEW_SIZE);
    let style = Style::default().fg(block_color(next.color));

    // Offsets are in half cells: one column per half cell, one row per two.
    let mut lines: Vec<Line> = vec![Line::from(""); offset_y / 2];
    for row in next.shape.rows() {
        let mut spans = vec![Span::raw(" ".repeat(offset_x))];
        spans.extend(row.iter().map(|&filled| {
            if filled {
                Span::styled(BLOCK_CHAR, style)
            } else {
                Span::raw(EMPTY_CHAR)
            }
        }));
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_info(frame: &mut Frame, view: &View<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let last = view.last_event.map(event_label).unwrap_or_default();
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Score", Style::default().fg(Color::Yellow))),
        Line::from(format!("{}", view.snapshot.score)),
        Line::from(""),
        Line::from(Span::styled("Lines", Style::default().fg(Color::Cyan))),
        Line::from(format!("{}", view.lines_cleared)),
        Line::from(""),
        Line::from(Span::styled(last, Style::default().fg(Color::DarkGray))),
    ];

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_game_over(frame: &mut Frame, view: &View<'_>, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Game Over!", Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(format!("Score: {}", view.snapshot.score)),
        Line::from(""),
        Line::from(Span::styled(
            "Press Q to quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(22, 8, area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(paragraph, popup_area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Input
// ============================================================================

struct TerminalInput {
    repeat: KeyRepeat,
    swipe: SwipeTracker,
}

impl InputSource for TerminalInput {
    fn next_command(&mut self, timeout: Duration) -> blockfall::Result<Option<Command>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        let command = match event::read()? {
            Event::Key(key) => key_to_command(key)
                .filter(|&command| self.repeat.accept(command, key.kind, Instant::now())),
            Event::Mouse(mouse) => {
                let (x, y) = (i32::from(mouse.column), i32::from(mouse.row));
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        self.swipe.begin(x, y);
                        None
                    }
                    MouseEventKind::Drag(MouseButton::Left) => self.swipe.drag(x, y),
                    MouseEventKind::Up(MouseButton::Left) => {
                        self.swipe.end();
                        None
                    }
                    _ => None,
                }
            }
            _ => None,
        };
        Ok(command)
    }
}

// ============================================================================
// Score Display
// ============================================================================

/// Mirrors the score into the terminal window title.
struct TitleScore;

impl ScoreSink for TitleScore {
    fn show_score(&mut self, score: u32) -> blockfall::Result<()> {
        stdout().execute(SetTitle(format!("blockfall - {score}")))?;
        Ok(())
    }
}

// ============================================================================
// Main Loop
// ============================================================================

/// Restores the terminal when dropped, including on error paths.
struct TerminalGuard {
    mouse: bool,
    key_events: bool,
}

impl TerminalGuard {
    fn enter(mouse: bool) -> io::Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        if mouse {
            stdout().execute(EnableMouseCapture)?;
        }
        // Needed for Repeat and Release kinds; without it every key is a Press.
        let key_events = supports_keyboard_enhancement().unwrap_or(false);
        if key_events {
            stdout().execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
        }
        Ok(Self { mouse, key_events })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.key_events {
            let _ = stdout().execute(PopKeyboardEnhancementFlags);
        }
        if self.mouse {
            let _ = stdout().execute(DisableMouseCapture);
        }
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.game_config();

    let _guard = TerminalGuard::enter(config.mouse).context("failed to set up terminal")?;
    let terminal =
        Terminal::new(CrosstermBackend::new(stdout())).context("failed to create terminal")?;

    let renderer = TerminalRenderer { terminal };
    let input = TerminalInput {
        repeat: KeyRepeat::new(config.key_repeat_delay()),
        swipe: SwipeTracker::new(),
    };

    let mut app = App::new(Game::with_config(&config), renderer, input, TitleScore, &config);
    app.run().context("game loop failed")?;

    Ok(())
}
