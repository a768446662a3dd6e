//! Terminal UI rendering with ratatui

use blockfall::settings::VisualSettings;
use blockfall::{Cell, GameState, Snapshot, TetrominoType};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const EMPTY: &str = "  ";
const HOLD_WIDTH: u16 = 12;
const SIDE_WIDTH: u16 = 16;

/// Per-frame presentation state that is not part of the engine
#[derive(Debug, Clone, Copy, Default)]
pub struct Effects {
    /// Highlight the board border after a line clear
    pub flash: bool,
}

fn cells_to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

fn piece_color(kind: TetrominoType) -> Color {
    let (r, g, b) = kind.rgb();
    Color::Rgb(r, g, b)
}

/// Render a whole frame from a session snapshot
pub fn render_game(frame: &mut Frame, snap: &Snapshot, visual: &VisualSettings, fx: Effects) {
    let area = frame.area();

    // Board is 2 terminal columns per cell plus borders
    let board_width = cells_to_u16(snap.cols()).saturating_mul(2).saturating_add(2);
    let board_height = cells_to_u16(snap.rows()).saturating_add(2);
    let game_area = center_rect(
        area,
        HOLD_WIDTH.saturating_add(board_width).saturating_add(SIDE_WIDTH),
        board_height,
    );

    // Create main layout: hold | board | next + stats
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(HOLD_WIDTH),
            Constraint::Length(board_width),
            Constraint::Length(SIDE_WIDTH),
        ])
        .split(game_area);

    let (block_char, _) = visual.block_chars();
    render_hold(frame, main_layout[0], snap, block_char);
    render_board(frame, main_layout[1], snap, visual, fx);

    // Right side: next queue and stats
    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(cells_to_u16(snap.next.len()) * 3 + 2),
            Constraint::Min(6),
        ])
        .split(main_layout[2]);

    render_next_queue(frame, right_layout[0], &snap.next, block_char);
    render_stats(frame, right_layout[1], snap);

    // Overlays
    match snap.state {
        GameState::Idle => render_overlay(frame, area, "BLOCKFALL", "Space or Enter to start"),
        GameState::Paused => render_overlay(frame, area, "PAUSED", "Press P to resume"),
        GameState::GameOver => {
            let subtitle = format!("Score {} - Space to retry", snap.score);
            render_overlay(frame, area, "GAME OVER", &subtitle);
        }
        GameState::Running => {}
    }
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the hold piece box
fn render_hold(frame: &mut Frame, area: Rect, snap: &Snapshot, block_char: &str) {
    // Dim the border while hold is spent for this piece
    let border = if snap.can_hold { Color::Gray } else { Color::DarkGray };
    let block = Block::default()
        .title(" HOLD ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(kind) = snap.hold {
        render_mini_piece(frame, inner, kind, block_char);
    }
}

/// Render the next piece queue
fn render_next_queue(frame: &mut Frame, area: Rect, queue: &[TetrominoType], block_char: &str) {
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if queue.is_empty() {
        return;
    }

    let piece_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3); queue.len()])
        .split(inner);

    for (slot, &kind) in piece_areas.iter().zip(queue) {
        render_mini_piece(frame, *slot, kind, block_char);
    }
}

/// Render a small piece preview (for hold and next queue)
fn render_mini_piece(frame: &mut Frame, area: Rect, kind: TetrominoType, block_char: &str) {
    if area.height < 1 || area.width < 4 {
        return;
    }

    let color = piece_color(kind);
    let shape = kind.base_shape();
    let lines: Vec<Line> = shape
        .rows()
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|&filled| {
                    if filled {
                        Span::styled(block_char, Style::default().fg(color))
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Render the game board
fn render_board(frame: &mut Frame, area: Rect, snap: &Snapshot, visual: &VisualSettings, fx: Effects) {
    let (block_char, ghost_char) = visual.block_chars();

    let border = if fx.flash { Color::Yellow } else { Color::White };
    let block = Block::default()
        .title(format!(" LEVEL {} ", snap.level))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let active: Vec<(i32, i32)> = snap
        .active
        .as_ref()
        .map(|piece| piece.cells().collect())
        .unwrap_or_default();
    let ghost: Vec<(i32, i32)> = match (&snap.active, snap.ghost_y) {
        (Some(piece), Some(ghost_y)) if visual.show_ghost && ghost_y != piece.y => {
            piece.cells_at(ghost_y).collect()
        }
        _ => Vec::new(),
    };
    let active_color = snap.active.as_ref().map(|piece| piece_color(piece.kind));

    let lines: Vec<Line> = snap
        .board
        .iter()
        .enumerate()
        .map(|(y, row)| {
            let spans: Vec<Span> = row
                .iter()
                .enumerate()
                .map(|(x, cell)| {
                    let pos = (x as i32, y as i32);
                    match (active_color, cell) {
                        (Some(color), _) if active.contains(&pos) => {
                            Span::styled(block_char, Style::default().fg(color))
                        }
                        (_, Cell::Filled(kind)) => {
                            Span::styled(block_char, Style::default().fg(piece_color(*kind)))
                        }
                        (Some(color), Cell::Empty) if ghost.contains(&pos) => {
                            Span::styled(ghost_char, Style::default().fg(color).dim())
                        }
                        _ => Span::raw(EMPTY),
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render stats panel
fn render_stats(frame: &mut Frame, area: Rect, snap: &Snapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let stat = |label: &'static str, value: String, color: Color| {
        [
            Line::from(Span::styled(label, Style::default().fg(Color::Gray))),
            Line::from(Span::styled(value, Style::default().fg(color).bold())),
            Line::raw(""),
        ]
    };

    let lines: Vec<Line> = [
        stat("SCORE", snap.score.to_string(), Color::Yellow),
        stat("BEST", snap.best.to_string(), Color::Magenta),
        stat("LINES", snap.lines.to_string(), Color::Green),
        stat("LEVEL", snap.level.to_string(), Color::Cyan),
    ]
    .into_iter()
    .flatten()
    .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render an overlay (for start/pause/game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = (subtitle.len() as u16 + 4).max(24);
    let popup_height = 5u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title.to_string(), Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle.to_string(), Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
