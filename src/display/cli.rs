//! Stateless board rendering for the terminal.

use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tictacterm_core::{BoardRenderer, Coordinates, DisplayData, GamePhase, MoveType, RenderError};
use tracing::instrument;

/// Board symbol of each user, by user index.
pub const SYMBOLS: [char; 10] = ['x', 'o', '#', '$', '%', '+', '?', 'V', 'H', 'f'];

const USER_COLORS: [Color; 5] = [
    Color::Blue,
    Color::Red,
    Color::Green,
    Color::Magenta,
    Color::Yellow,
];

/// Returns the board symbol of `user`.
pub fn symbol(user: usize) -> char {
    SYMBOLS.get(user).copied().unwrap_or('*')
}

/// Describes the phase for the status bar.
pub fn status_line(data: &DisplayData<'_>) -> String {
    let player = |user: usize| format!("Player {} ({})", user + 1, symbol(user));

    match data.phase {
        GamePhase::Play if data.is_board_full() => {
            "Board full, no winner. Exit twice to quit".to_string()
        }
        GamePhase::Play => format!("{} to move", player(data.next_user())),
        GamePhase::Quitting => "Quit? Exit again to confirm, any other key to resume".to_string(),
        GamePhase::Quit => "Game abandoned".to_string(),
        GamePhase::Winning => match data.winner {
            Some(winner) => format!("{} wins! Press any key to leave", player(winner)),
            None => "Game over".to_string(),
        },
        GamePhase::Win => match data.winner {
            Some(winner) => format!("{} wins!", player(winner)),
            None => "Game over".to_string(),
        },
    }
}

/// Renders the board with the cursor highlighted.
pub fn draw(frame: &mut Frame, data: &DisplayData<'_>) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(3),    // Board
            Constraint::Length(3), // Status
        ])
        .split(area);

    let title = Paragraph::new("tictacterm")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    draw_board(frame, chunks[1], data);

    let status = Paragraph::new(status_line(data))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[2]);
}

fn draw_board(frame: &mut Frame, area: Rect, data: &DisplayData<'_>) {
    let side = data.board_side;
    let width = u16::try_from(side * 4).unwrap_or(u16::MAX);
    let height = u16::try_from(side * 2).unwrap_or(u16::MAX);
    let [rows] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [board_area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(rows);

    let separator = vec!["───"; side].join("┼");
    let mut lines = Vec::with_capacity(side * 2);

    for y in 0..side {
        if y > 0 {
            lines.push(Line::styled(
                separator.clone(),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let mut spans = Vec::with_capacity(side * 2);
        for x in 0..side {
            if x > 0 {
                spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
            }
            spans.push(cell(data, Coordinates::new(x, y)));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), board_area);
}

fn cell(data: &DisplayData<'_>, at: Coordinates) -> Span<'static> {
    let (text, base_style) = match data.mark_at(at) {
        Some(user) => (
            format!(" {} ", symbol(user)),
            Style::default()
                .fg(USER_COLORS[user % USER_COLORS.len()])
                .add_modifier(Modifier::BOLD),
        ),
        None => ("   ".to_string(), Style::default().fg(Color::DarkGray)),
    };

    let style = match data.cursor() {
        Some((cursor, MoveType::SelectInvalid)) if cursor == at => base_style.bg(Color::Red),
        Some((cursor, _)) if cursor == at => base_style.bg(Color::Gray),
        _ => base_style,
    };

    Span::styled(text, style)
}

/// [`BoardRenderer`] drawing to a ratatui terminal.
pub struct CliRenderer<B: Backend> {
    terminal: Terminal<B>,
}

impl<B: Backend> CliRenderer<B> {
    /// Creates a renderer drawing to `terminal`.
    pub fn new(terminal: Terminal<B>) -> Self {
        Self { terminal }
    }

    /// Returns the terminal.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

impl<B: Backend> std::fmt::Debug for CliRenderer<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliRenderer").finish_non_exhaustive()
    }
}

impl<B: Backend> BoardRenderer for CliRenderer<B> {
    #[instrument(skip_all, fields(phase = %data.phase, moves = data.moves.len()))]
    fn render(&mut self, data: &DisplayData<'_>) -> Result<(), RenderError> {
        self.terminal
            .draw(|frame| draw(frame, data))
            .map_err(|e| RenderError::new(format!("Failed to draw board: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use tictacterm_core::UserMove;

    fn data<'a>(moves: &'a [UserMove], phase: GamePhase, winner: Option<usize>) -> DisplayData<'a> {
        DisplayData {
            phase,
            moves,
            user_id: 0,
            winner,
            players: 2,
            board_side: 3,
            display_id: "cli",
        }
    }

    fn screen(renderer: &CliRenderer<TestBackend>) -> String {
        renderer
            .terminal()
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_status_follows_phase() {
        let mark = [UserMove::new(MoveType::SelectValid, 0, Coordinates::new(0, 0))];

        assert_eq!(status_line(&data(&[], GamePhase::Play, None)), "Player 1 (x) to move");
        assert_eq!(status_line(&data(&mark, GamePhase::Play, None)), "Player 2 (o) to move");
        assert_eq!(
            status_line(&data(&mark, GamePhase::Win, Some(0))),
            "Player 1 (x) wins!"
        );
        assert!(status_line(&data(&mark, GamePhase::Quitting, None)).starts_with("Quit?"));
    }

    #[test]
    fn test_full_board_without_winner_suggests_quitting() {
        // x o x / x o o / o x x
        let owners = [0, 1, 0, 0, 1, 1, 1, 0, 0];
        let moves: Vec<_> = owners
            .iter()
            .enumerate()
            .map(|(i, &user)| {
                UserMove::new(MoveType::SelectValid, user, Coordinates::new(i % 3, i / 3))
            })
            .collect();

        assert_eq!(
            status_line(&data(&moves, GamePhase::Play, None)),
            "Board full, no winner. Exit twice to quit"
        );
        assert_eq!(
            status_line(&data(&moves[..8], GamePhase::Play, None)),
            "Player 2 (o) to move"
        );
    }

    #[test]
    fn test_renders_marks_and_status() {
        let terminal = Terminal::new(TestBackend::new(40, 14)).unwrap();
        let mut renderer = CliRenderer::new(terminal);
        let moves = [
            UserMove::new(MoveType::SelectValid, 0, Coordinates::new(0, 0)),
            UserMove::new(MoveType::SelectValid, 1, Coordinates::new(2, 2)),
        ];

        renderer
            .render(&data(&moves, GamePhase::Play, None))
            .unwrap();

        let screen = screen(&renderer);
        assert!(screen.contains("tictacterm"));
        assert!(screen.contains(" x "));
        assert!(screen.contains(" o "));
        assert!(screen.contains("───┼───┼───"));
        assert!(screen.contains("Player 1 (x) to move"));
    }

    #[test]
    fn test_board_is_centred() {
        let terminal = Terminal::new(TestBackend::new(40, 14)).unwrap();
        let mut renderer = CliRenderer::new(terminal);

        renderer.render(&data(&[], GamePhase::Play, None)).unwrap();

        // 12x6 board in the 40x8 area below the title
        let buffer = renderer.terminal().backend().buffer();
        assert_eq!(buffer.cell((13, 5)).map(|c| c.symbol()), Some(" "));
        assert_eq!(buffer.cell((14, 5)).map(|c| c.symbol()), Some("─"));
        assert_eq!(buffer.cell((24, 5)).map(|c| c.symbol()), Some("─"));
        assert_eq!(buffer.cell((17, 4)).map(|c| c.symbol()), Some("│"));
    }

    #[test]
    fn test_invalid_select_is_red() {
        let terminal = Terminal::new(TestBackend::new(40, 14)).unwrap();
        let mut renderer = CliRenderer::new(terminal);
        let moves = [
            UserMove::new(MoveType::SelectValid, 0, Coordinates::new(1, 1)),
            UserMove::new(MoveType::SelectInvalid, 1, Coordinates::new(1, 1)),
        ];

        renderer
            .render(&data(&moves, GamePhase::Play, None))
            .unwrap();

        let buffer = renderer.terminal().backend().buffer();
        let red = buffer
            .content()
            .iter()
            .filter(|c| c.symbol() == "x" && c.bg == Color::Red)
            .count();
        assert_eq!(red, 1);
    }
}
