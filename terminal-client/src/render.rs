use tokio::sync::mpsc;

use tictactoe_engine::tictactoe::{CELL_COUNT, Mark};
use tictactoe_engine::{GameBroadcaster, GameOverNotification, GameState, Tally, TurnPhase};

/// Renders each update into a text frame and hands it to the main loop,
/// which owns stdout.
#[derive(Clone)]
pub struct TerminalBroadcaster {
    frames: mpsc::UnboundedSender<String>,
    show_cell_hints: bool,
}

impl TerminalBroadcaster {
    pub fn new(frames: mpsc::UnboundedSender<String>, show_cell_hints: bool) -> Self {
        Self {
            frames,
            show_cell_hints,
        }
    }
}

impl GameBroadcaster for TerminalBroadcaster {
    async fn broadcast_state(&self, state: GameState) {
        let _ = self.frames.send(render_state(&state, self.show_cell_hints));
    }

    async fn broadcast_game_over(&self, notification: GameOverNotification) {
        let _ = self.frames.send(render_game_over(&notification));
    }
}

fn render_cell(state: &GameState, index: usize, show_cell_hints: bool) -> String {
    let symbol = match state.board.get(index) {
        Some(Mark::Empty) | None if show_cell_hints => index.to_string(),
        Some(Mark::Empty) | None => " ".to_string(),
        Some(mark) => mark.to_string(),
    };
    if state.is_winning_cell(index) {
        format!("[{}]", symbol)
    } else {
        format!(" {} ", symbol)
    }
}

/// Winning cells are drawn in brackets.
pub fn render_board(state: &GameState, show_cell_hints: bool) -> String {
    let cells: Vec<String> = (0..CELL_COUNT)
        .map(|index| render_cell(state, index, show_cell_hints))
        .collect();
    cells
        .chunks(3)
        .map(|row| row.join("|"))
        .collect::<Vec<_>>()
        .join("\n---+---+---\n")
}

pub fn render_tally(tally: &Tally) -> String {
    format!(
        "You: {} | Draws: {} | AI: {}",
        tally.player_wins, tally.draws, tally.ai_wins
    )
}

pub fn render_state(state: &GameState, show_cell_hints: bool) -> String {
    let mut frame = render_board(state, show_cell_hints);
    frame.push_str("\n\n");
    frame.push_str(state.status_text());
    if state.phase == TurnPhase::HumanTurn {
        frame.push_str(" (enter a cell number)");
    }
    frame.push('\n');
    frame.push_str(&render_tally(&state.tally));
    frame
}

pub fn render_game_over(notification: &GameOverNotification) -> String {
    let headline = match notification.winning_line {
        Some([a, b, c]) => format!("Game over: {} ({}-{}-{})", notification.outcome, a, b, c),
        None => format!("Game over: {}", notification.outcome),
    };
    format!(
        "{}. {}. Type 'reset' to play again.",
        headline,
        render_tally(&notification.tally)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictactoe_engine::tictactoe::Board;
    use tictactoe_engine::{GameController, Outcome, Side};

    #[test]
    fn test_empty_board_shows_cell_numbers() {
        let state = GameController::new().state();
        assert_eq!(
            render_board(&state, true),
            " 0 | 1 | 2 \n---+---+---\n 3 | 4 | 5 \n---+---+---\n 6 | 7 | 8 "
        );
        assert_eq!(
            render_board(&state, false),
            "   |   |   \n---+---+---\n   |   |   \n---+---+---\n   |   |   "
        );
    }

    #[test]
    fn test_winning_line_is_bracketed() {
        let state = GameState {
            board: Board::from_cells([
                Mark::X, Mark::X, Mark::X,
                Mark::O, Mark::O, Mark::Empty,
                Mark::Empty, Mark::Empty, Mark::Empty,
            ]),
            turn_owner: Side::Human,
            phase: TurnPhase::GameOver(Outcome::Win(Side::Human)),
            outcome: Outcome::Win(Side::Human),
            winning_line: Some([0, 1, 2]),
            tally: Tally { player_wins: 1, ai_wins: 0, draws: 0 },
        };
        let frame = render_state(&state, false);
        assert_eq!(
            frame,
            "[X]|[X]|[X]\n---+---+---\n O | O |   \n---+---+---\n   |   |   \n\nYou Win!\nYou: 1 | Draws: 0 | AI: 0"
        );
    }

    #[test]
    fn test_status_line_follows_phase() {
        let mut controller = GameController::new();
        assert!(render_state(&controller.state(), true).contains("Your Turn (enter a cell number)"));
        controller.submit_move(4).unwrap();
        assert!(render_state(&controller.state(), true).contains("AI is thinking..."));
    }

    #[test]
    fn test_game_over_message_includes_line_and_tally() {
        let notification = GameOverNotification {
            outcome: Outcome::Win(Side::Automated),
            winning_line: Some([1, 4, 7]),
            tally: Tally { player_wins: 0, ai_wins: 2, draws: 1 },
        };
        assert_eq!(
            render_game_over(&notification),
            "Game over: AI wins (1-4-7). You: 0 | Draws: 1 | AI: 2. Type 'reset' to play again."
        );

        let draw = GameOverNotification {
            outcome: Outcome::Draw,
            winning_line: None,
            tally: Tally::default(),
        };
        assert_eq!(
            render_game_over(&draw),
            "Game over: draw. You: 0 | Draws: 0 | AI: 0. Type 'reset' to play again."
        );
    }

    #[tokio::test]
    async fn test_broadcaster_emits_rendered_frames() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let broadcaster = TerminalBroadcaster::new(tx, true);
        let state = GameController::new().state();

        broadcaster.broadcast_state(state).await;
        assert_eq!(rx.recv().await.unwrap(), render_state(&state, true));
    }
}
