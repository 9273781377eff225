use std::fmt;

use super::board::{Board, get_available_moves};
use super::game_state::GameController;
use super::types::{Mark, Outcome, Side};
use super::win_detector::evaluate_outcome;
use crate::log_debug;

const WIN_SCORE: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    InvalidState { outcome: Outcome },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::InvalidState { outcome } => {
                write!(f, "Search invoked on a finished board ({})", outcome)
            }
        }
    }
}

impl std::error::Error for SearchError {}

pub struct BotInput {
    pub board: Board,
    pub side: Side,
}

impl BotInput {
    pub fn new(board: Board, side: Side) -> Self {
        Self { board, side }
    }

    pub fn from_controller(controller: &GameController) -> Self {
        Self {
            board: *controller.board(),
            side: Side::Automated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    pub best_move: usize,
    pub score: i32,
    pub nodes: u64,
}

pub fn calculate_best_move(board: &Board, side: Side) -> Result<usize, SearchError> {
    analyze(&BotInput::new(*board, side)).map(|report| report.best_move)
}

/// Scores every empty cell for `input.side` and keeps the first one with the
/// strictly greatest score, so ties resolve to the lowest index.
pub fn analyze(input: &BotInput) -> Result<SearchReport, SearchError> {
    let outcome = evaluate_outcome(&input.board);
    if outcome.is_terminal() {
        return Err(SearchError::InvalidState { outcome });
    }

    let bot_mark = input.side.mark();
    let mut board = input.board;
    let mut nodes = 0u64;
    let mut best: Option<(usize, i32)> = None;

    for index in get_available_moves(&board) {
        board.place(index, bot_mark);
        let score = minimax(&mut board, 0, false, input.side, i32::MIN, i32::MAX, &mut nodes);
        board.clear(index);

        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }

    // A non-terminal board always has an empty cell.
    let (best_move, score) = best.ok_or(SearchError::InvalidState { outcome })?;
    log_debug!(
        "Search for {} chose cell {} (score {}, {} nodes)",
        input.side,
        best_move,
        score,
        nodes
    );

    Ok(SearchReport {
        best_move,
        score,
        nodes,
    })
}

/// Game-theoretic value of `board` from the perspective of `side_to_move`,
/// using the same depth-adjusted scoring as the search.
pub fn position_value(board: &Board, side_to_move: Side) -> i32 {
    let mut board = *board;
    let mut nodes = 0u64;
    minimax(&mut board, 0, true, side_to_move, i32::MIN, i32::MAX, &mut nodes)
}

fn terminal_score(outcome: Outcome, depth: i32, bot_side: Side) -> Option<i32> {
    match outcome {
        Outcome::Win(winner) if winner == bot_side => Some(WIN_SCORE - depth),
        Outcome::Win(_) => Some(depth - WIN_SCORE),
        Outcome::Draw => Some(0),
        Outcome::InProgress => None,
    }
}

/// Every placement is undone before the next iteration or the pruning exit,
/// so `board` is unchanged when this returns.
fn minimax(
    board: &mut Board,
    depth: i32,
    is_maximizing: bool,
    bot_side: Side,
    mut alpha: i32,
    mut beta: i32,
    nodes: &mut u64,
) -> i32 {
    *nodes += 1;

    if let Some(score) = terminal_score(evaluate_outcome(board), depth, bot_side) {
        return score;
    }

    let mark: Mark = if is_maximizing {
        bot_side.mark()
    } else {
        bot_side.opponent().mark()
    };

    if is_maximizing {
        let mut max_eval = i32::MIN;
        for index in 0..board.cells().len() {
            if !board.is_valid_move(index) {
                continue;
            }

            board.place(index, mark);
            let eval = minimax(board, depth + 1, false, bot_side, alpha, beta, nodes);
            board.clear(index);

            max_eval = max_eval.max(eval);
            alpha = alpha.max(eval);
            if beta <= alpha {
                break;
            }
        }
        max_eval
    } else {
        let mut min_eval = i32::MAX;
        for index in 0..board.cells().len() {
            if !board.is_valid_move(index) {
                continue;
            }

            board.place(index, mark);
            let eval = minimax(board, depth + 1, true, bot_side, alpha, beta, nodes);
            board.clear(index);

            min_eval = min_eval.min(eval);
            beta = beta.min(eval);
            if beta <= alpha {
                break;
            }
        }
        min_eval
    }
}
