use super::board::Board;
use super::types::{LINES, Mark, Outcome, Side, WinningLine};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub outcome: Outcome,
    pub winning_line: Option<WinningLine>,
}

pub fn check_win(board: &Board) -> Option<Side> {
    check_win_with_line(board).map(|(side, _)| side)
}

pub fn check_win_with_line(board: &Board) -> Option<(Side, WinningLine)> {
    let cells = board.cells();
    LINES.iter().find_map(|&line| {
        let [a, b, c] = line;
        let mark = cells[a];
        if mark != Mark::Empty && mark == cells[b] && mark == cells[c] {
            mark.side().map(|side| (side, line))
        } else {
            None
        }
    })
}

pub fn evaluate(board: &Board) -> Evaluation {
    if let Some((side, line)) = check_win_with_line(board) {
        return Evaluation {
            outcome: Outcome::Win(side),
            winning_line: Some(line),
        };
    }

    let outcome = if board.is_full() {
        Outcome::Draw
    } else {
        Outcome::InProgress
    };

    Evaluation {
        outcome,
        winning_line: None,
    }
}

pub fn evaluate_outcome(board: &Board) -> Outcome {
    evaluate(board).outcome
}
