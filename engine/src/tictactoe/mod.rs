mod board;
mod bot_controller;
mod game_state;
mod session;
mod types;
mod win_detector;


pub use board::{Board, get_available_moves};
pub use bot_controller::{
    BotInput, SearchError, SearchReport, analyze, calculate_best_move, position_value,
};
pub use game_state::*;
pub use session::{GameBroadcaster, GameOverNotification, TicTacToeSession};
pub use types::{CELL_COUNT, LINES, Mark, Outcome, Side, WinningLine};
pub use win_detector::{Evaluation, check_win, check_win_with_line, evaluate, evaluate_outcome};
