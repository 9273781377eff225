pub mod config;
pub mod logger;
pub mod tictactoe;

pub use tictactoe::{
    GameBroadcaster, GameController, GameOverNotification, GameState, Outcome, Side, Tally,
    TicTacToeSession, TurnPhase,
};
