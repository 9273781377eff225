use std::fmt;

use super::board::Board;
use super::bot_controller::{BotInput, SearchError, analyze};
use super::types::{Outcome, Side, WinningLine};
use super::win_detector::evaluate;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnPhase {
    HumanTurn,
    AutomatedTurnPending,
    /// Holds either `Outcome::Win` or `Outcome::Draw`.
    GameOver(Outcome),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub player_wins: u32,
    pub ai_wins: u32,
    pub draws: u32,
}

impl Tally {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win(Side::Human) => self.player_wins += 1,
            Outcome::Win(Side::Automated) => self.ai_wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::InProgress => {}
        }
    }

    pub fn games_played(&self) -> u32 {
        self.player_wins + self.ai_wins + self.draws
    }
}

/// Read-only snapshot handed to renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    /// Side to move, or the side that made the final move once the game is over.
    pub turn_owner: Side,
    pub phase: TurnPhase,
    pub outcome: Outcome,
    pub winning_line: Option<WinningLine>,
    pub tally: Tally,
}

impl GameState {
    pub fn status_text(&self) -> &'static str {
        match self.phase {
            TurnPhase::HumanTurn => "Your Turn",
            TurnPhase::AutomatedTurnPending => "AI is thinking...",
            TurnPhase::GameOver(Outcome::Win(Side::Human)) => "You Win!",
            TurnPhase::GameOver(Outcome::Win(Side::Automated)) => "AI Wins!",
            TurnPhase::GameOver(_) => "It's a Draw!",
        }
    }

    pub fn is_winning_cell(&self, index: usize) -> bool {
        self.winning_line.is_some_and(|line| line.contains(&index))
    }
}

/// Ticket for an automated move that has been requested but not yet applied.
/// It is only honoured while the game is still in the same generation and on
/// the same board it was issued for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingMove {
    pub generation: u64,
    pub board: Board,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveRejection {
    OutOfRange(usize),
    CellOccupied(usize),
    NotHumanTurn,
    NotAutomatedTurn,
    GameOver,
    StaleMove,
    Search(SearchError),
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveRejection::OutOfRange(index) => write!(f, "Cell {} is out of range", index),
            MoveRejection::CellOccupied(index) => write!(f, "Cell {} is already marked", index),
            MoveRejection::NotHumanTurn => write!(f, "Not the human player's turn"),
            MoveRejection::NotAutomatedTurn => write!(f, "Not the automated player's turn"),
            MoveRejection::GameOver => write!(f, "Game is already over"),
            MoveRejection::StaleMove => write!(f, "Move was computed for a board that no longer exists"),
            MoveRejection::Search(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for MoveRejection {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MoveRejection::Search(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SearchError> for MoveRejection {
    fn from(e: SearchError) -> Self {
        MoveRejection::Search(e)
    }
}

#[derive(Clone, Debug)]
pub struct GameController {
    board: Board,
    phase: TurnPhase,
    turn_owner: Side,
    winning_line: Option<WinningLine>,
    tally: Tally,
    generation: u64,
}

impl Default for GameController {
    fn default() -> Self {
        Self::new()
    }
}

impl GameController {
    pub fn new() -> Self {
        Self::with_tally(Tally::default())
    }

    pub fn with_tally(tally: Tally) -> Self {
        Self {
            board: Board::new(),
            phase: TurnPhase::HumanTurn,
            turn_owner: Side::Human,
            winning_line: None,
            tally,
            generation: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> GameState {
        let outcome = match self.phase {
            TurnPhase::GameOver(outcome) => outcome,
            _ => Outcome::InProgress,
        };
        GameState {
            board: self.board,
            turn_owner: self.turn_owner,
            phase: self.phase,
            outcome,
            winning_line: self.winning_line,
            tally: self.tally,
        }
    }

    pub fn submit_move(&mut self, index: usize) -> Result<(), MoveRejection> {
        match self.phase {
            TurnPhase::HumanTurn => {}
            TurnPhase::AutomatedTurnPending => return Err(MoveRejection::NotHumanTurn),
            TurnPhase::GameOver(_) => return Err(MoveRejection::GameOver),
        }
        self.check_cell(index)?;

        self.place_mark(index, Side::Human);
        Ok(())
    }

    /// Issues the ticket for the automated reply. `None` unless the automated
    /// player is due to move.
    pub fn pending_move(&self) -> Option<PendingMove> {
        if self.phase != TurnPhase::AutomatedTurnPending {
            return None;
        }
        Some(PendingMove {
            generation: self.generation,
            board: self.board,
        })
    }

    pub fn apply_automated_move(
        &mut self,
        ticket: &PendingMove,
        index: usize,
    ) -> Result<(), MoveRejection> {
        if ticket.generation != self.generation || ticket.board != self.board {
            return Err(MoveRejection::StaleMove);
        }
        match self.phase {
            TurnPhase::AutomatedTurnPending => {}
            TurnPhase::HumanTurn => return Err(MoveRejection::NotAutomatedTurn),
            TurnPhase::GameOver(_) => return Err(MoveRejection::GameOver),
        }
        self.check_cell(index)?;

        self.place_mark(index, Side::Automated);
        Ok(())
    }

    /// Runs the search and applies its move immediately, without any delay.
    pub fn play_automated_turn(&mut self) -> Result<usize, MoveRejection> {
        let ticket = self.pending_move().ok_or(match self.phase {
            TurnPhase::GameOver(_) => MoveRejection::GameOver,
            _ => MoveRejection::NotAutomatedTurn,
        })?;
        let report = analyze(&BotInput::from_controller(self))?;
        self.apply_automated_move(&ticket, report.best_move)?;
        Ok(report.best_move)
    }

    /// Starts a new game. The tally survives; everything else is cleared, and
    /// any outstanding [`PendingMove`] becomes stale.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.phase = TurnPhase::HumanTurn;
        self.turn_owner = Side::Human;
        self.winning_line = None;
        self.generation += 1;
    }

    fn check_cell(&self, index: usize) -> Result<(), MoveRejection> {
        match self.board.get(index) {
            None => Err(MoveRejection::OutOfRange(index)),
            Some(_) if !self.board.is_valid_move(index) => Err(MoveRejection::CellOccupied(index)),
            Some(_) => Ok(()),
        }
    }

    fn place_mark(&mut self, index: usize, side: Side) {
        self.board.place(index, side.mark());

        let evaluation = evaluate(&self.board);
        if evaluation.outcome.is_terminal() {
            self.phase = TurnPhase::GameOver(evaluation.outcome);
            self.winning_line = evaluation.winning_line;
            self.tally.record(evaluation.outcome);
            return;
        }

        self.turn_owner = side.opponent();
        self.phase = match side {
            Side::Human => TurnPhase::AutomatedTurnPending,
            Side::Automated => TurnPhase::HumanTurn,
        };
    }
}
