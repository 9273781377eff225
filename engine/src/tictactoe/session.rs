use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::AbortHandle;

use super::bot_controller::{BotInput, analyze};
use super::game_state::{GameController, GameState, MoveRejection, PendingMove, Tally, TurnPhase};
use super::types::{Outcome, Side, WinningLine};
use crate::config::GameConfig;
use crate::{log, log_warn};

pub trait GameBroadcaster: Send + Sync + Clone + 'static {
    fn broadcast_state(&self, state: GameState) -> impl Future<Output = ()> + Send;

    fn broadcast_game_over(
        &self,
        notification: GameOverNotification,
    ) -> impl Future<Output = ()> + Send;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOverNotification {
    pub outcome: Outcome,
    pub winning_line: Option<WinningLine>,
    pub tally: Tally,
}

/// Drives one controller on behalf of a presentation layer. The automated
/// reply runs as a spawned task after `ai_move_delay`; `reset` aborts it, and
/// a reply that still slips through is discarded by the controller's ticket
/// check.
#[derive(Clone)]
pub struct TicTacToeSession<B: GameBroadcaster> {
    session_id: String,
    controller: Arc<Mutex<GameController>>,
    pending_task: Arc<Mutex<Option<AbortHandle>>>,
    broadcaster: B,
    ai_move_delay: Duration,
}

impl<B: GameBroadcaster> TicTacToeSession<B> {
    pub fn new(session_id: impl Into<String>, ai_move_delay: Duration, broadcaster: B) -> Self {
        Self {
            session_id: session_id.into(),
            controller: Arc::new(Mutex::new(GameController::new())),
            pending_task: Arc::new(Mutex::new(None)),
            broadcaster,
            ai_move_delay,
        }
    }

    pub fn from_config(session_id: impl Into<String>, config: &GameConfig, broadcaster: B) -> Self {
        Self::new(session_id, config.ai_move_delay(), broadcaster)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub async fn get_state(&self) -> GameState {
        self.controller.lock().await.state()
    }

    /// Returns whether the move was accepted. Rejected moves change nothing.
    pub async fn submit_move(&self, index: usize) -> bool {
        let mut controller = self.controller.lock().await;
        if let Err(e) = controller.submit_move(index) {
            log!("[session:{}] Rejected move at cell {}: {}", self.session_id, index, e);
            return false;
        }
        let state = controller.state();
        let ticket = controller.pending_move();
        drop(controller);

        self.publish(state).await;

        if let Some(ticket) = ticket {
            self.schedule_automated_move(ticket).await;
        }
        true
    }

    pub async fn reset(&self) {
        self.cancel_pending_move().await;

        let mut controller = self.controller.lock().await;
        controller.reset();
        let state = controller.state();
        drop(controller);

        log!(
            "[session:{}] New game (games played so far: {})",
            self.session_id,
            state.tally.games_played()
        );
        self.broadcaster.broadcast_state(state).await;
    }

    pub async fn shutdown(&self) {
        self.cancel_pending_move().await;
    }

    async fn cancel_pending_move(&self) {
        if let Some(handle) = self.pending_task.lock().await.take() {
            handle.abort();
        }
    }

    async fn schedule_automated_move(&self, ticket: PendingMove) {
        let session = self.clone();
        let handle = tokio::spawn(async move {
            session.play_automated_move(ticket).await;
        });

        if let Some(previous) = self.pending_task.lock().await.replace(handle.abort_handle()) {
            previous.abort();
        }
    }

    async fn play_automated_move(&self, ticket: PendingMove) {
        if !self.ai_move_delay.is_zero() {
            tokio::time::sleep(self.ai_move_delay).await;
        }

        let input = BotInput::new(ticket.board, Side::Automated);
        let report = match tokio::task::spawn_blocking(move || analyze(&input)).await {
            Ok(Ok(report)) => report,
            Ok(Err(e)) => {
                log_warn!("[session:{}] Automated move failed: {}", self.session_id, e);
                return;
            }
            Err(e) => {
                log_warn!("[session:{}] Search task failed: {}", self.session_id, e);
                return;
            }
        };

        let mut controller = self.controller.lock().await;
        match controller.apply_automated_move(&ticket, report.best_move) {
            Ok(()) => {}
            Err(MoveRejection::StaleMove) => {
                log!(
                    "[session:{}] Discarding automated move at cell {}: board changed",
                    self.session_id,
                    report.best_move
                );
                return;
            }
            Err(e) => {
                log_warn!(
                    "[session:{}] Automated move at cell {} was refused: {}",
                    self.session_id,
                    report.best_move,
                    e
                );
                return;
            }
        }
        let state = controller.state();
        drop(controller);

        log!(
            "[session:{}] AI played cell {} (score {}, {} nodes)",
            self.session_id,
            report.best_move,
            report.score,
            report.nodes
        );
        self.publish(state).await;
    }

    async fn publish(&self, state: GameState) {
        self.broadcaster.broadcast_state(state).await;

        if let TurnPhase::GameOver(outcome) = state.phase {
            log!("[session:{}] Game over: {}", self.session_id, outcome);
            let notification = GameOverNotification {
                outcome,
                winning_line: state.winning_line,
                tally: state.tally,
            };
            self.broadcaster.broadcast_game_over(notification).await;
        }
    }
}
