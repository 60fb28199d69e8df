//! Settlement orchestration over the game engine.
//!
//! [`CasinoLayer`] ties a request together: validate the bet against the
//! registry, debit the stake, run the game through the dispatcher, credit the
//! payout on the terminal move, and emit an audit event. The stake is debited
//! exactly once when a session opens; in-progress moves never touch the
//! wallet, only the terminal transition settles.

use crate::casino::{init_game, process_game_move, settle, GameError, GameRegistry, GameRng};
use crate::wallet::{Wallet, WalletError};
use greenfelt_types::casino::{
    BetSettlement, CasinoEvent, GameSession, GameType, MAX_PLAYER_ID_LENGTH,
};
use tracing::{debug, info};

/// Errors from the settlement layer.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayerError {
    #[error("bet amount must be positive")]
    ZeroBet,
    #[error("bet {bet} outside limits [{min}, {max}]")]
    BetOutOfRange { bet: u64, min: u64, max: u64 },
    #[error("game {0} is not active")]
    GameInactive(GameType),
    #[error("player id is empty or too long")]
    InvalidPlayer,
    #[error("game {0} requires a session; use start_session")]
    MultiStepGame(GameType),
    #[error("session is already settled")]
    SessionComplete,
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Wallet(#[from] WalletError),
}

/// Sink for settlement audit events (history/leaderboard collaborator).
pub trait EventSink {
    fn emit(&mut self, event: CasinoEvent);
}

/// Event sink that retains everything, for tests and the simulator.
#[derive(Clone, Debug, Default)]
pub struct VecSink {
    pub events: Vec<CasinoEvent>,
}

impl EventSink for VecSink {
    fn emit(&mut self, event: CasinoEvent) {
        self.events.push(event);
    }
}

/// Result of opening a session.
#[derive(Clone, Debug)]
pub struct SessionStart {
    pub session: GameSession,
    /// Present when the opening draws already settled the bet.
    pub settlement: Option<BetSettlement>,
    pub logs: Vec<String>,
}

/// Result of one move.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveOutcome {
    /// Present when this move settled the bet.
    pub settlement: Option<BetSettlement>,
    pub logs: Vec<String>,
}

/// Settlement orchestration: registry + wallet + event sink around the
/// dispatcher.
pub struct CasinoLayer<W: Wallet, S: EventSink> {
    seed: [u8; 32],
    registry: GameRegistry,
    wallet: W,
    sink: S,
    next_session_id: u64,
}

impl<W: Wallet, S: EventSink> CasinoLayer<W, S> {
    pub fn new(seed: [u8; 32], wallet: W, sink: S) -> Self {
        Self {
            seed,
            registry: GameRegistry::new(),
            wallet,
            sink,
            next_session_id: 1,
        }
    }

    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut GameRegistry {
        &mut self.registry
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// One-shot play for single-draw games: open a session and resolve it
    /// with a single move payload.
    pub fn play(
        &mut self,
        player: &str,
        game_type: GameType,
        bet: u64,
        payload: &[u8],
        now: u64,
    ) -> Result<BetSettlement, LayerError> {
        if game_type.is_multi_step() {
            return Err(LayerError::MultiStepGame(game_type));
        }

        let start = self.start_session(player, game_type, bet, now)?;
        let mut session = start.session;
        let outcome = self.submit_move(&mut session, payload)?;
        // Single-draw games settle on their first valid move
        outcome.settlement.ok_or(LayerError::Game(GameError::InvalidState))
    }

    /// Open a session: validate the bet, debit the stake, run the game's
    /// opening draws. The caller holds the returned session and passes it
    /// back to `submit_move`.
    pub fn start_session(
        &mut self,
        player: &str,
        game_type: GameType,
        bet: u64,
        now: u64,
    ) -> Result<SessionStart, LayerError> {
        if player.is_empty() || player.len() > MAX_PLAYER_ID_LENGTH {
            return Err(LayerError::InvalidPlayer);
        }
        if bet == 0 {
            return Err(LayerError::ZeroBet);
        }
        if !self.registry.is_active(game_type) {
            return Err(LayerError::GameInactive(game_type));
        }
        let info = GameRegistry::get_info(game_type);
        if bet < info.min_bet || bet > info.max_bet {
            return Err(LayerError::BetOutOfRange {
                bet,
                min: info.min_bet,
                max: info.max_bet,
            });
        }

        // Stake is debited up front; insufficient funds reject the request
        // before any draw happens.
        self.wallet.apply_delta(player, bet, 0)?;

        let id = self.next_session_id;
        self.next_session_id += 1;

        let mut session = GameSession {
            id,
            player: player.to_string(),
            game_type,
            bet,
            state_blob: vec![],
            move_count: 0,
            created_at: now,
            is_complete: false,
        };

        let mut rng = GameRng::new(&self.seed, session.id, 0);
        let result = init_game(&mut session, &mut rng);
        debug!(player, game = %game_type, bet, session = id, "session started");

        self.sink.emit(CasinoEvent::SessionStarted {
            session_id: id,
            player: player.to_string(),
            game_type,
            bet,
        });

        let settlement = self.settle_if_terminal(&session, &settle(bet, &result)?)?;
        Ok(SessionStart {
            logs: result.logs().to_vec(),
            settlement,
            session,
        })
    }

    /// Process one move for a caller-held session, settling the wallet and
    /// emitting the audit event if the move is terminal.
    pub fn submit_move(
        &mut self,
        session: &mut GameSession,
        payload: &[u8],
    ) -> Result<MoveOutcome, LayerError> {
        if session.is_complete {
            return Err(LayerError::SessionComplete);
        }

        let mut rng = GameRng::new(&self.seed, session.id, session.move_count + 1);
        let result = process_game_move(session, payload, &mut rng)?;
        let settlement = self.settle_if_terminal(session, &settle(session.bet, &result)?)?;

        Ok(MoveOutcome {
            logs: result.logs().to_vec(),
            settlement,
        })
    }

    /// Credit the payout and emit the audit record for a terminal result.
    fn settle_if_terminal(
        &mut self,
        session: &GameSession,
        settlement: &Option<BetSettlement>,
    ) -> Result<Option<BetSettlement>, LayerError> {
        let Some(settlement) = settlement else {
            return Ok(None);
        };

        if settlement.win_amount > 0 {
            self.wallet
                .apply_delta(&session.player, 0, settlement.win_amount)?;
        }

        info!(
            player = %session.player,
            game = %session.game_type,
            session = session.id,
            result = %settlement.result,
            multiplier_bps = settlement.multiplier_bps,
            win_amount = settlement.win_amount,
            "bet settled"
        );
        self.sink.emit(CasinoEvent::BetSettled {
            session_id: session.id,
            player: session.player.clone(),
            game_type: session.game_type,
            settlement: settlement.clone(),
        });

        Ok(Some(settlement.clone()))
    }
}
