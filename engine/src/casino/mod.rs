//! Casino game execution.
//!
//! One module per game, each implementing [`CasinoGame`]: `init` prepares a
//! fresh session (dealing opening cards where the game calls for it) and
//! `process_move` consumes a binary move payload, draws from the provided
//! [`GameRng`], and returns a [`GameResult`]. Single-draw games (slots, dice,
//! coinflip, roulette, wheel, baccarat, keno, plinko, crash) resolve on their
//! first move; multi-step games (mines, hi-lo, blackjack) thread their state
//! through `session.state_blob` until a terminal move.
//!
//! Payout multipliers are basis points ([`MULTIPLIER_ONE`] = 1.00x). A push
//! is `Win(MULTIPLIER_ONE)`; the dispatcher classifies terminal results via
//! [`settle`].

mod cards;
mod logging;
mod payload;
mod rng;
mod serialization;

pub mod baccarat;
pub mod blackjack;
pub mod coinflip;
pub mod crash;
pub mod dice;
pub mod hilo;
pub mod keno;
pub mod mines;
pub mod plinko;
pub mod registry;
pub mod roulette;
pub mod slots;
pub mod wheel;


pub use registry::{GameCategory, GameInfo, GameRegistry};
pub use rng::GameRng;

use greenfelt_types::casino::{BetSettlement, GameSession, GameType, MULTIPLIER_ONE};

/// Errors surfaced by game settlement functions.
///
/// Everything except `InvalidState` and `DeckExhausted` is an invalid-input
/// rejection raised before any draw; those two indicate a corrupt session or
/// an internal fault and must surface as a server error, never as a loss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("malformed or out-of-range move payload")]
    InvalidPayload,
    #[error("move is not legal in the current game state")]
    InvalidMove,
    #[error("corrupt or truncated session state")]
    InvalidState,
    #[error("session is already complete")]
    GameAlreadyComplete,
    #[error("deck exhausted")]
    DeckExhausted,
}

/// Result of initializing a session or processing a move.
///
/// Terminal variants carry the settlement multiplier in basis points; the
/// payout itself is computed once, in [`settle`]. Each variant carries JSON
/// object lines describing the draw for history display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Game continues; no payout yet.
    Continue(Vec<String>),
    /// Terminal with the given multiplier (`MULTIPLIER_ONE` is a push).
    Win(u64, Vec<String>),
    /// Terminal total loss (multiplier 0).
    Loss(Vec<String>),
}

impl GameResult {
    /// True once the session reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Continue(_))
    }

    /// Outcome log lines for this step.
    pub fn logs(&self) -> &[String] {
        match self {
            Self::Continue(logs) | Self::Win(_, logs) | Self::Loss(logs) => logs,
        }
    }
}

/// A casino game's settlement state machine.
pub trait CasinoGame {
    /// Prepare a fresh session (state blob, opening draws).
    fn init(session: &mut GameSession, rng: &mut GameRng) -> GameResult;

    /// Process one move payload against the session state.
    fn process_move(
        session: &mut GameSession,
        payload: &[u8],
        rng: &mut GameRng,
    ) -> Result<GameResult, GameError>;
}

/// Initialize a session for its game type.
pub fn init_game(session: &mut GameSession, rng: &mut GameRng) -> GameResult {
    match session.game_type {
        GameType::Slots => slots::Slots::init(session, rng),
        GameType::Dice => dice::Dice::init(session, rng),
        GameType::Coinflip => coinflip::Coinflip::init(session, rng),
        GameType::Roulette => roulette::Roulette::init(session, rng),
        GameType::Wheel => wheel::Wheel::init(session, rng),
        GameType::Baccarat => baccarat::Baccarat::init(session, rng),
        GameType::Keno => keno::Keno::init(session, rng),
        GameType::Plinko => plinko::Plinko::init(session, rng),
        GameType::Crash => crash::Crash::init(session, rng),
        GameType::Mines => mines::Mines::init(session, rng),
        GameType::HiLo => hilo::HiLo::init(session, rng),
        GameType::Blackjack => blackjack::Blackjack::init(session, rng),
    }
}

/// Process a move for a session's game type.
pub fn process_game_move(
    session: &mut GameSession,
    payload: &[u8],
    rng: &mut GameRng,
) -> Result<GameResult, GameError> {
    if payload.len() > greenfelt_types::casino::MAX_PAYLOAD_LENGTH {
        return Err(GameError::InvalidPayload);
    }
    match session.game_type {
        GameType::Slots => slots::Slots::process_move(session, payload, rng),
        GameType::Dice => dice::Dice::process_move(session, payload, rng),
        GameType::Coinflip => coinflip::Coinflip::process_move(session, payload, rng),
        GameType::Roulette => roulette::Roulette::process_move(session, payload, rng),
        GameType::Wheel => wheel::Wheel::process_move(session, payload, rng),
        GameType::Baccarat => baccarat::Baccarat::process_move(session, payload, rng),
        GameType::Keno => keno::Keno::process_move(session, payload, rng),
        GameType::Plinko => plinko::Plinko::process_move(session, payload, rng),
        GameType::Crash => crash::Crash::process_move(session, payload, rng),
        GameType::Mines => mines::Mines::process_move(session, payload, rng),
        GameType::HiLo => hilo::HiLo::process_move(session, payload, rng),
        GameType::Blackjack => blackjack::Blackjack::process_move(session, payload, rng),
    }
}

/// Build the settlement for a terminal result.
///
/// Returns `Ok(None)` while the game is still in progress. The win amount is
/// derived here, once, from the multiplier, so
/// `win_amount == bet * multiplier_bps / MULTIPLIER_ONE` holds for every
/// settlement the engine produces.
pub fn settle(bet: u64, result: &GameResult) -> Result<Option<BetSettlement>, GameError> {
    let (multiplier_bps, outcome) = match result {
        GameResult::Continue(_) => return Ok(None),
        GameResult::Win(bps, logs) => (*bps, logs.clone()),
        GameResult::Loss(logs) => (0, logs.clone()),
    };
    match BetSettlement::from_multiplier(bet, multiplier_bps, outcome) {
        Some(settlement) => Ok(Some(settlement)),
        None => Err(GameError::InvalidState),
    }
}

/// Compound a running multiplier by one step, both in basis points.
///
/// Used by the streak games (mines ×1.2 per safe reveal, hi-lo ×1.5 per
/// correct guess). Overflow surfaces as a fault rather than a clamped payout.
pub(crate) fn accumulate(multiplier_bps: u64, step_bps: u64) -> Result<u64, GameError> {
    multiplier_bps
        .checked_mul(step_bps)
        .map(|v| v / MULTIPLIER_ONE)
        .ok_or(GameError::InvalidState)
}
