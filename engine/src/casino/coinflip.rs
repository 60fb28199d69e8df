//! Coinflip game implementation.
//!
//! State blob format:
//! Empty before the flip, [result:u8] after (0 = heads, 1 = tails).
//!
//! Payload format:
//! [choice:u8] (0 = heads, 1 = tails)
//!
//! A fair flip; a matching call pays 1.95x.

use super::{CasinoGame, GameError, GameResult, GameRng};
use greenfelt_types::casino::GameSession;

/// Payout for a correct call (1.95x).
const WIN_BPS: u64 = 19_500;

/// Coin faces.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    Heads = 0,
    Tails = 1,
}

impl TryFrom<u8> for Face {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Face::Heads),
            1 => Ok(Face::Tails),
            _ => Err(GameError::InvalidPayload),
        }
    }
}

impl Face {
    fn id(&self) -> &'static str {
        match self {
            Face::Heads => "heads",
            Face::Tails => "tails",
        }
    }
}

pub struct Coinflip;

impl CasinoGame for Coinflip {
    fn init(session: &mut GameSession, _rng: &mut GameRng) -> GameResult {
        // No initial state needed - waiting for the call
        session.state_blob = vec![];
        GameResult::Continue(vec![])
    }

    fn process_move(
        session: &mut GameSession,
        payload: &[u8],
        rng: &mut GameRng,
    ) -> Result<GameResult, GameError> {
        if session.is_complete {
            return Err(GameError::GameAlreadyComplete);
        }

        if payload.is_empty() {
            return Err(GameError::InvalidPayload);
        }
        let choice = Face::try_from(payload[0])?;

        let flip = if rng.gen_bool(0.5) {
            Face::Heads
        } else {
            Face::Tails
        };

        session.state_blob = vec![flip as u8];
        session.move_count += 1;
        session.is_complete = true;

        let win = choice == flip;
        let logs = vec![format!(
            r#"{{"result":"{}","choice":"{}","win":{}}}"#,
            flip.id(),
            choice.id(),
            win
        )];

        if win {
            Ok(GameResult::Win(WIN_BPS, logs))
        } else {
            Ok(GameResult::Loss(logs))
        }
    }
}
