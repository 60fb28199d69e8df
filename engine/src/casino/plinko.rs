//! Plinko game implementation.
//!
//! State blob format:
//! Empty before the drop, [slot:u8] after.
//!
//! Payload format:
//! [0] = Drop
//!
//! One uniform draw over 13 landing slots with a symmetric multiplier curve
//! (0.2x at the edges rising to 10x in the center). There is no physics
//! simulation; any bouncing-ball animation is cosmetic and produced by the
//! client, never by this engine.

use super::{CasinoGame, GameError, GameResult, GameRng};
use greenfelt_types::casino::GameSession;

/// Slot multipliers in board order (basis points).
const SLOT_MULTIPLIERS_BPS: [u64; 13] = [
    2_000, 5_000, 10_000, 15_000, 20_000, 50_000, 100_000, 50_000, 20_000, 15_000, 10_000, 5_000,
    2_000,
];

/// Plinko move types.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    Drop = 0,
}

impl TryFrom<u8> for Move {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Move::Drop),
            _ => Err(GameError::InvalidPayload),
        }
    }
}

pub struct Plinko;

impl CasinoGame for Plinko {
    fn init(session: &mut GameSession, _rng: &mut GameRng) -> GameResult {
        // No initial state needed - waiting for the drop
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
        Move::try_from(payload[0])?;

        let slot = rng.gen_range_inclusive(0, (SLOT_MULTIPLIERS_BPS.len() - 1) as u64) as usize;
        let multiplier = SLOT_MULTIPLIERS_BPS[slot];

        session.state_blob = vec![slot as u8];
        session.move_count += 1;
        session.is_complete = true;

        let logs = vec![format!(
            r#"{{"slot":{},"multiplier":{}}}"#,
            slot, multiplier
        )];

        // Sub-1x slots still pay out a fraction of the stake; they classify
        // as losses at settlement because the multiplier is below 1x.
        if multiplier > 0 {
            Ok(GameResult::Win(multiplier, logs))
        } else {
            Ok(GameResult::Loss(logs))
        }
    }
}
