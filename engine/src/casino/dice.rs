//! Dice game implementation.
//!
//! State blob format:
//! Empty before the roll, [roll:u8] after.
//!
//! Payload format:
//! [prediction:u8]
//!
//! Predictions:
//! 0 = Low (wins on 1-50)
//! 1 = High (wins on 51-100)
//!
//! A winning prediction pays 1.95x (2.5% house edge on a coin-fair split).
//! A roll of exactly 50 is a low win, never a high one.

use super::{CasinoGame, GameError, GameResult, GameRng};
use greenfelt_types::casino::GameSession;

/// Payout for a correct prediction (1.95x).
const WIN_BPS: u64 = 19_500;

/// Dice predictions.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prediction {
    Low = 0,
    High = 1,
}

impl TryFrom<u8> for Prediction {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Prediction::Low),
            1 => Ok(Prediction::High),
            _ => Err(GameError::InvalidPayload),
        }
    }
}

impl Prediction {
    fn id(&self) -> &'static str {
        match self {
            Prediction::Low => "low",
            Prediction::High => "high",
        }
    }
}

/// Check if a prediction wins for a given roll (1-100).
fn prediction_wins(prediction: Prediction, roll: u8) -> bool {
    match prediction {
        Prediction::High => roll > 50,
        Prediction::Low => roll <= 50,
    }
}

pub struct Dice;

impl CasinoGame for Dice {
    fn init(session: &mut GameSession, _rng: &mut GameRng) -> GameResult {
        // No initial state needed - waiting for the prediction
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
        let prediction = Prediction::try_from(payload[0])?;

        let roll = rng.roll_die(100);
        session.state_blob = vec![roll];
        session.move_count += 1;
        session.is_complete = true;

        let win = prediction_wins(prediction, roll);
        let logs = vec![format!(
            r#"{{"roll":{},"prediction":"{}","win":{}}}"#,
            roll,
            prediction.id(),
            win
        )];

        if win {
            Ok(GameResult::Win(WIN_BPS, logs))
        } else {
            Ok(GameResult::Loss(logs))
        }
    }
}
