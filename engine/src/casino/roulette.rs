//! Roulette game implementation.
//!
//! State blob format:
//! Empty before spin, [result:u8] after spin.
//!
//! Payload format:
//! [betType:u8] [value:u8]
//!
//! Bet types:
//! 0 = Straight (single number 0-36, 35x)
//! 1 = Color (value 0=red, 1=black, 2=green, 2x)
//! 2 = OddEven (value 0=odd, 1=even, 2x; zero is neither)
//!
//! Colors come from a parity mapping: zero is green, even pockets are
//! black, odd pockets are red. This is NOT the physical wheel layout;
//! payouts depend on it, so it must not be "corrected" silently.

use super::{CasinoGame, GameError, GameResult, GameRng};
use greenfelt_types::casino::GameSession;

/// Straight-up payout (35x).
const STRAIGHT_BPS: u64 = 350_000;
/// Color and odd/even payout (2x).
const EVEN_MONEY_BPS: u64 = 20_000;

/// Roulette bet types.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BetType {
    Straight = 0,
    Color = 1,
    OddEven = 2,
}

impl TryFrom<u8> for BetType {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BetType::Straight),
            1 => Ok(BetType::Color),
            2 => Ok(BetType::OddEven),
            _ => Err(GameError::InvalidPayload),
        }
    }
}

/// Pocket colors.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red = 0,
    Black = 1,
    Green = 2,
}

impl Color {
    fn id(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Black => "black",
            Color::Green => "green",
        }
    }
}

/// Color of a pocket under the parity mapping.
fn color_of(number: u8) -> Color {
    if number == 0 {
        Color::Green
    } else if number % 2 == 0 {
        Color::Black
    } else {
        Color::Red
    }
}

/// Check if a bet wins for a given result.
fn bet_wins(bet_type: BetType, bet_value: u8, result: u8) -> bool {
    match bet_type {
        BetType::Straight => bet_value == result,
        BetType::Color => color_of(result) as u8 == bet_value,
        BetType::OddEven => {
            // Zero counts as neither odd nor even
            if result == 0 {
                return false;
            }
            let is_even = result % 2 == 0;
            (bet_value == 1 && is_even) || (bet_value == 0 && !is_even)
        }
    }
}

/// Payout multiplier for a winning bet.
fn payout_multiplier(bet_type: BetType) -> u64 {
    match bet_type {
        BetType::Straight => STRAIGHT_BPS,
        BetType::Color | BetType::OddEven => EVEN_MONEY_BPS,
    }
}

pub struct Roulette;

impl CasinoGame for Roulette {
    fn init(session: &mut GameSession, _rng: &mut GameRng) -> GameResult {
        // No initial state needed - waiting for bet
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

        if payload.len() < 2 {
            return Err(GameError::InvalidPayload);
        }

        let bet_type = BetType::try_from(payload[0])?;
        let bet_value = payload[1];

        // Validate bet value per bet type
        match bet_type {
            BetType::Straight => {
                if bet_value > 36 {
                    return Err(GameError::InvalidPayload);
                }
            }
            BetType::Color => {
                if bet_value > 2 {
                    return Err(GameError::InvalidPayload);
                }
            }
            BetType::OddEven => {
                if bet_value > 1 {
                    return Err(GameError::InvalidPayload);
                }
            }
        }

        // Spin the wheel
        let result = rng.spin_roulette();
        session.state_blob = vec![result];
        session.move_count += 1;
        session.is_complete = true;

        let win = bet_wins(bet_type, bet_value, result);
        let logs = vec![format!(
            r#"{{"number":{},"color":"{}","win":{}}}"#,
            result,
            color_of(result).id(),
            win
        )];

        if win {
            Ok(GameResult::Win(payout_multiplier(bet_type), logs))
        } else {
            Ok(GameResult::Loss(logs))
        }
    }
}
