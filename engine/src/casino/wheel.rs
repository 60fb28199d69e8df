//! Wheel of fortune game implementation.
//!
//! State blob format:
//! Empty before spin, [segmentIndex:u8] after spin.
//!
//! Payload format:
//! [betType:u8] [value:u8]
//!
//! Bet types:
//! 0 = Number (value = segment number; pays the segment multiplier)
//! 1 = Color (value = color id; flat 2x regardless of segment multiplier)
//! 2 = Multiplier (value = whole multiplier 2/5/10/20/40; pays that multiplier)
//!
//! The wheel has 12 fixed segments; duplicated low segments bias the odds
//! (2x appears three times per color, 40x once). The draw is uniform over
//! the 12 entries, which yields the intended non-uniform multiplier odds.

use super::{CasinoGame, GameError, GameResult, GameRng};
use greenfelt_types::casino::GameSession;

/// Flat payout for a color hit (2x).
const COLOR_BPS: u64 = 20_000;

/// Wheel segment colors.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red = 0,
    Blue = 1,
    Yellow = 2,
    Green = 3,
    Purple = 4,
    Orange = 5,
}

impl Color {
    fn id(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Purple => "purple",
            Color::Orange => "orange",
        }
    }
}

/// One wheel segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub number: u8,
    pub color: Color,
    pub multiplier_bps: u64,
}

const fn segment(number: u8, color: Color, multiplier_bps: u64) -> Segment {
    Segment {
        number,
        color,
        multiplier_bps,
    }
}

/// The fixed 12-segment wheel, in spin order.
const SEGMENTS: [Segment; 12] = [
    segment(1, Color::Red, 20_000),
    segment(2, Color::Blue, 20_000),
    segment(5, Color::Yellow, 50_000),
    segment(10, Color::Green, 100_000),
    segment(1, Color::Red, 20_000),
    segment(2, Color::Blue, 20_000),
    segment(5, Color::Yellow, 50_000),
    segment(20, Color::Purple, 200_000),
    segment(1, Color::Red, 20_000),
    segment(2, Color::Blue, 20_000),
    segment(5, Color::Yellow, 50_000),
    segment(40, Color::Orange, 400_000),
];

/// Wheel bet types.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BetType {
    Number = 0,
    Color = 1,
    Multiplier = 2,
}

impl TryFrom<u8> for BetType {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BetType::Number),
            1 => Ok(BetType::Color),
            2 => Ok(BetType::Multiplier),
            _ => Err(GameError::InvalidPayload),
        }
    }
}

/// Multiplier paid for a bet against the drawn segment (0 = loss).
fn bet_payout(bet_type: BetType, bet_value: u8, drawn: &Segment) -> u64 {
    match bet_type {
        BetType::Number => {
            if bet_value == drawn.number {
                drawn.multiplier_bps
            } else {
                0
            }
        }
        BetType::Color => {
            if bet_value == drawn.color as u8 {
                COLOR_BPS
            } else {
                0
            }
        }
        BetType::Multiplier => {
            // Bet value is the whole multiplier (2, 5, 10, 20, 40)
            if (bet_value as u64) * 10_000 == drawn.multiplier_bps {
                drawn.multiplier_bps
            } else {
                0
            }
        }
    }
}

/// True if any segment could pay this bet.
fn bet_is_on_wheel(bet_type: BetType, bet_value: u8) -> bool {
    SEGMENTS
        .iter()
        .any(|s| bet_payout(bet_type, bet_value, s) > 0)
}

pub struct Wheel;

impl CasinoGame for Wheel {
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

        // A bet no segment could ever pay is malformed, not a guaranteed loss
        if !bet_is_on_wheel(bet_type, bet_value) {
            return Err(GameError::InvalidPayload);
        }

        let index = rng.gen_range_inclusive(0, (SEGMENTS.len() - 1) as u64) as usize;
        let drawn = &SEGMENTS[index];

        session.state_blob = vec![index as u8];
        session.move_count += 1;
        session.is_complete = true;

        let multiplier = bet_payout(bet_type, bet_value, drawn);
        let logs = vec![format!(
            r#"{{"segment":{{"number":{},"color":"{}","multiplier":{}}},"win":{}}}"#,
            drawn.number,
            drawn.color.id(),
            drawn.multiplier_bps,
            multiplier > 0
        )];

        if multiplier > 0 {
            Ok(GameResult::Win(multiplier, logs))
        } else {
            Ok(GameResult::Loss(logs))
        }
    }
}
