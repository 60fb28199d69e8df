//! Mines game implementation.
//!
//! State blob format (v1):
//! [version:u8=1] [stage:u8] [mineCount:u8]
//! [mines:u32 BE bitmask] [revealed:u32 BE bitmask]
//! [accumulator:u64 BE]
//!
//! The two bitmasks index the 5x5 grid row-major (bit = row * 5 + col).
//! The accumulator is the current cash-out multiplier in basis points and is
//! recomputed by the engine on every reveal; a client-side multiplier is
//! never honored.
//!
//! Stages:
//! 0 = AwaitingStart (mines not placed yet)
//! 1 = Revealing
//!
//! Payload format:
//! [0, mineCount:u8] = Start - place mines (1-24)
//! [1, cell:u8]      = Reveal cell (0-24)
//! [2]               = Cashout at the current accumulator
//!
//! Each safe reveal multiplies the accumulator by 1.2; revealing every safe
//! cell ends the game as a win at the accumulated multiplier; a mine ends it
//! at zero.

use super::logging::format_number_list;
use super::serialization::{StateReader, StateWriter};
use super::{accumulate, CasinoGame, GameError, GameResult, GameRng};
use greenfelt_types::casino::{GameSession, MULTIPLIER_ONE};

/// Grid side length.
const GRID_SIDE: u8 = 5;
/// Total cells in the grid.
const GRID_CELLS: u8 = GRID_SIDE * GRID_SIDE;
/// Per-safe-reveal multiplier step (1.2x).
const STEP_BPS: u64 = 12_000;
/// State blob version.
const STATE_VERSION: u8 = 1;

/// Mines game stages.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    AwaitingStart = 0,
    Revealing = 1,
}

impl TryFrom<u8> for Stage {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Stage::AwaitingStart),
            1 => Ok(Stage::Revealing),
            _ => Err(GameError::InvalidState),
        }
    }
}

/// Mines move types.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    Start = 0,
    Reveal = 1,
    Cashout = 2,
}

impl TryFrom<u8> for Move {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Move::Start),
            1 => Ok(Move::Reveal),
            2 => Ok(Move::Cashout),
            _ => Err(GameError::InvalidPayload),
        }
    }
}

struct MinesState {
    stage: Stage,
    mine_count: u8,
    mines: u32,
    revealed: u32,
    accumulator: u64,
}

impl MinesState {
    fn parse(blob: &[u8]) -> Result<Self, GameError> {
        let mut reader = StateReader::new(blob);
        if reader.read_u8() != Some(STATE_VERSION) {
            return Err(GameError::InvalidState);
        }
        let stage = Stage::try_from(reader.read_u8().ok_or(GameError::InvalidState)?)?;
        let mine_count = reader.read_u8().ok_or(GameError::InvalidState)?;
        let mines = reader.read_u32_be().ok_or(GameError::InvalidState)?;
        let revealed = reader.read_u32_be().ok_or(GameError::InvalidState)?;
        let accumulator = reader.read_u64_be().ok_or(GameError::InvalidState)?;

        // Masks must stay within the grid and the placed mines must agree
        // with the recorded count.
        let grid_mask = (1u32 << GRID_CELLS) - 1;
        if mines & !grid_mask != 0 || revealed & !grid_mask != 0 {
            return Err(GameError::InvalidState);
        }
        match stage {
            Stage::AwaitingStart => {
                if mines != 0 || revealed != 0 || mine_count != 0 {
                    return Err(GameError::InvalidState);
                }
            }
            Stage::Revealing => {
                if mine_count == 0 || mine_count >= GRID_CELLS {
                    return Err(GameError::InvalidState);
                }
                if mines.count_ones() != mine_count as u32 {
                    return Err(GameError::InvalidState);
                }
                // Revealed cells are always safe cells
                if revealed & mines != 0 {
                    return Err(GameError::InvalidState);
                }
            }
        }
        if accumulator < MULTIPLIER_ONE {
            return Err(GameError::InvalidState);
        }

        Ok(Self {
            stage,
            mine_count,
            mines,
            revealed,
            accumulator,
        })
    }

    fn serialize(&self) -> Vec<u8> {
        let mut writer = StateWriter::with_capacity(19);
        writer.push_u8(STATE_VERSION);
        writer.push_u8(self.stage as u8);
        writer.push_u8(self.mine_count);
        writer.push_u32_be(self.mines);
        writer.push_u32_be(self.revealed);
        writer.push_u64_be(self.accumulator);
        writer.into_inner()
    }

    fn safe_cells(&self) -> u32 {
        GRID_CELLS as u32 - self.mine_count as u32
    }

    fn mine_cells(&self) -> Vec<u8> {
        (0..GRID_CELLS).filter(|&c| self.mines & (1 << c) != 0).collect()
    }
}

pub struct Mines;

impl CasinoGame for Mines {
    fn init(session: &mut GameSession, _rng: &mut GameRng) -> GameResult {
        let state = MinesState {
            stage: Stage::AwaitingStart,
            mine_count: 0,
            mines: 0,
            revealed: 0,
            accumulator: MULTIPLIER_ONE,
        };
        session.state_blob = state.serialize();
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
        let mv = Move::try_from(payload[0])?;
        let mut state = MinesState::parse(&session.state_blob)?;

        match mv {
            Move::Start => {
                if state.stage != Stage::AwaitingStart {
                    return Err(GameError::InvalidMove);
                }
                if payload.len() < 2 {
                    return Err(GameError::InvalidPayload);
                }
                let mine_count = payload[1];
                if mine_count == 0 || mine_count >= GRID_CELLS {
                    return Err(GameError::InvalidPayload);
                }

                // Place mines uniformly without replacement
                let mut mines = 0u32;
                for cell in rng.sample_unique(GRID_CELLS as usize, mine_count as usize) {
                    mines |= 1 << cell;
                }

                state.stage = Stage::Revealing;
                state.mine_count = mine_count;
                state.mines = mines;
                session.state_blob = state.serialize();
                session.move_count += 1;

                let logs = vec![format!(
                    r#"{{"action":"start","mineCount":{},"multiplier":{}}}"#,
                    mine_count, state.accumulator
                )];
                Ok(GameResult::Continue(logs))
            }
            Move::Reveal => {
                if state.stage != Stage::Revealing {
                    return Err(GameError::InvalidMove);
                }
                if payload.len() < 2 {
                    return Err(GameError::InvalidPayload);
                }
                let cell = payload[1];
                if cell >= GRID_CELLS {
                    return Err(GameError::InvalidPayload);
                }
                let bit = 1u32 << cell;
                if state.revealed & bit != 0 {
                    return Err(GameError::InvalidMove);
                }

                session.move_count += 1;

                if state.mines & bit != 0 {
                    // Hit a mine - total loss, expose the grid
                    session.state_blob = state.serialize();
                    session.is_complete = true;
                    let logs = vec![format!(
                        r#"{{"action":"reveal","cell":{},"mine":true,"mines":[{}]}}"#,
                        cell,
                        format_number_list(&state.mine_cells())
                    )];
                    return Ok(GameResult::Loss(logs));
                }

                state.revealed |= bit;
                state.accumulator = accumulate(state.accumulator, STEP_BPS)?;
                let revealed_count = state.revealed.count_ones();

                if revealed_count == state.safe_cells() {
                    // Every safe cell revealed - automatic win
                    session.state_blob = state.serialize();
                    session.is_complete = true;
                    let logs = vec![format!(
                        r#"{{"action":"reveal","cell":{},"mine":false,"revealed":{},"multiplier":{},"won":true}}"#,
                        cell, revealed_count, state.accumulator
                    )];
                    return Ok(GameResult::Win(state.accumulator, logs));
                }

                session.state_blob = state.serialize();
                let logs = vec![format!(
                    r#"{{"action":"reveal","cell":{},"mine":false,"revealed":{},"multiplier":{}}}"#,
                    cell, revealed_count, state.accumulator
                )];
                Ok(GameResult::Continue(logs))
            }
            Move::Cashout => {
                if state.stage != Stage::Revealing {
                    return Err(GameError::InvalidMove);
                }

                session.state_blob = state.serialize();
                session.move_count += 1;
                session.is_complete = true;

                let logs = vec![format!(
                    r#"{{"action":"cashout","revealed":{},"multiplier":{}}}"#,
                    state.revealed.count_ones(),
                    state.accumulator
                )];
                Ok(GameResult::Win(state.accumulator, logs))
            }
        }
    }
}
