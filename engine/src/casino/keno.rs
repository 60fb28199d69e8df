//! Keno game implementation.
//!
//! State blob format:
//! Empty before the draw, then [drawn:u8×20] [matches:u8].
//!
//! Payload format:
//! [count:u8] [numbers:u8×count]
//!
//! The player selects 1-10 distinct numbers in 1-80; the house draws 20
//! unique numbers. The payout is looked up from a fixed table keyed by
//! (spots selected, spots matched); combinations without an entry pay 0.

use super::logging::format_number_list;
use super::{CasinoGame, GameError, GameResult, GameRng};
use greenfelt_types::casino::GameSession;

/// Numbers drawn by the house each round.
const DRAW_COUNT: usize = 20;
/// Pool of selectable numbers (1..=POOL_SIZE).
const POOL_SIZE: usize = 80;
/// Maximum spots a player may select.
const MAX_SPOTS: usize = 10;

/// Payout multiplier for (spots selected, spots matched).
///
/// Combinations without an entry pay 0.
fn payout_bps(spots: usize, matches: usize) -> u64 {
    let whole: u64 = match (spots, matches) {
        (1, 1) => 3,
        (2, 2) => 12,
        (3, 2) => 1,
        (3, 3) => 42,
        (4, 2) => 1,
        (4, 3) => 4,
        (4, 4) => 142,
        (5, 3) => 1,
        (5, 4) => 12,
        (5, 5) => 810,
        (6, 3) => 1,
        (6, 4) => 3,
        (6, 5) => 72,
        (6, 6) => 1_800,
        (7, 4) => 1,
        (7, 5) => 21,
        (7, 6) => 400,
        (7, 7) => 7_000,
        (8, 5) => 12,
        (8, 6) => 98,
        (8, 7) => 1_652,
        (8, 8) => 25_000,
        (9, 5) => 5,
        (9, 6) => 44,
        (9, 7) => 335,
        (9, 8) => 4_700,
        (9, 9) => 25_000,
        (10, 5) => 2,
        (10, 6) => 24,
        (10, 7) => 142,
        (10, 8) => 1_000,
        (10, 9) => 4_500,
        (10, 10) => 25_000,
        _ => 0,
    };
    whole * 10_000
}

/// Validate and extract the player's selections from the payload.
fn parse_selections(payload: &[u8]) -> Result<Vec<u8>, GameError> {
    if payload.is_empty() {
        return Err(GameError::InvalidPayload);
    }
    let count = payload[0] as usize;
    if count == 0 || count > MAX_SPOTS || payload.len() < 1 + count {
        return Err(GameError::InvalidPayload);
    }
    let selections = payload[1..1 + count].to_vec();
    if selections
        .iter()
        .any(|&n| n == 0 || n as usize > POOL_SIZE)
    {
        return Err(GameError::InvalidPayload);
    }
    // Selections must be distinct
    let mut sorted = selections.clone();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != selections.len() {
        return Err(GameError::InvalidPayload);
    }
    Ok(selections)
}

pub struct Keno;

impl CasinoGame for Keno {
    fn init(session: &mut GameSession, _rng: &mut GameRng) -> GameResult {
        // No initial state needed - waiting for selections
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

        let selections = parse_selections(payload)?;

        // 20 unique numbers out of 1..=80
        let drawn: Vec<u8> = rng
            .sample_unique(POOL_SIZE, DRAW_COUNT)
            .into_iter()
            .map(|n| (n + 1) as u8)
            .collect();

        let matches = selections.iter().filter(|n| drawn.contains(n)).count();

        let mut state = drawn.clone();
        state.push(matches as u8);
        session.state_blob = state;
        session.move_count += 1;
        session.is_complete = true;

        let multiplier = payout_bps(selections.len(), matches);
        let logs = vec![format!(
            r#"{{"drawnNumbers":[{}],"selectedNumbers":[{}],"matches":{},"multiplier":{}}}"#,
            format_number_list(&drawn),
            format_number_list(&selections),
            matches,
            multiplier
        )];

        if multiplier > 0 {
            Ok(GameResult::Win(multiplier, logs))
        } else {
            Ok(GameResult::Loss(logs))
        }
    }
}
