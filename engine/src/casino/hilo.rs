//! Hi-Lo game implementation.
//!
//! State blob format:
//! [currentRank:u8] [accumulator:u64 BE] [streak:u32 BE]
//!
//! The accumulator stores the current cash-out multiplier in basis points
//! (15000 = 1.5x) and is recomputed on every correct guess.
//!
//! Payload format:
//! [0] = Higher - guess the next card is strictly higher
//! [1] = Lower - guess the next card is strictly lower
//! [2] = Cashout - take the current multiplier
//!
//! Ranks are drawn uniformly 1-13 with replacement; suits are cosmetic and
//! not modeled. Comparisons are strict and a tied rank ALWAYS loses - there
//! is no push. Guessing higher at a King or lower at an Ace is accepted; it
//! simply cannot win. Each correct guess multiplies the accumulator by 1.5.

use super::{accumulate, CasinoGame, GameError, GameResult, GameRng};
use greenfelt_types::casino::{GameSession, MULTIPLIER_ONE};

/// Per-correct-guess multiplier step (1.5x).
const STEP_BPS: u64 = 15_000;

/// Hi-Lo move types.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    Higher = 0,
    Lower = 1,
    Cashout = 2,
}

impl TryFrom<u8> for Move {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Move::Higher),
            1 => Ok(Move::Lower),
            2 => Ok(Move::Cashout),
            _ => Err(GameError::InvalidPayload),
        }
    }
}

struct HiLoState {
    current_rank: u8,
    accumulator: u64,
    streak: u32,
}

/// Parse state blob into current rank, accumulator, and streak.
fn parse_state(state: &[u8]) -> Result<HiLoState, GameError> {
    if state.len() < 13 {
        return Err(GameError::InvalidState);
    }

    let current_rank = state[0];
    if !(1..=13).contains(&current_rank) {
        return Err(GameError::InvalidState);
    }
    let accumulator = u64::from_be_bytes(state[1..9].try_into().map_err(|_| GameError::InvalidState)?);
    if accumulator < MULTIPLIER_ONE {
        return Err(GameError::InvalidState);
    }
    let streak = u32::from_be_bytes(state[9..13].try_into().map_err(|_| GameError::InvalidState)?);

    Ok(HiLoState {
        current_rank,
        accumulator,
        streak,
    })
}

/// Serialize state to blob.
fn serialize_state(current_rank: u8, accumulator: u64, streak: u32) -> Vec<u8> {
    let mut state = Vec::with_capacity(13);
    state.push(current_rank);
    state.extend_from_slice(&accumulator.to_be_bytes());
    state.extend_from_slice(&streak.to_be_bytes());
    state
}

/// Check if a guess is correct; a tied rank loses either way.
fn guess_correct(mv: Move, current_rank: u8, next_rank: u8) -> bool {
    match mv {
        Move::Higher => next_rank > current_rank,
        Move::Lower => next_rank < current_rank,
        Move::Cashout => false,
    }
}

pub struct HiLo;

impl CasinoGame for HiLo {
    fn init(session: &mut GameSession, rng: &mut GameRng) -> GameResult {
        // Deal the opening card
        let rank = rng.draw_rank();
        session.state_blob = serialize_state(rank, MULTIPLIER_ONE, 0);
        let logs = vec![format!(
            r#"{{"action":"start","card":{},"multiplier":{}}}"#,
            rank, MULTIPLIER_ONE
        )];
        GameResult::Continue(logs)
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
        let state = parse_state(&session.state_blob)?;

        match mv {
            Move::Cashout => {
                session.move_count += 1;
                session.is_complete = true;
                let logs = vec![format!(
                    r#"{{"action":"cashout","card":{},"streak":{},"multiplier":{}}}"#,
                    state.current_rank, state.streak, state.accumulator
                )];
                Ok(GameResult::Win(state.accumulator, logs))
            }
            Move::Higher | Move::Lower => {
                let next_rank = rng.draw_rank();
                session.move_count += 1;

                let guess = if mv == Move::Higher { "higher" } else { "lower" };
                if guess_correct(mv, state.current_rank, next_rank) {
                    let streak = state.streak + 1;
                    let accumulator = accumulate(state.accumulator, STEP_BPS)?;
                    session.state_blob = serialize_state(next_rank, accumulator, streak);
                    let logs = vec![format!(
                        r#"{{"previousCard":{},"nextCard":{},"guess":"{}","correct":true,"streak":{},"multiplier":{}}}"#,
                        state.current_rank, next_rank, guess, streak, accumulator
                    )];
                    Ok(GameResult::Continue(logs))
                } else {
                    // Wrong guess (or tied rank) - the run is over
                    session.state_blob = serialize_state(next_rank, MULTIPLIER_ONE, 0);
                    session.is_complete = true;
                    let logs = vec![format!(
                        r#"{{"previousCard":{},"nextCard":{},"guess":"{}","correct":false,"streak":{}}}"#,
                        state.current_rank, next_rank, guess, state.streak
                    )];
                    Ok(GameResult::Loss(logs))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenfelt_types::casino::GameType;

    const SEED: [u8; 32] = [12u8; 32];

    fn create_test_session(bet: u64) -> GameSession {
        GameSession {
            id: 1,
            player: "tester".to_string(),
            game_type: GameType::HiLo,
            bet,
            state_blob: vec![],
            move_count: 0,
            created_at: 0,
            is_complete: false,
        }
    }

    #[test]
    fn test_guess_comparisons_are_strict() {
        assert!(guess_correct(Move::Higher, 7, 8));
        assert!(!guess_correct(Move::Higher, 7, 7));
        assert!(!guess_correct(Move::Higher, 7, 6));

        assert!(guess_correct(Move::Lower, 7, 6));
        assert!(!guess_correct(Move::Lower, 7, 7));
        assert!(!guess_correct(Move::Lower, 7, 8));
    }

    #[test]
    fn test_higher_at_king_never_wins() {
        for next_rank in 1..=13u8 {
            assert!(!guess_correct(Move::Higher, 13, next_rank));
        }
    }

    #[test]
    fn test_lower_at_ace_never_wins() {
        for next_rank in 1..=13u8 {
            assert!(!guess_correct(Move::Lower, 1, next_rank));
        }
    }

    #[test]
    fn test_init_deals_opening_card() {
        let mut session = create_test_session(100);
        let mut rng = GameRng::new(&SEED, session.id, 0);
        HiLo::init(&mut session, &mut rng);

        let state = parse_state(&session.state_blob).expect("state");
        assert!((1..=13).contains(&state.current_rank));
        assert_eq!(state.accumulator, MULTIPLIER_ONE);
        assert_eq!(state.streak, 0);
        assert!(!session.is_complete);
    }

    #[test]
    fn test_immediate_cashout_returns_stake() {
        let mut session = create_test_session(100);
        let mut rng = GameRng::new(&SEED, session.id, 0);
        HiLo::init(&mut session, &mut rng);

        let mut rng = GameRng::new(&SEED, session.id, 1);
        let result = HiLo::process_move(&mut session, &[2], &mut rng).expect("cashout");
        match result {
            GameResult::Win(bps, _) => assert_eq!(bps, MULTIPLIER_ONE),
            other => panic!("expected stake return, got {:?}", other),
        }
        assert!(session.is_complete);
    }

    #[test]
    fn test_correct_guess_compounds_accumulator() {
        let mut session = create_test_session(100);
        // Force a 2 so "higher" is nearly always right
        session.state_blob = serialize_state(2, MULTIPLIER_ONE, 0);

        let mut move_num = 1u32;
        loop {
            let mut rng = GameRng::new(&SEED, session.id, move_num);
            let result = HiLo::process_move(&mut session, &[0], &mut rng).expect("guess");
            match result {
                GameResult::Continue(_) => {
                    let state = parse_state(&session.state_blob).expect("state");
                    // 1.5^streak with per-step truncation
                    let mut expected = MULTIPLIER_ONE;
                    for _ in 0..state.streak {
                        expected = expected * STEP_BPS / MULTIPLIER_ONE;
                    }
                    assert_eq!(state.accumulator, expected);
                    if state.streak >= 3 {
                        break;
                    }
                }
                GameResult::Loss(_) => {
                    // Unlucky draw ended the run; restart from a fresh forced state
                    session.is_complete = false;
                    session.state_blob = serialize_state(2, MULTIPLIER_ONE, 0);
                }
                other => panic!("unexpected result: {:?}", other),
            }
            move_num += 1;
            assert!(move_num < 1_000, "streak of 3 should occur quickly");
        }
    }

    #[test]
    fn test_wrong_guess_ends_game() {
        let mut session = create_test_session(100);
        // Force a King; "higher" can never win
        session.state_blob = serialize_state(13, MULTIPLIER_ONE, 0);

        let mut rng = GameRng::new(&SEED, session.id, 1);
        let result = HiLo::process_move(&mut session, &[0], &mut rng).expect("guess");
        assert!(matches!(result, GameResult::Loss(_)));
        assert!(session.is_complete);
    }

    #[test]
    fn test_tied_rank_loses() {
        // Scan for a draw that ties the forced rank and assert it loses
        for session_id in 1..=500u64 {
            let mut session = create_test_session(100);
            session.id = session_id;
            session.state_blob = serialize_state(7, MULTIPLIER_ONE, 0);

            let mut rng = GameRng::new(&SEED, session_id, 1);
            let result = HiLo::process_move(&mut session, &[0], &mut rng).expect("guess");
            let state = parse_state(&session.state_blob).expect("state");
            if state.current_rank == 7 {
                assert!(
                    matches!(result, GameResult::Loss(_)),
                    "a tied rank must lose"
                );
                return;
            }
        }
        panic!("expected at least one tied draw in 500 sessions");
    }

    #[test]
    fn test_corrupt_state_rejected() {
        let mut session = create_test_session(100);
        let mut rng = GameRng::new(&SEED, session.id, 0);
        HiLo::init(&mut session, &mut rng);

        session.state_blob.truncate(5);
        let mut rng = GameRng::new(&SEED, session.id, 1);
        let result = HiLo::process_move(&mut session, &[0], &mut rng);
        assert!(matches!(result, Err(GameError::InvalidState)));

        // Rank outside 1-13
        session.state_blob = serialize_state(14, MULTIPLIER_ONE, 0);
        let mut rng = GameRng::new(&SEED, session.id, 1);
        let result = HiLo::process_move(&mut session, &[0], &mut rng);
        assert!(matches!(result, Err(GameError::InvalidState)));
    }
}
