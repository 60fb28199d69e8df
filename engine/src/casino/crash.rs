//! Crash game implementation.
//!
//! State blob format:
//! Empty before launch, [crashPoint:u32 BE] (basis points) after.
//!
//! Payload format:
//! [0] [target:u32 BE] - launch with a pre-selected cash-out multiplier in
//! basis points (must be above 1.00x).
//!
//! The authoritative crash point is a single draw, uniform over [1.0, 11.0)
//! in basis-point steps. Note this is a flat distribution, not an
//! exponential house-edge curve. The bet wins its chosen target iff the
//! target is at or below the crash point. The client's live climbing
//! multiplier is cosmetic only and never decides the outcome.

use super::payload::parse_u32_be;
use super::{CasinoGame, GameError, GameResult, GameRng};
use greenfelt_types::casino::{GameSession, MULTIPLIER_ONE};

/// Lowest possible crash point (1.00x).
const CRASH_MIN_BPS: u64 = MULTIPLIER_ONE;
/// Width of the crash-point range (10.00x, exclusive upper bound).
const CRASH_RANGE_BPS: u64 = 100_000;

/// Crash move types.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    Launch = 0,
}

impl TryFrom<u8> for Move {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Move::Launch),
            _ => Err(GameError::InvalidPayload),
        }
    }
}

/// Draw a crash point in basis points, uniform over [1.0, 11.0).
fn draw_crash_point(rng: &mut GameRng) -> u64 {
    CRASH_MIN_BPS + rng.gen_range_inclusive(0, CRASH_RANGE_BPS - 1)
}

pub struct Crash;

impl CasinoGame for Crash {
    fn init(session: &mut GameSession, _rng: &mut GameRng) -> GameResult {
        // No initial state needed - waiting for launch
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
        let target = parse_u32_be(payload, 1)? as u64;

        // A cash-out at or below 1x is not a meaningful bet
        if target <= MULTIPLIER_ONE {
            return Err(GameError::InvalidPayload);
        }

        let crash_point = draw_crash_point(rng);

        session.state_blob = (crash_point as u32).to_be_bytes().to_vec();
        session.move_count += 1;
        session.is_complete = true;

        let success = target <= crash_point;
        let logs = vec![format!(
            r#"{{"crashPoint":{},"cashoutMultiplier":{},"success":{}}}"#,
            crash_point, target, success
        )];

        if success {
            Ok(GameResult::Win(target, logs))
        } else {
            Ok(GameResult::Loss(logs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenfelt_types::casino::GameType;

    const SEED: [u8; 32] = [10u8; 32];

    fn create_test_session(bet: u64) -> GameSession {
        GameSession {
            id: 1,
            player: "tester".to_string(),
            game_type: GameType::Crash,
            bet,
            state_blob: vec![],
            move_count: 0,
            created_at: 0,
            is_complete: false,
        }
    }

    fn launch_payload(target_bps: u32) -> Vec<u8> {
        let mut payload = vec![0u8];
        payload.extend_from_slice(&target_bps.to_be_bytes());
        payload
    }

    #[test]
    fn test_crash_point_range() {
        for session_id in 1..=500u64 {
            let mut rng = GameRng::new(&SEED, session_id, 1);
            let point = draw_crash_point(&mut rng);
            assert!((10_000..110_000).contains(&point));
        }
    }

    #[test]
    fn test_win_pays_chosen_target() {
        let mut session = create_test_session(100);
        let mut rng = GameRng::new(&SEED, session.id, 0);
        Crash::init(&mut session, &mut rng);

        let mut rng = GameRng::new(&SEED, session.id, 1);
        let result =
            Crash::process_move(&mut session, &launch_payload(15_000), &mut rng).expect("launch");

        assert!(session.is_complete);
        let crash_point =
            u32::from_be_bytes(session.state_blob[..4].try_into().expect("state")) as u64;
        match result {
            GameResult::Win(bps, _) => {
                assert_eq!(bps, 15_000);
                assert!(crash_point >= 15_000);
            }
            GameResult::Loss(_) => assert!(crash_point < 15_000),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_target_above_range_always_loses() {
        // 12x can never be at or below a crash point drawn from [1, 11)
        for session_id in 1..=100u64 {
            let mut session = create_test_session(100);
            session.id = session_id;
            let mut rng = GameRng::new(&SEED, session_id, 1);
            let result = Crash::process_move(&mut session, &launch_payload(120_000), &mut rng)
                .expect("launch");
            assert!(matches!(result, GameResult::Loss(_)));
        }
    }

    #[test]
    fn test_invalid_target_rejected() {
        let mut session = create_test_session(100);
        let mut rng = GameRng::new(&SEED, session.id, 0);
        Crash::init(&mut session, &mut rng);

        let mut rng = GameRng::new(&SEED, session.id, 1);
        // At 1x
        let result = Crash::process_move(&mut session, &launch_payload(10_000), &mut rng);
        assert!(matches!(result, Err(GameError::InvalidPayload)));
        // Below 1x
        let result = Crash::process_move(&mut session, &launch_payload(5_000), &mut rng);
        assert!(matches!(result, Err(GameError::InvalidPayload)));
        // Truncated payload
        let result = Crash::process_move(&mut session, &[0, 0, 0], &mut rng);
        assert!(matches!(result, Err(GameError::InvalidPayload)));
    }
}
