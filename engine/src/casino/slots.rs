//! Slots game implementation.
//!
//! State blob format:
//! Empty before spin, [reel1:u8] [reel2:u8] [reel3:u8] after spin.
//!
//! Payload format:
//! [0] = Spin
//!
//! Three reels, each an independent uniform draw over six symbols. Payouts:
//! - Triple diamond: 50x
//! - Triple seven: 25x
//! - Any other triple: 10x
//! - Any pair: 2x

use super::{CasinoGame, GameError, GameResult, GameRng};
use greenfelt_types::casino::GameSession;

/// Symbol identifiers, in reel order.
const SYMBOLS: [&str; 6] = ["cherry", "lemon", "bell", "star", "diamond", "seven"];

const DIAMOND: u8 = 4;
const SEVEN: u8 = 5;

/// Triple-diamond jackpot (50x).
const TRIPLE_DIAMOND_BPS: u64 = 500_000;
/// Triple-seven (25x).
const TRIPLE_SEVEN_BPS: u64 = 250_000;
/// Any other triple (10x).
const TRIPLE_BPS: u64 = 100_000;
/// Any pair (2x).
const PAIR_BPS: u64 = 20_000;

/// Slots move types.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    Spin = 0,
}

impl TryFrom<u8> for Move {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Move::Spin),
            _ => Err(GameError::InvalidPayload),
        }
    }
}

/// Multiplier for a spin result.
fn spin_multiplier(reels: [u8; 3]) -> u64 {
    let [a, b, c] = reels;
    if a == b && b == c {
        match a {
            DIAMOND => TRIPLE_DIAMOND_BPS,
            SEVEN => TRIPLE_SEVEN_BPS,
            _ => TRIPLE_BPS,
        }
    } else if a == b || b == c || a == c {
        PAIR_BPS
    } else {
        0
    }
}

pub struct Slots;

impl CasinoGame for Slots {
    fn init(session: &mut GameSession, _rng: &mut GameRng) -> GameResult {
        // No initial state needed - waiting for the spin
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

        let reels = [
            rng.gen_range_inclusive(0, 5) as u8,
            rng.gen_range_inclusive(0, 5) as u8,
            rng.gen_range_inclusive(0, 5) as u8,
        ];

        session.state_blob = reels.to_vec();
        session.move_count += 1;
        session.is_complete = true;

        let multiplier = spin_multiplier(reels);
        let logs = vec![format!(
            r#"{{"reels":["{}","{}","{}"],"multiplier":{}}}"#,
            SYMBOLS[reels[0] as usize],
            SYMBOLS[reels[1] as usize],
            SYMBOLS[reels[2] as usize],
            multiplier
        )];

        if multiplier > 0 {
            Ok(GameResult::Win(multiplier, logs))
        } else {
            Ok(GameResult::Loss(logs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenfelt_types::casino::GameType;

    const SEED: [u8; 32] = [1u8; 32];

    fn create_test_session(bet: u64) -> GameSession {
        GameSession {
            id: 1,
            player: "tester".to_string(),
            game_type: GameType::Slots,
            bet,
            state_blob: vec![],
            move_count: 0,
            created_at: 0,
            is_complete: false,
        }
    }

    #[test]
    fn test_spin_multiplier_triples() {
        assert_eq!(spin_multiplier([DIAMOND, DIAMOND, DIAMOND]), 500_000);
        assert_eq!(spin_multiplier([SEVEN, SEVEN, SEVEN]), 250_000);
        assert_eq!(spin_multiplier([0, 0, 0]), 100_000);
        assert_eq!(spin_multiplier([2, 2, 2]), 100_000);
    }

    #[test]
    fn test_spin_multiplier_pairs() {
        // Pairs in every position
        assert_eq!(spin_multiplier([1, 1, 3]), 20_000);
        assert_eq!(spin_multiplier([3, 1, 1]), 20_000);
        assert_eq!(spin_multiplier([1, 3, 1]), 20_000);
        // Diamonds pair like any other symbol
        assert_eq!(spin_multiplier([DIAMOND, DIAMOND, 0]), 20_000);
    }

    #[test]
    fn test_spin_multiplier_miss() {
        assert_eq!(spin_multiplier([0, 1, 2]), 0);
        assert_eq!(spin_multiplier([3, 4, 5]), 0);
    }

    #[test]
    fn test_spin_completes_game() {
        let mut session = create_test_session(100);
        let mut rng = GameRng::new(&SEED, session.id, 0);
        Slots::init(&mut session, &mut rng);
        assert!(!session.is_complete);

        let mut rng = GameRng::new(&SEED, session.id, 1);
        let result = Slots::process_move(&mut session, &[0], &mut rng).expect("spin");
        assert!(session.is_complete);
        assert_eq!(session.state_blob.len(), 3);
        assert!(session.state_blob.iter().all(|&s| s < 6));
        assert!(matches!(
            result,
            GameResult::Win(..) | GameResult::Loss(..)
        ));
    }

    #[test]
    fn test_unknown_move_rejected() {
        let mut session = create_test_session(100);
        let mut rng = GameRng::new(&SEED, session.id, 0);
        Slots::init(&mut session, &mut rng);

        let mut rng = GameRng::new(&SEED, session.id, 1);
        let result = Slots::process_move(&mut session, &[9], &mut rng);
        assert!(matches!(result, Err(GameError::InvalidPayload)));
        assert!(!session.is_complete);
    }

    #[test]
    fn test_cannot_spin_twice() {
        let mut session = create_test_session(100);
        let mut rng = GameRng::new(&SEED, session.id, 0);
        Slots::init(&mut session, &mut rng);

        let mut rng = GameRng::new(&SEED, session.id, 1);
        Slots::process_move(&mut session, &[0], &mut rng).expect("spin");

        let mut rng = GameRng::new(&SEED, session.id, 2);
        let result = Slots::process_move(&mut session, &[0], &mut rng);
        assert!(matches!(result, Err(GameError::GameAlreadyComplete)));
    }
}
