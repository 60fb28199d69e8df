//! Baccarat game implementation.
//!
//! State blob format:
//! Empty before the deal, then:
//! [playerLen:u8] [playerRanks:u8×n] [bankerLen:u8] [bankerRanks:u8×n]
//!
//! Payload format:
//! [betType:u8]
//!
//! Bet types:
//! 0 = Player (2x)
//! 1 = Banker (1.95x)
//! 2 = Tie (8x)
//!
//! Ranks are dealt uniformly 1-13 with replacement (no shoe). Card values:
//! Ace through 10 count face value, J/Q/K count zero; totals are mod 10.
//! Third-card rules are a reduced tableau, not full baccarat: the player
//! draws on a two-card total of 5 or less, the banker draws on 6 or less
//! but only when the player stood on two cards.

use super::logging::format_number_list;
use super::{CasinoGame, GameError, GameResult, GameRng};
use greenfelt_types::casino::GameSession;

/// Player win payout (2x).
const PLAYER_BPS: u64 = 20_000;
/// Banker win payout (1.95x).
const BANKER_BPS: u64 = 19_500;
/// Tie payout (8x).
const TIE_BPS: u64 = 80_000;

/// Baccarat bet types.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BetType {
    Player = 0,
    Banker = 1,
    Tie = 2,
}

impl TryFrom<u8> for BetType {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BetType::Player),
            1 => Ok(BetType::Banker),
            2 => Ok(BetType::Tie),
            _ => Err(GameError::InvalidPayload),
        }
    }
}

/// Hand outcomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Winner {
    Player,
    Banker,
    Tie,
}

impl Winner {
    fn id(&self) -> &'static str {
        match self {
            Winner::Player => "player",
            Winner::Banker => "banker",
            Winner::Tie => "tie",
        }
    }
}

/// Card value for a dealt rank: 1-10 face value, J/Q/K zero.
fn card_value(rank: u8) -> u8 {
    if rank > 10 {
        0
    } else {
        rank
    }
}

/// Hand total (mod 10).
fn hand_total(ranks: &[u8]) -> u8 {
    ranks.iter().map(|&r| card_value(r)).sum::<u8>() % 10
}

/// Deal both hands, applying the reduced third-card tableau.
fn deal_hands(rng: &mut GameRng) -> (Vec<u8>, Vec<u8>) {
    let mut player = vec![rng.draw_rank(), rng.draw_rank()];
    let mut banker = vec![rng.draw_rank(), rng.draw_rank()];

    if hand_total(&player) <= 5 {
        player.push(rng.draw_rank());
    }
    if hand_total(&banker) <= 6 && player.len() == 2 {
        banker.push(rng.draw_rank());
    }

    (player, banker)
}

fn winner_of(player_total: u8, banker_total: u8) -> Winner {
    if player_total > banker_total {
        Winner::Player
    } else if banker_total > player_total {
        Winner::Banker
    } else {
        Winner::Tie
    }
}

/// Payout for a bet given the hand winner (0 = loss).
fn bet_payout(bet_type: BetType, winner: Winner) -> u64 {
    match (bet_type, winner) {
        (BetType::Player, Winner::Player) => PLAYER_BPS,
        (BetType::Banker, Winner::Banker) => BANKER_BPS,
        (BetType::Tie, Winner::Tie) => TIE_BPS,
        _ => 0,
    }
}

fn serialize_state(player: &[u8], banker: &[u8]) -> Vec<u8> {
    let mut state = Vec::with_capacity(2 + player.len() + banker.len());
    state.push(player.len() as u8);
    state.extend_from_slice(player);
    state.push(banker.len() as u8);
    state.extend_from_slice(banker);
    state
}

pub struct Baccarat;

impl CasinoGame for Baccarat {
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

        if payload.is_empty() {
            return Err(GameError::InvalidPayload);
        }
        let bet_type = BetType::try_from(payload[0])?;

        let (player, banker) = deal_hands(rng);
        let player_total = hand_total(&player);
        let banker_total = hand_total(&banker);
        let winner = winner_of(player_total, banker_total);

        session.state_blob = serialize_state(&player, &banker);
        session.move_count += 1;
        session.is_complete = true;

        let multiplier = bet_payout(bet_type, winner);
        let logs = vec![format!(
            r#"{{"playerCards":[{}],"bankerCards":[{}],"playerTotal":{},"bankerTotal":{},"winner":"{}"}}"#,
            format_number_list(&player),
            format_number_list(&banker),
            player_total,
            banker_total,
            winner.id()
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

    const SEED: [u8; 32] = [6u8; 32];

    fn create_test_session(bet: u64) -> GameSession {
        GameSession {
            id: 1,
            player: "tester".to_string(),
            game_type: GameType::Baccarat,
            bet,
            state_blob: vec![],
            move_count: 0,
            created_at: 0,
            is_complete: false,
        }
    }

    #[test]
    fn test_card_values() {
        assert_eq!(card_value(1), 1);
        assert_eq!(card_value(9), 9);
        // A 10 counts ten in this variant; only face cards are zero
        assert_eq!(card_value(10), 10);
        assert_eq!(card_value(11), 0);
        assert_eq!(card_value(12), 0);
        assert_eq!(card_value(13), 0);
    }

    #[test]
    fn test_hand_totals_mod_ten() {
        assert_eq!(hand_total(&[9, 9]), 8);
        assert_eq!(hand_total(&[13, 12]), 0);
        assert_eq!(hand_total(&[10, 5]), 5);
        assert_eq!(hand_total(&[4, 3]), 7);
    }

    #[test]
    fn test_winner_of() {
        assert_eq!(winner_of(8, 3), Winner::Player);
        assert_eq!(winner_of(2, 7), Winner::Banker);
        assert_eq!(winner_of(6, 6), Winner::Tie);
    }

    #[test]
    fn test_bet_payouts() {
        assert_eq!(bet_payout(BetType::Player, Winner::Player), 20_000);
        assert_eq!(bet_payout(BetType::Banker, Winner::Banker), 19_500);
        assert_eq!(bet_payout(BetType::Tie, Winner::Tie), 80_000);
        assert_eq!(bet_payout(BetType::Player, Winner::Banker), 0);
        assert_eq!(bet_payout(BetType::Banker, Winner::Tie), 0);
        assert_eq!(bet_payout(BetType::Tie, Winner::Player), 0);
    }

    #[test]
    fn test_third_card_rules() {
        for session_id in 1..=300u64 {
            let mut rng = GameRng::new(&SEED, session_id, 1);
            let (player, banker) = deal_hands(&mut rng);

            // Player draws a third card exactly when the two-card total is <= 5
            let player_two = hand_total(&player[..2]);
            assert_eq!(player.len() == 3, player_two <= 5, "player tableau");

            // Banker only ever draws when the player stood
            let banker_two = hand_total(&banker[..2]);
            if player.len() == 3 {
                assert_eq!(banker.len(), 2, "banker stands behind a drawing player");
            } else {
                assert_eq!(banker.len() == 3, banker_two <= 6, "banker tableau");
            }
        }
    }

    #[test]
    fn test_deal_settles_session() {
        let mut session = create_test_session(100);
        let mut rng = GameRng::new(&SEED, session.id, 0);
        Baccarat::init(&mut session, &mut rng);

        let mut rng = GameRng::new(&SEED, session.id, 1);
        let result = Baccarat::process_move(&mut session, &[0], &mut rng);
        assert!(result.is_ok());
        assert!(session.is_complete);

        // State carries both dealt hands
        let player_len = session.state_blob[0] as usize;
        assert!((2..=3).contains(&player_len));
        let banker_len = session.state_blob[1 + player_len] as usize;
        assert!((2..=3).contains(&banker_len));
        assert_eq!(session.state_blob.len(), 2 + player_len + banker_len);
    }

    #[test]
    fn test_invalid_bet_rejected() {
        let mut session = create_test_session(100);
        let mut rng = GameRng::new(&SEED, session.id, 0);
        Baccarat::init(&mut session, &mut rng);

        let mut rng = GameRng::new(&SEED, session.id, 1);
        let result = Baccarat::process_move(&mut session, &[3], &mut rng);
        assert!(matches!(result, Err(GameError::InvalidPayload)));
    }
}
