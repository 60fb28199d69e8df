//! Blackjack game implementation.
//!
//! Single hand against the dealer: deal, hit, stand. No splits, doubles,
//! insurance, or surrender.
//!
//! State blob format (v1):
//! [version:u8=1]
//! [stage:u8]
//! [playerCount:u8] [playerCards:u8×n]
//! [dealerCount:u8] [dealerCards:u8×n]
//! [deckLen:u8] [deck:u8×n]
//!
//! Cards use the 0..=51 deck encoding; the shuffled remainder of the deck is
//! carried in the blob so hit/stand draw from the same shoe as the deal. The
//! blob is validated on every move: card codes, hand sizes, and cross-hand
//! uniqueness, so a tampered or truncated blob is rejected rather than
//! settled.
//!
//! Stages:
//! 0 = AwaitingDeal
//! 1 = PlayerTurn
//! 2 = Complete
//!
//! Payload format:
//! [0] = Deal
//! [1] = Hit
//! [2] = Stand
//!
//! Values: face cards count 10; aces count 11, downgraded to 1 while the
//! hand would bust. Naturals resolve at the deal: player-only pays 2.5x,
//! both is a push, dealer-only loses. Dealer draws to 17 (stands on all 17s).
//! Dealer bust or a higher player total pays 2x; equal totals push.

use super::cards::{card_rank_one_based, is_valid_card, CARDS_PER_DECK};
use super::logging::format_number_list;
use super::serialization::{StateReader, StateWriter};
use super::{CasinoGame, GameError, GameResult, GameRng};
use greenfelt_types::casino::{GameSession, MULTIPLIER_ONE};

/// Natural blackjack payout (2.5x, i.e. 3:2 on the stake).
const NATURAL_BPS: u64 = 25_000;
/// Standard win payout (2x).
const WIN_BPS: u64 = 20_000;
/// Dealer stands at this value or above.
const DEALER_STAND: u8 = 17;
/// Upper bound on plausible hand sizes; larger hands cannot occur with a
/// single deck before busting.
const MAX_HAND_SIZE: usize = 12;
const STATE_VERSION: u8 = 1;

/// Blackjack game stages.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    AwaitingDeal = 0,
    PlayerTurn = 1,
    Complete = 2,
}

impl TryFrom<u8> for Stage {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Stage::AwaitingDeal),
            1 => Ok(Stage::PlayerTurn),
            2 => Ok(Stage::Complete),
            _ => Err(GameError::InvalidState),
        }
    }
}

/// Blackjack move types.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    Deal = 0,
    Hit = 1,
    Stand = 2,
}

impl TryFrom<u8> for Move {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Move::Deal),
            1 => Ok(Move::Hit),
            2 => Ok(Move::Stand),
            _ => Err(GameError::InvalidPayload),
        }
    }
}

struct BlackjackState {
    stage: Stage,
    player: Vec<u8>,
    dealer: Vec<u8>,
    deck: Vec<u8>,
}

impl BlackjackState {
    fn parse(blob: &[u8]) -> Result<Self, GameError> {
        let mut reader = StateReader::new(blob);
        if reader.read_u8() != Some(STATE_VERSION) {
            return Err(GameError::InvalidState);
        }
        let stage = Stage::try_from(reader.read_u8().ok_or(GameError::InvalidState)?)?;

        let player_count = reader.read_u8().ok_or(GameError::InvalidState)? as usize;
        if player_count > MAX_HAND_SIZE {
            return Err(GameError::InvalidState);
        }
        let player = reader.read_vec(player_count).ok_or(GameError::InvalidState)?;

        let dealer_count = reader.read_u8().ok_or(GameError::InvalidState)? as usize;
        if dealer_count > MAX_HAND_SIZE {
            return Err(GameError::InvalidState);
        }
        let dealer = reader.read_vec(dealer_count).ok_or(GameError::InvalidState)?;

        let deck_len = reader.read_u8().ok_or(GameError::InvalidState)? as usize;
        if deck_len > CARDS_PER_DECK as usize {
            return Err(GameError::InvalidState);
        }
        let deck = reader.read_vec(deck_len).ok_or(GameError::InvalidState)?;

        // Every card must be a valid code and appear at most once across
        // both hands and the remaining deck.
        let mut seen = [false; CARDS_PER_DECK as usize];
        for &card in player.iter().chain(dealer.iter()).chain(deck.iter()) {
            if !is_valid_card(card) || seen[card as usize] {
                return Err(GameError::InvalidState);
            }
            seen[card as usize] = true;
        }

        match stage {
            Stage::AwaitingDeal => {
                if !player.is_empty() || !dealer.is_empty() || !deck.is_empty() {
                    return Err(GameError::InvalidState);
                }
            }
            Stage::PlayerTurn => {
                if player.len() < 2 || dealer.len() < 2 {
                    return Err(GameError::InvalidState);
                }
            }
            Stage::Complete => {}
        }

        Ok(Self {
            stage,
            player,
            dealer,
            deck,
        })
    }

    fn serialize(&self) -> Vec<u8> {
        let mut writer =
            StateWriter::with_capacity(6 + self.player.len() + self.dealer.len() + self.deck.len());
        writer.push_u8(STATE_VERSION);
        writer.push_u8(self.stage as u8);
        writer.push_u8(self.player.len() as u8);
        writer.push_bytes(&self.player);
        writer.push_u8(self.dealer.len() as u8);
        writer.push_bytes(&self.dealer);
        writer.push_u8(self.deck.len() as u8);
        writer.push_bytes(&self.deck);
        writer.into_inner()
    }
}

/// Hand value with the ace-downgrade rule: aces count 11, then drop to 1
/// one at a time while the hand would bust.
fn hand_value(cards: &[u8]) -> u8 {
    let mut value: u16 = 0;
    let mut aces = 0u8;
    for &card in cards {
        let rank = card_rank_one_based(card);
        match rank {
            1 => {
                aces += 1;
                value += 11;
            }
            11..=13 => value += 10,
            r => value += r as u16,
        }
    }
    while value > 21 && aces > 0 {
        value -= 10;
        aces -= 1;
    }
    value as u8
}

/// A natural blackjack: 21 from the first two cards.
fn is_natural(cards: &[u8]) -> bool {
    cards.len() == 2 && hand_value(cards) == 21
}

/// Terminal multiplier for the deal if either side has a natural.
fn naturals_multiplier(player_natural: bool, dealer_natural: bool) -> Option<u64> {
    match (player_natural, dealer_natural) {
        (true, true) => Some(MULTIPLIER_ONE), // both - push
        (true, false) => Some(NATURAL_BPS),   // blackjack pays 3:2
        (false, true) => Some(0),             // dealer natural alone
        (false, false) => None,
    }
}

/// Terminal multiplier after the player stands and the dealer has drawn out.
fn stand_multiplier(player_value: u8, dealer_value: u8) -> u64 {
    if dealer_value > 21 || player_value > dealer_value {
        WIN_BPS
    } else if player_value == dealer_value {
        MULTIPLIER_ONE
    } else {
        0
    }
}

fn terminal_result(multiplier: u64, logs: Vec<String>) -> GameResult {
    if multiplier > 0 {
        GameResult::Win(multiplier, logs)
    } else {
        GameResult::Loss(logs)
    }
}

pub struct Blackjack;

impl CasinoGame for Blackjack {
    fn init(session: &mut GameSession, _rng: &mut GameRng) -> GameResult {
        let state = BlackjackState {
            stage: Stage::AwaitingDeal,
            player: vec![],
            dealer: vec![],
            deck: vec![],
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
        let mut state = BlackjackState::parse(&session.state_blob)?;

        match mv {
            Move::Deal => {
                if state.stage != Stage::AwaitingDeal {
                    return Err(GameError::InvalidMove);
                }

                let mut deck = rng.create_deck();
                for _ in 0..2 {
                    state.player.push(rng.draw_card(&mut deck).ok_or(GameError::DeckExhausted)?);
                }
                for _ in 0..2 {
                    state.dealer.push(rng.draw_card(&mut deck).ok_or(GameError::DeckExhausted)?);
                }
                state.deck = deck;
                session.move_count += 1;

                let player_value = hand_value(&state.player);
                let dealer_value = hand_value(&state.dealer);
                let naturals =
                    naturals_multiplier(is_natural(&state.player), is_natural(&state.dealer));

                let logs = vec![format!(
                    r#"{{"action":"deal","playerCards":[{}],"dealerCards":[{}],"playerValue":{},"dealerValue":{}}}"#,
                    format_number_list(&state.player),
                    format_number_list(&state.dealer),
                    player_value,
                    dealer_value
                )];

                if let Some(multiplier) = naturals {
                    state.stage = Stage::Complete;
                    session.state_blob = state.serialize();
                    session.is_complete = true;
                    return Ok(terminal_result(multiplier, logs));
                }

                state.stage = Stage::PlayerTurn;
                session.state_blob = state.serialize();
                Ok(GameResult::Continue(logs))
            }
            Move::Hit => {
                if state.stage != Stage::PlayerTurn {
                    return Err(GameError::InvalidMove);
                }

                let card = rng.draw_card(&mut state.deck).ok_or(GameError::DeckExhausted)?;
                state.player.push(card);
                session.move_count += 1;

                let player_value = hand_value(&state.player);
                let logs = vec![format!(
                    r#"{{"action":"hit","card":{},"playerValue":{}}}"#,
                    card, player_value
                )];

                if player_value > 21 {
                    // Bust
                    state.stage = Stage::Complete;
                    session.state_blob = state.serialize();
                    session.is_complete = true;
                    return Ok(GameResult::Loss(logs));
                }

                session.state_blob = state.serialize();
                Ok(GameResult::Continue(logs))
            }
            Move::Stand => {
                if state.stage != Stage::PlayerTurn {
                    return Err(GameError::InvalidMove);
                }

                // Dealer draws to 17, stands on all 17s
                let mut dealer_value = hand_value(&state.dealer);
                while dealer_value < DEALER_STAND {
                    let card = rng.draw_card(&mut state.deck).ok_or(GameError::DeckExhausted)?;
                    state.dealer.push(card);
                    dealer_value = hand_value(&state.dealer);
                }

                let player_value = hand_value(&state.player);
                let multiplier = stand_multiplier(player_value, dealer_value);

                state.stage = Stage::Complete;
                session.state_blob = state.serialize();
                session.move_count += 1;
                session.is_complete = true;

                let logs = vec![format!(
                    r#"{{"action":"stand","dealerCards":[{}],"playerValue":{},"dealerValue":{},"multiplier":{}}}"#,
                    format_number_list(&state.dealer),
                    player_value,
                    dealer_value,
                    multiplier
                )];
                Ok(terminal_result(multiplier, logs))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenfelt_types::casino::GameType;

    const SEED: [u8; 32] = [13u8; 32];

    // Card codes: suit = code / 13, rank = code % 13 + 1 (1 = ace)
    const ACE_S: u8 = 0;
    const FIVE_S: u8 = 4;
    const TEN_S: u8 = 9;
    const KING_S: u8 = 12;
    const ACE_H: u8 = 13;
    const FOUR_H: u8 = 16;
    const FIVE_H: u8 = 17;
    const SEVEN_H: u8 = 19;
    const KING_H: u8 = 25;
    const NINE_D: u8 = 34;
    const TEN_D: u8 = 35;
    const SEVEN_C: u8 = 45;
    const TEN_C: u8 = 48;

    fn create_test_session(bet: u64) -> GameSession {
        GameSession {
            id: 1,
            player: "tester".to_string(),
            game_type: GameType::Blackjack,
            bet,
            state_blob: vec![],
            move_count: 0,
            created_at: 0,
            is_complete: false,
        }
    }

    fn session_at_player_turn(player: Vec<u8>, dealer: Vec<u8>, deck: Vec<u8>) -> GameSession {
        let mut session = create_test_session(100);
        let state = BlackjackState {
            stage: Stage::PlayerTurn,
            player,
            dealer,
            deck,
        };
        session.state_blob = state.serialize();
        session
    }

    #[test]
    fn test_hand_values() {
        assert_eq!(hand_value(&[ACE_S, KING_S]), 21);
        assert_eq!(hand_value(&[KING_S, TEN_S, FIVE_S]), 25);
        assert_eq!(hand_value(&[FIVE_S, FOUR_H]), 9);
        // Two aces: one downgrades, 11 + 1 = 12 rather than a 22 bust
        assert_eq!(hand_value(&[ACE_S, ACE_H]), 12);
        // Ace stays high until the hand would bust
        assert_eq!(hand_value(&[ACE_S, FIVE_S]), 16);
        assert_eq!(hand_value(&[ACE_S, FIVE_S, TEN_S]), 16);
        assert_eq!(hand_value(&[ACE_S, ACE_H, NINE_D]), 21);
    }

    #[test]
    fn test_naturals() {
        assert!(is_natural(&[ACE_S, KING_S]));
        assert!(is_natural(&[TEN_S, ACE_H]));
        assert!(!is_natural(&[TEN_S, FIVE_S]));
        // 21 in three cards is not a natural
        assert!(!is_natural(&[SEVEN_H, SEVEN_C, SEVEN_H]));

        assert_eq!(naturals_multiplier(true, false), Some(NATURAL_BPS));
        assert_eq!(naturals_multiplier(true, true), Some(MULTIPLIER_ONE));
        assert_eq!(naturals_multiplier(false, true), Some(0));
        assert_eq!(naturals_multiplier(false, false), None);
    }

    #[test]
    fn test_stand_multipliers() {
        assert_eq!(stand_multiplier(18, 17), WIN_BPS);
        assert_eq!(stand_multiplier(17, 22), WIN_BPS); // dealer bust
        assert_eq!(stand_multiplier(17, 17), MULTIPLIER_ONE);
        assert_eq!(stand_multiplier(17, 18), 0);
        assert_eq!(stand_multiplier(20, 21), 0);
    }

    #[test]
    fn test_deal_produces_two_card_hands() {
        let mut session = create_test_session(100);
        let mut rng = GameRng::new(&SEED, session.id, 0);
        Blackjack::init(&mut session, &mut rng);

        let mut rng = GameRng::new(&SEED, session.id, 1);
        let result = Blackjack::process_move(&mut session, &[0], &mut rng).expect("deal");

        let state = BlackjackState::parse(&session.state_blob).expect("state");
        assert_eq!(state.player.len(), 2);
        assert_eq!(state.dealer.len(), 2);
        assert_eq!(state.deck.len(), 48);

        match result {
            GameResult::Continue(_) => {
                assert_eq!(state.stage, Stage::PlayerTurn);
                assert!(!session.is_complete);
            }
            // Naturals resolve immediately
            GameResult::Win(bps, _) => {
                assert!(bps == NATURAL_BPS || bps == MULTIPLIER_ONE);
                assert!(session.is_complete);
            }
            GameResult::Loss(_) => assert!(session.is_complete),
        }
    }

    #[test]
    fn test_player_natural_pays_three_to_two() {
        // Scan deals until the player holds a natural and the dealer does not
        for session_id in 1..=500u64 {
            let mut session = create_test_session(100);
            session.id = session_id;
            let mut rng = GameRng::new(&SEED, session_id, 0);
            Blackjack::init(&mut session, &mut rng);

            let mut rng = GameRng::new(&SEED, session_id, 1);
            let result = Blackjack::process_move(&mut session, &[0], &mut rng).expect("deal");
            let state = BlackjackState::parse(&session.state_blob).expect("state");

            if is_natural(&state.player) && !is_natural(&state.dealer) {
                match result {
                    GameResult::Win(bps, _) => assert_eq!(bps, NATURAL_BPS),
                    other => panic!("expected natural win, got {:?}", other),
                }
                assert!(session.is_complete);
                return;
            }
        }
        panic!("expected a player natural within 500 deals");
    }

    #[test]
    fn test_hit_into_bust_loses() {
        // Player holds 15; the top of the deck is a king
        let mut session = session_at_player_turn(
            vec![TEN_S, FIVE_H],
            vec![NINE_D, SEVEN_C],
            vec![KING_H],
        );

        let mut rng = GameRng::new(&SEED, session.id, 2);
        let result = Blackjack::process_move(&mut session, &[1], &mut rng).expect("hit");

        assert!(matches!(result, GameResult::Loss(_)));
        assert!(session.is_complete);
        let state = BlackjackState::parse(&session.state_blob).expect("state");
        assert_eq!(hand_value(&state.player), 25);
    }

    #[test]
    fn test_hit_below_21_continues() {
        // Player holds 9; drawing a seven keeps the hand alive at 16
        let mut session = session_at_player_turn(
            vec![FIVE_S, FOUR_H],
            vec![NINE_D, TEN_D],
            vec![SEVEN_C],
        );

        let mut rng = GameRng::new(&SEED, session.id, 2);
        let result = Blackjack::process_move(&mut session, &[1], &mut rng).expect("hit");

        assert!(matches!(result, GameResult::Continue(_)));
        assert!(!session.is_complete);
        let state = BlackjackState::parse(&session.state_blob).expect("state");
        assert_eq!(hand_value(&state.player), 16);
        assert_eq!(state.deck.len(), 0);
    }

    #[test]
    fn test_stand_dealer_stands_on_17() {
        // Dealer already holds 17 and must not draw
        let mut session = session_at_player_turn(
            vec![TEN_S, KING_H],
            vec![TEN_D, SEVEN_C],
            vec![FIVE_S],
        );

        let mut rng = GameRng::new(&SEED, session.id, 2);
        let result = Blackjack::process_move(&mut session, &[2], &mut rng).expect("stand");

        let state = BlackjackState::parse(&session.state_blob).expect("state");
        assert_eq!(state.dealer.len(), 2, "dealer stands on 17");
        match result {
            GameResult::Win(bps, _) => assert_eq!(bps, WIN_BPS), // 20 beats 17
            other => panic!("expected win, got {:?}", other),
        }
    }

    #[test]
    fn test_stand_equal_totals_push() {
        let mut session = session_at_player_turn(
            vec![TEN_S, SEVEN_H],
            vec![TEN_D, SEVEN_C],
            vec![FIVE_S],
        );

        let mut rng = GameRng::new(&SEED, session.id, 2);
        let result = Blackjack::process_move(&mut session, &[2], &mut rng).expect("stand");
        match result {
            GameResult::Win(bps, _) => assert_eq!(bps, MULTIPLIER_ONE),
            other => panic!("expected push, got {:?}", other),
        }
    }

    #[test]
    fn test_stand_dealer_draws_and_busts() {
        // Dealer holds 15 and must draw; the only card is a ten - bust
        let mut session = session_at_player_turn(
            vec![TEN_S, SEVEN_H],
            vec![TEN_D, FIVE_H],
            vec![TEN_C],
        );

        let mut rng = GameRng::new(&SEED, session.id, 2);
        let result = Blackjack::process_move(&mut session, &[2], &mut rng).expect("stand");

        let state = BlackjackState::parse(&session.state_blob).expect("state");
        assert_eq!(state.dealer.len(), 3);
        assert!(hand_value(&state.dealer) > 21);
        match result {
            GameResult::Win(bps, _) => assert_eq!(bps, WIN_BPS),
            other => panic!("expected win on dealer bust, got {:?}", other),
        }
    }

    #[test]
    fn test_moves_out_of_order_rejected() {
        let mut session = create_test_session(100);
        let mut rng = GameRng::new(&SEED, session.id, 0);
        Blackjack::init(&mut session, &mut rng);

        // Hit and stand before the deal
        let mut rng = GameRng::new(&SEED, session.id, 1);
        assert!(matches!(
            Blackjack::process_move(&mut session, &[1], &mut rng),
            Err(GameError::InvalidMove)
        ));
        assert!(matches!(
            Blackjack::process_move(&mut session, &[2], &mut rng),
            Err(GameError::InvalidMove)
        ));

        // Deal twice
        let mut rng = GameRng::new(&SEED, session.id, 1);
        let result = Blackjack::process_move(&mut session, &[0], &mut rng).expect("deal");
        if matches!(result, GameResult::Continue(_)) {
            let mut rng = GameRng::new(&SEED, session.id, 2);
            assert!(matches!(
                Blackjack::process_move(&mut session, &[0], &mut rng),
                Err(GameError::InvalidMove)
            ));
        }
    }

    #[test]
    fn test_tampered_state_rejected() {
        // Duplicate card across player hand and deck
        let mut session = session_at_player_turn(
            vec![TEN_S, FIVE_H],
            vec![NINE_D, SEVEN_C],
            vec![TEN_S],
        );
        let mut rng = GameRng::new(&SEED, session.id, 2);
        assert!(matches!(
            Blackjack::process_move(&mut session, &[1], &mut rng),
            Err(GameError::InvalidState)
        ));

        // Invalid card code
        let mut session = session_at_player_turn(
            vec![52, FIVE_H],
            vec![NINE_D, SEVEN_C],
            vec![],
        );
        let mut rng = GameRng::new(&SEED, session.id, 2);
        assert!(matches!(
            Blackjack::process_move(&mut session, &[1], &mut rng),
            Err(GameError::InvalidState)
        ));

        // Truncated blob
        let mut session = session_at_player_turn(
            vec![TEN_S, FIVE_H],
            vec![NINE_D, SEVEN_C],
            vec![],
        );
        session.state_blob.truncate(3);
        let mut rng = GameRng::new(&SEED, session.id, 2);
        assert!(matches!(
            Blackjack::process_move(&mut session, &[1], &mut rng),
            Err(GameError::InvalidState)
        ));
    }
}
