//! Game registry for managing available games.
//!
//! The registry provides:
//! - Centralized listing of supported games
//! - Active/inactive game filtering
//! - Bet limits enforced by the settlement layer
//! - Metadata for UI display (names, descriptions, categories)

use greenfelt_types::casino::GameType;
use std::collections::HashMap;

/// Game category for UI organization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCategory {
    /// Card games (blackjack, baccarat, hi-lo).
    Cards,
    /// Table games (roulette, dice, wheel, keno).
    Table,
    /// Arcade-style games (slots, plinko, crash, mines, coinflip).
    Arcade,
}

/// Metadata about a game for UI display and bet validation.
#[derive(Clone, Debug)]
pub struct GameInfo {
    /// Game type identifier.
    pub game_type: GameType,
    /// Display name.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Category for UI grouping.
    pub category: GameCategory,
    /// Minimum bet (in chips).
    pub min_bet: u64,
    /// Maximum bet (in chips).
    pub max_bet: u64,
    /// Whether the game resolves over multiple moves.
    pub multi_step: bool,
    /// Whether the game is currently active.
    pub active: bool,
}

impl GameInfo {
    const fn new(
        game_type: GameType,
        name: &'static str,
        description: &'static str,
        category: GameCategory,
        min_bet: u64,
        max_bet: u64,
        multi_step: bool,
    ) -> Self {
        Self {
            game_type,
            name,
            description,
            category,
            min_bet,
            max_bet,
            multi_step,
            active: true,
        }
    }
}

/// Registry of available games.
///
/// Static metadata plus per-game active flags; the settlement layer consults
/// it for bet limits and availability before touching the wallet.
#[derive(Clone, Debug)]
pub struct GameRegistry {
    active: HashMap<GameType, bool>,
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRegistry {
    /// Create a new registry with all games active.
    pub fn new() -> Self {
        let mut active = HashMap::new();
        for &game_type in GameType::all() {
            active.insert(game_type, true);
        }
        Self { active }
    }

    /// Get static metadata for a game type.
    pub fn get_info(game_type: GameType) -> GameInfo {
        match game_type {
            GameType::Slots => GameInfo::new(
                GameType::Slots,
                "Slots",
                "Three reels; match symbols for up to 50x.",
                GameCategory::Arcade,
                1,
                100_000,
                false,
            ),
            GameType::Dice => GameInfo::new(
                GameType::Dice,
                "Dice",
                "Call high or low on a 1-100 roll.",
                GameCategory::Table,
                1,
                100_000,
                false,
            ),
            GameType::Coinflip => GameInfo::new(
                GameType::Coinflip,
                "Coinflip",
                "Heads or tails; a correct call pays 1.95x.",
                GameCategory::Arcade,
                1,
                100_000,
                false,
            ),
            GameType::Roulette => GameInfo::new(
                GameType::Roulette,
                "Roulette",
                "Spin the wheel and bet on numbers, colors, or parity.",
                GameCategory::Table,
                1,
                100_000,
                false,
            ),
            GameType::Wheel => GameInfo::new(
                GameType::Wheel,
                "Wheel",
                "Twelve weighted segments, up to 40x.",
                GameCategory::Table,
                1,
                100_000,
                false,
            ),
            GameType::Baccarat => GameInfo::new(
                GameType::Baccarat,
                "Baccarat",
                "Bet on Player, Banker, or Tie.",
                GameCategory::Cards,
                1,
                100_000,
                false,
            ),
            GameType::Keno => GameInfo::new(
                GameType::Keno,
                "Keno",
                "Pick up to ten numbers against a twenty-number draw.",
                GameCategory::Table,
                1,
                100_000,
                false,
            ),
            GameType::Plinko => GameInfo::new(
                GameType::Plinko,
                "Plinko",
                "Drop a ball into one of thirteen multiplier slots.",
                GameCategory::Arcade,
                1,
                100_000,
                false,
            ),
            GameType::Crash => GameInfo::new(
                GameType::Crash,
                "Crash",
                "Pick a cash-out multiplier and beat the crash point.",
                GameCategory::Arcade,
                1,
                100_000,
                false,
            ),
            GameType::Mines => GameInfo::new(
                GameType::Mines,
                "Mines",
                "Reveal safe cells on a 5x5 grid; cash out before a mine.",
                GameCategory::Arcade,
                1,
                50_000,
                true,
            ),
            GameType::HiLo => GameInfo::new(
                GameType::HiLo,
                "Hi-Lo",
                "Predict if the next card is higher or lower.",
                GameCategory::Cards,
                1,
                50_000,
                true,
            ),
            GameType::Blackjack => GameInfo::new(
                GameType::Blackjack,
                "Blackjack",
                "Beat the dealer to 21 without going bust.",
                GameCategory::Cards,
                1,
                50_000,
                true,
            ),
        }
    }

    /// Check if a game is active.
    pub fn is_active(&self, game_type: GameType) -> bool {
        self.active.get(&game_type).copied().unwrap_or(false)
    }

    /// Set a game's active status.
    pub fn set_active(&mut self, game_type: GameType, active: bool) {
        self.active.insert(game_type, active);
    }

    /// Get all active games.
    pub fn active_games(&self) -> Vec<GameType> {
        GameType::all()
            .iter()
            .copied()
            .filter(|gt| self.is_active(*gt))
            .collect()
    }

    /// Get all game info with current active status.
    pub fn all_games_info(&self) -> Vec<GameInfo> {
        GameType::all()
            .iter()
            .map(|&gt| {
                let mut info = Self::get_info(gt);
                info.active = self.is_active(gt);
                info
            })
            .collect()
    }

    /// Get games by category.
    pub fn games_by_category(&self, category: GameCategory) -> Vec<GameType> {
        GameType::all()
            .iter()
            .copied()
            .filter(|&gt| Self::get_info(gt).category == category)
            .collect()
    }
}
