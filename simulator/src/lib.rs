//! Monte Carlo harness over the greenfelt engine.
//!
//! Plays a fixed per-game policy for many trials straight through the
//! dispatcher and aggregates net results into return-to-player and
//! house-edge estimates with standard errors. Multi-step policies read the
//! engine's own outcome log lines (as a real client would) to decide their
//! next move.

use greenfelt_engine::casino::{init_game, process_game_move, settle, GameRng};
use greenfelt_types::casino::{BetSettlement, GameSession, GameType, RoundResult};
use serde::Serialize;

/// Running aggregate of per-trial net results.
#[derive(Default, Clone, Debug)]
pub struct Stats {
    trials: u64,
    total_net: f64,
    total_net_sq: f64,
    total_wagered: f64,
}

impl Stats {
    pub fn add(&mut self, net: i64, wagered: u64) {
        let n = net as f64;
        self.trials += 1;
        self.total_net += n;
        self.total_net_sq += n * n;
        self.total_wagered += wagered as f64;
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn mean_net(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.total_net / self.trials as f64
        }
    }

    pub fn mean_wagered(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.total_wagered / self.trials as f64
        }
    }

    /// Fraction of each wagered chip the house keeps (negative when the
    /// game favors the player).
    pub fn house_edge(&self) -> f64 {
        let mw = self.mean_wagered();
        if mw == 0.0 {
            0.0
        } else {
            -self.mean_net() / mw
        }
    }

    /// Return-to-player ratio (1.0 = break-even).
    pub fn rtp(&self) -> f64 {
        1.0 - self.house_edge()
    }

    /// Standard error of the per-trial net.
    pub fn stderr(&self) -> f64 {
        if self.trials <= 1 {
            return 0.0;
        }
        let mean = self.mean_net();
        let var = (self.total_net_sq / self.trials as f64) - mean * mean;
        let var = if var < 0.0 { 0.0 } else { var };
        (var / self.trials as f64).sqrt()
    }
}

/// Simulation parameters.
#[derive(Clone, Copy, Debug)]
pub struct SimConfig {
    pub trials: u64,
    pub bet: u64,
    pub seed: [u8; 32],
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            trials: 10_000,
            // A large, round stake keeps basis-point payouts exact
            bet: 10_000,
            seed: seed_from_u64(42),
        }
    }
}

/// Expand a small seed into the 32-byte engine seed.
pub fn seed_from_u64(value: u64) -> [u8; 32] {
    let mut seed = [0u8; 32];
    for (i, chunk) in seed.chunks_mut(8).enumerate() {
        chunk.copy_from_slice(&value.wrapping_add(i as u64).to_be_bytes());
    }
    seed
}

/// Per-game simulation summary.
#[derive(Clone, Debug, Serialize)]
pub struct GameReport {
    pub game: String,
    pub trials: u64,
    pub wins: u64,
    pub pushes: u64,
    pub losses: u64,
    pub rtp: f64,
    pub house_edge: f64,
    pub stderr: f64,
}

/// Run one game for `config.trials` rounds under the fixed policy.
pub fn simulate(game_type: GameType, config: &SimConfig) -> GameReport {
    let mut stats = Stats::default();
    let mut wins = 0u64;
    let mut pushes = 0u64;
    let mut losses = 0u64;

    for trial in 0..config.trials {
        let settlement = play_round(game_type, config, trial + 1);
        match settlement.result {
            RoundResult::Win => wins += 1,
            RoundResult::Push => pushes += 1,
            RoundResult::Loss => losses += 1,
        }
        let net = settlement.win_amount as i64 - settlement.bet as i64;
        stats.add(net, settlement.bet);
    }

    GameReport {
        game: game_type.id().to_string(),
        trials: stats.trials(),
        wins,
        pushes,
        losses,
        rtp: stats.rtp(),
        house_edge: stats.house_edge(),
        stderr: stats.stderr(),
    }
}

/// Play a single session to completion under the policy for its game.
fn play_round(game_type: GameType, config: &SimConfig, session_id: u64) -> BetSettlement {
    let mut session = GameSession {
        id: session_id,
        player: "simulator".to_string(),
        game_type,
        bet: config.bet,
        state_blob: vec![],
        move_count: 0,
        created_at: 0,
        is_complete: false,
    };

    let mut rng = GameRng::new(&config.seed, session.id, 0);
    let mut result = init_game(&mut session, &mut rng);

    let mut guard = 0;
    while !session.is_complete {
        let payload = next_move(&session, &result);
        let mut rng = GameRng::new(&config.seed, session.id, session.move_count + 1);
        result = process_game_move(&mut session, &payload, &mut rng)
            .expect("policy only submits valid moves");
        guard += 1;
        assert!(guard < 64, "policy must terminate");
    }

    settle(session.bet, &result)
        .expect("no overflow at simulated stakes")
        .expect("completed session settles")
}

/// Fixed play policy: opening bets for the single-draw games, short
/// conservative lines for the stateful ones.
fn next_move(session: &GameSession, last: &greenfelt_engine::casino::GameResult) -> Vec<u8> {
    match session.game_type {
        GameType::Slots | GameType::Plinko => vec![0],
        GameType::Dice => vec![1],
        GameType::Coinflip => vec![0],
        GameType::Roulette => vec![1, 0],
        GameType::Wheel => vec![1, 0],
        GameType::Baccarat => vec![0],
        GameType::Keno => vec![5, 4, 8, 15, 16, 23],
        GameType::Crash => {
            let mut p = vec![0u8];
            p.extend_from_slice(&20_000u32.to_be_bytes());
            p
        }
        GameType::Mines => match session.move_count {
            0 => vec![0, 5],
            // Reveal three cells, then take the money
            1..=3 => vec![1, session.move_count as u8 - 1],
            _ => vec![2],
        },
        GameType::HiLo => {
            if session.move_count >= 2 {
                return vec![2]; // cash out after two correct guesses
            }
            // Guess toward the larger side of the current rank
            match current_hilo_rank(session) {
                Some(rank) if rank >= 8 => vec![1],
                _ => vec![0],
            }
        }
        GameType::Blackjack => {
            if session.move_count == 0 {
                return vec![0]; // deal
            }
            // Read the engine's own log line to find the hand value
            match last_player_value(last) {
                Some(value) if value < 17 => vec![1], // hit
                _ => vec![2],                         // stand
            }
        }
    }
}

/// Current hi-lo rank from the session state (first state byte).
fn current_hilo_rank(session: &GameSession) -> Option<u8> {
    session.state_blob.first().copied()
}

/// Extract `playerValue` from the last outcome log line.
fn last_player_value(result: &greenfelt_engine::casino::GameResult) -> Option<u8> {
    let line = result.logs().last()?;
    let value: serde_json::Value = serde_json::from_str(line).ok()?;
    value.get("playerValue")?.as_u64().map(|v| v as u8)
}
