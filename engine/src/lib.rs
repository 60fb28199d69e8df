//! Game outcome engine for greenfelt.
//!
//! The engine is a set of per-game settlement state machines plus the thin
//! orchestration that applies their terminal results against a wallet and
//! emits audit events. Every draw comes from a [`GameRng`] derived from an
//! explicit seed, so outcomes are replayable and settlement functions stay
//! free of global state.

pub mod casino;
pub mod layer;
pub mod wallet;

pub use casino::{init_game, process_game_move, settle, GameError, GameResult, GameRng};
pub use layer::{CasinoLayer, EventSink, LayerError, MoveOutcome, SessionStart, VecSink};
pub use wallet::{MemoryWallet, Wallet, WalletError};
