//! Wallet collaborator boundary.
//!
//! The engine never owns balance storage; it talks to a [`Wallet`] that must
//! apply each debit/credit atomically per request. [`MemoryWallet`] is the
//! in-memory implementation used by tests and the simulator.

use std::collections::HashMap;

/// Errors from wallet operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    #[error("insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds { balance: u64, required: u64 },
    #[error("balance overflow")]
    Overflow,
}

/// Balance storage owned by an external collaborator.
///
/// `apply_delta` performs the read-modify-write for one request as a single
/// atomic step (`&mut self` serializes concurrent plays on one store), which
/// is what keeps concurrent insufficient-funds checks correct.
pub trait Wallet {
    /// Current balance for a player (zero if unknown).
    fn balance(&self, player: &str) -> u64;

    /// Apply a debit then a credit, returning the new balance.
    ///
    /// Fails without mutating if the balance cannot cover the debit or the
    /// credit would overflow.
    fn apply_delta(&mut self, player: &str, debit: u64, credit: u64) -> Result<u64, WalletError>;
}

/// HashMap-backed wallet for tests and simulation.
#[derive(Clone, Debug, Default)]
pub struct MemoryWallet {
    balances: HashMap<String, u64>,
}

impl MemoryWallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit a player unconditionally (test/faucet helper).
    pub fn deposit(&mut self, player: &str, amount: u64) {
        let balance = self.balances.entry(player.to_string()).or_insert(0);
        *balance = balance.saturating_add(amount);
    }
}

impl Wallet for MemoryWallet {
    fn balance(&self, player: &str) -> u64 {
        self.balances.get(player).copied().unwrap_or(0)
    }

    fn apply_delta(&mut self, player: &str, debit: u64, credit: u64) -> Result<u64, WalletError> {
        let balance = self.balance(player);
        if balance < debit {
            return Err(WalletError::InsufficientFunds {
                balance,
                required: debit,
            });
        }
        let new_balance = (balance - debit)
            .checked_add(credit)
            .ok_or(WalletError::Overflow)?;
        self.balances.insert(player.to_string(), new_balance);
        Ok(new_balance)
    }
}
