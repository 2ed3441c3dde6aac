// crates/thkx-ledger/src/token.rs
//
// Fungible THKX balance accounting: mint, transfer, allowances.
//
// This is the leaf component every other module moves value through.
// Balances are tracked in wei (1 THKX = 10^18 wei) and all arithmetic is
// checked — overflow surfaces as `LedgerError::Overflow`, never wraps.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use thkx_core::{Address, LedgerError, Thkx, Wei};

/// The THKX fungible token ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenLedger {
    /// Per-account balances in wei.
    balances: HashMap<Address, Wei>,
    /// Owner-authorized spend: allowances[owner][spender] in wei.
    allowances: HashMap<Address, HashMap<Address, Wei>>,
    /// Total minted supply in wei.
    total_supply: Wei,
}

impl TokenLedger {
    /// Create an empty token ledger with zero supply.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` new tokens to `to`, growing the total supply.
    ///
    /// # Errors
    /// - `InvalidAmount` if `amount` is zero.
    /// - `Overflow` if the supply or the recipient balance would overflow.
    pub fn mint(&mut self, to: Address, amount: Thkx) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount("mint of zero".to_string()));
        }
        let new_supply = self
            .total_supply
            .checked_add(amount.wei)
            .ok_or(LedgerError::Overflow)?;
        let balance = self.balances.get(&to).copied().unwrap_or(0);
        let new_balance = balance.checked_add(amount.wei).ok_or(LedgerError::Overflow)?;

        self.total_supply = new_supply;
        self.balances.insert(to, new_balance);
        Ok(())
    }

    /// Move `amount` from `from` to `to`.
    ///
    /// # Errors
    /// - `InvalidAmount` if `amount` is zero.
    /// - `InsufficientBalance` if `from` holds less than `amount`.
    /// - `Overflow` if the recipient balance would overflow.
    pub fn transfer(&mut self, from: Address, to: Address, amount: Thkx) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount("transfer of zero".to_string()));
        }
        let from_balance = self.balances.get(&from).copied().unwrap_or(0);
        if amount.wei > from_balance {
            return Err(LedgerError::InsufficientBalance {
                requested: amount.wei,
                available: from_balance,
            });
        }
        // A self-transfer is a funded no-op; falling through would credit
        // the stale pre-debit balance.
        if from == to {
            return Ok(());
        }
        let to_balance = self.balances.get(&to).copied().unwrap_or(0);
        let new_to = to_balance.checked_add(amount.wei).ok_or(LedgerError::Overflow)?;

        self.balances.insert(from, from_balance - amount.wei);
        self.balances.insert(to, new_to);
        Ok(())
    }

    /// Authorize `spender` to move up to `amount` out of `owner`'s balance.
    /// Replaces any previous allowance for the pair.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: Thkx) {
        self.allowances
            .entry(owner)
            .or_default()
            .insert(spender, amount.wei);
    }

    /// Move `amount` from `from` to `to` on behalf of `spender`,
    /// consuming the corresponding allowance.
    ///
    /// # Errors
    /// - `InsufficientBalance` if the allowance or the source balance is
    ///   below `amount` (the error reports whichever bound was violated).
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Thkx,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance_of(from, spender);
        if amount.wei > allowed.wei {
            return Err(LedgerError::InsufficientBalance {
                requested: amount.wei,
                available: allowed.wei,
            });
        }
        self.transfer(from, to, amount)?;
        self.allowances
            .entry(from)
            .or_default()
            .insert(spender, allowed.wei - amount.wei);
        Ok(())
    }

    /// Balance of `address` (zero for unknown accounts).
    pub fn balance_of(&self, address: Address) -> Thkx {
        Thkx::from_wei(self.balances.get(&address).copied().unwrap_or(0))
    }

    /// Remaining allowance from `owner` to `spender`.
    pub fn allowance_of(&self, owner: Address, spender: Address) -> Thkx {
        let wei = self
            .allowances
            .get(&owner)
            .and_then(|m| m.get(&spender))
            .copied()
            .unwrap_or(0);
        Thkx::from_wei(wei)
    }

    /// Total minted supply.
    pub fn total_supply(&self) -> Thkx {
        Thkx::from_wei(self.total_supply)
    }
}
