// crates/thkx-core/src/lib.rs
//
// thkx-core: Core types for the THKX token, staking, and faucet ledger.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines account addresses, the fixed-point token amount type, and the
// protocol-wide error type used throughout the ledger.

pub mod address;
pub mod amount;
pub mod error;

// Re-export key types for ergonomic access from downstream crates.
pub use address::Address;
pub use amount::{Thkx, Wei, WEI_PER_THKX};
pub use error::LedgerError;
