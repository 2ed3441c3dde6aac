// crates/thkx-store/src/lib.rs
//
// thkx-store: file-backed persistence for the THKX ledger.
//
// Layout inside a data directory:
//   snapshot.json — full serialized `ThkxLedger` at some point in time
//   journal.jsonl — one JSON `Operation` per line, applied after the snapshot
//
// Recovery loads the snapshot and replays the journal in order; committing
// an operation applies it to the in-memory ledger first and appends the
// record only if it succeeded, so the journal never contains failed calls.

pub mod store;

pub use store::{LedgerStore, StoreError};
