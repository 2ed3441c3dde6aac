// crates/thkx-store/src/store.rs
//
// Snapshot + journal store over a plain directory.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use thkx_core::LedgerError;
use thkx_ledger::{Operation, ThkxLedger};

/// Storage-layer error type.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A journaled operation failed on replay — the journal and snapshot
    /// disagree, which means the data directory was tampered with or mixed
    /// between ledgers.
    #[error("Journal replay failed at line {line}: {source}")]
    Replay {
        line: usize,
        #[source]
        source: LedgerError,
    },

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// File-backed snapshot + journal persistence for one ledger.
pub struct LedgerStore {
    dir: PathBuf,
}

impl LedgerStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn snapshot_path(&self) -> PathBuf {
        self.dir.join("snapshot.json")
    }

    fn journal_path(&self) -> PathBuf {
        self.dir.join("journal.jsonl")
    }

    /// True once a snapshot exists (i.e. the ledger was initialized).
    pub fn is_initialized(&self) -> bool {
        self.snapshot_path().exists()
    }

    /// Write the genesis snapshot and an empty journal.
    pub fn initialize(&self, ledger: &ThkxLedger) -> Result<(), StoreError> {
        self.write_snapshot(ledger)?;
        File::create(self.journal_path())?;
        Ok(())
    }

    /// Load the snapshot and replay any journaled operations on top.
    pub fn load(&self) -> Result<ThkxLedger, StoreError> {
        let snapshot = fs::read_to_string(self.snapshot_path())?;
        let mut ledger: ThkxLedger = serde_json::from_str(&snapshot)?;

        let journal = self.journal_path();
        if journal.exists() {
            let reader = BufReader::new(File::open(journal)?);
            for (idx, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let op: Operation = serde_json::from_str(&line)?;
                ledger
                    .apply(&op)
                    .map_err(|source| StoreError::Replay { line: idx + 1, source })?;
            }
        }
        Ok(ledger)
    }

    /// Apply `op` to the in-memory ledger and journal it on success.
    pub fn commit(&self, ledger: &mut ThkxLedger, op: &Operation) -> Result<(), StoreError> {
        ledger.apply(op)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.journal_path())?;
        let line = serde_json::to_string(op)?;
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }

    /// Fold the journal into a fresh snapshot and truncate it.
    /// `ledger` must be the fully replayed in-memory state.
    pub fn compact(&self, ledger: &ThkxLedger) -> Result<(), StoreError> {
        self.write_snapshot(ledger)?;
        File::create(self.journal_path())?;
        Ok(())
    }

    fn write_snapshot(&self, ledger: &ThkxLedger) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(ledger)?;
        // Write-then-rename so a crash never leaves a torn snapshot.
        let tmp = self.dir.join("snapshot.json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, self.snapshot_path())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thkx_core::{Address, Thkx, WEI_PER_THKX};
    use thkx_ledger::LedgerConfig;

    const T0: u64 = 1_700_000_000;

    fn addr(last: u8) -> Address {
        let mut b = [0u8; 20];
        b[19] = last;
        Address(b)
    }

    fn temp_dir(label: &str) -> PathBuf {
        let pid = std::process::id();
        std::env::temp_dir().join(format!("thkx_store_test_{label}_{pid}"))
    }

    fn genesis() -> ThkxLedger {
        let mut ledger = ThkxLedger::new(addr(1), LedgerConfig::default(), T0);
        ledger
            .mint(addr(1), addr(1), Thkx::from_whole(700_000_000))
            .unwrap();
        ledger
    }

    #[test]
    fn test_initialize_and_load_round_trip() {
        let dir = temp_dir("init");
        let _ = fs::remove_dir_all(&dir);
        let store = LedgerStore::open(&dir).unwrap();
        assert!(!store.is_initialized());

        let ledger = genesis();
        store.initialize(&ledger).unwrap();
        assert!(store.is_initialized());

        let loaded = store.load().unwrap();
        assert_eq!(loaded.total_supply(), Thkx::from_whole(700_000_000));
        assert_eq!(loaded.owner(), addr(1));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_commit_then_load_replays_journal() {
        let dir = temp_dir("commit");
        let _ = fs::remove_dir_all(&dir);
        let store = LedgerStore::open(&dir).unwrap();
        let mut ledger = genesis();
        store.initialize(&ledger).unwrap();

        store
            .commit(
                &mut ledger,
                &Operation::Stake {
                    caller: addr(1),
                    amount: 50 * WEI_PER_THKX,
                    now: T0,
                },
            )
            .unwrap();
        store
            .commit(
                &mut ledger,
                &Operation::DepositRewards {
                    caller: addr(1),
                    amount: 1_000 * WEI_PER_THKX,
                },
            )
            .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.contract_info(), ledger.contract_info());
        assert_eq!(loaded.balance_of(addr(1)), ledger.balance_of(addr(1)));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_failed_commit_not_journaled() {
        let dir = temp_dir("failed");
        let _ = fs::remove_dir_all(&dir);
        let store = LedgerStore::open(&dir).unwrap();
        let mut ledger = genesis();
        store.initialize(&ledger).unwrap();

        let bad = Operation::Mint {
            caller: addr(9),
            to: addr(9),
            amount: WEI_PER_THKX,
        };
        assert!(store.commit(&mut ledger, &bad).is_err());

        // Journal stays empty, load still works.
        let loaded = store.load().unwrap();
        assert_eq!(loaded.total_supply(), Thkx::from_whole(700_000_000));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_compact_folds_journal_into_snapshot() {
        let dir = temp_dir("compact");
        let _ = fs::remove_dir_all(&dir);
        let store = LedgerStore::open(&dir).unwrap();
        let mut ledger = genesis();
        store.initialize(&ledger).unwrap();

        store
            .commit(
                &mut ledger,
                &Operation::Stake {
                    caller: addr(1),
                    amount: 10 * WEI_PER_THKX,
                    now: T0,
                },
            )
            .unwrap();
        store.compact(&ledger).unwrap();

        let journal = fs::read_to_string(dir.join("journal.jsonl")).unwrap();
        assert!(journal.is_empty());
        let loaded = store.load().unwrap();
        assert_eq!(
            loaded.contract_info().total_staked,
            Thkx::from_whole(10)
        );
        let _ = fs::remove_dir_all(&dir);
    }
}
