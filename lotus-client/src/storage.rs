//! redb-based durable local persistence
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `drafts` | `"draft"` | `OrderDraft` (JSON) | In-progress order draft |
//! | `holds` | `"hold"` | `HeldSelection` (JSON) | Active table hold + selection |
//!
//! Snapshots are read once on process start and rewritten on every
//! mutation commit. Persistence is last-write-wins per process;
//! cross-tab reconciliation is explicitly out of scope.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::cart::OrderDraft;
use crate::hold::HeldSelection;

/// Table for the order draft snapshot: key = "draft", value = JSON
const DRAFTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("drafts");

/// Table for the hold snapshot: key = "hold", value = JSON
const HOLDS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("holds");

const DRAFT_KEY: &str = "draft";
const HOLD_KEY: &str = "hold";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Draft/hold snapshot store backed by redb
///
/// redb commits with `Durability::Immediate`, so a snapshot survives a
/// killed process as soon as the mutation's commit returns.
#[derive(Clone)]
pub struct DraftStorage {
    db: Arc<Database>,
}

impl DraftStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests and in-process embedding)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(DRAFTS_TABLE)?;
            let _ = write_txn.open_table(HOLDS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Persist the order draft snapshot
    pub fn save_draft(&self, draft: &OrderDraft) -> StorageResult<()> {
        let bytes = serde_json::to_vec(draft)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(DRAFTS_TABLE)?;
            table.insert(DRAFT_KEY, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Load the order draft snapshot, if any
    pub fn load_draft(&self) -> StorageResult<Option<OrderDraft>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DRAFTS_TABLE)?;
        match table.get(DRAFT_KEY)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Remove the order draft snapshot
    pub fn clear_draft(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(DRAFTS_TABLE)?;
            table.remove(DRAFT_KEY)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Persist the hold + selection snapshot
    pub fn save_hold(&self, selection: &HeldSelection) -> StorageResult<()> {
        let bytes = serde_json::to_vec(selection)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(HOLDS_TABLE)?;
            table.insert(HOLD_KEY, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Load the hold + selection snapshot, if any
    pub fn load_hold(&self) -> StorageResult<Option<HeldSelection>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(HOLDS_TABLE)?;
        match table.get(HOLD_KEY)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Remove the hold + selection snapshot
    pub fn clear_hold(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(HOLDS_TABLE)?;
            table.remove(HOLD_KEY)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}
