//! redb-based audit log storage
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `audit_entries` | sequence | JSON `AuditEntry` | Append-only log |
//! | `audit_meta` | name | `u64` | Sequence counter |
//!
//! Entries are written inside a single transaction with their sequence
//! number, so the log has no gaps and no duplicates. There is no update or
//! delete path by construction.

use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use thiserror::Error;

use shared::util::now_millis;

use super::types::{AuditAction, AuditEntry, AuditListResponse, AuditQuery};
use crate::auth::CurrentUser;

/// Table for audit entries: key = sequence, value = JSON-serialized AuditEntry
const AUDIT_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("audit_entries");

/// Table for audit metadata: key = name, value = u64
const AUDIT_META_TABLE: TableDefinition<&str, u64> = TableDefinition::new("audit_meta");

const SEQ_KEY: &str = "seq";

/// Audit storage errors
#[derive(Debug, Error)]
pub enum AuditStorageError {
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

pub type AuditResult<T> = Result<T, AuditStorageError>;

/// Append-only audit log over a shared redb database.
#[derive(Clone)]
pub struct AuditStorage {
    db: Arc<Database>,
}

impl AuditStorage {
    /// Open the audit tables on an existing database handle.
    pub fn new(db: Arc<Database>) -> AuditResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(AUDIT_TABLE)?;
            let mut meta = write_txn.open_table(AUDIT_META_TABLE)?;
            if meta.get(SEQ_KEY)?.is_none() {
                meta.insert(SEQ_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Append one entry, assigning the next sequence number.
    pub fn append(
        &self,
        action: AuditAction,
        entity_type: &str,
        entity_id: Option<String>,
        admin: &CurrentUser,
        details: serde_json::Value,
    ) -> AuditResult<AuditEntry> {
        let txn = self.db.begin_write()?;
        let entry = {
            let mut meta = txn.open_table(AUDIT_META_TABLE)?;
            let next = meta.get(SEQ_KEY)?.map(|g| g.value()).unwrap_or(0) + 1;
            meta.insert(SEQ_KEY, next)?;
            drop(meta);

            let entry = AuditEntry {
                id: next,
                timestamp: now_millis(),
                action,
                entity_type: entity_type.to_string(),
                entity_id,
                admin_id: admin.id.clone(),
                admin_name: Some(admin.username.clone()),
                details,
            };

            let mut table = txn.open_table(AUDIT_TABLE)?;
            let value = serde_json::to_vec(&entry)?;
            table.insert(entry.id, value.as_slice())?;
            entry
        };
        txn.commit()?;
        Ok(entry)
    }

    /// Query the log, newest entries first.
    pub fn query(&self, query: &AuditQuery) -> AuditResult<AuditListResponse> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(AUDIT_TABLE)?;

        let mut matching = Vec::new();
        for result in table.iter()?.rev() {
            let (_key, value) = result?;
            let entry: AuditEntry = serde_json::from_slice(value.value())?;

            if let Some(from) = query.from
                && entry.timestamp < from
            {
                continue;
            }
            if let Some(to) = query.to
                && entry.timestamp > to
            {
                continue;
            }
            if let Some(action) = query.action
                && entry.action != action
            {
                continue;
            }
            if let Some(ref admin_id) = query.admin_id
                && entry.admin_id != *admin_id
            {
                continue;
            }

            matching.push(entry);
        }

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect();

        Ok(AuditListResponse { items, total })
    }
}
