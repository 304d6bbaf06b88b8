//! Store settings persistence
//!
//! A single [`StoreSettings`] document in redb, seeded from config defaults
//! on first boot. Reads happen per request, so an admin change (e.g. turning
//! notifications off) applies immediately without a restart.

use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use shared::{StoreSettings, StoreSettingsUpdate};

use crate::orders::store::{StorageError, StorageResult};

/// Table for the settings document: key = "store", value = JSON StoreSettings
const SETTINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("store_settings");

const SETTINGS_KEY: &str = "store";

/// Persisted store settings over a shared redb database.
#[derive(Clone)]
pub struct SettingsService {
    db: Arc<Database>,
}

impl SettingsService {
    /// Open the settings table, seeding defaults when the document is absent.
    pub fn new(db: Arc<Database>, defaults: StoreSettings) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(SETTINGS_TABLE)?;
            if table.get(SETTINGS_KEY)?.is_none() {
                let value = serde_json::to_vec(&defaults)?;
                table.insert(SETTINGS_KEY, value.as_slice())?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Current settings document.
    pub fn get(&self) -> StorageResult<StoreSettings> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SETTINGS_TABLE)?;

        match table.get(SETTINGS_KEY)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            // Seeded in new(); a missing row means the table was tampered with
            None => Err(StorageError::Serialization(serde::de::Error::custom(
                "settings document missing",
            ))),
        }
    }

    /// Merge a partial update into the persisted document and return it.
    pub fn update(&self, update: &StoreSettingsUpdate) -> StorageResult<StoreSettings> {
        let txn = self.db.begin_write()?;
        let merged = {
            let mut table = txn.open_table(SETTINGS_TABLE)?;
            let current: StoreSettings = match table.get(SETTINGS_KEY)?.map(|g| g.value().to_vec())
            {
                Some(bytes) => serde_json::from_slice(&bytes)?,
                None => StoreSettings::default(),
            };
            let merged = current.merged(update);
            let value = serde_json::to_vec(&merged)?;
            table.insert(SETTINGS_KEY, value.as_slice())?;
            merged
        };
        txn.commit()?;
        Ok(merged)
    }
}
