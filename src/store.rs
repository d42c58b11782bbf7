//! Flat-file JSON record store
//!
//! Each table is one pretty-printed JSON array of objects under the data
//! directory. The store owns id assignment and timestamps; every mutation is
//! a read-entire-table, modify-in-memory, write-entire-table cycle held
//! under a per-table lock.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::WebResult;

/// One schema-less entity within a table. Field order is insertion order.
pub type Record = serde_json::Map<String, Value>;

/// Table-oriented CRUD over JSON-encoded files
pub struct JsonStore {
    data_dir: PathBuf,
    table_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl JsonStore {
    /// Create a store rooted at the given data directory.
    ///
    /// The directory is created if missing; failure to create it is the only
    /// storage error worth dying for, and only at startup.
    pub fn new(data_dir: impl Into<PathBuf>) -> WebResult<Self> {
        let data_dir = data_dir.into();

        if !data_dir.exists() {
            tracing::info!("Creating data directory: {}", data_dir.display());
            fs::create_dir_all(&data_dir)?;
        }

        Ok(Self {
            data_dir,
            table_locks: Mutex::new(HashMap::new()),
        })
    }

    /// Directory holding the table files
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", table))
    }

    /// Mutations on one table are serialized through this lock so concurrent
    /// read-modify-write cycles cannot interleave within the process.
    fn table_lock(&self, table: &str) -> Arc<Mutex<()>> {
        let mut locks = self.table_locks.lock().unwrap();
        locks.entry(table.to_string()).or_default().clone()
    }

    /// Load a table's full contents.
    ///
    /// A missing file is an empty table. Unreadable content is also treated
    /// as empty: the read contract never fails, so corruption is logged and
    /// discarded rather than surfaced.
    pub fn read_table(&self, table: &str) -> Vec<Record> {
        let path = self.table_path(table);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_str::<Vec<Record>>(&content) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    "Discarding unreadable table file {}: {}",
                    path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Replace a table's entire contents.
    ///
    /// The array is written pretty-printed (UTF-8, non-ASCII unescaped) to a
    /// temp file and renamed over the target, so readers never observe a
    /// torn file.
    pub fn write_table(&self, table: &str, records: &[Record]) -> WebResult<()> {
        let path = self.table_path(table);
        let json = serde_json::to_string_pretty(records)?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;

        Ok(())
    }

    /// Insert a record, assigning the next id and stamping `created_at`.
    ///
    /// The id is 1 + the highest id ever still present in the table; deleted
    /// ids are never reused while any higher id survives. Caller-supplied
    /// `id`/`created_at` fields are overwritten.
    pub fn insert(&self, table: &str, mut fields: Record) -> WebResult<u64> {
        let lock = self.table_lock(table);
        let _guard = lock.lock().unwrap();

        let mut records = self.read_table(table);

        let max_id = records.iter().filter_map(record_id).max().unwrap_or(0);
        let id = max_id + 1;

        fields.insert("id".to_string(), Value::from(id));
        fields.insert("created_at".to_string(), Value::from(timestamp()));

        records.push(fields);
        self.write_table(table, &records)?;

        Ok(id)
    }

    /// Replace the record with the given id, field for field.
    ///
    /// Returns `Ok(false)` without writing when no record matches. The
    /// original `created_at` is preserved and `updated_at` stamped fresh.
    pub fn update(&self, table: &str, id: u64, mut fields: Record) -> WebResult<bool> {
        let lock = self.table_lock(table);
        let _guard = lock.lock().unwrap();

        let mut records = self.read_table(table);

        let Some(index) = records.iter().position(|r| record_id(r) == Some(id)) else {
            return Ok(false);
        };

        let created_at = records[index]
            .get("created_at")
            .cloned()
            .unwrap_or_else(|| Value::from(timestamp()));

        fields.insert("id".to_string(), Value::from(id));
        fields.insert("created_at".to_string(), created_at);
        fields.insert("updated_at".to_string(), Value::from(timestamp()));

        records[index] = fields;
        self.write_table(table, &records)?;

        Ok(true)
    }

    /// Remove the record with the given id and compact the sequence.
    ///
    /// Surviving records keep their ids and relative order.
    pub fn delete(&self, table: &str, id: u64) -> WebResult<bool> {
        let lock = self.table_lock(table);
        let _guard = lock.lock().unwrap();

        let mut records = self.read_table(table);

        let Some(index) = records.iter().position(|r| record_id(r) == Some(id)) else {
            return Ok(false);
        };

        records.remove(index);
        self.write_table(table, &records)?;

        Ok(true)
    }

    /// First record whose field equals the value, by strict (type-sensitive)
    /// equality
    pub fn find(&self, table: &str, field: &str, value: &Value) -> Option<Record> {
        self.read_table(table)
            .into_iter()
            .find(|record| record.get(field) == Some(value))
    }

    /// Record with the given id
    pub fn find_by_id(&self, table: &str, id: u64) -> Option<Record> {
        self.find(table, "id", &Value::from(id))
    }

    /// All records matching the filter, or the whole table without one.
    /// Stored order is preserved; filtering never re-sorts.
    pub fn find_all(&self, table: &str, filter: Option<(&str, &Value)>) -> Vec<Record> {
        let records = self.read_table(table);

        match filter {
            None => records,
            Some((field, value)) => records
                .into_iter()
                .filter(|record| record.get(field) == Some(value))
                .collect(),
        }
    }
}

fn record_id(record: &Record) -> Option<u64> {
    record.get("id").and_then(Value::as_u64)
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
