//! Task model over the `tasks` table

use std::sync::Arc;

use serde_json::Value;

use crate::models::i64_field;
use crate::store::{JsonStore, Record};
use crate::WebResult;

const TABLE: &str = "tasks";

/// Task persistence for the kanban board
#[derive(Clone)]
pub struct TaskModel {
    store: Arc<JsonStore>,
}

impl TaskModel {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    /// All tasks sorted by board position. The sort is stable, so tasks
    /// sharing a position keep their stored order.
    pub fn get_all(&self) -> Vec<Record> {
        let mut tasks = self.store.read_table(TABLE);
        tasks.sort_by_key(|task| i64_field(task, "position"));
        tasks
    }

    /// Create a task; `status` defaults to `todo`, `position` to 0
    pub fn create(&self, mut fields: Record) -> WebResult<u64> {
        fields
            .entry("status".to_string())
            .or_insert_with(|| Value::from("todo"));
        fields
            .entry("position".to_string())
            .or_insert_with(|| Value::from(0));

        self.store.insert(TABLE, fields)
    }

    pub fn update(&self, id: u64, fields: Record) -> WebResult<bool> {
        self.store.update(TABLE, id, fields)
    }

    pub fn delete(&self, id: u64) -> WebResult<bool> {
        self.store.delete(TABLE, id)
    }

    /// Move a task on the board: rewrite status and position, carrying every
    /// other field through unchanged
    pub fn update_status(&self, id: u64, status: &str, position: i64) -> WebResult<bool> {
        let Some(mut task) = self.store.find_by_id(TABLE, id) else {
            return Ok(false);
        };

        task.insert("status".to_string(), Value::from(status));
        task.insert("position".to_string(), Value::from(position));

        self.store.update(TABLE, id, task)
    }

    pub fn get_by_status(&self, status: &str) -> Vec<Record> {
        self.store
            .find_all(TABLE, Some(("status", &Value::from(status))))
    }

    pub fn get_by_user(&self, user_id: u64) -> Vec<Record> {
        self.store
            .find_all(TABLE, Some(("user_id", &Value::from(user_id))))
    }
}
