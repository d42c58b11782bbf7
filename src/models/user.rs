//! User model: CRUD and credential verification over the `users` table

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde_json::Value;

use crate::store::{JsonStore, Record};
use crate::{WebError, WebResult};

const TABLE: &str = "users";

/// Form fields for creating or editing a user
#[derive(Debug, Clone)]
pub struct UserFields {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// User persistence and authentication
#[derive(Clone)]
pub struct UserModel {
    store: Arc<JsonStore>,
}

impl UserModel {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    pub fn find_by_email(&self, email: &str) -> Option<Record> {
        self.store.find(TABLE, "email", &Value::from(email))
    }

    pub fn find_by_id(&self, id: u64) -> Option<Record> {
        self.store.find_by_id(TABLE, id)
    }

    /// Create a user; the password is argon2-hashed before it touches disk
    /// and an empty role defaults to `user`
    pub fn create(&self, fields: UserFields) -> WebResult<u64> {
        let role = if fields.role.is_empty() {
            "user".to_string()
        } else {
            fields.role
        };

        let mut record = Record::new();
        record.insert("name".to_string(), Value::from(fields.name));
        record.insert("email".to_string(), Value::from(fields.email));
        record.insert(
            "password".to_string(),
            Value::from(hash_password(&fields.password)?),
        );
        record.insert("role".to_string(), Value::from(role));

        self.store.insert(TABLE, record)
    }

    /// Replace a user's fields. An empty password keeps the stored hash;
    /// anything else is re-hashed.
    pub fn update(&self, id: u64, fields: UserFields) -> WebResult<bool> {
        let Some(existing) = self.find_by_id(id) else {
            return Ok(false);
        };

        let password = if fields.password.is_empty() {
            existing
                .get("password")
                .cloned()
                .unwrap_or_else(|| Value::from(""))
        } else {
            Value::from(hash_password(&fields.password)?)
        };

        let mut record = Record::new();
        record.insert("name".to_string(), Value::from(fields.name));
        record.insert("email".to_string(), Value::from(fields.email));
        record.insert("password".to_string(), password);
        record.insert("role".to_string(), Value::from(fields.role));

        self.store.update(TABLE, id, record)
    }

    pub fn delete(&self, id: u64) -> WebResult<bool> {
        self.store.delete(TABLE, id)
    }

    /// All users, password hashes stripped
    pub fn get_all(&self) -> Vec<Record> {
        self.store
            .read_table(TABLE)
            .into_iter()
            .map(|mut user| {
                user.remove("password");
                user
            })
            .collect()
    }

    /// Verify credentials; the returned record has the password stripped
    pub fn authenticate(&self, email: &str, password: &str) -> Option<Record> {
        let mut user = self.find_by_email(email)?;
        let hash = user.get("password").and_then(Value::as_str)?.to_string();

        if verify_password(password, &hash) {
            user.remove("password");
            Some(user)
        } else {
            tracing::debug!("Invalid password for {}", email);
            None
        }
    }
}

/// Hash password using Argon2
fn hash_password(password: &str) -> WebResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| WebError::Password(e.to_string()))
}

/// Verify password against hash
fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
