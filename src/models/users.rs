use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use super::ModelError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub created: DateTime<Utc>,
}

/// User accounts. Password hashing is CPU-bound; call these from a blocking
/// context.
pub trait UserModel: Send + Sync + 'static {
    /// Creates an account. Email addresses are unique, compared
    /// case-insensitively.
    fn insert(&self, name: &str, email: &str, password: &str) -> Result<(), ModelError>;

    /// The id of the account matching `email` and `password`.
    fn authenticate(&self, email: &str, password: &str) -> Result<u64, ModelError>;

    fn exists(&self, id: u64) -> Result<bool, ModelError>;

    fn get(&self, id: u64) -> Result<User, ModelError>;
}

#[derive(Debug)]
pub struct MemoryUsers {
    cost: u32,
    inner: RwLock<Accounts>,
}

#[derive(Debug, Default)]
struct Accounts {
    last_id: u64,
    by_email: HashMap<String, u64>,
    rows: HashMap<u64, (User, String)>,
}

impl MemoryUsers {
    /// `cost` is the bcrypt work factor (4..=31).
    pub fn new(cost: u32) -> Self {
        Self { cost, inner: RwLock::default() }
    }
}

impl Default for MemoryUsers {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl UserModel for MemoryUsers {
    fn insert(&self, name: &str, email: &str, password: &str) -> Result<(), ModelError> {
        let hashed = bcrypt::hash(password, self.cost)?;
        let key = email.to_lowercase();

        let mut accounts = self.inner.write();
        if accounts.by_email.contains_key(&key) {
            return Err(ModelError::DuplicateEmail);
        }
        accounts.last_id += 1;
        let id = accounts.last_id;
        let user = User {
            id,
            name: name.to_owned(),
            email: email.to_owned(),
            created: Utc::now(),
        };
        accounts.by_email.insert(key, id);
        accounts.rows.insert(id, (user, hashed));
        Ok(())
    }

    fn authenticate(&self, email: &str, password: &str) -> Result<u64, ModelError> {
        let (id, hashed) = {
            let accounts = self.inner.read();
            let id = *accounts
                .by_email
                .get(&email.to_lowercase())
                .ok_or(ModelError::InvalidCredentials)?;
            let hashed = accounts.rows.get(&id).map(|(_, h)| h.clone()).ok_or(ModelError::NoRecord)?;
            (id, hashed)
        };

        if bcrypt::verify(password, &hashed)? {
            Ok(id)
        } else {
            Err(ModelError::InvalidCredentials)
        }
    }

    fn exists(&self, id: u64) -> Result<bool, ModelError> {
        Ok(self.inner.read().rows.contains_key(&id))
    }

    fn get(&self, id: u64) -> Result<User, ModelError> {
        self.inner
            .read()
            .rows
            .get(&id)
            .map(|(user, _)| user.clone())
            .ok_or(ModelError::NoRecord)
    }
}
