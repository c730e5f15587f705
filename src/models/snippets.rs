use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use super::ModelError;

/// How many snippets [`SnippetModel::latest`] returns at most.
const LATEST_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snippet {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

impl Snippet {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires > now
    }
}

pub trait SnippetModel: Send + Sync + 'static {
    /// Stores a snippet that expires `expires_days` from now; returns its id.
    fn insert(&self, title: &str, content: &str, expires_days: u32) -> Result<u64, ModelError>;

    /// A live snippet by id. Expired snippets are [`ModelError::NoRecord`].
    fn get(&self, id: u64) -> Result<Snippet, ModelError>;

    /// Up to ten live snippets, newest first.
    fn latest(&self) -> Result<Vec<Snippet>, ModelError>;
}

#[derive(Debug, Default)]
pub struct MemorySnippets {
    inner: RwLock<Store>,
}

#[derive(Debug, Default)]
struct Store {
    last_id: u64,
    rows: BTreeMap<u64, Snippet>,
}

impl MemorySnippets {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnippetModel for MemorySnippets {
    fn insert(&self, title: &str, content: &str, expires_days: u32) -> Result<u64, ModelError> {
        let created = Utc::now();
        let expires = created + TimeDelta::days(i64::from(expires_days));

        let mut store = self.inner.write();
        store.last_id += 1;
        let id = store.last_id;
        store.rows.insert(id, Snippet {
            id,
            title: title.to_owned(),
            content: content.to_owned(),
            created,
            expires,
        });
        Ok(id)
    }

    fn get(&self, id: u64) -> Result<Snippet, ModelError> {
        let now = Utc::now();
        self.inner
            .read()
            .rows
            .get(&id)
            .filter(|s| s.is_live(now))
            .cloned()
            .ok_or(ModelError::NoRecord)
    }

    fn latest(&self) -> Result<Vec<Snippet>, ModelError> {
        let now = Utc::now();
        Ok(self.inner
            .read()
            .rows
            .values()
            .rev()
            .filter(|s| s.is_live(now))
            .take(LATEST_LIMIT)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_get() {
        let snippets = MemorySnippets::new();
        let id = snippets.insert("An old silent pond", "A frog jumps into the pond", 7).unwrap();

        let snippet = snippets.get(id).unwrap();
        assert_eq!(snippet.id, id);
        assert_eq!(snippet.title, "An old silent pond");
        assert_eq!(snippet.expires - snippet.created, TimeDelta::days(7));
    }

    #[test]
    fn missing_and_expired_are_no_record() {
        let snippets = MemorySnippets::new();
        assert!(matches!(snippets.get(1), Err(ModelError::NoRecord)));

        let id = snippets.insert("gone", "already", 0).unwrap();
        assert!(matches!(snippets.get(id), Err(ModelError::NoRecord)));
    }

    #[test]
    fn latest_is_newest_first_and_capped() {
        let snippets = MemorySnippets::new();
        for n in 1..=12 {
            snippets.insert(&format!("snippet {n}"), "body", 365).unwrap();
        }
        snippets.insert("expired", "body", 0).unwrap();

        let latest = snippets.latest().unwrap();
        assert_eq!(latest.len(), 10);
        assert_eq!(latest[0].title, "snippet 12");
        assert_eq!(latest[9].title, "snippet 3");
    }
}
