use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::models::Note;

use super::{NoteFilter, NoteStore, StoreError};

#[derive(Default)]
struct Inner {
    next_id: i64,
    notes: BTreeMap<i64, Note>,
}

#[derive(Default)]
pub struct MemoryNoteStore {
    inner: RwLock<Inner>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `now`, or one microsecond past `previous` if the clock has not moved.
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn create(&self, title: String, content: String) -> Result<Note, StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;

        let now = Utc::now();
        let note = Note {
            id: inner.next_id,
            title,
            content,
            created_at: now,
            updated_at: now,
            archived: false,
        };
        inner.notes.insert(note.id, note.clone());

        Ok(note)
    }

    async fn get(&self, id: i64) -> Result<Option<Note>, StoreError> {
        Ok(self.inner.read().await.notes.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Note>, StoreError> {
        Ok(self.inner.read().await.notes.values().cloned().collect())
    }

    async fn list_where(&self, filter: &NoteFilter) -> Result<Vec<Note>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .notes
            .values()
            .filter(|note| filter.matches(note))
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: i64,
        title: String,
        content: String,
        archived: Option<bool>,
    ) -> Result<Option<Note>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(note) = inner.notes.get_mut(&id) else {
            return Ok(None);
        };

        note.title = title;
        note.content = content;
        if let Some(archived) = archived {
            note.archived = archived;
        }
        note.updated_at = next_timestamp(note.updated_at);

        Ok(Some(note.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.notes.remove(&id).is_some())
    }

    async fn count_where(&self, filter: &NoteFilter) -> Result<i64, StoreError> {
        let count = self
            .inner
            .read()
            .await
            .notes
            .values()
            .filter(|note| filter.matches(note))
            .count();

        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.inner.write().await.notes.clear();
        Ok(())
    }
}
