mod embedded;
pub mod memory;
pub mod postgres;

pub use memory::MemoryNoteStore;
pub use postgres::PgNoteStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::Note;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),
}

/// Text variants match case-insensitive substrings; date variants are strict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteFilter {
    Archived(bool),
    TitleContains(String),
    ContentContains(String),
    TitleOrContentContains(String),
    CreatedAfter(DateTime<Utc>),
    UpdatedAfter(DateTime<Utc>),
}

impl NoteFilter {
    pub fn matches(&self, note: &Note) -> bool {
        match self {
            Self::Archived(true) => note.archived,
            Self::Archived(false) => note.is_active(),
            Self::TitleContains(needle) => contains_ignore_case(&note.title, needle),
            Self::ContentContains(needle) => contains_ignore_case(&note.content, needle),
            Self::TitleOrContentContains(needle) => {
                contains_ignore_case(&note.title, needle)
                    || contains_ignore_case(&note.content, needle)
            }
            Self::CreatedAfter(t) => note.created_at > *t,
            Self::UpdatedAfter(t) => note.updated_at > *t,
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn create(&self, title: String, content: String) -> Result<Note, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<Note>, StoreError>;

    async fn list_all(&self) -> Result<Vec<Note>, StoreError>;

    async fn list_where(&self, filter: &NoteFilter) -> Result<Vec<Note>, StoreError>;

    /// `archived` is left untouched when `None`.
    async fn update(
        &self,
        id: i64,
        title: String,
        content: String,
        archived: Option<bool>,
    ) -> Result<Option<Note>, StoreError>;

    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    async fn count_where(&self, filter: &NoteFilter) -> Result<i64, StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;
}
