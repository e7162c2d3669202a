use chrono::{DateTime, Utc};

use crate::{
    dto::{NoteRequest, NoteResponse, StatsResponse},
    models::Note,
    repository::{NoteFilter, NoteStore, StoreError},
};

use std::sync::Arc;

fn to_responses(notes: Vec<Note>) -> Vec<NoteResponse> {
    notes.into_iter().map(NoteResponse::from).collect()
}

#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
}

impl NoteService {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    /// New notes always start active; `request.archived` is ignored.
    pub async fn create_note(&self, request: NoteRequest) -> Result<NoteResponse, StoreError> {
        let note = self.store.create(request.title, request.content).await?;
        tracing::debug!("created note {}", note.id);
        Ok(note.into())
    }

    pub async fn update_note(
        &self,
        id: i64,
        request: NoteRequest,
    ) -> Result<Option<NoteResponse>, StoreError> {
        self.store
            .update(id, request.title, request.content, request.archived)
            .await
            .map(|note| note.map(NoteResponse::from))
    }

    pub async fn toggle_archive(&self, id: i64) -> Result<Option<NoteResponse>, StoreError> {
        let Some(note) = self.store.get(id).await? else {
            return Ok(None);
        };

        self.store
            .update(id, note.title, note.content, Some(!note.archived))
            .await
            .map(|note| note.map(NoteResponse::from))
    }

    pub async fn delete_note(&self, id: i64) -> Result<bool, StoreError> {
        let deleted = self.store.delete(id).await?;
        if deleted {
            tracing::debug!("deleted note {id}");
        }
        Ok(deleted)
    }

    pub async fn get_one_note(&self, id: i64) -> Result<Option<NoteResponse>, StoreError> {
        self.store
            .get(id)
            .await
            .map(|note| note.map(NoteResponse::from))
    }

    pub async fn get_all_notes(&self) -> Result<Vec<NoteResponse>, StoreError> {
        self.store.list_all().await.map(to_responses)
    }

    pub async fn get_active_notes(&self) -> Result<Vec<NoteResponse>, StoreError> {
        self.list_where(NoteFilter::Archived(false)).await
    }

    pub async fn get_archived_notes(&self) -> Result<Vec<NoteResponse>, StoreError> {
        self.list_where(NoteFilter::Archived(true)).await
    }

    pub async fn search_notes(&self, term: &str) -> Result<Vec<NoteResponse>, StoreError> {
        self.list_where(NoteFilter::TitleOrContentContains(term.to_owned()))
            .await
    }

    pub async fn search_by_title(&self, title: &str) -> Result<Vec<NoteResponse>, StoreError> {
        self.list_where(NoteFilter::TitleContains(title.to_owned()))
            .await
    }

    pub async fn search_by_content(
        &self,
        content: &str,
    ) -> Result<Vec<NoteResponse>, StoreError> {
        self.list_where(NoteFilter::ContentContains(content.to_owned()))
            .await
    }

    pub async fn get_notes_created_after(
        &self,
        date: DateTime<Utc>,
    ) -> Result<Vec<NoteResponse>, StoreError> {
        self.list_where(NoteFilter::CreatedAfter(date)).await
    }

    pub async fn get_notes_updated_after(
        &self,
        date: DateTime<Utc>,
    ) -> Result<Vec<NoteResponse>, StoreError> {
        self.list_where(NoteFilter::UpdatedAfter(date)).await
    }

    pub async fn get_stats(&self) -> Result<StatsResponse, StoreError> {
        let active = self.store.count_where(&NoteFilter::Archived(false)).await?;
        let archived = self.store.count_where(&NoteFilter::Archived(true)).await?;

        Ok(StatsResponse {
            total: active + archived,
            active,
            archived,
        })
    }

    async fn list_where(&self, filter: NoteFilter) -> Result<Vec<NoteResponse>, StoreError> {
        self.store.list_where(&filter).await.map(to_responses)
    }
}
