use async_trait::async_trait;
use tokio_postgres::{Client, NoTls, Row, types::ToSql};

use crate::models::Note;

use super::{NoteFilter, NoteStore, StoreError, embedded::migrations};

const COLUMNS: &str = "id, title, content, created_at, updated_at, archived";

pub struct PgNoteStore {
    client: Client,
}

impl PgNoteStore {
    pub async fn new(database_dsn: &str) -> Result<Self, tokio_postgres::Error> {
        let (client, con) = tokio_postgres::connect(database_dsn, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = con.await {
                tracing::error!("connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    pub async fn migrate(&mut self) -> Result<(), refinery::Error> {
        let migrations_report = migrations::runner().run_async(&mut self.client).await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }
}

fn note_from_row(row: &Row) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        archived: row.get("archived"),
    }
}

// `strpos` instead of LIKE keeps `%` and `_` in search terms literal.
fn where_clause(filter: &NoteFilter) -> (&'static str, &(dyn ToSql + Sync)) {
    match filter {
        NoteFilter::Archived(archived) => ("archived = $1", archived),
        NoteFilter::TitleContains(needle) => ("strpos(lower(title), lower($1)) > 0", needle),
        NoteFilter::ContentContains(needle) => {
            ("strpos(lower(content), lower($1)) > 0", needle)
        }
        NoteFilter::TitleOrContentContains(needle) => (
            "strpos(lower(title), lower($1)) > 0 OR strpos(lower(content), lower($1)) > 0",
            needle,
        ),
        NoteFilter::CreatedAfter(t) => ("created_at > $1", t),
        NoteFilter::UpdatedAfter(t) => ("updated_at > $1", t),
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn create(&self, title: String, content: String) -> Result<Note, StoreError> {
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO notepads (title, content) VALUES ($1, $2) RETURNING {COLUMNS}"
                ),
                &[&title, &content],
            )
            .await?;

        Ok(note_from_row(&row))
    }

    async fn get(&self, id: i64) -> Result<Option<Note>, StoreError> {
        let row = self
            .client
            .query_opt(
                &format!("SELECT {COLUMNS} FROM notepads WHERE id = $1"),
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn list_all(&self) -> Result<Vec<Note>, StoreError> {
        let rows = self
            .client
            .query(&format!("SELECT {COLUMNS} FROM notepads ORDER BY id"), &[])
            .await?;

        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn list_where(&self, filter: &NoteFilter) -> Result<Vec<Note>, StoreError> {
        let (condition, param) = where_clause(filter);
        let rows = self
            .client
            .query(
                &format!("SELECT {COLUMNS} FROM notepads WHERE {condition} ORDER BY id"),
                &[param],
            )
            .await?;

        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn update(
        &self,
        id: i64,
        title: String,
        content: String,
        archived: Option<bool>,
    ) -> Result<Option<Note>, StoreError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "UPDATE notepads SET title = $1, content = $2, \
                     archived = COALESCE($3, archived), \
                     updated_at = GREATEST(clock_timestamp(), updated_at + interval '1 microsecond') \
                     WHERE id = $4 RETURNING {COLUMNS}"
                ),
                &[&title, &content, &archived, &id],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let rows = self
            .client
            .execute("DELETE FROM notepads WHERE id = $1", &[&id])
            .await?;

        Ok(rows == 1)
    }

    async fn count_where(&self, filter: &NoteFilter) -> Result<i64, StoreError> {
        let (condition, param) = where_clause(filter);
        let row = self
            .client
            .query_one(
                &format!("SELECT COUNT(*) AS count FROM notepads WHERE {condition}"),
                &[param],
            )
            .await?;

        Ok(row.get("count"))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.client.execute("DELETE FROM notepads", &[]).await?;
        Ok(())
    }
}
