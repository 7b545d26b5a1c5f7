use crate::db::Database;
use crate::error::ApiError;
use crate::models::{CreateLanguageRequest, Language, UpdateLanguageRequest};
use crate::repositories::LanguageRepository;
use async_trait::async_trait;
use tokio_postgres::Row;
use tracing::info;
use uuid::Uuid;

/// Postgres-backed language repository.
/// Each operation checks out one pooled connection for its duration.
pub struct PgLanguageRepository {
    db: Database,
}

impl PgLanguageRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn map_language(row: &Row) -> Language {
    Language {
        id: row.get(0),
        name: row.get(1),
        code: row.get(2),
        created_at: row.get(3),
        updated_at: row.get(4),
    }
}

#[async_trait]
impl LanguageRepository for PgLanguageRepository {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Language>, ApiError> {
        let client = self.db.get_connection().await?;
        let query = "SELECT id, name, code, created_at, updated_at FROM languages WHERE id = $1";

        let row = client.query_opt(query, &[&id]).await.map_err(ApiError::from)?;

        Ok(row.as_ref().map(map_language))
    }

    async fn get_by_code(&self, code: &str) -> Result<Option<Language>, ApiError> {
        let client = self.db.get_connection().await?;
        let query = "SELECT id, name, code, created_at, updated_at FROM languages WHERE code = $1";

        let row = client
            .query_opt(query, &[&code])
            .await
            .map_err(ApiError::from)?;

        Ok(row.as_ref().map(map_language))
    }

    async fn get_all(&self) -> Result<Vec<Language>, ApiError> {
        let client = self.db.get_connection().await?;
        let query = "SELECT id, name, code, created_at, updated_at FROM languages ORDER BY name";

        let rows = client.query(query, &[]).await.map_err(ApiError::from)?;

        Ok(rows.iter().map(map_language).collect())
    }

    async fn create(&self, request: &CreateLanguageRequest) -> Result<Uuid, ApiError> {
        let client = self.db.get_connection().await?;

        // Id and timestamps are assigned by the database
        let query = r#"
            INSERT INTO languages (name, code)
            VALUES ($1, $2)
            RETURNING id
        "#;

        let row = client
            .query_one(query, &[&request.normalized_name(), &request.normalized_code()])
            .await
            .map_err(ApiError::from)?;

        let id: Uuid = row.get(0);
        info!("Created language with id: {}", id);
        Ok(id)
    }

    async fn update(&self, id: Uuid, request: &UpdateLanguageRequest) -> Result<bool, ApiError> {
        let client = self.db.get_connection().await?;

        let query = r#"
            UPDATE languages
            SET name = $1, code = $2, updated_at = NOW()
            WHERE id = $3
        "#;

        let rows_affected = client
            .execute(query, &[&request.normalized_name(), &request.normalized_code(), &id])
            .await
            .map_err(ApiError::from)?;

        if rows_affected > 0 {
            info!("Updated language with id: {}", id);
        }

        Ok(rows_affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let client = self.db.get_connection().await?;
        let query = "DELETE FROM languages WHERE id = $1";

        let rows_affected = client.execute(query, &[&id]).await.map_err(ApiError::from)?;

        if rows_affected > 0 {
            // Dependent greetings are removed by the FK cascade
            info!("Deleted language with id: {}", id);
        }

        Ok(rows_affected > 0)
    }
}
