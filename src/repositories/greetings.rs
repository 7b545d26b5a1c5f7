use crate::db::Database;
use crate::error::ApiError;
use crate::models::{CreateGreetingRequest, Greeting, UpdateGreetingRequest};
use crate::repositories::GreetingRepository;
use async_trait::async_trait;
use tokio_postgres::Row;
use tracing::info;
use uuid::Uuid;

/// Postgres-backed greeting repository.
pub struct PgGreetingRepository {
    db: Database,
}

impl PgGreetingRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn map_greeting(row: &Row) -> Greeting {
    Greeting {
        id: row.get(0),
        language_id: row.get(1),
        greeting_text: row.get(2),
        formal: row.get(3),
        created_at: row.get(4),
        updated_at: row.get(5),
    }
}

#[async_trait]
impl GreetingRepository for PgGreetingRepository {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Greeting>, ApiError> {
        let client = self.db.get_connection().await?;
        let query = r#"
            SELECT id, language_id, greeting_text, formal, created_at, updated_at
            FROM greetings
            WHERE id = $1
        "#;

        let row = client.query_opt(query, &[&id]).await.map_err(ApiError::from)?;

        Ok(row.as_ref().map(map_greeting))
    }

    async fn get_all(&self) -> Result<Vec<Greeting>, ApiError> {
        let client = self.db.get_connection().await?;
        let query = r#"
            SELECT id, language_id, greeting_text, formal, created_at, updated_at
            FROM greetings
            ORDER BY greeting_text
        "#;

        let rows = client.query(query, &[]).await.map_err(ApiError::from)?;

        Ok(rows.iter().map(map_greeting).collect())
    }

    async fn get_by_language_id(&self, language_id: Uuid) -> Result<Vec<Greeting>, ApiError> {
        let client = self.db.get_connection().await?;
        let query = r#"
            SELECT id, language_id, greeting_text, formal, created_at, updated_at
            FROM greetings
            WHERE language_id = $1
            ORDER BY greeting_text
        "#;

        let rows = client
            .query(query, &[&language_id])
            .await
            .map_err(ApiError::from)?;

        Ok(rows.iter().map(map_greeting).collect())
    }

    async fn get_by_language_code(
        &self,
        code: &str,
        formal: Option<bool>,
    ) -> Result<Option<Greeting>, ApiError> {
        let client = self.db.get_connection().await?;

        // `ORDER BY g.formal` ranks informal (false) before formal on ties
        const BASE_QUERY: &str = r#"
            SELECT g.id, g.language_id, g.greeting_text, g.formal, g.created_at, g.updated_at
            FROM greetings g
            INNER JOIN languages l ON g.language_id = l.id
            WHERE l.code = $1
        "#;

        let row = match formal {
            Some(flag) => {
                let query = format!("{} AND g.formal = $2 ORDER BY g.formal LIMIT 1", BASE_QUERY);
                client
                    .query_opt(&query, &[&code, &flag])
                    .await
                    .map_err(ApiError::from)?
            }
            None => {
                let query = format!("{} ORDER BY g.formal LIMIT 1", BASE_QUERY);
                client
                    .query_opt(&query, &[&code])
                    .await
                    .map_err(ApiError::from)?
            }
        };

        Ok(row.as_ref().map(map_greeting))
    }

    async fn create(&self, request: &CreateGreetingRequest) -> Result<Uuid, ApiError> {
        let client = self.db.get_connection().await?;

        // A missing language surfaces as an FK violation, mapped to a client error
        let query = r#"
            INSERT INTO greetings (language_id, greeting_text, formal)
            VALUES ($1, $2, $3)
            RETURNING id
        "#;

        let row = client
            .query_one(
                query,
                &[&request.language_id, &request.normalized_text(), &request.formal],
            )
            .await
            .map_err(ApiError::from)?;

        let id: Uuid = row.get(0);
        info!("Created greeting with id: {}", id);
        Ok(id)
    }

    async fn update(&self, id: Uuid, request: &UpdateGreetingRequest) -> Result<bool, ApiError> {
        let client = self.db.get_connection().await?;

        let query = r#"
            UPDATE greetings
            SET language_id = $1, greeting_text = $2, formal = $3, updated_at = NOW()
            WHERE id = $4
        "#;

        let rows_affected = client
            .execute(
                query,
                &[&request.language_id, &request.normalized_text(), &request.formal, &id],
            )
            .await
            .map_err(ApiError::from)?;

        if rows_affected > 0 {
            info!("Updated greeting with id: {}", id);
        }

        Ok(rows_affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let client = self.db.get_connection().await?;
        let query = "DELETE FROM greetings WHERE id = $1";

        let rows_affected = client.execute(query, &[&id]).await.map_err(ApiError::from)?;

        if rows_affected > 0 {
            info!("Deleted greeting with id: {}", id);
        }

        Ok(rows_affected > 0)
    }
}
