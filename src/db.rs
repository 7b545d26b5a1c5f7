use crate::config::DatabaseConfig;
use crate::error::ApiError;
use deadpool_postgres::{Config, Object, Pool, Runtime};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tracing::{error, info, warn};

/// PostgreSQL への接続プールを握る接続プロバイダ。
/// Deadpool の `Pool` を内部に保持し、リクエストごとに接続を貸し出す。
#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// 接続プールを構築する。プール自体は遅延接続なので、
    /// 起動時の疎通確認は `test_connection` を別途呼び出す。
    pub async fn new(config: DatabaseConfig) -> Result<Self, ApiError> {
        info!(
            "Creating PostgreSQL connection pool for host: {}:{}",
            config.host, config.port
        );

        let pool = Self::create_pool(config)?;
        Ok(Database { pool })
    }

    /// Deadpool 用の `Config` を組み立ててプールを生成する内部関数。
    /// `match` で SSL モードを切り替え、`native_tls` で TLS コネクタを差し込む。
    fn create_pool(config: DatabaseConfig) -> Result<Pool, ApiError> {
        let mut pg_config = Config::new();

        pg_config.host = Some(config.host);
        pg_config.port = Some(config.port);
        pg_config.dbname = Some(config.database);
        pg_config.user = Some(config.username);
        pg_config.password = Some(config.password);

        match config.ssl_mode.as_str() {
            "disable" => {
                pg_config.ssl_mode = Some(deadpool_postgres::SslMode::Disable);
            }
            "prefer" => {
                pg_config.ssl_mode = Some(deadpool_postgres::SslMode::Prefer);
            }
            "require" => {
                pg_config.ssl_mode = Some(deadpool_postgres::SslMode::Require);
            }
            _ => {
                warn!("Unknown SSL mode '{}', defaulting to 'prefer'", config.ssl_mode);
                pg_config.ssl_mode = Some(deadpool_postgres::SslMode::Prefer);
            }
        }

        pg_config.manager = Some(deadpool_postgres::ManagerConfig {
            recycling_method: deadpool_postgres::RecyclingMethod::Fast,
        });

        pg_config.pool = Some(deadpool_postgres::PoolConfig::new(
            config.max_connections as usize,
        ));

        let tls_connector = TlsConnector::builder().build().map_err(|e| {
            error!("Failed to create TLS connector: {}", e);
            ApiError::Database(format!("TLS connector creation failed: {}", e))
        })?;
        let tls = MakeTlsConnector::new(tls_connector);

        pg_config.create_pool(Some(Runtime::Tokio1), tls).map_err(|e| {
            error!("Failed to create connection pool: {}", e);
            ApiError::Database(format!("Connection pool creation failed: {}", e))
        })
    }

    /// プールから接続を 1 本借りる。借りた接続はドロップ時に必ずプールへ返却される。
    pub(crate) async fn get_connection(&self) -> Result<Object, ApiError> {
        self.pool.get().await.map_err(ApiError::from)
    }

    /// `SELECT 1` を投げて返ってきたスカラー値をそのまま返す。
    /// 期待値 (1) かどうかの判定はヘルスチェックハンドラ側で行う。
    pub async fn health_check(&self) -> Result<i32, ApiError> {
        let client = self.get_connection().await?;

        let row = client
            .query_one("SELECT 1", &[])
            .await
            .map_err(ApiError::from)?;

        Ok(row.get(0))
    }

    /// 起動直後にプール全体が機能するかの確認に使う。
    /// 失敗した場合は即座に `ApiError::Database` を返す。
    pub async fn test_connection(&self) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[]).await.map_err(|e| {
            error!("Database connection test failed: {}", e);
            ApiError::Database(format!("Connection test failed: {}", e))
        })?;

        info!("Database connection test successful");
        Ok(())
    }

    /// アプリ起動時にテーブル群を CREATE する簡易マイグレーター。
    /// SQL をリテラル文字列で保持しておき、`client.execute` を順番に呼び出す。
    pub async fn migrate(&self) -> Result<(), ApiError> {
        info!("Running database migrations");

        let client = self.get_connection().await?;

        let enable_uuid = "CREATE EXTENSION IF NOT EXISTS \"uuid-ossp\"";
        client.execute(enable_uuid, &[]).await.map_err(|e| {
            error!("Failed to enable UUID extension: {}", e);
            ApiError::Database(format!("UUID extension error: {}", e))
        })?;

        let languages_table = r#"
            CREATE TABLE IF NOT EXISTS languages (
                id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
                name VARCHAR(255) NOT NULL,
                code VARCHAR(20) UNIQUE NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        client.execute(languages_table, &[]).await.map_err(|e| {
            error!("Failed to create languages table: {}", e);
            ApiError::Database(format!("Languages table creation failed: {}", e))
        })?;

        let languages_code_index =
            "CREATE INDEX IF NOT EXISTS idx_languages_code ON languages(code)";
        client.execute(languages_code_index, &[]).await.map_err(|e| {
            error!("Failed to create languages code index: {}", e);
            ApiError::Database(format!("Languages code index creation failed: {}", e))
        })?;

        // Deleting a language cascades to its greetings via the FK constraint
        let greetings_table = r#"
            CREATE TABLE IF NOT EXISTS greetings (
                id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
                language_id UUID NOT NULL REFERENCES languages(id) ON DELETE CASCADE,
                greeting_text VARCHAR(500) NOT NULL,
                formal BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        client.execute(greetings_table, &[]).await.map_err(|e| {
            error!("Failed to create greetings table: {}", e);
            ApiError::Database(format!("Greetings table creation failed: {}", e))
        })?;

        let greetings_language_index =
            "CREATE INDEX IF NOT EXISTS idx_greetings_language_id ON greetings(language_id)";
        client
            .execute(greetings_language_index, &[])
            .await
            .map_err(|e| {
                error!("Failed to create greetings language_id index: {}", e);
                ApiError::Database(format!("Greetings language_id index creation failed: {}", e))
            })?;

        info!("Database migrations completed successfully");
        Ok(())
    }
}
