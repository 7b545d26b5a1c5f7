use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 登録済み言語を表すドメインモデル。
/// API のレスポンス形式 (camelCase) に合わせて `rename_all` を指定している。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 言語作成 API が受け取るペイロード。
/// id とタイムスタンプはサーバー側 (Postgres) が採番するため含まれない。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLanguageRequest {
    pub name: String,
    pub code: String,
}

/// 言語更新 API の入力。更新は全フィールド書き換えなので両方とも必須。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLanguageRequest {
    pub name: String,
    pub code: String,
}

impl CreateLanguageRequest {
    /// 空欄禁止と文字数上限を検証する。
    /// 失敗時は `Err(String)` を返し、ハンドラ層で `ApiError::Validation` に変換される。
    pub fn validate(&self) -> Result<(), String> {
        validate_fields(&self.name, &self.code)
    }

    /// 前後の空白を取り除いた名前を返す。
    pub fn normalized_name(&self) -> String {
        self.name.trim().to_string()
    }

    /// 前後の空白を取り除いたコードを返す。大文字小文字はそのまま保存する。
    pub fn normalized_code(&self) -> String {
        self.code.trim().to_string()
    }
}

impl UpdateLanguageRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_fields(&self.name, &self.code)
    }

    pub fn normalized_name(&self) -> String {
        self.name.trim().to_string()
    }

    pub fn normalized_code(&self) -> String {
        self.code.trim().to_string()
    }
}

/// 作成・更新で共通の必須フィールド検証。
fn validate_fields(name: &str, code: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if name.len() > 255 {
        return Err("Name cannot exceed 255 characters".to_string());
    }

    if code.trim().is_empty() {
        return Err("Code cannot be empty".to_string());
    }

    if code.len() > 20 {
        return Err("Code cannot exceed 20 characters".to_string());
    }

    Ok(())
}
