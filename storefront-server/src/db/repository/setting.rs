//! Setting Repository (key/value, JSON values)

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::{Setting, SettingKey, SettingRow, SettingUpsert, StoreSettings};
use sqlx::SqlitePool;

const SETTING_SELECT: &str = "SELECT key, value, description, updated_at FROM setting";

fn decode(row: SettingRow) -> RepoResult<Setting> {
    let value = serde_json::from_str(&row.value).map_err(|e| {
        RepoError::Database(format!("Setting '{}' holds invalid JSON: {e}", row.key))
    })?;
    Ok(Setting {
        key: row.key,
        value,
        description: row.description,
        updated_at: row.updated_at,
    })
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Setting>> {
    let sql = format!("{SETTING_SELECT} ORDER BY key");
    let rows = sqlx::query_as::<_, SettingRow>(&sql).fetch_all(pool).await?;
    rows.into_iter().map(decode).collect()
}

pub async fn find_by_key(pool: &SqlitePool, key: &str) -> RepoResult<Option<Setting>> {
    let sql = format!("{SETTING_SELECT} WHERE key = ?");
    let row = sqlx::query_as::<_, SettingRow>(&sql)
        .bind(key)
        .fetch_optional(pool)
        .await?;
    row.map(decode).transpose()
}

/// Insert or replace a setting. Known keys are type-checked first.
pub async fn upsert(pool: &SqlitePool, key: &str, data: SettingUpsert) -> RepoResult<Setting> {
    if let Some(known) = SettingKey::parse(key) {
        known
            .check(&data.value)
            .map_err(|msg| RepoError::Business(ErrorCode::SettingInvalidValue, msg))?;
    }

    let text = serde_json::to_string(&data.value)
        .map_err(|e| RepoError::Validation(format!("Unserializable value: {e}")))?;
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO setting (key, value, description, updated_at) VALUES (?1, ?2, ?3, ?4) ON CONFLICT(key) DO UPDATE SET value = excluded.value, description = COALESCE(excluded.description, setting.description), updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(&text)
    .bind(&data.description)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_key(pool, key).await?.ok_or_else(|| {
        RepoError::Business(ErrorCode::SettingNotFound, format!("Setting '{key}' not found"))
    })
}

pub async fn delete(pool: &SqlitePool, key: &str) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM setting WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Typed settings for pricing and checkout, defaults filled in
pub async fn load_store_settings(pool: &SqlitePool) -> RepoResult<StoreSettings> {
    let all = find_all(pool).await?;
    Ok(StoreSettings::from_settings(&all))
}
