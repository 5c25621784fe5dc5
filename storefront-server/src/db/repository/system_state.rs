//! System State Repository (Singleton)

use super::RepoResult;
use sqlx::SqliteConnection;

const SINGLETON_ID: i64 = 1;

/// Order numbers start after this value
pub const INITIAL_ORDER_NUMBER: i64 = 1000;

async fn ensure_row(conn: &mut SqliteConnection) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT OR IGNORE INTO system_state (id, last_order_number, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
    )
    .bind(SINGLETON_ID)
    .bind(INITIAL_ORDER_NUMBER)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

/// Atomically increment the order counter and return the new value.
///
/// Run inside the checkout transaction so a rolled-back order does not
/// consume a number.
pub async fn next_order_number(conn: &mut SqliteConnection) -> RepoResult<i64> {
    ensure_row(&mut *conn).await?;
    let now = shared::util::now_millis();
    let number = sqlx::query_scalar::<_, i64>(
        "UPDATE system_state SET last_order_number = last_order_number + 1, updated_at = ?1 WHERE id = ?2 RETURNING last_order_number",
    )
    .bind(now)
    .bind(SINGLETON_ID)
    .fetch_one(conn)
    .await?;
    Ok(number)
}

/// Move the counter forward so it is at least `floor` (after a restore)
pub async fn bump_order_number_floor(conn: &mut SqliteConnection, floor: i64) -> RepoResult<()> {
    ensure_row(&mut *conn).await?;
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE system_state SET last_order_number = MAX(last_order_number, ?1), updated_at = ?2 WHERE id = ?3",
    )
    .bind(floor)
    .bind(now)
    .bind(SINGLETON_ID)
    .execute(conn)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support;

    #[tokio::test]
    async fn test_order_numbers_start_after_initial() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(next_order_number(&mut conn).await.unwrap(), 1001);
        assert_eq!(next_order_number(&mut conn).await.unwrap(), 1002);
        drop(conn);

        let state = sqlx::query_as::<_, shared::models::SystemState>(
            "SELECT id, last_order_number, created_at, updated_at FROM system_state",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(state.last_order_number, 1002);
    }

    #[tokio::test]
    async fn test_rolled_back_number_is_reused() {
        let pool = test_support::pool().await;
        let mut tx = pool.begin().await.unwrap();
        assert_eq!(next_order_number(&mut tx).await.unwrap(), 1001);
        tx.rollback().await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(next_order_number(&mut conn).await.unwrap(), 1001);
    }

    #[tokio::test]
    async fn test_floor_never_moves_backwards() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();
        bump_order_number_floor(&mut conn, 1500).await.unwrap();
        bump_order_number_floor(&mut conn, 1200).await.unwrap();
        assert_eq!(next_order_number(&mut conn).await.unwrap(), 1501);
    }
}
