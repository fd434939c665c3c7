use sqlx::{Row, SqlitePool};
use tracing::debug;

/// A named table inside a shared SQLite pool.
#[async_trait::async_trait]
pub trait Table {
    type Record<'a>;

    fn name(&self) -> &str;
    fn pool(&self) -> &SqlitePool;

    /// Column definitions of `CREATE TABLE`, without the parentheses.
    fn columns(&self) -> &'static str;

    async fn insert<'a>(&self, record: Self::Record<'a>) -> Result<(), sqlx::Error>;

    async fn exists(&self) -> Result<bool, sqlx::Error> {
        Ok(
            sqlx::query("SELECT name FROM sqlite_master WHERE type='table' AND name = ?")
                .bind(self.name())
                .fetch_optional(self.pool())
                .await?
                .is_some(),
        )
    }

    /// Creates the table unless an earlier run already did.
    async fn ensure(&self) -> Result<(), sqlx::Error> {
        if self.exists().await? {
            debug!("Use table {}", self.name());
            return Ok(());
        }

        debug!("Create table {}", self.name());
        let query = format!("CREATE TABLE {} ({})", self.name(), self.columns());
        sqlx::query(&query).execute(self.pool()).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), sqlx::Error> {
        let query = format!("DELETE FROM {}", self.name());
        sqlx::query(&query).execute(self.pool()).await?;
        Ok(())
    }

    async fn count(&self) -> Result<u32, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM {}", self.name());
        Ok(sqlx::query(&query)
            .fetch_one(self.pool())
            .await?
            .try_get(0)?)
    }
}
