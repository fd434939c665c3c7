use super::ItemRecord;
use crate::{CrawlerError, Storage, Table};
use chrono::{DateTime, FixedOffset};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::{path::Path, str::FromStr};

fn now() -> DateTime<FixedOffset> {
    let now = chrono::offset::Local::now();
    now.with_timezone(now.offset())
}

pub struct PageTable {
    name: String,
    pool: SqlitePool,
}

#[async_trait::async_trait]
impl Table for PageTable {
    type Record<'a> = (u32, usize);

    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn columns(&self) -> &'static str {
        "page INTEGER PRIMARY KEY, items INTEGER, created_at DATETIME"
    }

    async fn insert<'a>(&self, (page, items): Self::Record<'a>) -> Result<(), sqlx::Error> {
        let query = format!(
            "INSERT OR REPLACE INTO {} (page, items, created_at) VALUES (?, ?, ?)",
            &self.name
        );
        sqlx::query(&query)
            .bind(page)
            .bind(items as i64)
            .bind(now())
            .execute(self.pool())
            .await?;
        Ok(())
    }
}

pub struct ItemTable {
    name: String,
    pool: SqlitePool,
}

#[async_trait::async_trait]
impl Table for ItemTable {
    type Record<'a> = (u32, &'a [ItemRecord]);

    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn columns(&self) -> &'static str {
        r#"
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            page INTEGER,
            title TEXT,
            link TEXT,
            price TEXT,
            stock_status TEXT,
            created_at DATETIME
        "#
    }

    async fn insert<'a>(&self, (page, records): Self::Record<'a>) -> Result<(), sqlx::Error> {
        let mut tx = self.pool().begin().await?;
        let query = format!(
            r#"INSERT INTO {} (
                page,
                title,
                link,
                price,
                stock_status,
                created_at) VALUES (?, ?, ?, ?, ?, ?)"#,
            self.name
        );
        let timestamp = now();
        for record in records {
            sqlx::query(&query)
                .bind(page)
                .bind(record.title.as_str())
                .bind(record.link.as_str())
                .bind(record.price.as_str())
                .bind(record.stock_status.as_str())
                .bind(timestamp)
                .execute(&mut tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

/// SQLite checkpoint of a crawl: one row per finished page, one row per record.
pub struct BooksData {
    pub name: String,
    pub pages: PageTable,
    pub items: ItemTable,
}

impl BooksData {
    pub async fn new(path: impl AsRef<Path>, name: &str) -> Result<BooksData, CrawlerError> {
        let opt = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(opt).await?;
        BooksData::with_pool(pool, name).await
    }

    /// A private in-memory database, lost when the value is dropped.
    pub async fn in_memory(name: &str) -> Result<BooksData, CrawlerError> {
        let opt = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opt)
            .await?;
        BooksData::with_pool(pool, name).await
    }

    async fn with_pool(pool: SqlitePool, name: &str) -> Result<BooksData, CrawlerError> {
        let p = BooksData {
            name: name.to_string(),
            pages: PageTable {
                name: format!("{}_pages", name),
                pool: pool.clone(),
            },
            items: ItemTable {
                name: format!("{}_items", name),
                pool,
            },
        };

        p.pages.ensure().await?;
        p.items.ensure().await?;
        Ok(p)
    }

    /// Empties both tables, a checkpoint only ever holds the latest crawl.
    pub async fn reset(&self) -> Result<(), CrawlerError> {
        self.items.clear().await?;
        self.pages.clear().await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Storage for BooksData {
    type Record = ItemRecord;

    async fn pages_insert(&self, page: u32, items: usize) -> Result<(), CrawlerError> {
        Ok(self.pages.insert((page, items)).await?)
    }

    async fn results_insert(
        &self,
        page: u32,
        records: &[Self::Record],
    ) -> Result<(), CrawlerError> {
        Ok(self.items.insert((page, records)).await?)
    }

    async fn results_count(&self) -> Result<u32, CrawlerError> {
        Ok(self.items.count().await?)
    }
}
