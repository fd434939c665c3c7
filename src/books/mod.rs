mod crawler;
mod data;

pub use crawler::{strip_currency, BooksCrawler, NOT_FOUND_TITLE};
pub use data::BooksData;

use crate::{run_crawler, CrawlerError, PageSource, Storage};
use serde::{Deserialize, Serialize};
use std::{fmt, slice};

/// One catalogue entry. Field names in exports are the display labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(rename = "Titulo")]
    pub title: String,
    #[serde(rename = "Link")]
    pub link: String,
    #[serde(rename = "Preco")]
    pub price: String,
    #[serde(rename = "Estoque")]
    pub stock_status: String,
}

pub const COLUMNS: [&str; 4] = ["Titulo", "Link", "Preco", "Estoque"];

impl ItemRecord {
    pub fn fields(&self) -> [&str; 4] {
        [
            self.title.as_str(),
            self.link.as_str(),
            self.price.as_str(),
            self.stock_status.as_str(),
        ]
    }
}

impl fmt::Display for ItemRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title           : {}", self.title)?;
        writeln!(f, "Link            : {}", self.link)?;
        writeln!(f, "Price           : {}", self.price)?;
        writeln!(f, "Stock           : {}", self.stock_status)
    }
}

/// Every record of a crawl, in crawl order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<ItemRecord>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, ItemRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[ItemRecord] {
        &self.records
    }

    /// Number of empty values per column, in `COLUMNS` order.
    pub fn missing_by_column(&self) -> [usize; 4] {
        let mut missing = [0; 4];
        for record in &self.records {
            for (count, field) in missing.iter_mut().zip(record.fields()) {
                if field.trim().is_empty() {
                    *count += 1;
                }
            }
        }
        missing
    }
}

impl From<Vec<ItemRecord>> for Dataset {
    fn from(records: Vec<ItemRecord>) -> Self {
        Dataset { records }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a ItemRecord;
    type IntoIter = slice::Iter<'a, ItemRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Crawls the whole catalogue into a [`Dataset`].
pub async fn crawl_catalog<P, S>(
    crawler: &BooksCrawler,
    source: &P,
    storage: Option<&S>,
    max_pages: u32,
) -> Result<Dataset, CrawlerError>
where
    P: PageSource + Sync,
    S: Storage<Record = ItemRecord> + Sync,
{
    Ok(run_crawler(crawler, source, storage, max_pages)
        .await?
        .into())
}
