use scraper::Html;
use tracing::{debug, info, warn};

pub mod books;
pub mod config;
pub mod report;
pub mod source;

mod data;
mod error;

pub use data::Table;
pub use error::CrawlerError;
pub use source::HttpSource;

/// One listing page after parsing. `exists` is false for the terminal page,
/// whose `items` are always empty.
#[derive(Debug, PartialEq, Eq)]
pub struct CatalogPage<R> {
    pub index: u32,
    pub exists: bool,
    pub items: Vec<R>,
}

pub trait Crawler {
    type Record: Send + Sync;

    fn page_url(&self, page: u32) -> String;
    fn is_terminal(&self, doc: &Html) -> Result<bool, &'static str>;
    fn extract_items(
        &self,
        page: u32,
        page_url: &str,
        doc: &Html,
    ) -> Result<Vec<Self::Record>, CrawlerError>;

    fn crawl(
        &self,
        page: u32,
        page_url: &str,
        doc: &Html,
    ) -> Result<CatalogPage<Self::Record>, CrawlerError> {
        let terminal = self
            .is_terminal(doc)
            .map_err(|element| CrawlerError::ParseError { page, element })?;

        if terminal {
            return Ok(CatalogPage {
                index: page,
                exists: false,
                items: vec![],
            });
        }

        Ok(CatalogPage {
            index: page,
            exists: true,
            items: self.extract_items(page, page_url, doc)?,
        })
    }
}

#[async_trait::async_trait]
pub trait PageSource {
    async fn fetch(&self, url: &str) -> Result<String, CrawlerError>;
}

#[async_trait::async_trait]
pub trait Storage {
    type Record: Sync;

    async fn pages_insert(&self, page: u32, items: usize) -> Result<(), CrawlerError>;
    async fn results_insert(&self, page: u32, records: &[Self::Record])
        -> Result<(), CrawlerError>;
    async fn results_count(&self) -> Result<u32, CrawlerError>;
}

/// Walks pages 1, 2, ... until the crawler reports the terminal page.
///
/// Pages are fetched and parsed one at a time. When `storage` is given,
/// every finished page is written to it before the next request.
///
/// At most `max_pages` listing pages are crawled. Page `max_pages + 1` is
/// still fetched to look for the terminal page, so a catalogue of exactly
/// `max_pages` pages succeeds.
pub async fn run_crawler<C, P, S>(
    crawler: &C,
    source: &P,
    storage: Option<&S>,
    max_pages: u32,
) -> Result<Vec<C::Record>, CrawlerError>
where
    C: Crawler,
    P: PageSource + Sync,
    S: Storage<Record = C::Record> + Sync,
{
    let mut records = Vec::new();

    for page in 1..=max_pages.saturating_add(1) {
        let url = crawler.page_url(page);

        debug!("Visit {}", url);
        let html = source.fetch(&url).await?;

        let result = {
            let doc = Html::parse_document(&html);
            crawler.crawl(page, &url, &doc)?
        };

        if !result.exists {
            info!("Page {} not found, crawl complete", page);
            if let Some(storage) = storage {
                debug!("Checkpointed {} records", storage.results_count().await?);
            }
            return Ok(records);
        }

        if page > max_pages {
            break;
        }

        if result.items.is_empty() {
            warn!("\nEmpty listing page: {}\n", url);
        }

        if let Some(storage) = storage {
            storage.pages_insert(page, result.items.len()).await?;
            storage.results_insert(page, &result.items).await?;
        }

        info!(
            "[{}] Page {} with {} items",
            records.len() + result.items.len(),
            page,
            result.items.len()
        );
        records.extend(result.items);
    }

    Err(CrawlerError::PageLimitExceeded(max_pages))
}
