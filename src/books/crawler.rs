use crate::{books::ItemRecord, Crawler, CrawlerError};
use lazy_static::lazy_static;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

pub const NOT_FOUND_TITLE: &str = "404 Not Found";
const PAGE_PLACEHOLDER: &str = "{page}";

const E: &str = "Invalid selector";
lazy_static! {
    static ref TITLE: Selector = Selector::parse("title").expect(E);
    static ref ITEM: Selector =
        Selector::parse(r#"li[class="col-xs-6 col-sm-4 col-md-3 col-lg-3"]"#).expect(E);
    static ref IMG: Selector = Selector::parse("img").expect(E);
    static ref A: Selector = Selector::parse("a").expect(E);
    static ref PRICE: Selector = Selector::parse("p.price_color").expect(E);
    static ref AVAILABILITY: Selector = Selector::parse("p.availability").expect(E);
}

#[derive(Debug)]
pub struct BooksCrawler {
    url_template: String,
}

impl BooksCrawler {
    pub fn new(url_template: &str) -> Result<Self, CrawlerError> {
        if !url_template.contains(PAGE_PLACEHOLDER) {
            return Err(CrawlerError::InvalidUrl(format!(
                "{} has no {} placeholder",
                url_template, PAGE_PLACEHOLDER
            )));
        }
        Url::parse(&url_template.replace(PAGE_PLACEHOLDER, "1"))
            .map_err(|e| CrawlerError::InvalidUrl(format!("{}: {}", url_template, e)))?;

        Ok(BooksCrawler {
            url_template: url_template.to_string(),
        })
    }
}

/// Drops the currency symbol in front of the amount, `"£51.77"` becomes `"51.77"`.
///
/// Everything before the first digit, sign or decimal point is dropped, which also
/// covers a mis-decoded `"Â£"`.
pub fn strip_currency(text: &str) -> &str {
    text.trim()
        .trim_start_matches(|c: char| !(c.is_ascii_digit() || c == '-' || c == '.'))
}

fn text_of(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

impl Crawler for BooksCrawler {
    type Record = ItemRecord;

    fn page_url(&self, page: u32) -> String {
        self.url_template.replace(PAGE_PLACEHOLDER, &page.to_string())
    }

    fn is_terminal(&self, doc: &Html) -> Result<bool, &'static str> {
        doc.select(&TITLE)
            .next()
            .map(|title| text_of(title) == NOT_FOUND_TITLE)
            .ok_or("title")
    }

    fn extract_items(
        &self,
        page: u32,
        page_url: &str,
        doc: &Html,
    ) -> Result<Vec<ItemRecord>, CrawlerError> {
        let missing = |element: &'static str| CrawlerError::ParseError { page, element };
        let base = Url::parse(page_url).map_err(|_| missing("page url"))?;

        doc.select(&ITEM)
            .map(|item| {
                let title = item
                    .select(&IMG)
                    .next()
                    .and_then(|img| img.value().attr("alt"))
                    .ok_or_else(|| missing("img alt"))?;

                let link = item
                    .select(&A)
                    .next()
                    .and_then(|a| a.value().attr("href"))
                    .and_then(|href| base.join(href.trim()).ok())
                    .ok_or_else(|| missing("a href"))?;

                let price = item
                    .select(&PRICE)
                    .next()
                    .map(text_of)
                    .ok_or_else(|| missing("price_color"))?;

                let stock_status = item
                    .select(&AVAILABILITY)
                    .next()
                    .map(text_of)
                    .ok_or_else(|| missing("availability"))?;

                Ok(ItemRecord {
                    title: title.to_string(),
                    link: link.to_string(),
                    price: strip_currency(&price).to_string(),
                    stock_status,
                })
            })
            .collect()
    }
}
