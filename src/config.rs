use crate::report::ReportOptions;
use clap::Parser;
use std::path::PathBuf;
use tokio::time::Duration;

pub const DEFAULT_URL_TEMPLATE: &str = "https://books.toscrape.com/catalogue/page-{page}.html";

/// Scrape the books catalogue, then export and summarize it.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    /// Listing page URL, `{page}` is replaced by the page index
    #[arg(long, default_value = DEFAULT_URL_TEMPLATE)]
    pub url_template: String,

    /// Fail if the catalogue has more listing pages than this
    #[arg(long, default_value_t = 1000)]
    pub max_pages: u32,

    /// Timeout of every HTTP request
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Minimum delay between two requests
    #[arg(long, default_value_t = 0)]
    pub delay_ms: u64,

    /// Directory receiving exports, charts and the checkpoint database
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Number of bins of the price histogram
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..))]
    pub bins: u32,

    /// Write crawled pages to `<NAME>.db` as the crawl goes
    #[arg(long, value_name = "NAME")]
    pub checkpoint: Option<String>,
}

impl Args {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Database file of the checkpoint `name`, inside the output directory.
    pub fn checkpoint_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.db", name))
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            output_dir: self.output_dir.clone(),
            bins: self.bins as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_the_catalogue() {
        let args = Args::parse_from(["books-catalog-crawler"]);
        assert_eq!(args.url_template, DEFAULT_URL_TEMPLATE);
        assert_eq!(args.max_pages, 1000);
        assert_eq!(args.timeout(), Duration::from_secs(30));
        assert_eq!(args.request_delay(), Duration::ZERO);
        assert_eq!(args.bins, 20);
        assert_eq!(args.checkpoint, None);
    }

    #[test]
    fn checkpoint_lands_in_output_dir() {
        let args = Args::parse_from([
            "books-catalog-crawler",
            "--output-dir",
            "out",
            "--checkpoint",
            "livros",
        ]);
        assert_eq!(args.checkpoint.as_deref(), Some("livros"));
        assert_eq!(args.checkpoint_path("livros"), PathBuf::from("out/livros.db"));
    }

    #[test]
    fn zero_bins_rejected() {
        assert!(Args::try_parse_from(["books-catalog-crawler", "--bins", "0"]).is_err());
    }
}
