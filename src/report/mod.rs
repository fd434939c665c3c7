mod chart;
mod export;
mod stats;
mod tally;

pub use export::{read_csv, write_csv, write_xlsx};
pub use stats::{describe, histogram, kde, parse_price, Bin, PriceStats};
pub use tally::StockTally;

use crate::{
    books::{Dataset, COLUMNS},
    CrawlerError,
};
use std::{fmt, path::PathBuf};
use tracing::{info, warn};

pub const XLSX_FILE: &str = "livros.xlsx";
pub const CSV_FILE: &str = "livros.csv";
pub const HISTOGRAM_FILE: &str = "precos_histograma.svg";
pub const STOCK_CHART_FILE: &str = "estoque_barras.svg";

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub output_dir: PathBuf,
    pub bins: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            output_dir: PathBuf::from("."),
            bins: 20,
        }
    }
}

#[derive(Debug)]
pub struct Summary {
    pub stats: Option<PriceStats>,
    pub stock_tally: StockTally,
    pub missing: [usize; 4],
    pub charts: Vec<PathBuf>,
    pub exported_files: Vec<PathBuf>,
}

/// Exports the dataset, then computes the price statistics, the stock tally
/// and renders both charts.
///
/// Exports are written before any price is converted, so a
/// [`CrawlerError::TypeConversionError`] never loses the crawled data.
pub fn summarize(dataset: &Dataset, options: &ReportOptions) -> Result<Summary, CrawlerError> {
    let xlsx = options.output_dir.join(XLSX_FILE);
    write_xlsx(dataset, &xlsx)?;
    info!("Wrote {}", xlsx.display());

    let csv = options.output_dir.join(CSV_FILE);
    write_csv(dataset, &csv)?;
    info!("Wrote {}", csv.display());

    let prices = dataset
        .iter()
        .map(|record| parse_price(&record.price))
        .collect::<Result<Vec<f64>, _>>()?;
    let stats = describe(&prices);
    let stock_tally = StockTally::from_dataset(dataset);

    let mut charts = vec![];
    if dataset.is_empty() {
        warn!("Empty dataset, no chart rendered");
    } else {
        let histogram = options.output_dir.join(HISTOGRAM_FILE);
        chart::price_histogram(&prices, options.bins, &histogram)?;
        info!("Wrote {}", histogram.display());
        charts.push(histogram);

        let bars = options.output_dir.join(STOCK_CHART_FILE);
        chart::stock_bars(&stock_tally, &bars)?;
        info!("Wrote {}", bars.display());
        charts.push(bars);
    }

    Ok(Summary {
        stats,
        stock_tally,
        missing: dataset.missing_by_column(),
        charts,
        exported_files: vec![xlsx, csv],
    })
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Preco")?;
        match &self.stats {
            Some(stats) => write!(f, "{}", stats)?,
            None => writeln!(f, "count  {:>12}", 0)?,
        }

        writeln!(f, "\nEstoque")?;
        write!(f, "{}", self.stock_tally)?;

        writeln!(f, "\nMissing values")?;
        for (column, missing) in COLUMNS.iter().zip(self.missing) {
            writeln!(f, "{:<8} {}", column, missing)?;
        }

        writeln!(f, "\nFiles")?;
        for path in self.exported_files.iter().chain(&self.charts) {
            writeln!(f, "> {}", path.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::books::ItemRecord;
    use pretty_assertions::assert_eq;

    fn record(title: &str, price: &str, stock_status: &str) -> ItemRecord {
        ItemRecord {
            title: title.to_string(),
            link: format!("https://books.toscrape.com/catalogue/{}/index.html", title),
            price: price.to_string(),
            stock_status: stock_status.to_string(),
        }
    }

    fn options(dir: &tempfile::TempDir) -> ReportOptions {
        ReportOptions {
            output_dir: dir.path().to_path_buf(),
            ..ReportOptions::default()
        }
    }

    #[test]
    fn test_summarize() {
        let dir = tempfile::tempdir().unwrap();
        let dataset: Dataset = vec![
            record("a", "10.00", "In stock"),
            record("b", "20.00", "In stock"),
            record("c", "30.00", "Out of stock"),
        ]
        .into();

        let summary = summarize(&dataset, &options(&dir)).unwrap();

        let stats = summary.stats.as_ref().unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 30.0);
        assert!((stats.mean - 20.0).abs() < 1e-9);
        assert_eq!(summary.stock_tally.get("In stock"), 2);
        assert_eq!(summary.stock_tally.total(), dataset.len());
        assert_eq!(summary.missing, [0, 0, 0, 0]);

        assert_eq!(
            summary.exported_files,
            vec![dir.path().join(XLSX_FILE), dir.path().join(CSV_FILE)]
        );
        assert_eq!(
            summary.charts,
            vec![dir.path().join(HISTOGRAM_FILE), dir.path().join(STOCK_CHART_FILE)]
        );
        for path in summary.exported_files.iter().chain(&summary.charts) {
            assert!(path.is_file(), "{}", path.display());
        }
        assert_eq!(read_csv(&dir.path().join(CSV_FILE)).unwrap(), dataset);

        let text = summary.to_string();
        assert!(text.contains("Out of stock"));
        assert!(text.contains("mean"));
    }

    #[test]
    fn test_bad_price_fails_after_export() {
        let dir = tempfile::tempdir().unwrap();
        let dataset: Dataset = vec![
            record("a", "10.00", "In stock"),
            record("b", "", "In stock"),
        ]
        .into();

        let err = summarize(&dataset, &options(&dir)).unwrap_err();
        assert!(matches!(err, CrawlerError::TypeConversionError(t) if t.is_empty()));

        assert_eq!(read_csv(&dir.path().join(CSV_FILE)).unwrap(), dataset);
        assert!(!dir.path().join(HISTOGRAM_FILE).exists());
    }

    #[test]
    fn test_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let summary = summarize(&Dataset::default(), &options(&dir)).unwrap();

        assert_eq!(summary.stats, None);
        assert!(summary.stock_tally.is_empty());
        assert!(summary.charts.is_empty());
        assert_eq!(summary.exported_files.len(), 2);
    }
}
