use crate::books::Dataset;
use itertools::Itertools;
use std::fmt;

/// Record count per distinct stock status, largest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockTally {
    counts: Vec<(String, usize)>,
}

impl StockTally {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let counts = dataset
            .iter()
            .map(|record| record.stock_status.as_str())
            .counts()
            .into_iter()
            .sorted_by(|(a, x), (b, y)| y.cmp(x).then_with(|| a.cmp(b)))
            .map(|(status, count)| (status.to_string(), count))
            .collect();
        StockTally { counts }
    }

    pub fn get(&self, status: &str) -> usize {
        self.counts
            .iter()
            .find(|(s, _)| s == status)
            .map_or(0, |(_, count)| *count)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(s, count)| (s.as_str(), *count))
    }
}

impl fmt::Display for StockTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.iter().map(|(s, _)| s.len()).max().unwrap_or(0);
        for (status, count) in self.iter() {
            writeln!(f, "{:<width$}  {}", status, count, width = width)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::books::ItemRecord;
    use pretty_assertions::assert_eq;

    fn dataset(statuses: &[(&str, usize)]) -> Dataset {
        statuses
            .iter()
            .flat_map(|(status, n)| std::iter::repeat(*status).take(*n))
            .enumerate()
            .map(|(i, status)| ItemRecord {
                title: format!("Book {}", i),
                link: format!("https://books.toscrape.com/catalogue/book_{}/index.html", i),
                price: "20.00".to_string(),
                stock_status: status.to_string(),
            })
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_tally_counts_each_status() {
        let data = dataset(&[("Out of stock", 3), ("In stock", 7)]);
        let tally = StockTally::from_dataset(&data);

        assert_eq!(
            tally.iter().collect::<Vec<_>>(),
            vec![("In stock", 7), ("Out of stock", 3)]
        );
        assert_eq!(tally.get("In stock"), 7);
        assert_eq!(tally.get("Sold out"), 0);
        assert_eq!(tally.total(), data.len());
    }

    #[test]
    fn test_tally_ties_sorted_by_label() {
        let data = dataset(&[("b", 2), ("a", 2), ("c", 5)]);
        let tally = StockTally::from_dataset(&data);
        assert_eq!(
            tally.iter().collect::<Vec<_>>(),
            vec![("c", 5), ("a", 2), ("b", 2)]
        );
    }

    #[test]
    fn test_tally_is_exact_match() {
        let data = dataset(&[("In stock", 1), ("in stock", 1)]);
        assert_eq!(StockTally::from_dataset(&data).iter().count(), 2);
        assert!(StockTally::from_dataset(&Dataset::default()).is_empty());
    }
}
