use crate::{books::strip_currency, CrawlerError};
use lazy_regex::regex;
use std::fmt;

/// Parses a price such as `"51.77"`, `"£51.77"` or `"1,299.00"`.
pub fn parse_price(text: &str) -> Result<f64, CrawlerError> {
    let amount = strip_currency(text).replace(',', "");
    if !regex!(r"^-?(\d+\.?\d*|\.\d+)$").is_match(&amount) {
        return Err(CrawlerError::TypeConversionError(text.to_string()));
    }
    amount
        .parse::<f64>()
        .map_err(|_| CrawlerError::TypeConversionError(text.to_string()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation, NaN for a single value.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

/// Descriptive statistics, `None` for an empty input.
pub fn describe(values: &[f64]) -> Option<PriceStats> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    Some(PriceStats {
        count,
        mean,
        std,
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        q50: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[count - 1],
    })
}

/// Linear interpolation between the closest ranks of a sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64)
}

impl fmt::Display for PriceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "count  {:>12.5}", self.count as f64)?;
        writeln!(f, "mean   {:>12.5}", self.mean)?;
        writeln!(f, "std    {:>12.5}", self.std)?;
        writeln!(f, "min    {:>12.5}", self.min)?;
        writeln!(f, "25%    {:>12.5}", self.q25)?;
        writeln!(f, "50%    {:>12.5}", self.q50)?;
        writeln!(f, "75%    {:>12.5}", self.q75)?;
        writeln!(f, "max    {:>12.5}", self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Splits `[min, max]` into `bins` equal bins. The last bin includes `max`.
///
/// When every value is equal the range is widened to `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() || bins == 0 {
        return vec![];
    }

    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            start: lo + width * i as f64,
            end: if i + 1 == bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for v in values {
        let i = (((v - lo) / width) as usize).min(bins - 1);
        out[i].count += 1;
    }
    out
}

/// Gaussian kernel density with Scott's bandwidth, sampled at `points`
/// positions across `[start, end]`. Empty when fewer than two distinct values.
pub fn kde(values: &[f64], start: f64, end: f64, points: usize) -> Vec<(f64, f64)> {
    let stats = match describe(values) {
        Some(stats) if stats.count > 1 && stats.std > 0.0 => stats,
        _ => return vec![],
    };

    let n = stats.count as f64;
    let bandwidth = stats.std * n.powf(-0.2);
    let norm = n * bandwidth * (2.0 * std::f64::consts::PI).sqrt();
    let step = (end - start) / (points.max(2) - 1) as f64;

    (0..points.max(2))
        .map(|i| {
            let x = start + step * i as f64;
            let density = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                / norm;
            (x, density)
        })
        .collect()
}
