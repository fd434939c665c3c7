use super::{
    stats::{histogram, kde},
    tally::StockTally,
};
use crate::CrawlerError;
use plotters::prelude::*;
use std::path::Path;

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const DENSITY_LINE: RGBColor = RGBColor(31, 119, 180);
const GRID: RGBColor = RGBColor(200, 200, 200);
const VIRIDIS: [RGBColor; 5] = [
    RGBColor(68, 1, 84),
    RGBColor(59, 82, 139),
    RGBColor(33, 145, 140),
    RGBColor(94, 201, 98),
    RGBColor(253, 231, 37),
];

fn chart_error(e: impl std::fmt::Display) -> CrawlerError {
    CrawlerError::Chart(e.to_string())
}

/// Price histogram with a density curve scaled to record counts.
pub fn price_histogram(prices: &[f64], bins: usize, path: &Path) -> Result<(), CrawlerError> {
    let bars = histogram(prices, bins);
    let (start, end) = match (bars.first(), bars.last()) {
        (Some(first), Some(last)) => (first.start, last.end),
        _ => return Err(CrawlerError::Chart("no prices to plot".to_string())),
    };
    let bin_width = (end - start) / bars.len() as f64;

    let density: Vec<(f64, f64)> = kde(prices, start, end, 200)
        .into_iter()
        .map(|(x, d)| (x, d * prices.len() as f64 * bin_width))
        .collect();

    let top = bars
        .iter()
        .map(|b| b.count as f64)
        .chain(density.iter().map(|(_, y)| *y))
        .fold(0.0, f64::max)
        * 1.1;

    let root = SVGBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Distribuição de Preços dos Livros", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(start..end, 0.0..top.max(1.0))
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .light_line_style(GRID.mix(0.7))
        .x_desc("Preço")
        .y_desc("Número de Livros")
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(bars.iter().map(|b| {
            Rectangle::new(
                [(b.start, 0.0), (b.end, b.count as f64)],
                SKY_BLUE.filled(),
            )
        }))
        .map_err(chart_error)?;

    if !density.is_empty() {
        chart
            .draw_series(LineSeries::new(density, DENSITY_LINE.stroke_width(2)))
            .map_err(chart_error)?;
    }

    root.present().map_err(chart_error)?;
    Ok(())
}

/// One bar per stock status, labels rotated under the axis.
pub fn stock_bars(tally: &StockTally, path: &Path) -> Result<(), CrawlerError> {
    if tally.is_empty() {
        return Err(CrawlerError::Chart("no stock status to plot".to_string()));
    }

    let labels: Vec<&str> = tally.iter().map(|(status, _)| status).collect();
    let top = tally.iter().map(|(_, count)| count).max().unwrap_or(0) as u32;
    let top = top + top / 10 + 1;

    let root = SVGBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Quantidade de Livros por Status de Estoque", ("sans-serif", 22))
        .margin(20)
        .x_label_area_size(120)
        .y_label_area_size(60)
        .build_cartesian_2d((0..labels.len() as u32).into_segmented(), 0u32..top)
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .light_line_style(GRID.mix(0.7))
        .x_labels(labels.len())
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => labels
                .get(*i as usize)
                .map_or(String::new(), |l| l.to_string()),
            _ => String::new(),
        })
        .x_label_style(("sans-serif", 14).into_font().transform(FontTransform::Rotate90))
        .x_desc("Status de Estoque")
        .y_desc("Número de Livros")
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(tally.iter().enumerate().map(|(i, (_, count))| {
            let i = i as u32;
            let color = VIRIDIS[i as usize % VIRIDIS.len()];
            Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0),
                    (SegmentValue::Exact(i + 1), count as u32),
                ],
                color.filled(),
            )
        }))
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::books::{Dataset, ItemRecord};
    use std::fs;

    #[test]
    fn test_price_histogram_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("precos_histograma.svg");

        price_histogram(&[10.0, 22.1, 35.98, 51.77, 59.99], 20, &path).unwrap();
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Distribuição de Preços dos Livros"));
    }

    #[test]
    fn test_price_histogram_needs_prices() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.svg");
        assert!(matches!(
            price_histogram(&[], 20, &path),
            Err(CrawlerError::Chart(_))
        ));
    }

    #[test]
    fn test_stock_bars_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("estoque_barras.svg");

        let dataset: Dataset = ["In stock", "In stock", "Out of stock"]
            .iter()
            .map(|status| ItemRecord {
                title: "t".to_string(),
                link: "l".to_string(),
                price: "1.00".to_string(),
                stock_status: status.to_string(),
            })
            .collect::<Vec<_>>()
            .into();
        stock_bars(&StockTally::from_dataset(&dataset), &path).unwrap();

        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Out of stock"));
    }
}
