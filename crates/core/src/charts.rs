//! PNG chart primitives built on plotters.

use std::path::Path;

use plotters::{
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use crate::error::{Result, TrendlexError};

pub const CHART_SIZE: (u32, u32) = (640, 480);

const SERIES_COLORS: [RGBColor; 3] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
];

/// One equal-width histogram bin
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// Split `values` into `bins` equal-width bins over their range.
///
/// The last bin is closed on the right. A constant series is centred in a
/// unit-wide range.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<Bin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in finite {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            lo: lo + width * i as f64,
            hi: if i + 1 == bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

/// A labelled series for overlaid histograms
pub struct HistogramSeries<'a> {
    pub label: &'a str,
    pub values: &'a [f64],
}

pub struct HistogramLayout<'a> {
    pub title: &'a str,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
    pub bins: usize,
}

/// Overlaid histograms; the legend is drawn when more than one series is given.
pub fn render_histogram(
    path: &Path,
    layout: &HistogramLayout,
    series: &[HistogramSeries],
) -> Result<()> {
    let binned: Vec<Vec<Bin>> = series
        .iter()
        .map(|s| histogram_bins(s.values, layout.bins))
        .collect();

    let all_bins = binned.iter().flatten();
    let x_min = all_bins.clone().map(|b| b.lo).fold(f64::INFINITY, f64::min);
    let x_max = all_bins.clone().map(|b| b.hi).fold(f64::NEG_INFINITY, f64::max);
    let y_max = all_bins.map(|b| b.count).max().unwrap_or(0).max(1) as f64;
    let (x_min, x_max) = if x_min.is_finite() && x_max.is_finite() {
        (x_min, x_max)
    } else {
        (0.0, 1.0)
    };

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(TrendlexError::plot)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(layout.title, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max * 1.05)
        .map_err(TrendlexError::plot)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(layout.x_desc)
        .y_desc(layout.y_desc)
        .draw()
        .map_err(TrendlexError::plot)?;

    let alpha = if series.len() > 1 { 0.6 } else { 1.0 };
    for (i, (s, bins)) in series.iter().zip(&binned).enumerate() {
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        chart
            .draw_series(bins.iter().map(|b| {
                Rectangle::new(
                    [(b.lo, 0.0), (b.hi, b.count as f64)],
                    color.mix(alpha).filled(),
                )
            }))
            .map_err(TrendlexError::plot)?
            .label(s.label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    if series.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(TrendlexError::plot)?;
    }

    root.present().map_err(TrendlexError::plot)?;
    Ok(())
}

/// Horizontal bars, first entry on top
pub fn render_top_terms(
    path: &Path,
    title: &str,
    x_desc: &str,
    entries: &[(String, f64)],
) -> Result<()> {
    let n = entries.len() as i32;
    let x_max = entries
        .iter()
        .map(|(_, v)| *v)
        .fold(0.0, f64::max)
        .max(1.0);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(TrendlexError::plot)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(180)
        .build_cartesian_2d(0f64..x_max * 1.05, (0..n.max(1)).into_segmented())
        .map_err(TrendlexError::plot)?;

    // Row i from the bottom holds entry n - 1 - i.
    let label_of = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) if *i >= 0 && *i < n => {
            entries[(n - 1 - *i) as usize].0.clone()
        }
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(entries.len().max(1))
        .y_label_formatter(&label_of)
        .x_desc(x_desc)
        .draw()
        .map_err(TrendlexError::plot)?;

    chart
        .draw_series(
            Histogram::horizontal(&chart)
                .style(SERIES_COLORS[0].filled())
                .margin(4)
                .data(
                    entries
                        .iter()
                        .enumerate()
                        .map(|(i, (_, v))| (n - 1 - i as i32, *v)),
                ),
        )
        .map_err(TrendlexError::plot)?;

    root.present().map_err(TrendlexError::plot)?;
    Ok(())
}

/// 2x2 heat map; `cells[actual][predicted]`
pub fn render_confusion_matrix(path: &Path, title: &str, cells: [[usize; 2]; 2]) -> Result<()> {
    let max = cells.iter().flatten().copied().max().unwrap_or(0).max(1) as f64;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(TrendlexError::plot)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..1.5f64, -0.5f64..1.5f64)
        .map_err(TrendlexError::plot)?;

    // Actual class 0 is drawn on the top row.
    let class_at = |v: f64| {
        let r = v.round();
        ((v - r).abs() < 1e-6 && (0.0..=1.0).contains(&r)).then_some(r as i32)
    };
    let predicted_label = |v: &f64| class_at(*v).map(|c| c.to_string()).unwrap_or_default();
    let actual_label = |v: &f64| {
        class_at(*v)
            .map(|c| (1 - c).to_string())
            .unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(5)
        .y_labels(5)
        .x_label_formatter(&predicted_label)
        .y_label_formatter(&actual_label)
        .x_desc("Predicted label")
        .y_desc("True label")
        .draw()
        .map_err(TrendlexError::plot)?;

    for (actual, row) in cells.iter().enumerate() {
        for (predicted, &count) in row.iter().enumerate() {
            let (x, y) = (predicted as f64, 1.0 - actual as f64);
            let t = count as f64 / max;
            let shade = RGBColor(
                (247.0 - t * 239.0) as u8,
                (251.0 - t * 203.0) as u8,
                (255.0 - t * 148.0) as u8,
            );
            let ink = if t > 0.5 { WHITE } else { BLACK };

            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                    shade.filled(),
                )))
                .map_err(TrendlexError::plot)?;
            chart
                .draw_series(std::iter::once(Text::new(
                    count.to_string(),
                    (x, y),
                    ("sans-serif", 32)
                        .into_font()
                        .color(&ink)
                        .pos(Pos::new(HPos::Center, VPos::Center)),
                )))
                .map_err(TrendlexError::plot)?;
        }
    }

    root.present().map_err(TrendlexError::plot)?;
    Ok(())
}

/// ROC curve with the chance diagonal
pub fn render_roc_curve(path: &Path, title: &str, points: &[(f64, f64)], auc: f64) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(TrendlexError::plot)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(0f64..1f64, 0f64..1.02f64)
        .map_err(TrendlexError::plot)?;

    chart
        .configure_mesh()
        .x_desc("False positive rate")
        .y_desc("True positive rate")
        .draw()
        .map_err(TrendlexError::plot)?;

    let color = SERIES_COLORS[0];
    chart
        .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
        .map_err(TrendlexError::plot)?
        .label(format!("AUC = {auc:.3}"))
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

    chart
        .draw_series(DashedLineSeries::new(
            vec![(0.0, 0.0), (1.0, 1.0)],
            6,
            6,
            SERIES_COLORS[1].stroke_width(1),
        ))
        .map_err(TrendlexError::plot)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(TrendlexError::plot)?;

    root.present().map_err(TrendlexError::plot)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_bins_cover_range() {
        let bins = histogram_bins(&[0.0, 1.0, 2.0, 3.0, 4.0], 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].lo, 0.0);
        assert_eq!(bins[3].hi, 4.0);
        // max value lands in the closed last bin
        assert_eq!(
            bins.iter().map(|b| b.count).collect::<Vec<_>>(),
            vec![1, 1, 1, 2]
        );
    }

    #[test]
    fn test_histogram_bins_constant_and_empty() {
        let bins = histogram_bins(&[5.0, 5.0], 2);
        assert_eq!(bins[0].lo, 4.5);
        assert_eq!(bins[1].hi, 5.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);

        assert!(histogram_bins(&[], 20).is_empty());
        assert!(histogram_bins(&[f64::NAN], 20).is_empty());
    }
}
