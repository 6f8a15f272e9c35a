use crate::{dataset::Table, error::Result};

pub const SAMPLE_TITLES: usize = 5;
pub const SAMPLE_DESCRIPTIONS: usize = 3;
pub const DESCRIPTION_PREVIEW_CHARS: usize = 200;

/// Summary statistics of one numeric column
#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation, NaN below two values
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl Describe {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let std = if sorted.len() > 1 {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1.0)).sqrt()
        } else {
            f64::NAN
        };

        Some(Self {
            count: sorted.len(),
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            q50: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Linear-interpolated quantile of pre-sorted values
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[derive(Debug, Clone)]
pub struct ExplorationReport {
    pub rows: usize,
    pub missing: Vec<(String, usize)>,
    pub lengths: Vec<(String, Describe)>,
    pub sample_titles: Vec<String>,
    pub sample_descriptions: Vec<String>,
    pub category_counts: Vec<(String, usize)>,
}

fn char_lengths(cells: &[&str]) -> Vec<f64> {
    cells.iter().map(|c| c.chars().count() as f64).collect()
}

fn preview(text: &str, max_chars: usize) -> String {
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{truncated}...")
}

/// Frequencies in descending order; equal counts keep first-seen order
pub fn value_counts(cells: &[&str]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for cell in cells {
        match counts.iter_mut().find(|(value, _)| value == cell) {
            Some((_, n)) => *n += 1,
            None => counts.push((cell.to_string(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

pub fn explore(table: &Table) -> Result<ExplorationReport> {
    let titles = table.column("title")?;
    let descriptions = table.column("description")?;
    let categories = table.column("category_id")?;

    let missing = vec![
        (
            "title".to_string(),
            titles.iter().filter(|t| t.is_empty()).count(),
        ),
        (
            "description".to_string(),
            descriptions.iter().filter(|d| d.is_empty()).count(),
        ),
    ];

    let mut lengths = Vec::new();
    if let Some(d) = Describe::from_values(&char_lengths(&titles)) {
        lengths.push(("title_length".to_string(), d));
    }
    if let Some(d) = Describe::from_values(&char_lengths(&descriptions)) {
        lengths.push(("description_length".to_string(), d));
    }
    for header in table
        .headers
        .iter()
        .filter(|h| h.starts_with("token_count"))
    {
        if let Some(d) = Describe::from_values(&table.numeric_column(header)?) {
            lengths.push((header.clone(), d));
        }
    }

    Ok(ExplorationReport {
        rows: table.len(),
        missing,
        lengths,
        sample_titles: titles
            .iter()
            .take(SAMPLE_TITLES)
            .map(|t| t.to_string())
            .collect(),
        sample_descriptions: descriptions
            .iter()
            .take(SAMPLE_DESCRIPTIONS)
            .map(|d| preview(d, DESCRIPTION_PREVIEW_CHARS))
            .collect(),
        category_counts: value_counts(&categories),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_matches_linear_quantiles() {
        let d = Describe::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(d.count, 4);
        assert_eq!(d.mean, 2.5);
        assert!((d.std - 1.2909944487358056).abs() < 1e-12);
        assert_eq!(d.min, 1.0);
        assert_eq!(d.q25, 1.75);
        assert_eq!(d.q50, 2.5);
        assert_eq!(d.q75, 3.25);
        assert_eq!(d.max, 4.0);
    }

    #[test]
    fn test_describe_single_value() {
        let d = Describe::from_values(&[7.0]).unwrap();
        assert!(d.std.is_nan());
        assert_eq!(d.q25, 7.0);
        assert!(Describe::from_values(&[]).is_none());
    }

    #[test]
    fn test_value_counts_order() {
        let counts = value_counts(&["22", "10", "10", "24", "22", "10"]);
        assert_eq!(
            counts,
            vec![
                ("10".to_string(), 3),
                ("22".to_string(), 2),
                ("24".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_preview_truncates_on_chars() {
        assert_eq!(preview("héllo", 2), "hé...");
        assert_eq!(preview("", 200), "...");
    }
}
