//! CSV loading and saving, raw-file discovery and the median split label.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, TimeZone};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::{Result, TrendlexError},
    types::VideoRecord,
};

/// Pick the raw CSV whose file name sorts last.
///
/// Raw files are named with a leading timestamp, so the last name is the most
/// recent fetch. Returns `None` when the directory is absent or holds no CSV.
pub fn latest_raw_csv(dir: &Path) -> Result<Option<PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            candidates.push(path);
        }
    }

    candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(candidates.pop())
}

pub fn require_latest_raw_csv(dir: &Path) -> Result<PathBuf> {
    latest_raw_csv(dir)?.ok_or_else(|| TrendlexError::NoRawData {
        dir: dir.to_path_buf(),
    })
}

/// `trending_<YYYYmmdd_HHMMSS>_<REGIONS>.csv`
pub fn raw_file_name<Tz: TimeZone>(regions: &[String], at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "trending_{}_{}.csv",
        at.format("%Y%m%d_%H%M%S"),
        regions.join("-")
    )
}

pub fn read_raw(path: &Path) -> Result<Vec<VideoRecord>> {
    read_records(path)
}

pub fn write_raw(path: &Path, records: &[VideoRecord]) -> Result<()> {
    write_records(path, records)
}

/// Deserialize every row of a headed CSV into `T`
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    log::debug!("read {} rows from {}", records.len(), path.display());
    Ok(records)
}

pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    log::debug!("wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Header-addressed view of an arbitrary CSV
#[derive(Debug, Clone)]
pub struct Table {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<csv::StringRecord>,
}

impl Table {
    pub fn read(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let rows = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Cells of one column, in row order
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self
            .headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TrendlexError::MissingColumn {
                column: name.to_string(),
                path: self.path.clone(),
            })?;

        Ok(self
            .rows
            .iter()
            .map(|row| row.get(idx).unwrap_or(""))
            .collect())
    }

    /// Numeric column; empty cells are skipped
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        self.column(name)?
            .into_iter()
            .filter(|cell| !cell.trim().is_empty())
            .map(|cell| {
                cell.trim()
                    .parse::<f64>()
                    .map_err(|_| TrendlexError::InvalidValue {
                        column: name.to_string(),
                        value: cell.to_string(),
                    })
            })
            .collect()
    }
}

/// Middle value, or the mean of the two middle values for an even count
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;

    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Label every record 1 when its views strictly exceed the sample median.
pub fn label_high_views(views: &[u64]) -> Option<(f64, Vec<u8>)> {
    let as_f64: Vec<f64> = views.iter().map(|&v| v as f64).collect();
    let median_views = median(&as_f64)?;
    let labels = as_f64
        .iter()
        .map(|&v| u8::from(v > median_views))
        .collect();
    Some((median_views, labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_odd_sample_median_record_is_low() {
        let (median_views, labels) = label_high_views(&[500, 100, 300]).unwrap();
        assert_eq!(median_views, 300.0);
        assert_eq!(labels, vec![1, 0, 0]);
    }

    #[test]
    fn test_two_rows_larger_is_high() {
        let (_, labels) = label_high_views(&[10, 1_000]).unwrap();
        assert_eq!(labels, vec![0, 1]);
        assert_eq!(labels.iter().map(|&l| l as u32).sum::<u32>(), 1);
    }

    #[test]
    fn test_ties_at_median_are_low() {
        let (_, labels) = label_high_views(&[7, 7, 7, 7]).unwrap();
        assert_eq!(labels, vec![0, 0, 0, 0]);
        assert!(label_high_views(&[]).is_none());
    }

    #[test]
    fn test_raw_file_name_sorts_chronologically() {
        let earlier = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 1, 2, 13, 0, 0).unwrap();
        let a = raw_file_name(&["US".to_string(), "GB".to_string()], &earlier);
        let b = raw_file_name(&["CA".to_string()], &later);
        assert_eq!(a, "trending_20260102_030405_US-GB.csv");
        assert!(a < b);
    }
}
