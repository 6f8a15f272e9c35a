use std::collections::BTreeMap;

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::error::{Result, TrendlexError};

/// Row indices of a train/test partition, each ascending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Per-class test quotas by largest remainder, clamped so every class keeps
/// a row on each side.
fn test_quotas(class_sizes: &[usize], n: usize, test_size: usize) -> Vec<usize> {
    let exact: Vec<f64> = class_sizes
        .iter()
        .map(|&size| size as f64 * test_size as f64 / n as f64)
        .collect();
    let mut quotas: Vec<usize> = exact.iter().map(|q| q.floor() as usize).collect();

    let mut by_remainder: Vec<usize> = (0..class_sizes.len()).collect();
    by_remainder.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.total_cmp(&ra)
    });

    let leftover = test_size.saturating_sub(quotas.iter().sum());
    for &class in by_remainder.iter().take(leftover) {
        quotas[class] += 1;
    }

    for (quota, &size) in quotas.iter_mut().zip(class_sizes) {
        *quota = (*quota).clamp(1, size - 1);
    }
    quotas
}

/// Stratified shuffle split of `labels`.
///
/// The test side holds `ceil(n * test_fraction)` rows spread over classes in
/// proportion to their sizes. The same labels and seed always give the same
/// partition.
pub fn stratified_split(labels: &[u8], test_fraction: f64, seed: u64) -> Result<Split> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(TrendlexError::InvalidConfig {
            reason: format!("test fraction {test_fraction} is outside (0, 1)"),
        });
    }

    let mut classes: BTreeMap<u8, Vec<usize>> = BTreeMap::new();
    for (idx, &label) in labels.iter().enumerate() {
        classes.entry(label).or_default().push(idx);
    }

    if classes.len() < 2 {
        return Err(TrendlexError::DegenerateSplit {
            reason: format!("need two classes, found {}", classes.len()),
        });
    }
    if let Some((label, _)) = classes.iter().find(|(_, rows)| rows.len() < 2) {
        return Err(TrendlexError::DegenerateSplit {
            reason: format!("class {label} has a single member"),
        });
    }

    let n = labels.len();
    let test_size = (n as f64 * test_fraction).ceil() as usize;
    let sizes: Vec<usize> = classes.values().map(Vec::len).collect();
    let quotas = test_quotas(&sizes, n, test_size);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n);
    let mut test = Vec::with_capacity(test_size);
    for (mut rows, quota) in classes.into_values().zip(quotas) {
        rows.shuffle(&mut rng);
        test.extend_from_slice(&rows[..quota]);
        train.extend_from_slice(&rows[quota..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    Ok(Split { train, test })
}
