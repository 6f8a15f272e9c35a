//! Evaluation metrics for the binary high-views classifier.

/// Confusion matrix for labels 0 and 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfusionMatrix {
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
    pub tp: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(y_true: &[u8], y_pred: &[u8]) -> Self {
        let mut cm = Self::default();
        for (&t, &p) in y_true.iter().zip(y_pred) {
            match (t == 1, p == 1) {
                (true, true) => cm.tp += 1,
                (false, false) => cm.tn += 1,
                (false, true) => cm.fp += 1,
                (true, false) => cm.fn_ += 1,
            }
        }
        cm
    }

    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    /// Rows are actual labels, columns predicted labels
    pub fn cells(&self) -> [[usize; 2]; 2] {
        [[self.tn, self.fp], [self.fn_, self.tp]]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

fn ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}

impl ClassMetrics {
    fn new(true_positive: usize, predicted: usize, support: usize) -> Self {
        let precision = ratio(true_positive, predicted);
        let recall = ratio(true_positive, support);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        Self {
            precision,
            recall,
            f1,
            support,
        }
    }
}

fn average(a: &ClassMetrics, b: &ClassMetrics, wa: f64, wb: f64) -> ClassMetrics {
    let sum = wa + wb;
    let mix = |x: f64, y: f64| if sum == 0.0 { 0.0 } else { (x * wa + y * wb) / sum };
    ClassMetrics {
        precision: mix(a.precision, b.precision),
        recall: mix(a.recall, b.recall),
        f1: mix(a.f1, b.f1),
        support: a.support + b.support,
    }
}

/// Per-class precision, recall and F1 with accuracy and averages.
///
/// Undefined ratios (no predictions or no support) count as 0.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub classes: [ClassMetrics; 2],
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    pub fn from_confusion(cm: &ConfusionMatrix) -> Self {
        let negative = ClassMetrics::new(cm.tn, cm.tn + cm.fn_, cm.tn + cm.fp);
        let positive = ClassMetrics::new(cm.tp, cm.tp + cm.fp, cm.tp + cm.fn_);
        let total = cm.total();
        Self {
            classes: [negative, positive],
            accuracy: ratio(cm.tp + cm.tn, total),
            macro_avg: average(&negative, &positive, 1.0, 1.0),
            weighted_avg: average(
                &negative,
                &positive,
                negative.support as f64,
                positive.support as f64,
            ),
        }
    }
}

/// False and true positive rates at every distinct score threshold
#[derive(Debug, Clone, PartialEq)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    pub thresholds: Vec<f64>,
}

impl RocCurve {
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.fpr.iter().copied().zip(self.tpr.iter().copied()).collect()
    }
}

/// ROC curve starting at (0, 0) with thresholds in descending order.
///
/// Returns `None` unless both classes are present.
pub fn roc_curve(y_true: &[u8], scores: &[f64]) -> Option<RocCurve> {
    let mut pairs: Vec<(f64, bool)> = scores
        .iter()
        .zip(y_true)
        .map(|(&s, &t)| (s, t == 1))
        .collect();
    pairs.sort_by(|a, b| b.0.total_cmp(&a.0));

    let n_pos = pairs.iter().filter(|(_, t)| *t).count();
    let n_neg = pairs.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut curve = RocCurve {
        fpr: vec![0.0],
        tpr: vec![0.0],
        thresholds: vec![f64::INFINITY],
    };
    let (mut tp, mut fp) = (0usize, 0usize);
    let mut i = 0;
    while i < pairs.len() {
        let score = pairs[i].0;
        while i < pairs.len() && pairs[i].0 == score {
            if pairs[i].1 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        curve.fpr.push(ratio(fp, n_neg));
        curve.tpr.push(ratio(tp, n_pos));
        curve.thresholds.push(score);
    }
    Some(curve)
}

/// Area under a curve by the trapezoid rule
pub fn auc(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confusion_matrix() {
        let cm = ConfusionMatrix::from_predictions(&[1, 0, 1, 1, 0, 0], &[1, 0, 0, 1, 1, 0]);
        assert_eq!(cm.cells(), [[2, 1], [1, 2]]);
        assert_eq!(cm.total(), 6);
    }

    #[test]
    fn test_report_matches_hand_computation() {
        // tn=3 fp=1 fn=2 tp=4
        let cm = ConfusionMatrix {
            tn: 3,
            fp: 1,
            fn_: 2,
            tp: 4,
        };
        let report = ClassificationReport::from_confusion(&cm);
        let [neg, pos] = report.classes;

        assert!((neg.precision - 3.0 / 5.0).abs() < 1e-12);
        assert!((neg.recall - 3.0 / 4.0).abs() < 1e-12);
        assert_eq!(neg.support, 4);
        assert!((pos.precision - 4.0 / 5.0).abs() < 1e-12);
        assert!((pos.recall - 4.0 / 6.0).abs() < 1e-12);
        assert_eq!(pos.support, 6);
        assert!((report.accuracy - 0.7).abs() < 1e-12);

        assert!((report.macro_avg.precision - 0.7).abs() < 1e-12);
        let weighted_recall = (0.75 * 4.0 + (4.0 / 6.0) * 6.0) / 10.0;
        assert!((report.weighted_avg.recall - weighted_recall).abs() < 1e-12);
        assert_eq!(report.weighted_avg.support, 10);
    }

    #[test]
    fn test_zero_division_counts_as_zero() {
        let cm = ConfusionMatrix::from_predictions(&[0, 1, 1], &[0, 0, 0]);
        let report = ClassificationReport::from_confusion(&cm);
        assert_eq!(report.classes[1].precision, 0.0);
        assert_eq!(report.classes[1].f1, 0.0);
    }

    #[test]
    fn test_roc_and_auc() {
        let curve = roc_curve(&[0, 0, 1, 1], &[0.1, 0.4, 0.35, 0.8]).unwrap();
        assert_eq!(curve.fpr, vec![0.0, 0.0, 0.5, 0.5, 1.0]);
        assert_eq!(curve.tpr, vec![0.0, 0.5, 0.5, 1.0, 1.0]);
        assert!((auc(&curve.fpr, &curve.tpr) - 0.75).abs() < 1e-12);

        let perfect = roc_curve(&[0, 0, 1, 1], &[0.1, 0.2, 0.8, 0.9]).unwrap();
        assert_eq!(auc(&perfect.fpr, &perfect.tpr), 1.0);
    }

    #[test]
    fn test_roc_groups_tied_scores() {
        let curve = roc_curve(&[0, 1, 0, 1], &[0.5, 0.5, 0.2, 0.9]).unwrap();
        assert_eq!(curve.thresholds.len(), 4);
        assert_eq!(curve.points()[2], (0.5, 1.0));
        assert!(roc_curve(&[1, 1], &[0.2, 0.3]).is_none());
    }
}
