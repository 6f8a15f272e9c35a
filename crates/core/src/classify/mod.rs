//! Bag-of-words baseline predicting `high_views`.

mod logistic;
mod metrics;
mod split;

use std::path::{Path, PathBuf};

use ndarray::Array1;

pub use logistic::LogisticRegression;
pub use metrics::{
    ClassMetrics, ClassificationReport, ConfusionMatrix, RocCurve, auc, roc_curve,
};
pub use split::{Split, stratified_split};

use crate::{
    charts::{render_confusion_matrix, render_roc_curve},
    config::PipelineConfig,
    dataset::read_records,
    error::{Result, TrendlexError},
    types::{
        DocumentVariant, DualDocumentRecord, ProcessedRecord, ProcessedSchema,
        SingleDocumentRecord,
    },
    vectorize::CountVectorizer,
};

pub const NGRAM_RANGE: (usize, usize) = (1, 2);

/// Scores of one held-out evaluation
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub train_rows: usize,
    pub test_rows: usize,
    pub vocabulary_size: usize,
    pub confusion: ConfusionMatrix,
    pub report: ClassificationReport,
    pub roc: RocCurve,
    pub auc: f64,
}

#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub schema: ProcessedSchema,
    pub variant: DocumentVariant,
    pub evaluation: Evaluation,
    pub figures: Vec<PathBuf>,
}

fn pick<T: Clone>(items: &[T], rows: &[usize]) -> Vec<T> {
    rows.iter().map(|&i| items[i].clone()).collect()
}

/// Split, vectorize the training side only, fit and score the test side.
pub fn evaluate(documents: &[String], labels: &[u8], cfg: &PipelineConfig) -> Result<Evaluation> {
    let split = stratified_split(labels, cfg.split.test_fraction, cfg.split.seed)?;
    let (train_docs, test_docs) = (pick(documents, &split.train), pick(documents, &split.test));
    let (train_y, test_y) = (pick(labels, &split.train), pick(labels, &split.test));

    let mut vectorizer = CountVectorizer::new(NGRAM_RANGE, cfg.model.min_df);
    let x_train = vectorizer.fit_transform(&train_docs);
    if vectorizer.n_terms() == 0 {
        return Err(TrendlexError::Model {
            reason: format!(
                "empty vocabulary: no n-gram appears in {} training documents",
                cfg.model.min_df
            ),
        });
    }
    let x_test = vectorizer.transform(&test_docs);
    log::info!(
        "{} train / {} test rows, {} features",
        split.train.len(),
        split.test.len(),
        vectorizer.n_terms()
    );

    let mut model = LogisticRegression::from_config(&cfg.model);
    let y_train: Array1<f64> = train_y.iter().map(|&y| f64::from(y)).collect();
    model.fit(&x_train, &y_train)?;

    let predictions = model.predict(&x_test)?;
    let scores = model.predict_proba(&x_test)?.to_vec();

    let confusion = ConfusionMatrix::from_predictions(&test_y, &predictions);
    let roc = roc_curve(&test_y, &scores).ok_or_else(|| TrendlexError::Model {
        reason: "test split lacks one of the classes".to_string(),
    })?;
    let auc = auc(&roc.fpr, &roc.tpr);

    Ok(Evaluation {
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        vocabulary_size: vectorizer.n_terms(),
        report: ClassificationReport::from_confusion(&confusion),
        confusion,
        roc,
        auc,
    })
}

/// Token documents and labels of a processed CSV for `variant`
pub fn load_corpus<R: ProcessedRecord>(
    path: &Path,
    variant: DocumentVariant,
) -> Result<(Vec<String>, Vec<u8>)> {
    let records: Vec<R> = read_records(path)?;
    if records.is_empty() {
        return Err(TrendlexError::EmptyDataset {
            path: path.to_path_buf(),
        });
    }
    Ok(records
        .iter()
        .map(|r| (r.tokens_joined(variant).to_string(), r.high_views()))
        .unzip())
}

/// Train on a processed CSV and write the confusion matrix and ROC figures.
pub fn run_training(
    cfg: &PipelineConfig,
    schema: ProcessedSchema,
    variant: DocumentVariant,
) -> Result<TrainingOutcome> {
    let path = cfg.paths.processed_path(schema);
    log::info!("training on {} ({} text)", path.display(), variant.name());

    let (documents, labels) = match schema {
        ProcessedSchema::Dual => load_corpus::<DualDocumentRecord>(&path, variant)?,
        ProcessedSchema::Single => load_corpus::<SingleDocumentRecord>(&path, variant)?,
    };
    let evaluation = evaluate(&documents, &labels, cfg)?;

    let dir = &cfg.paths.figures_dir;
    std::fs::create_dir_all(dir)?;
    let confusion_path = dir.join("confusion_matrix.png");
    render_confusion_matrix(
        &confusion_path,
        "Confusion matrix (high_views)",
        evaluation.confusion.cells(),
    )?;
    let roc_path = dir.join("roc_curve.png");
    render_roc_curve(
        &roc_path,
        "ROC curve (high_views)",
        &evaluation.roc.points(),
        evaluation.auc,
    )?;

    Ok(TrainingOutcome {
        schema,
        variant,
        evaluation,
        figures: vec![confusion_path, roc_path],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> (Vec<String>, Vec<u8>) {
        let mut documents = Vec::new();
        let mut labels = Vec::new();
        for i in 0..24 {
            if i % 2 == 0 {
                documents.push(format!("official music video premiere {}", i % 3));
                labels.push(1);
            } else {
                documents.push(format!("quiet acoustic cover session {}", i % 3));
                labels.push(0);
            }
        }
        (documents, labels)
    }

    #[test]
    fn test_evaluate_on_separable_corpus() {
        let (documents, labels) = corpus();
        let cfg = PipelineConfig::default();
        let evaluation = evaluate(&documents, &labels, &cfg).unwrap();

        assert_eq!(evaluation.test_rows, 6);
        assert_eq!(evaluation.train_rows, 18);
        assert_eq!(evaluation.confusion.total(), 6);
        assert_eq!(evaluation.report.accuracy, 1.0);
        assert_eq!(evaluation.auc, 1.0);
    }

    #[test]
    fn test_evaluate_rejects_empty_vocabulary() {
        let documents: Vec<String> = (0..8).map(|i| format!("w{i}x")).collect();
        let labels = vec![0, 1, 0, 1, 0, 1, 0, 1];
        let err = evaluate(&documents, &labels, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, TrendlexError::Model { .. }));
    }
}
