use std::path::{Path, PathBuf};

use crate::{
    charts::{HistogramLayout, HistogramSeries, render_histogram, render_top_terms},
    config::PipelineConfig,
    dataset::read_records,
    error::{Result, TrendlexError},
    types::{DualDocumentRecord, ProcessedSchema, SingleDocumentRecord},
    vectorize::{CountVectorizer, TfidfVectorizer, column_sums, pairwise_upper_triangle, top_terms},
};

pub const TOP_TERMS: usize = 20;
pub const TERM_MIN_DF: usize = 2;
pub const SIMILARITY_SAMPLE: usize = 200;
const LENGTH_BINS: usize = 20;
const SIMILARITY_BINS: usize = 30;

#[derive(Debug, Clone)]
pub struct FigureSummary {
    pub schema: ProcessedSchema,
    pub rows: usize,
    pub files: Vec<PathBuf>,
    /// Column means printed after rendering, in display order
    pub means: Vec<(String, f64)>,
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

fn top_count_terms(documents: &[&str], ngram: usize) -> Vec<(String, f64)> {
    let mut vectorizer = CountVectorizer::new((ngram, ngram), TERM_MIN_DF);
    let counts = vectorizer.fit_transform(documents);
    top_terms(vectorizer.terms(), &column_sums(&counts), TOP_TERMS)
}

fn tfidf_similarities(documents: &[&str]) -> Vec<f64> {
    let mut vectorizer = TfidfVectorizer::new((1, 1), TERM_MIN_DF);
    let matrix = vectorizer.fit_transform(documents);
    pairwise_upper_triangle(&matrix, SIMILARITY_SAMPLE)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// View distribution, text length and top n-grams of the single-document schema.
pub fn render_single_figures(records: &[SingleDocumentRecord], dir: &Path) -> Result<Vec<PathBuf>> {
    ensure_dir(dir)?;
    let mut files = Vec::new();

    let log_views: Vec<f64> = records
        .iter()
        .map(|r| (r.view_count as f64 + 1.0).log10())
        .collect();
    let path = dir.join("view_count_distribution_log.png");
    render_histogram(
        &path,
        &HistogramLayout {
            title: "Distribution of views (log scale)",
            x_desc: "log10(view_count + 1)",
            y_desc: "Number of videos",
            bins: LENGTH_BINS,
        },
        &[HistogramSeries {
            label: "videos",
            values: &log_views,
        }],
    )?;
    files.push(path);

    let token_counts: Vec<f64> = records.iter().map(|r| r.token_count as f64).collect();
    let path = dir.join("text_length_distribution.png");
    render_histogram(
        &path,
        &HistogramLayout {
            title: "Distribution of text length",
            x_desc: "Token count (document_clean)",
            y_desc: "Number of videos",
            bins: LENGTH_BINS,
        },
        &[HistogramSeries {
            label: "videos",
            values: &token_counts,
        }],
    )?;
    files.push(path);

    let documents: Vec<&str> = records.iter().map(|r| r.tokens_joined.as_str()).collect();
    for (ngram, name, title) in [
        (1, "top_unigrams.png", "Top unigrams (min_df=2)"),
        (2, "top_bigrams.png", "Top bigrams (min_df=2)"),
    ] {
        let path = dir.join(name);
        render_top_terms(&path, title, "Count", &top_count_terms(&documents, ngram))?;
        files.push(path);
    }

    Ok(files)
}

/// Promo versus phrase-filtered comparisons of the dual-document schema.
pub fn render_dual_figures(records: &[DualDocumentRecord], dir: &Path) -> Result<Vec<PathBuf>> {
    ensure_dir(dir)?;
    let mut files = Vec::new();

    let promo_counts: Vec<f64> = records.iter().map(|r| r.token_count_promo as f64).collect();
    let semantic_counts: Vec<f64> = records
        .iter()
        .map(|r| r.token_count_semantic as f64)
        .collect();
    let path = dir.join("token_count_promo_vs_semantic.png");
    render_histogram(
        &path,
        &HistogramLayout {
            title: "Document length before vs after filtering",
            x_desc: "Token count",
            y_desc: "Number of videos",
            bins: LENGTH_BINS,
        },
        &[
            HistogramSeries {
                label: "promo",
                values: &promo_counts,
            },
            HistogramSeries {
                label: "semantic-filtered",
                values: &semantic_counts,
            },
        ],
    )?;
    files.push(path);

    let promo: Vec<&str> = records
        .iter()
        .map(|r| r.tokens_joined_promo.as_str())
        .collect();
    let semantic: Vec<&str> = records
        .iter()
        .map(|r| r.tokens_joined_semantic.as_str())
        .collect();

    for (ngram, kind) in [(1, "unigrams"), (2, "bigrams")] {
        for (variant, label, documents) in [
            ("promo", "promo text", &promo),
            ("semantic", "semantic-filtered text", &semantic),
        ] {
            let path = dir.join(format!("top_{kind}_count_{variant}.png"));
            let title = format!("Top {kind} (Count, {label})");
            render_top_terms(&path, &title, "Count", &top_count_terms(documents, ngram))?;
            files.push(path);
        }
    }

    let promo_similarity = tfidf_similarities(&promo);
    let semantic_similarity = tfidf_similarities(&semantic);
    let path = dir.join("similarity_promo_vs_semantic_tfidf.png");
    render_histogram(
        &path,
        &HistogramLayout {
            title: "Document similarity shifts after filtering (TF-IDF unigrams)",
            x_desc: "Cosine similarity",
            y_desc: "Number of pairs",
            bins: SIMILARITY_BINS,
        },
        &[
            HistogramSeries {
                label: "promo TF-IDF",
                values: &promo_similarity,
            },
            HistogramSeries {
                label: "semantic TF-IDF",
                values: &semantic_similarity,
            },
        ],
    )?;
    files.push(path);

    Ok(files)
}

pub fn single_means(records: &[SingleDocumentRecord]) -> Vec<(String, f64)> {
    vec![
        (
            "token_count".to_string(),
            mean(records.iter().map(|r| r.token_count as f64)),
        ),
        (
            "lexical_diversity".to_string(),
            mean(records.iter().map(|r| r.lexical_diversity)),
        ),
    ]
}

pub fn dual_means(records: &[DualDocumentRecord]) -> Vec<(String, f64)> {
    vec![
        (
            "token_count (promo)".to_string(),
            mean(records.iter().map(|r| r.token_count_promo as f64)),
        ),
        (
            "token_count (semantic)".to_string(),
            mean(records.iter().map(|r| r.token_count_semantic as f64)),
        ),
        (
            "lexical diversity (promo)".to_string(),
            mean(records.iter().map(|r| r.lexdiv_promo)),
        ),
        (
            "lexical diversity (semantic)".to_string(),
            mean(records.iter().map(|r| r.lexdiv_semantic)),
        ),
    ]
}

/// Read the processed CSV of `schema` and render its figure set.
pub fn run_figures(cfg: &PipelineConfig, schema: ProcessedSchema) -> Result<FigureSummary> {
    let path = cfg.paths.processed_path(schema);
    let dir = &cfg.paths.figures_dir;
    log::info!("rendering {} figures from {}", schema.name(), path.display());

    let (rows, files, means) = match schema {
        ProcessedSchema::Single => {
            let records: Vec<SingleDocumentRecord> = read_records(&path)?;
            if records.is_empty() {
                return Err(TrendlexError::EmptyDataset { path });
            }
            let files = render_single_figures(&records, dir)?;
            (records.len(), files, single_means(&records))
        }
        ProcessedSchema::Dual => {
            let records: Vec<DualDocumentRecord> = read_records(&path)?;
            if records.is_empty() {
                return Err(TrendlexError::EmptyDataset { path });
            }
            let files = render_dual_figures(&records, dir)?;
            (records.len(), files, dual_means(&records))
        }
    };

    Ok(FigureSummary {
        schema,
        rows,
        files,
        means,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_count_terms_respects_min_df() {
        let docs = ["love song love", "love song", "remix"];
        let top = top_count_terms(&docs, 1);
        assert_eq!(
            top,
            vec![("love".to_string(), 3.0), ("song".to_string(), 2.0)]
        );
        assert_eq!(top_count_terms(&docs, 2), vec![("love song".to_string(), 2.0)]);
    }

    #[test]
    fn test_similarities_use_leading_sample() {
        let docs: Vec<String> = (0..205).map(|i| format!("common word{}", i % 3)).collect();
        let refs: Vec<&str> = docs.iter().map(|d| d.as_str()).collect();
        let sims = tfidf_similarities(&refs);
        assert_eq!(sims.len(), 200 * 199 / 2);
        assert!(sims.iter().all(|s| (0.0..=1.0 + 1e-12).contains(s)));
    }

    #[test]
    fn test_mean_of_empty_is_nan() {
        assert!(mean(std::iter::empty()).is_nan());
        assert_eq!(mean([1.0, 2.0, 6.0].into_iter()), 3.0);
    }
}
