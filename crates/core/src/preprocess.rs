//! Builds processed datasets from the latest raw fetch.

use std::path::{Path, PathBuf};

use crate::{
    config::PipelineConfig,
    dataset::{label_high_views, read_raw, require_latest_raw_csv, write_records},
    error::{Result, TrendlexError},
    text::{DocumentStats, TitleStyle, clean_text, load_phrases, remove_phrases},
    types::{DualDocumentRecord, ProcessedSchema, SingleDocumentRecord, VideoRecord},
};

pub fn filter_category(records: Vec<VideoRecord>, category_id: &str) -> Vec<VideoRecord> {
    records
        .into_iter()
        .filter(|r| r.category_id == category_id)
        .collect()
}

/// Cleaned title and description joined into one document
pub fn base_document(record: &VideoRecord) -> String {
    let title = clean_text(&record.title);
    let description = clean_text(&record.description);
    format!("{title} {description}").trim().to_string()
}

/// Promo-inclusive and phrase-filtered documents per record.
///
/// Returns the rows together with the median used for `high_views`.
pub fn build_dual_records(
    records: &[VideoRecord],
    phrases: &[String],
) -> Option<(Vec<DualDocumentRecord>, f64)> {
    let views: Vec<u64> = records.iter().map(|r| r.view_count).collect();
    let (median_views, labels) = label_high_views(&views)?;

    let rows = records
        .iter()
        .zip(labels)
        .map(|(record, high_views)| {
            let document_promo = base_document(record);
            let document_semantic = remove_phrases(&document_promo, phrases);
            let promo = DocumentStats::from_document(&document_promo);
            let semantic = DocumentStats::from_document(&document_semantic);

            DualDocumentRecord {
                video_id: record.video_id.clone(),
                published_at: record.published_at.clone(),
                region: record.region.clone(),
                category_id: record.category_id.clone(),
                view_count: record.view_count,
                like_count: record.like_count,
                comment_count: record.comment_count,
                title: record.title.clone(),
                description: record.description.clone(),
                tags: record.tags.clone(),
                token_count_promo: promo.token_count,
                token_count_semantic: semantic.token_count,
                unique_token_count_promo: promo.unique_token_count,
                unique_token_count_semantic: semantic.unique_token_count,
                lexdiv_promo: promo.lexical_diversity,
                lexdiv_semantic: semantic.lexical_diversity,
                high_views,
                tokens_joined_promo: promo.joined(),
                tokens_joined_semantic: semantic.joined(),
                document_promo,
                document_semantic,
            }
        })
        .collect();

    Some((rows, median_views))
}

/// One cleaned document per record plus title style counts
pub fn build_single_records(records: &[VideoRecord]) -> Option<(Vec<SingleDocumentRecord>, f64)> {
    let views: Vec<u64> = records.iter().map(|r| r.view_count).collect();
    let (median_views, labels) = label_high_views(&views)?;

    let rows = records
        .iter()
        .zip(labels)
        .map(|(record, high_views)| {
            let document_clean = base_document(record);
            let stats = DocumentStats::from_document(&document_clean);
            let style = TitleStyle::from_title(&record.title);

            SingleDocumentRecord {
                video_id: record.video_id.clone(),
                published_at: record.published_at.clone(),
                region: record.region.clone(),
                category_id: record.category_id.clone(),
                view_count: record.view_count,
                like_count: record.like_count,
                comment_count: record.comment_count,
                title: record.title.clone(),
                description: record.description.clone(),
                tags: record.tags.clone(),
                document_clean,
                token_count: stats.token_count,
                unique_token_count: stats.unique_token_count,
                lexical_diversity: stats.lexical_diversity,
                title_exclamation_count: style.exclamation_count,
                title_question_count: style.question_count,
                title_hashtag_count: style.hashtag_count,
                title_caps_ratio: style.caps_ratio,
                high_views,
                tokens_joined: stats.joined(),
            }
        })
        .collect();

    Some((rows, median_views))
}

#[derive(Debug, Clone)]
pub struct PreprocessSummary {
    pub schema: ProcessedSchema,
    pub raw_path: PathBuf,
    pub output_path: PathBuf,
    pub raw_rows: usize,
    pub rows: usize,
    pub median_views: f64,
    pub phrases_loaded: usize,
}

/// Read a raw CSV (the latest one unless `input` is given), process, write.
pub fn run_preprocess(
    cfg: &PipelineConfig,
    schema: ProcessedSchema,
    input: Option<&Path>,
) -> Result<PreprocessSummary> {
    let raw_path = match input {
        Some(path) => path.to_path_buf(),
        None => require_latest_raw_csv(&cfg.paths.raw_dir)?,
    };
    log::info!("loading raw data from {}", raw_path.display());

    let raw = read_raw(&raw_path)?;
    let raw_rows = raw.len();
    let filtered = filter_category(raw, &cfg.category_id);
    log::info!(
        "{} of {raw_rows} rows in category {}",
        filtered.len(),
        cfg.category_id
    );

    let empty = || TrendlexError::EmptyDataset {
        path: raw_path.clone(),
    };
    let output_path = cfg.paths.processed_path(schema);

    let (rows, median_views, phrases_loaded) = match schema {
        ProcessedSchema::Dual => {
            let phrases = load_phrases(&cfg.paths.phrases_path)?;
            let (records, median_views) =
                build_dual_records(&filtered, &phrases).ok_or_else(empty)?;
            write_records(&output_path, &records)?;
            (records.len(), median_views, phrases.len())
        }
        ProcessedSchema::Single => {
            let (records, median_views) = build_single_records(&filtered).ok_or_else(empty)?;
            write_records(&output_path, &records)?;
            (records.len(), median_views, 0)
        }
    };

    Ok(PreprocessSummary {
        schema,
        raw_path,
        output_path,
        raw_rows,
        rows,
        median_views,
        phrases_loaded,
    })
}
