use std::fs;
use std::path::Path;

use trendlex_core::classify::{evaluate, load_corpus, stratified_split};
use trendlex_core::dataset::{latest_raw_csv, read_records, require_latest_raw_csv, write_raw};
use trendlex_core::{
    DocumentVariant, DualDocumentRecord, PipelineConfig, ProcessedSchema, SingleDocumentRecord,
    Table, TrendlexError, VideoRecord, explore, run_figures, run_preprocess, run_training,
};

fn video(id: &str, category: &str, views: u64, title: &str, description: &str) -> VideoRecord {
    VideoRecord {
        video_id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        tags: "music live".to_string(),
        category_id: category.to_string(),
        published_at: "2026-10-01T12:00:00Z".to_string(),
        view_count: views,
        like_count: views / 10,
        comment_count: views / 100,
        region: "US".to_string(),
    }
}

fn write_three_row_raw(root: &Path) {
    let raw = vec![
        video("a", "10", 1_000, "New Single OUT NOW", "stream it https://x.co/abc"),
        video("b", "22", 9_999_999, "Vlog day", "not music"),
        video("c", "10", 5_000, "Acoustic session", "live from the studio"),
    ];
    let dir = root.join("data").join("raw");
    write_raw(&dir.join("trending_20261001_120000_US.csv"), &raw).unwrap();
}

#[test]
fn preprocess_keeps_category_and_labels_one_of_two() {
    let tmp = tempfile::tempdir().unwrap();
    write_three_row_raw(tmp.path());
    let cfg = PipelineConfig::with_root(tmp.path());

    let summary = run_preprocess(&cfg, ProcessedSchema::Dual, None).unwrap();
    assert_eq!(summary.raw_rows, 3);
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.median_views, 3_000.0);
    assert_eq!(summary.phrases_loaded, 0);

    let rows: Vec<DualDocumentRecord> = read_records(&summary.output_path).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.iter().map(|r| u32::from(r.high_views)).sum::<u32>(), 1);
    assert_eq!(rows[1].video_id, "c");
    assert_eq!(rows[1].high_views, 1);
    assert_eq!(rows[0].document_promo, "New Single OUT NOW stream it");
    // no phrase list on disk, so both documents agree
    assert_eq!(rows[0].tokens_joined_promo, rows[0].tokens_joined_semantic);
}

#[test]
fn preprocess_single_schema_and_phrase_filtering() {
    let tmp = tempfile::tempdir().unwrap();
    write_three_row_raw(tmp.path());
    let cfg = PipelineConfig::with_root(tmp.path());

    let single = run_preprocess(&cfg, ProcessedSchema::Single, None).unwrap();
    let rows: Vec<SingleDocumentRecord> = read_records(&single.output_path).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].title_caps_ratio, 8.0 / 15.0);
    assert!(single.output_path.ends_with("music_processed.csv"));

    fs::create_dir_all(tmp.path().join("assets")).unwrap();
    fs::write(
        &cfg.paths.phrases_path,
        "# promo boilerplate\n\nOut Now\nnew single\n",
    )
    .unwrap();
    let dual = run_preprocess(&cfg, ProcessedSchema::Dual, None).unwrap();
    assert_eq!(dual.phrases_loaded, 2);
    let rows: Vec<DualDocumentRecord> = read_records(&dual.output_path).unwrap();
    assert_eq!(rows[0].document_semantic, "stream it");
    assert_eq!(rows[0].token_count_promo, 6);
    assert_eq!(rows[0].token_count_semantic, 2);
}

#[test]
fn preprocess_fails_without_raw_data_or_matching_rows() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = PipelineConfig::with_root(tmp.path());
    assert!(matches!(
        run_preprocess(&cfg, ProcessedSchema::Dual, None),
        Err(TrendlexError::NoRawData { .. })
    ));

    write_three_row_raw(tmp.path());
    let mut cfg = cfg;
    cfg.category_id = "17".to_string();
    assert!(matches!(
        run_preprocess(&cfg, ProcessedSchema::Single, None),
        Err(TrendlexError::EmptyDataset { .. })
    ));
}

#[test]
fn latest_raw_csv_picks_last_name() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("raw");
    assert_eq!(latest_raw_csv(&dir).unwrap(), None);

    fs::create_dir_all(&dir).unwrap();
    assert_eq!(latest_raw_csv(&dir).unwrap(), None);
    assert!(matches!(
        require_latest_raw_csv(&dir),
        Err(TrendlexError::NoRawData { .. })
    ));

    for name in [
        "trending_20261001_090000_US.csv",
        "trending_20261003_080000_US.csv",
        "trending_20261002_230000_US.csv",
        "zz_notes.txt",
    ] {
        fs::write(dir.join(name), "video_id\n").unwrap();
    }
    assert_eq!(
        latest_raw_csv(&dir).unwrap(),
        Some(dir.join("trending_20261003_080000_US.csv"))
    );
}

#[test]
fn explore_describes_processed_token_counts() {
    let tmp = tempfile::tempdir().unwrap();
    write_three_row_raw(tmp.path());
    let cfg = PipelineConfig::with_root(tmp.path());
    let summary = run_preprocess(&cfg, ProcessedSchema::Dual, None).unwrap();

    let report = explore(&Table::read(&summary.output_path).unwrap()).unwrap();
    assert_eq!(report.rows, 2);
    let names: Vec<&str> = report.lengths.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "title_length",
            "description_length",
            "token_count_promo",
            "token_count_semantic"
        ]
    );
    assert_eq!(report.category_counts, vec![("10".to_string(), 2)]);
}

#[test]
fn seeded_split_and_evaluation_are_repeatable() {
    let labels: Vec<u8> = (0..60).map(|i| u8::from(i % 5 < 2)).collect();
    let documents: Vec<String> = labels
        .iter()
        .enumerate()
        .map(|(i, &label)| {
            let flavour = if label == 1 { "official video" } else { "lyric cover" };
            format!("{flavour} track{} mix{}", i % 4, i % 7)
        })
        .collect();

    let first = stratified_split(&labels, 0.25, 42).unwrap();
    let second = stratified_split(&labels, 0.25, 42).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.test.len(), 15);

    let cfg = PipelineConfig::default();
    let a = evaluate(&documents, &labels, &cfg).unwrap();
    let b = evaluate(&documents, &labels, &cfg).unwrap();
    assert_eq!(a.confusion, b.confusion);
    assert_eq!(a.roc, b.roc);
    assert_eq!(a.auc, b.auc);
}

fn write_forty_row_raw(root: &Path) {
    let raw: Vec<VideoRecord> = (0..40u64)
        .map(|i| {
            let title = if i >= 20 {
                format!("Official Video track{}", i % 4)
            } else {
                format!("Lyric Cover track{}", i % 4)
            };
            let description = format!("new single out now stream tonight mix{}", i % 5);
            video(&format!("v{i}"), "10", 1_000 + i * 10, &title, &description)
        })
        .collect();
    let dir = root.join("data").join("raw");
    write_raw(&dir.join("trending_20261005_100000_US.csv"), &raw).unwrap();
    fs::create_dir_all(root.join("assets")).unwrap();
    fs::write(root.join("assets").join("promo_phrases.txt"), "new single\nout now\n").unwrap();
}

#[test]
fn load_corpus_picks_the_variant_column() {
    let tmp = tempfile::tempdir().unwrap();
    write_forty_row_raw(tmp.path());
    let cfg = PipelineConfig::with_root(tmp.path());
    let dual = run_preprocess(&cfg, ProcessedSchema::Dual, None).unwrap();
    assert_eq!(dual.phrases_loaded, 2);
    let rows: Vec<DualDocumentRecord> = read_records(&dual.output_path).unwrap();

    let (semantic, labels) =
        load_corpus::<DualDocumentRecord>(&dual.output_path, DocumentVariant::Semantic).unwrap();
    let (promo, _) =
        load_corpus::<DualDocumentRecord>(&dual.output_path, DocumentVariant::Promo).unwrap();
    assert_eq!(semantic.len(), 40);
    assert_eq!(labels.iter().map(|&y| u32::from(y)).sum::<u32>(), 20);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(semantic[i], row.tokens_joined_semantic);
        assert_eq!(promo[i], row.tokens_joined_promo);
    }
    assert_eq!(semantic[0], "lyric cover track0 stream tonight mix0");
    assert!(promo[0].contains("new single out now"));

    let single = run_preprocess(&cfg, ProcessedSchema::Single, None).unwrap();
    let single_rows: Vec<SingleDocumentRecord> = read_records(&single.output_path).unwrap();
    let (documents, _) =
        load_corpus::<SingleDocumentRecord>(&single.output_path, DocumentVariant::Semantic)
            .unwrap();
    assert_eq!(documents[5], single_rows[5].tokens_joined);
}

#[test]
fn preprocess_figures_and_train_both_schemas() {
    let tmp = tempfile::tempdir().unwrap();
    write_forty_row_raw(tmp.path());
    let cfg = PipelineConfig::with_root(tmp.path());

    for (schema, figure_count) in [(ProcessedSchema::Dual, 6), (ProcessedSchema::Single, 4)] {
        run_preprocess(&cfg, schema, None).unwrap();

        let figures = run_figures(&cfg, schema).unwrap();
        assert_eq!(figures.rows, 40);
        assert_eq!(figures.files.len(), figure_count);
        assert!(figures.files.iter().all(|f| f.exists()));

        let outcome = run_training(&cfg, schema, DocumentVariant::Semantic).unwrap();
        let evaluation = &outcome.evaluation;
        assert_eq!(evaluation.train_rows, 30);
        assert_eq!(evaluation.test_rows, 10);
        assert_eq!(evaluation.confusion.total(), 10);
        assert!((0.0..=1.0).contains(&evaluation.auc));
        assert_eq!(outcome.figures.len(), 2);
        assert!(outcome.figures.iter().all(|f| f.exists()));
    }
}
