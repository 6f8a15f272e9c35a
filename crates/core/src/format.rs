use crate::{
    classify::{ClassMetrics, ClassificationReport, ConfusionMatrix, TrainingOutcome},
    explore::{Describe, ExplorationReport},
    fetch::FetchSummary,
    figures::FigureSummary,
    preprocess::PreprocessSummary,
};

fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.2}")
    }
}

/// Describe rows as an aligned table, one column per statistic
pub fn format_describe_table(rows: &[(String, Describe)]) -> String {
    let name_width = rows.iter().map(|(n, _)| n.len()).max().unwrap_or(0).max(6);
    let mut output = format!(
        "{:<name_width$} {:>7} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
        "", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    );
    for (name, d) in rows {
        output.push_str(&format!(
            "{:<name_width$} {:>7} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
            name,
            d.count,
            format_stat(d.mean),
            format_stat(d.std),
            format_stat(d.min),
            format_stat(d.q25),
            format_stat(d.q50),
            format_stat(d.q75),
            format_stat(d.max),
        ));
    }
    output
}

pub fn format_exploration_report(report: &ExplorationReport) -> String {
    let mut output = String::new();
    output.push_str(&format!("Rows: {}\n\n", report.rows));

    output.push_str("Missing values:\n");
    for (column, count) in &report.missing {
        output.push_str(&format!("  {column:<12} {count}\n"));
    }
    output.push('\n');

    output.push_str("Text lengths:\n");
    output.push_str(&format_describe_table(&report.lengths));
    output.push('\n');

    output.push_str("Sample titles:\n");
    for title in &report.sample_titles {
        output.push_str(&format!("  • {title}\n"));
    }
    output.push('\n');

    output.push_str("Sample descriptions:\n");
    for description in &report.sample_descriptions {
        output.push_str(&format!("  • {description}\n"));
    }
    output.push('\n');

    output.push_str("category_id counts:\n");
    for (category, count) in &report.category_counts {
        output.push_str(&format!("  {category:<6} {count}\n"));
    }

    output
}

fn report_row(label: &str, m: &ClassMetrics) -> String {
    format!(
        "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}\n",
        label, m.precision, m.recall, m.f1, m.support
    )
}

/// Precision/recall/F1 table laid out like the usual text report
pub fn format_classification_report(report: &ClassificationReport) -> String {
    let mut output = format!(
        "{:>12} {:>9} {:>9} {:>9} {:>9}\n\n",
        "", "precision", "recall", "f1-score", "support"
    );
    for (label, metrics) in report.classes.iter().enumerate() {
        output.push_str(&report_row(&label.to_string(), metrics));
    }
    output.push('\n');
    output.push_str(&format!(
        "{:>12} {:>9} {:>9} {:>9.2} {:>9}\n",
        "accuracy", "", "", report.accuracy, report.macro_avg.support
    ));
    output.push_str(&report_row("macro avg", &report.macro_avg));
    output.push_str(&report_row("weighted avg", &report.weighted_avg));
    output
}

pub fn format_confusion_matrix(cm: &ConfusionMatrix) -> String {
    format!(
        "Predicted:    0       1\n\
         Actual 0:   {:>5}   {:>5}  (TN/FP)\n\
         Actual 1:   {:>5}   {:>5}  (FN/TP)\n",
        cm.tn, cm.fp, cm.fn_, cm.tp
    )
}

pub fn format_fetch_summary(summary: &FetchSummary) -> String {
    let mut output = String::new();
    for (region, count) in &summary.per_region {
        output.push_str(&format!("  {region}: {count} videos\n"));
    }
    output.push_str(&format!(
        "  {} unique after dropping {} duplicates, {} kept in category\n",
        summary.unique, summary.duplicates_dropped, summary.kept
    ));
    output
}

pub fn format_preprocess_summary(summary: &PreprocessSummary) -> String {
    let mut output = format!(
        "  {} of {} raw rows kept ({} schema)\n  median view_count: {}\n",
        summary.rows,
        summary.raw_rows,
        summary.schema.name(),
        summary.median_views
    );
    if summary.phrases_loaded > 0 {
        output.push_str(&format!(
            "  {} promo phrases removed from semantic documents\n",
            summary.phrases_loaded
        ));
    }
    output
}

pub fn format_figure_summary(summary: &FigureSummary) -> String {
    let mut output = format!("  Videos: {}\n", summary.rows);
    for (name, value) in &summary.means {
        output.push_str(&format!("  Mean {name}: {}\n", format_stat(*value)));
    }
    output
}

pub fn format_training_outcome(outcome: &TrainingOutcome) -> String {
    let evaluation = &outcome.evaluation;
    let mut output = format!(
        "{} train / {} test rows, {} n-gram features ({} text)\n\n",
        evaluation.train_rows,
        evaluation.test_rows,
        evaluation.vocabulary_size,
        outcome.variant.name()
    );
    output.push_str(&format_classification_report(&evaluation.report));
    output.push('\n');
    output.push_str(&format_confusion_matrix(&evaluation.confusion));
    output.push_str(&format!("\nROC AUC = {:.3}\n", evaluation.auc));
    output
}
