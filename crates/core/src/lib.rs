pub mod charts;
pub mod classify;
pub mod config;
pub mod dataset;
pub mod error;
pub mod explore;
pub mod fetch;
pub mod figures;
pub mod format;
pub mod preprocess;
pub mod text;
pub mod types;
pub mod vectorize;

pub use classify::{TrainingOutcome, run_training};
pub use config::{ApiKey, PipelineConfig};
pub use dataset::{Table, latest_raw_csv};
pub use error::{Result, TrendlexError};
pub use explore::{ExplorationReport, explore};
pub use fetch::{FetchSummary, TrendingSource, YouTubeClient, run_fetch};
pub use figures::{FigureSummary, run_figures};
pub use format::{
    format_classification_report, format_confusion_matrix, format_exploration_report,
    format_fetch_summary, format_figure_summary, format_preprocess_summary,
    format_training_outcome,
};
pub use preprocess::{PreprocessSummary, run_preprocess};
pub use types::{
    DocumentVariant, DualDocumentRecord, ProcessedSchema, SingleDocumentRecord, VideoRecord,
};
