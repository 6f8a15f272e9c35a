use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// One trending video as returned by the API, flattened to a raw CSV row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub video_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: String,
    pub category_id: String,
    #[serde(default)]
    pub published_at: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub region: String,
}

/// Processed row with a promo-inclusive and a phrase-filtered document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualDocumentRecord {
    pub video_id: String,
    pub published_at: String,
    pub region: String,
    pub category_id: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub title: String,
    pub description: String,
    pub tags: String,
    pub document_promo: String,
    pub document_semantic: String,
    pub token_count_promo: usize,
    pub token_count_semantic: usize,
    pub unique_token_count_promo: usize,
    pub unique_token_count_semantic: usize,
    pub lexdiv_promo: f64,
    pub lexdiv_semantic: f64,
    pub high_views: u8,
    pub tokens_joined_promo: String,
    pub tokens_joined_semantic: String,
}

/// Processed row with one cleaned document and title style counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleDocumentRecord {
    pub video_id: String,
    pub published_at: String,
    pub region: String,
    pub category_id: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub title: String,
    pub description: String,
    pub tags: String,
    pub document_clean: String,
    pub token_count: usize,
    pub unique_token_count: usize,
    pub lexical_diversity: f64,
    pub title_exclamation_count: usize,
    pub title_question_count: usize,
    pub title_hashtag_count: usize,
    pub title_caps_ratio: f64,
    pub high_views: u8,
    pub tokens_joined: String,
}

/// Which processed record type a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessedSchema {
    #[default]
    Dual,
    Single,
}

impl ProcessedSchema {
    pub fn file_name(&self) -> &'static str {
        match self {
            ProcessedSchema::Dual => "trending_music_processed.csv",
            ProcessedSchema::Single => "music_processed.csv",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProcessedSchema::Dual => "dual",
            ProcessedSchema::Single => "single",
        }
    }
}

/// Document form used by the dual schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentVariant {
    #[default]
    Promo,
    Semantic,
}

impl DocumentVariant {
    pub fn name(&self) -> &'static str {
        match self {
            DocumentVariant::Promo => "promo",
            DocumentVariant::Semantic => "semantic",
        }
    }
}

/// Shared view over both processed record types used by the trainer.
pub trait ProcessedRecord: DeserializeOwned + Serialize {
    const SCHEMA: ProcessedSchema;

    fn high_views(&self) -> u8;
    fn view_count(&self) -> u64;
    fn tokens_joined(&self, variant: DocumentVariant) -> &str;
}

impl ProcessedRecord for DualDocumentRecord {
    const SCHEMA: ProcessedSchema = ProcessedSchema::Dual;

    fn high_views(&self) -> u8 {
        self.high_views
    }

    fn view_count(&self) -> u64 {
        self.view_count
    }

    fn tokens_joined(&self, variant: DocumentVariant) -> &str {
        match variant {
            DocumentVariant::Promo => &self.tokens_joined_promo,
            DocumentVariant::Semantic => &self.tokens_joined_semantic,
        }
    }
}

impl ProcessedRecord for SingleDocumentRecord {
    const SCHEMA: ProcessedSchema = ProcessedSchema::Single;

    fn high_views(&self) -> u8 {
        self.high_views
    }

    fn view_count(&self) -> u64 {
        self.view_count
    }

    // Only one document exists in this schema.
    fn tokens_joined(&self, _variant: DocumentVariant) -> &str {
        &self.tokens_joined
    }
}
