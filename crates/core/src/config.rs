use std::path::{Path, PathBuf};

use crate::{
    error::{Result, TrendlexError},
    types::ProcessedSchema,
};

pub const API_KEY_ENV_VAR: &str = "YOUTUBE_API_KEY";
pub const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const MUSIC_CATEGORY_ID: &str = "10";

/// Upper bound the Data API accepts for `maxResults`.
pub const MAX_PAGE_SIZE: u32 = 50;

/// API credential, validated before any network call.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Load `.env` (if any) and read the key from the environment
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        match std::env::var(API_KEY_ENV_VAR) {
            Ok(key) if !key.trim().is_empty() => Ok(Self(key.trim().to_string())),
            _ => Err(TrendlexError::MissingApiKey {
                env_var: API_KEY_ENV_VAR.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone)]
pub struct PathsConfig {
    pub root: PathBuf,
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub figures_dir: PathBuf,
    pub phrases_path: PathBuf,
}

impl PathsConfig {
    pub fn under(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            raw_dir: root.join("data").join("raw"),
            processed_dir: root.join("data").join("processed"),
            figures_dir: root.join("figures"),
            phrases_path: root.join("assets").join("promo_phrases.txt"),
        }
    }

    pub fn processed_path(&self, schema: ProcessedSchema) -> PathBuf {
        self.processed_dir.join(schema.file_name())
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub regions: Vec<String>,
    pub per_region_target: usize,
    pub page_size: u32,
    pub api_url: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            regions: vec!["US".to_string()],
            per_region_target: 200,
            page_size: MAX_PAGE_SIZE,
            api_url: YOUTUBE_API_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.25,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub max_iter: usize,
    pub learning_rate: f64,
    pub tolerance: f64,
    /// Inverse regularization strength
    pub c: f64,
    pub min_df: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            max_iter: 2000,
            learning_rate: 1.0,
            tolerance: 1e-6,
            c: 1.0,
            min_df: 2,
        }
    }
}

/// Everything a stage needs, passed in explicitly.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub paths: PathsConfig,
    pub category_id: String,
    pub fetch: FetchConfig,
    pub split: SplitConfig,
    pub model: ModelConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::with_root(Path::new("."))
    }
}

impl PipelineConfig {
    pub fn with_root(root: &Path) -> Self {
        Self {
            paths: PathsConfig::under(root),
            category_id: MUSIC_CATEGORY_ID.to_string(),
            fetch: FetchConfig::default(),
            split: SplitConfig::default(),
            model: ModelConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(TrendlexError::InvalidConfig { reason });

        if self.category_id.trim().is_empty() {
            return invalid("category id is empty".to_string());
        }
        if self.fetch.regions.is_empty() {
            return invalid("at least one region code is required".to_string());
        }
        for region in &self.fetch.regions {
            if region.len() != 2 || !region.chars().all(|c| c.is_ascii_alphabetic()) {
                return invalid(format!("region code {region:?} is not two ASCII letters"));
            }
        }
        if self.fetch.per_region_target == 0 {
            return invalid("per-region target must be > 0".to_string());
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.fetch.page_size) {
            return invalid(format!("page size must be within 1..={MAX_PAGE_SIZE}"));
        }
        if !(self.split.test_fraction > 0.0 && self.split.test_fraction < 1.0) {
            return invalid("test fraction must be within (0, 1)".to_string());
        }
        if self.model.max_iter == 0 {
            return invalid("iteration cap must be > 0".to_string());
        }
        if self.model.c <= 0.0 || self.model.learning_rate <= 0.0 {
            return invalid("C and learning rate must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = PipelineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.category_id, "10");
        assert_eq!(cfg.split.seed, 42);
        assert_eq!(cfg.paths.raw_dir, Path::new(".").join("data").join("raw"));
    }

    #[test]
    fn test_rejects_bad_region() {
        let mut cfg = PipelineConfig::default();
        cfg.fetch.regions = vec!["USA".to_string()];
        assert!(matches!(
            cfg.validate(),
            Err(TrendlexError::InvalidConfig { .. })
        ));

        cfg.fetch.regions.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_split_and_page_size() {
        let mut cfg = PipelineConfig::default();
        cfg.split.test_fraction = 1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = PipelineConfig::default();
        cfg.fetch.page_size = 51;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_processed_path_per_schema() {
        let paths = PathsConfig::under(Path::new("/tmp/project"));
        assert_eq!(
            paths.processed_path(ProcessedSchema::Dual),
            Path::new("/tmp/project/data/processed/trending_music_processed.csv")
        );
        assert_eq!(
            paths.processed_path(ProcessedSchema::Single),
            Path::new("/tmp/project/data/processed/music_processed.csv")
        );
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("secret");
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
        assert_eq!(key.as_str(), "secret");
    }
}
