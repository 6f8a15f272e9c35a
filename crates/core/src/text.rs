use std::{collections::HashSet, path::Path, sync::LazyLock};

use regex::Regex;

use crate::error::Result;

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http\S+|www\.\S+").expect("valid URL pattern"));
static WS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9']+").expect("valid token pattern"));
static HASHTAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+").expect("valid hashtag pattern"));

fn collapse_whitespace(s: &str) -> String {
    WS_REGEX.replace_all(s, " ").trim().to_string()
}

/// Strip URLs and normalize whitespace
pub fn clean_text(s: &str) -> String {
    let without_urls = URL_REGEX.replace_all(s, " ");
    collapse_whitespace(&without_urls)
}

/// Lowercased spans of ASCII letters, digits and apostrophes
pub fn tokenize(s: &str) -> Vec<String> {
    let lowered = s.to_lowercase();
    TOKEN_REGEX
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Read the promotional phrase list.
///
/// One phrase per line, trimmed and lowercased. Blank lines and `#` comments
/// are skipped. A missing file is an empty list.
pub fn load_phrases(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        log::warn!("phrase list {} not found, using none", path.display());
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)?;
    Ok(parse_phrases(&content))
}

pub fn parse_phrases(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

/// Remove each phrase as a literal substring, in list order.
///
/// Matching is not word-boundary aware: a phrase may clip the inside of an
/// unrelated word.
pub fn remove_phrases(text: &str, phrases: &[String]) -> String {
    let mut t = text.to_lowercase();
    for phrase in phrases.iter().filter(|p| !p.is_empty()) {
        t = t.replace(phrase.as_str(), " ");
    }
    collapse_whitespace(&t)
}

pub fn lexical_diversity(unique_count: usize, token_count: usize) -> f64 {
    if token_count > 0 {
        unique_count as f64 / token_count as f64
    } else {
        0.0
    }
}

/// Token statistics for one document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentStats {
    pub tokens: Vec<String>,
    pub token_count: usize,
    pub unique_token_count: usize,
    pub lexical_diversity: f64,
}

impl DocumentStats {
    pub fn from_document(document: &str) -> Self {
        let tokens = tokenize(document);
        let token_count = tokens.len();
        let unique_token_count = tokens.iter().collect::<HashSet<_>>().len();

        Self {
            lexical_diversity: lexical_diversity(unique_token_count, token_count),
            tokens,
            token_count,
            unique_token_count,
        }
    }

    pub fn joined(&self) -> String {
        self.tokens.join(" ")
    }
}

/// Stylistic counts taken from the raw, uncleaned title
#[derive(Debug, Clone, PartialEq)]
pub struct TitleStyle {
    pub exclamation_count: usize,
    pub question_count: usize,
    pub hashtag_count: usize,
    pub caps_ratio: f64,
}

impl TitleStyle {
    pub fn from_title(title: &str) -> Self {
        let alphabetic = title.chars().filter(|c| c.is_alphabetic()).count();
        let uppercase = title.chars().filter(|c| c.is_uppercase()).count();

        Self {
            exclamation_count: title.matches('!').count(),
            question_count: title.matches('?').count(),
            hashtag_count: HASHTAG_REGEX.find_iter(title).count(),
            caps_ratio: if alphabetic > 0 {
                uppercase as f64 / alphabetic as f64
            } else {
                0.0
            },
        }
    }
}
