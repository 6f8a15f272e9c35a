//! Bag-of-words and TF-IDF vectorizers over space-joined token columns.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::LazyLock,
};

use ndarray::{Array1, Array2, ArrayView1, Axis};
use regex::Regex;

// Word analyzer: runs of two or more word characters.
static WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid word pattern"));

/// Word n-grams of `doc` for every n in `ngram_range` (inclusive)
pub fn analyze(doc: &str, ngram_range: (usize, usize)) -> Vec<String> {
    let lowered = doc.to_lowercase();
    let words: Vec<&str> = WORD_REGEX.find_iter(&lowered).map(|m| m.as_str()).collect();

    let (min_n, max_n) = ngram_range;
    let mut grams = Vec::new();
    for n in min_n.max(1)..=max_n {
        if n == 1 {
            grams.extend(words.iter().map(|w| w.to_string()));
        } else {
            grams.extend(words.windows(n).map(|w| w.join(" ")));
        }
    }
    grams
}

/// Count vectorizer with a document-frequency floor
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    ngram_range: (usize, usize),
    min_df: usize,
    vocabulary: HashMap<String, usize>,
    terms: Vec<String>,
}

impl CountVectorizer {
    pub fn new(ngram_range: (usize, usize), min_df: usize) -> Self {
        Self {
            ngram_range,
            min_df,
            vocabulary: HashMap::new(),
            terms: Vec::new(),
        }
    }

    pub fn unigrams(min_df: usize) -> Self {
        Self::new((1, 1), min_df)
    }

    pub fn bigrams(min_df: usize) -> Self {
        Self::new((2, 2), min_df)
    }

    /// Vocabulary in column order (lexicographic)
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) {
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let unique: HashSet<String> = analyze(doc.as_ref(), self.ngram_range)
                .into_iter()
                .collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        self.terms = doc_freq
            .into_iter()
            .filter(|(_, df)| *df >= self.min_df)
            .map(|(term, _)| term)
            .collect();
        self.vocabulary = self
            .terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();
    }

    /// Term counts per document; unknown terms are ignored
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Array2<f64> {
        let mut matrix = Array2::<f64>::zeros((documents.len(), self.terms.len()));
        for (row, doc) in documents.iter().enumerate() {
            for gram in analyze(doc.as_ref(), self.ngram_range) {
                if let Some(&col) = self.vocabulary.get(&gram) {
                    matrix[[row, col]] += 1.0;
                }
            }
        }
        matrix
    }

    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Array2<f64> {
        self.fit(documents);
        self.transform(documents)
    }
}

/// TF-IDF with smoothed idf and l2-normalised rows
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    counts: CountVectorizer,
    idf: Array1<f64>,
}

impl TfidfVectorizer {
    pub fn new(ngram_range: (usize, usize), min_df: usize) -> Self {
        Self {
            counts: CountVectorizer::new(ngram_range, min_df),
            idf: Array1::zeros(0),
        }
    }

    pub fn terms(&self) -> &[String] {
        self.counts.terms()
    }

    pub fn idf(&self) -> &Array1<f64> {
        &self.idf
    }

    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) {
        self.counts.fit(documents);
        let tf = self.counts.transform(documents);

        let n_docs = documents.len() as f64;
        let doc_freq = tf.mapv(|c| if c > 0.0 { 1.0 } else { 0.0 }).sum_axis(Axis(0));
        self.idf = doc_freq.mapv(|df| ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0);
    }

    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Array2<f64> {
        let mut matrix = self.counts.transform(documents) * &self.idf;
        for mut row in matrix.rows_mut() {
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row /= norm;
            }
        }
        matrix
    }

    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Array2<f64> {
        self.fit(documents);
        self.transform(documents)
    }
}

/// Total count of every column
pub fn column_sums(matrix: &Array2<f64>) -> Vec<f64> {
    matrix.sum_axis(Axis(0)).to_vec()
}

/// The `n` highest-scoring terms, highest first.
///
/// Indices are stably sorted ascending by score and the last `n` taken in
/// reverse, so among equal scores the later vocabulary entry ranks first.
pub fn top_terms(terms: &[String], scores: &[f64], n: usize) -> Vec<(String, f64)> {
    let mut order: Vec<usize> = (0..terms.len().min(scores.len())).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let start = order.len().saturating_sub(n);
    order[start..]
        .iter()
        .rev()
        .map(|&i| (terms[i].clone(), scores[i]))
        .collect()
}

pub fn cosine_similarity(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        a.dot(&b) / (norm_a * norm_b)
    }
}

/// Similarities of every pair `i < j` among the first `limit` rows
pub fn pairwise_upper_triangle(matrix: &Array2<f64>, limit: usize) -> Vec<f64> {
    let n = matrix.nrows().min(limit);
    let mut values = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            values.push(cosine_similarity(matrix.row(i), matrix.row(j)));
        }
    }
    values
}
