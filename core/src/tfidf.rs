use crate::tokenizer::tokenize;
use crate::vocabulary::{TermId, Vocabulary};
use std::collections::BTreeMap;

/// Sparse weight vector, entries sorted by column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(TermId, f32)>,
}

impl SparseVector {
    pub fn entries(&self) -> &[(TermId, f32)] { &self.entries }

    /// True for the vector of a title without any known term.
    pub fn is_zero(&self) -> bool { self.entries.is_empty() }

    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt()
    }

    /// Dot product by merging the two sorted entry lists.
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut acc = 0.0f32;
        while i < self.entries.len() && j < other.entries.len() {
            let (ta, wa) = self.entries[i];
            let (tb, wb) = other.entries[j];
            if ta == tb {
                acc += wa * wb;
                i += 1;
                j += 1;
            } else if ta < tb {
                i += 1;
            } else {
                j += 1;
            }
        }
        acc
    }
}

/// Fitted TF-IDF weights plus one normalized vector per catalog row.
#[derive(Debug, Clone)]
pub struct TfIdfModel {
    vocabulary: Vocabulary,
    idf: Vec<f32>,
    rows: Vec<SparseVector>,
}

impl TfIdfModel {
    /// Weigh every title against `vocabulary`; rows stay aligned with the input order.
    ///
    /// idf(t) = ln((1 + N) / (1 + df(t))) + 1, so every known term keeps a positive weight.
    pub fn fit<'a, I>(titles: I, vocabulary: Vocabulary) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let counts: Vec<BTreeMap<TermId, u32>> = titles
            .into_iter()
            .map(|title| term_counts(title, &vocabulary))
            .collect();

        let mut df = vec![0u32; vocabulary.len()];
        for doc in &counts {
            for tid in doc.keys() {
                df[*tid as usize] += 1;
            }
        }

        let n = counts.len() as f64;
        let idf: Vec<f32> = df
            .iter()
            .map(|&df_t| (((1.0 + n) / (1.0 + df_t as f64)).ln() + 1.0) as f32)
            .collect();

        let rows = counts.into_iter().map(|doc| weigh(doc, &idf)).collect();
        Self { vocabulary, idf, rows }
    }

    /// Vectorize arbitrary text with the fitted weights; unknown terms are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        weigh(term_counts(text, &self.vocabulary), &self.idf)
    }

    pub fn vocabulary(&self) -> &Vocabulary { &self.vocabulary }

    pub fn idf(&self) -> &[f32] { &self.idf }

    pub fn row(&self, index: usize) -> Option<&SparseVector> { self.rows.get(index) }

    pub fn rows(&self) -> &[SparseVector] { &self.rows }

    pub fn num_docs(&self) -> usize { self.rows.len() }
}

fn term_counts(text: &str, vocabulary: &Vocabulary) -> BTreeMap<TermId, u32> {
    let mut tf: BTreeMap<TermId, u32> = BTreeMap::new();
    for term in tokenize(text) {
        if let Some(tid) = vocabulary.get(&term) {
            *tf.entry(tid).or_insert(0) += 1;
        }
    }
    tf
}

fn weigh(tf: BTreeMap<TermId, u32>, idf: &[f32]) -> SparseVector {
    let mut entries: Vec<(TermId, f32)> = tf
        .into_iter()
        .map(|(tid, count)| (tid, count as f32 * idf[tid as usize]))
        .collect();
    let norm = entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for (_, w) in entries.iter_mut() { *w /= norm; }
    } else {
        entries.clear();
    }
    SparseVector { entries }
}
