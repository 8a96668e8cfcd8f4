use crate::catalog::ItemIndex;
use crate::tfidf::SparseVector;

/// Cosine similarity of `query` against every row, in row order.
///
/// Both sides are unit length or zero, so the dot product is the cosine.
pub fn similarities(query: &SparseVector, matrix: &[SparseVector]) -> Vec<(ItemIndex, f32)> {
    matrix.iter().enumerate().map(|(i, row)| (i, query.dot(row))).collect()
}
