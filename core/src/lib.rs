pub mod analytics;
pub mod catalog;
pub mod error;
pub mod loader;
pub mod recommend;
pub mod similarity;
pub mod snapshot;
pub mod tfidf;
pub mod tokenizer;
pub mod vocabulary;

pub use catalog::{Catalog, Item, ItemIndex};
pub use error::{Error, Result};
pub use recommend::{Recommendation, Recommender, ScoredItem, SelfExclusion, DEFAULT_K, NOT_FOUND_MESSAGE};
pub use snapshot::{SharedSnapshot, Snapshot};
pub use tfidf::{SparseVector, TfIdfModel};
pub use vocabulary::{TermId, Vocabulary};
