use crate::catalog::{Catalog, Item, ItemIndex};
use crate::error::{Error, Result};
use crate::similarity::similarities;
use crate::tfidf::TfIdfModel;
use crate::vocabulary::Vocabulary;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::Write as _;
use std::time::Instant;

pub const DEFAULT_K: usize = 5;
pub const NOT_FOUND_MESSAGE: &str = "No se encontró ningún juego con ese id";

/// How the query item is kept out of its own recommendations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelfExclusion {
    /// Drop every row whose id equals the query id; ties rank by ascending catalog position.
    #[default]
    ById,
    /// Drop whichever row ranks first after an ascending (score, index) sort and
    /// read the next k from the top. An identical title sorting after the query
    /// takes its place and the query item leaks into the results.
    TopRank,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredItem {
    pub id: String,
    pub title: String,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub query: Item,
    pub items: Vec<ScoredItem>,
}

impl Recommendation {
    /// Numbered, human readable listing, most similar first.
    pub fn message(&self) -> String {
        let mut out = format!("Si te gusta '{}' te recomendamos los siguientes juegos:\n", self.query.title);
        for (i, item) in self.items.iter().enumerate() {
            let _ = write!(out, "{}. id: {}\n   title: {}\n", i + 1, item.id, item.title);
        }
        out
    }
}

/// Content based recommender over an immutable catalog.
///
/// The vocabulary and every document vector are computed once in [`Recommender::build`];
/// [`Recommender::recommend`] only reads them.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Catalog,
    model: TfIdfModel,
    exclusion: SelfExclusion,
}

impl Recommender {
    pub fn build(catalog: Catalog) -> Result<Self> {
        if catalog.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let vocabulary = Vocabulary::build(catalog.titles());
        let model = TfIdfModel::fit(catalog.titles(), vocabulary);
        let degenerate = model.rows().iter().filter(|r| r.is_zero()).count();
        tracing::info!(
            items = catalog.len(),
            vocabulary = model.vocabulary().len(),
            degenerate,
            "recommender built"
        );
        Ok(Self { catalog, model, exclusion: SelfExclusion::default() })
    }

    pub fn with_exclusion(mut self, exclusion: SelfExclusion) -> Self {
        self.exclusion = exclusion;
        self
    }

    pub fn catalog(&self) -> &Catalog { &self.catalog }

    pub fn model(&self) -> &TfIdfModel { &self.model }

    pub fn exclusion(&self) -> SelfExclusion { self.exclusion }

    /// Up to `k` items most similar to the first item with id `item_id`.
    pub fn recommend(&self, item_id: &str, k: usize) -> Result<Recommendation> {
        let start = Instant::now();
        let index = self
            .catalog
            .position(item_id)
            .ok_or_else(|| Error::NotFound(item_id.to_string()))?;
        let query = &self.model.rows()[index];
        let scores = similarities(query, self.model.rows());

        let query_id = self.catalog.items()[index].id.as_str();
        let shares_query_id = |i: ItemIndex| self.catalog.get(i).is_some_and(|it| it.id == query_id);
        let items = rank(scores, shares_query_id, k, self.exclusion)
            .into_iter()
            .filter_map(|(i, score)| {
                self.catalog.get(i).map(|it| ScoredItem { id: it.id.clone(), title: it.title.clone(), score })
            })
            .collect::<Vec<_>>();

        tracing::debug!(item_id, hits = items.len(), took_us = start.elapsed().as_micros() as u64, "recommend");
        Ok(Recommendation { query: self.catalog.items()[index].clone(), items })
    }
}

/// `is_query` marks every row carrying the query id; only `ById` consults it.
fn rank<F>(mut scores: Vec<(ItemIndex, f32)>, is_query: F, k: usize, exclusion: SelfExclusion) -> Vec<(ItemIndex, f32)>
where
    F: Fn(ItemIndex) -> bool,
{
    match exclusion {
        SelfExclusion::ById => {
            scores.retain(|(i, _)| !is_query(*i));
            scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));
            scores.truncate(k);
            scores
        }
        SelfExclusion::TopRank => {
            scores.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));
            scores.pop();
            scores.into_iter().rev().take(k).collect()
        }
    }
}
