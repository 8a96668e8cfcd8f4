use crate::tokenizer::tokenize;
use std::collections::{BTreeSet, HashMap};

pub type TermId = u32;

/// Token to column mapping derived from every title of a catalog.
///
/// Columns are assigned in lexicographic token order, so two builds over the
/// same titles always agree.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    dictionary: HashMap<String, TermId>,
    terms: Vec<String>,
}

impl Vocabulary {
    pub fn build<'a, I>(titles: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<String> = titles.into_iter().flat_map(tokenize).collect();
        let terms: Vec<String> = distinct.into_iter().collect();
        let dictionary = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as TermId))
            .collect();
        Self { dictionary, terms }
    }

    pub fn get(&self, term: &str) -> Option<TermId> { self.dictionary.get(term).copied() }

    pub fn term(&self, id: TermId) -> Option<&str> { self.terms.get(id as usize).map(String::as_str) }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    /// Terms in column order.
    pub fn terms(&self) -> &[String] { &self.terms }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_follow_sorted_token_order() {
        let v = Vocabulary::build(["Portal 2", "Half Life", "portal"]);
        assert_eq!(v.terms(), &["half", "life", "portal"]);
        assert_eq!(v.get("portal"), Some(2));
        assert_eq!(v.term(0), Some("half"));
        assert_eq!(v.get("2"), None);
    }

    #[test]
    fn empty_input_builds_empty_vocabulary() {
        assert!(Vocabulary::build(std::iter::empty::<&str>()).is_empty());
        assert!(Vocabulary::build(["", "4"]).is_empty());
    }

    #[test]
    fn rebuild_is_identical() {
        let titles = ["Left 4 Dead", "Counter Strike", "Dead Space"];
        let a = Vocabulary::build(titles);
        let b = Vocabulary::build(titles);
        assert_eq!(a.terms(), b.terms());
    }
}
