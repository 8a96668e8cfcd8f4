use serde::{Deserialize, Serialize};

/// Row position of an item inside its catalog; also the row of its document vector.
pub type ItemIndex = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
}

impl Item {
    pub fn new(id: impl AsRef<str>, title: impl Into<String>) -> Self {
        Self { id: canonical_id(id.as_ref()), title: title.into() }
    }
}

/// Ordered, immutable list of recommendable items.
///
/// Duplicate ids are tolerated; lookups resolve to the first occurrence.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    pub fn new(items: Vec<Item>) -> Self {
        let items = items
            .into_iter()
            .map(|it| Item { id: canonical_id(&it.id), title: it.title })
            .collect();
        Self { items }
    }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn items(&self) -> &[Item] { &self.items }

    pub fn get(&self, index: ItemIndex) -> Option<&Item> { self.items.get(index) }

    pub fn titles(&self) -> impl Iterator<Item = &str> { self.items.iter().map(|it| it.title.as_str()) }

    /// First item whose id equals `id` once both sides are canonicalized.
    pub fn position(&self, id: &str) -> Option<ItemIndex> {
        let id = canonical_id(id);
        self.items.iter().position(|it| it.id == id)
    }
}

impl FromIterator<Item> for Catalog {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Canonical string form of an externally supplied id.
///
/// Trims whitespace and collapses float renderings of integers ("730.0") to "730".
pub fn canonical_id(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some((int_part, frac)) = trimmed.split_once('.') {
        let digits = int_part.strip_prefix('-').unwrap_or(int_part);
        let is_int = !digits.is_empty()
            && digits.chars().all(|c| c.is_ascii_digit())
            && !frac.is_empty()
            && frac.chars().all(|c| c == '0');
        if is_int {
            return int_part.to_string();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_id_collapses_float_integers() {
        assert_eq!(canonical_id(" 730 "), "730");
        assert_eq!(canonical_id("730.0"), "730");
        assert_eq!(canonical_id("730.00"), "730");
        assert_eq!(canonical_id("730.5"), "730.5");
        assert_eq!(canonical_id("abc.0"), "abc.0");
        assert_eq!(canonical_id(".0"), ".0");
    }

    #[test]
    fn position_returns_first_duplicate() {
        let cat = Catalog::new(vec![
            Item::new("1", "Portal"),
            Item::new("2", "Half Life"),
            Item::new("2", "Half Life 2"),
        ]);
        assert_eq!(cat.position("2"), Some(1));
        assert_eq!(cat.position("2.0"), Some(1));
        assert_eq!(cat.position("3"), None);
    }
}
