use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Two or more word characters between word boundaries; single characters never become terms.
    static ref RE: Regex = Regex::new(r"\b\w\w+\b").expect("valid regex");
}

/// Tokenize a title into lowercase terms in order of appearance, duplicates kept.
///
/// No stop words and no stemming: "Portal 2" and "portal" share exactly one term.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    RE.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("Left 4 Dead 2");
        assert_eq!(t, vec!["left", "dead"]);
    }

    #[test]
    fn splits_on_punctuation_and_keeps_duplicates() {
        let t = tokenize("Tom Clancy's Splinter-Cell: Splinter");
        assert_eq!(t, vec!["tom", "clancy", "splinter", "cell", "splinter"]);
    }

    #[test]
    fn empty_and_symbol_only_titles_have_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("!!! 1 - ?").is_empty());
    }
}
