use regex::Regex;
use std::sync::OnceLock;

const END_PUNCTUATION: [char; 3] = ['.', '?', '!'];

fn word_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\w+$").expect("static regex"))
}

/// Counts whitespace-separated tokens that are entirely word characters
/// (Unicode letters, digits, underscore) -- per spec.md §4.6, a token with
/// any attached punctuation doesn't count.
fn alpha_token_count(s: &str) -> usize {
    s.split_whitespace().filter(|tok| word_token_re().is_match(tok)).count()
}

fn ends_with_punctuation(s: &str) -> bool {
    s.trim_end().chars().last().is_some_and(|c| END_PUNCTUATION.contains(&c))
}

/// A candidate sentence pair filter (C7): pure and order-preserving, never
/// reordering or merging pairs, only dropping ones that fail a check.
pub struct PairFilter {
    pub min_alpha_tokens: usize,
    pub require_end_punctuation: bool,
}

impl PairFilter {
    pub fn new(min_alpha_tokens: usize, require_end_punctuation: bool) -> Self {
        PairFilter { min_alpha_tokens, require_end_punctuation }
    }

    /// Whether a single `(source, target)` sentence pair passes every
    /// configured check. Both sides must be non-empty, the two sides must
    /// not be byte-identical (a translation is never the same string as its
    /// source, so an identical pair is noise), and -- when enabled -- each
    /// side must contain at least `min_alpha_tokens` word tokens and end in
    /// sentence-final punctuation.
    pub fn accepts(&self, source: &str, target: &str) -> bool {
        if source.trim().is_empty() || target.trim().is_empty() {
            return false;
        }
        if source == target {
            return false;
        }
        if alpha_token_count(source) < self.min_alpha_tokens
            || alpha_token_count(target) < self.min_alpha_tokens
        {
            return false;
        }
        if self.require_end_punctuation
            && (!ends_with_punctuation(source) || !ends_with_punctuation(target))
        {
            return false;
        }
        true
    }

    /// Filters a list of `(source, target)` pairs in place, preserving the
    /// relative order of every pair that survives.
    pub fn filter_pairs(&self, pairs: Vec<(String, String)>) -> Vec<(String, String)> {
        pairs
            .into_iter()
            .filter(|(s, t)| self.accepts(s, t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_filter() -> PairFilter {
        PairFilter::new(5, true)
    }

    #[test]
    fn accepts_well_formed_pair() {
        let f = default_filter();
        assert!(f.accepts(
            "This is a sentence with enough words.",
            "Ceci est une phrase avec assez de mots."
        ));
    }

    #[test]
    fn rejects_empty_side() {
        let f = default_filter();
        assert!(!f.accepts("", "Something here."));
        assert!(!f.accepts("Something here.", ""));
    }

    #[test]
    fn rejects_missing_end_punctuation() {
        let f = default_filter();
        assert!(!f.accepts(
            "This is a sentence with enough words",
            "Ceci est une phrase avec assez de mots."
        ));
    }

    #[test]
    fn rejects_too_few_alpha_tokens() {
        let f = default_filter();
        assert!(!f.accepts("One two.", "Ceci est une phrase avec assez de mots."));
    }

    #[test]
    fn rejects_byte_identical_pair() {
        let f = default_filter();
        assert!(!f.accepts(
            "This is a sentence with enough words.",
            "This is a sentence with enough words."
        ));
    }

    #[test]
    fn alpha_token_count_ignores_attached_punctuation() {
        // "words," and "mots." don't fully match ^\w+$, so they don't count.
        let f = default_filter();
        assert!(!f.accepts(
            "One, two, three, four, five, six, words,",
            "Ceci, est, une, phrase, avec, mots."
        ));
    }

    #[test]
    fn end_punctuation_check_can_be_disabled() {
        let f = PairFilter::new(5, false);
        assert!(f.accepts(
            "This is a sentence with enough words",
            "Ceci est une phrase avec assez de mots"
        ));
    }

    #[test]
    fn filter_pairs_is_order_preserving() {
        let f = default_filter();
        let pairs = vec![
            (
                "This good sentence has enough words here.".to_string(),
                "Cette bonne phrase a suffisamment de mots ici.".to_string(),
            ),
            ("Too short.".to_string(), "Court.".to_string()),
            (
                "Another really good sentence to keep right here.".to_string(),
                "Une autre tres bonne phrase a garder juste ici.".to_string(),
            ),
        ];
        let kept = f.filter_pairs(pairs.clone());
        assert_eq!(kept, vec![pairs[0].clone(), pairs[2].clone()]);
    }

    #[test]
    fn filter_pairs_is_idempotent() {
        let f = default_filter();
        let pairs = vec![(
            "This good sentence has enough words here.".to_string(),
            "Cette bonne phrase a suffisamment de mots ici.".to_string(),
        )];
        let once = f.filter_pairs(pairs.clone());
        let twice = f.filter_pairs(once.clone());
        assert_eq!(once, twice);
    }
}
