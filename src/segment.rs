use regex::Regex;
use std::sync::OnceLock;

/// Pluggable sentence segmenter (C5). Implementations split one chunk's text
/// into sentence-sized spans for the Gale-Church aligner (C6); language
/// tagging lets the pipeline dispatch to a script-appropriate segmenter
/// instead of hardcoding one rule set.
pub trait Segmenter {
    fn process(&self, line: &str) -> Vec<String>;
}

const ENGLISH_TERMINALS: [char; 3] = ['.', '?', '!'];

/// Punctuation-boundary segmenter for English and other Latin-script
/// languages: splits after `.`/`?`/`!` when followed by whitespace and then
/// an uppercase letter or digit, a simpler stand-in for `nltk.punkt`'s
/// trained model (not available in this dependency set). Not implemented
/// with a lookaround regex -- the `regex` crate's linear-time engine
/// doesn't support one -- so this scans manually instead.
pub struct DefaultSegmenter;

impl Segmenter for DefaultSegmenter {
    fn process(&self, line: &str) -> Vec<String> {
        let chars: Vec<(usize, char)> = line.char_indices().collect();
        let mut sentences = Vec::new();
        let mut start = 0usize;

        let mut i = 0;
        while i < chars.len() {
            let (idx, c) = chars[i];
            if ENGLISH_TERMINALS.contains(&c) {
                let mut j = i + 1;
                while j < chars.len() && chars[j].1.is_whitespace() {
                    j += 1;
                }
                if j < chars.len() && (chars[j].1.is_uppercase() || chars[j].1.is_ascii_digit()) {
                    let end = idx + c.len_utf8();
                    sentences.push(line[start..end].to_string());
                    start = chars[j].0;
                    i = j;
                    continue;
                }
            }
            i += 1;
        }
        if start < line.len() {
            sentences.push(line[start..].to_string());
        }

        trim_and_drop_empty(sentences)
    }
}

/// Matches a single Japanese sentence-boundary character: the full-width
/// terminators, the ASCII period, a bare newline, or the zero-width space
/// (`\u{200B}`) -- the exact character class spec.md §6 calls for. No
/// lookaround needed, so unlike `DefaultSegmenter` this is a plain regex
/// split rather than a manual scan.
fn japanese_boundary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[。！？.\n\u{200B}]").expect("static regex"))
}

/// Japanese segmenter: splits on `！？。.\n` and the zero-width space, per
/// spec.md §6. Punctuation terminators (`！？。.`) are kept at the end of
/// the sentence they close (no following-whitespace requirement -- Japanese
/// prose doesn't space after sentence punctuation); bare newlines and the
/// zero-width space are plain separators and are dropped, like whitespace
/// in the default segmenter.
pub struct JapaneseSegmenter;

impl Segmenter for JapaneseSegmenter {
    fn process(&self, line: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut start = 0usize;

        for m in japanese_boundary_re().find_iter(line) {
            let is_separator = matches!(m.as_str(), "\n" | "\u{200B}");
            let end = if is_separator { m.start() } else { m.end() };
            sentences.push(line[start..end].to_string());
            start = m.end();
        }
        if start < line.len() {
            sentences.push(line[start..].to_string());
        }

        trim_and_drop_empty(sentences)
    }
}

fn trim_and_drop_empty(sentences: Vec<String>) -> Vec<String> {
    sentences
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Resolves a language tag (e.g. `"en"`, `"ja"`) to a segmenter, falling
/// back to [`DefaultSegmenter`] for anything unrecognized.
pub fn segmenter_for_language(language: &str) -> Box<dyn Segmenter> {
    match language.to_ascii_lowercase().as_str() {
        "ja" | "jp" | "japanese" => Box::new(JapaneseSegmenter),
        _ => Box::new(DefaultSegmenter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_splits_on_terminal_punctuation() {
        let out = DefaultSegmenter.process("Hello there. This is a test! Is it working?");
        assert_eq!(
            out,
            vec!["Hello there.", "This is a test!", "Is it working?"]
        );
    }

    #[test]
    fn english_does_not_split_without_following_capital() {
        let out = DefaultSegmenter.process("a value of 3.5 meters long.");
        assert_eq!(out, vec!["a value of 3.5 meters long."]);
    }

    #[test]
    fn japanese_splits_on_full_width_terminators() {
        let out = JapaneseSegmenter.process("こんにちは。元気ですか？はい。");
        assert_eq!(out, vec!["こんにちは。", "元気ですか？", "はい。"]);
    }

    #[test]
    fn japanese_splits_on_ascii_period_too() {
        let out = JapaneseSegmenter.process("これはテストです.次も同様です.");
        assert_eq!(out, vec!["これはテストです.", "次も同様です."]);
    }

    #[test]
    fn japanese_drops_zero_width_space_as_a_bare_separator() {
        let out = JapaneseSegmenter.process("こんにちは\u{200B}世界。");
        assert_eq!(out, vec!["こんにちは", "世界。"]);
    }

    #[test]
    fn empty_input_yields_no_sentences() {
        assert!(DefaultSegmenter.process("").is_empty());
        assert!(DefaultSegmenter.process("   ").is_empty());
    }

    #[test]
    fn unknown_language_falls_back_to_default() {
        let seg = segmenter_for_language("xx");
        let out = seg.process("One. Two.");
        assert_eq!(out, vec!["One.", "Two."]);
    }

    #[test]
    fn known_japanese_tag_dispatches_correctly() {
        let seg = segmenter_for_language("ja");
        let out = seg.process("一。二。");
        assert_eq!(out, vec!["一。", "二。"]);
    }
}
