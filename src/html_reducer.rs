use crate::error::ReducerError;
use crate::tagchunk::{Tagchunk, TagchunkStream};
use ego_tree::NodeRef;
use regex::Regex;
use scraper::{Html, Node};
use std::sync::OnceLock;

/// Tags whose open/close markers are dropped from the output stream rather
/// than emitted as `Start`/`End`. Ported from `StrandTarget.strand_ignore_tags`
/// in the original parser: inline markup that shouldn't fragment a sentence.
const STRAND_IGNORE: &[&str] = &[
    "a", "b", "strong", "i", "em", "font", "span", "nobr", "sup", "sub", "meta", "link", "acronym",
];

/// Tags that still inject a word-break space into the surrounding chunk even
/// though they don't emit `Start`/`End` markers.
const WORD_BREAK: &[&str] = &["br", "option", "a"];

/// Tags whose entire subtree is skipped -- non-prose content that should
/// never reach a chunk.
const IGNORED_CONTENT_TAGS: &[&str] = &["script", "style"];

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

fn collapse_whitespace(s: &str) -> String {
    whitespace_re().replace_all(s, " ").into_owned()
}

/// Accumulates Start/End/Chunk events while walking the DOM in document
/// order, mirroring the SAX target's `ignore_stack` / `current_chunk`
/// bookkeeping from the original parser.
struct Reducer {
    ignore_stack: Vec<String>,
    current_chunk: String,
    stream: TagchunkStream,
}

impl Reducer {
    fn new() -> Self {
        Reducer {
            ignore_stack: Vec::new(),
            current_chunk: String::new(),
            stream: Vec::new(),
        }
    }

    fn flush(&mut self) {
        let trimmed = self.current_chunk.trim();
        if !trimmed.is_empty() {
            self.stream.push(Tagchunk::chunk(trimmed));
        }
        self.current_chunk.clear();
    }

    fn start_tag(&mut self, tag: &str) {
        if !self.ignore_stack.is_empty() {
            if IGNORED_CONTENT_TAGS.contains(&tag) {
                self.ignore_stack.push(tag.to_string());
            }
            return;
        }
        if IGNORED_CONTENT_TAGS.contains(&tag) {
            self.ignore_stack.push(tag.to_string());
            return;
        }
        if STRAND_IGNORE.contains(&tag) {
            if WORD_BREAK.contains(&tag) {
                self.current_chunk.push(' ');
            }
            return;
        }
        self.flush();
        self.stream.push(Tagchunk::Start { tag: tag.to_string() });
    }

    fn end_tag(&mut self, tag: &str) {
        if !self.ignore_stack.is_empty() {
            if self.ignore_stack.last().map(String::as_str) == Some(tag) {
                self.ignore_stack.pop();
            }
            return;
        }
        if STRAND_IGNORE.contains(&tag) {
            if WORD_BREAK.contains(&tag) {
                self.current_chunk.push(' ');
            }
            return;
        }
        self.flush();
        self.stream.push(Tagchunk::End { tag: tag.to_string() });
    }

    fn text(&mut self, text: &str) {
        if !self.ignore_stack.is_empty() {
            return;
        }
        self.current_chunk.push_str(&collapse_whitespace(text));
    }

    fn finish(mut self) -> TagchunkStream {
        self.flush();
        self.stream
    }
}

fn walk(node: NodeRef<Node>, reducer: &mut Reducer) {
    match node.value() {
        Node::Element(element) => {
            let tag = element.name().to_ascii_lowercase();
            reducer.start_tag(&tag);
            for child in node.children() {
                walk(child, reducer);
            }
            reducer.end_tag(&tag);
        }
        Node::Text(text) => {
            reducer.text(text);
        }
        _ => {
            for child in node.children() {
                walk(child, reducer);
            }
        }
    }
}

fn reduce_str(document: &str) -> TagchunkStream {
    let html = Html::parse_document(document);
    let mut reducer = Reducer::new();
    walk(html.tree.root(), &mut reducer);
    reducer.finish()
}

/// Reduces raw HTML bytes into a tagchunk stream (C1).
///
/// Tolerant of malformed *encodings* through a three-pass fallback chain:
/// strict UTF-8 decode, then a lossy Latin-1/Windows-1252 re-decode (every
/// byte maps to some codepoint), then a lossy UTF-8 "soup" repair that just
/// drops invalid sequences. The HTML5 tree builder underneath (`scraper`,
/// via `html5ever`) already tolerates malformed markup by spec -- unclosed
/// tags, bad nesting, stray attributes -- so byte decoding is the only place
/// a document can realistically fail to become *some* tree.
pub fn reduce_html(bytes: &[u8]) -> Result<TagchunkStream, ReducerError> {
    if bytes.is_empty() {
        return Err(ReducerError::EmptyInput);
    }

    if let Ok(strict) = std::str::from_utf8(bytes) {
        return Ok(reduce_str(strict));
    }

    let latin1: String = bytes.iter().map(|&b| b as char).collect();
    if !latin1.trim().is_empty() {
        let stream = reduce_str(&latin1);
        if !stream.is_empty() {
            return Ok(stream);
        }
    }

    let lossy = String::from_utf8_lossy(bytes);
    if lossy.trim().is_empty() {
        return Err(ReducerError::ParseFailed(
            "all parser passes produced an empty document".to_string(),
        ));
    }
    Ok(reduce_str(&lossy))
}
