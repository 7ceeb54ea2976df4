use crate::tagchunk::{Tagchunk, TagchunkStream};
use std::collections::HashMap;

/// Interns tag names to small integers, shared across both sides of a pair
/// so a `<p>` in the source and a `<p>` in the target encode to the same id.
/// The table is built fresh per call, exactly as `strand.py`'s `tc_to_int`
/// builds one `tag2id` map per `align` invocation rather than a global one.
struct TagInterner {
    ids: HashMap<String, u32>,
    next: u32,
}

impl TagInterner {
    fn new() -> Self {
        TagInterner { ids: HashMap::new(), next: 0 }
    }

    fn id(&mut self, tag: &str) -> u32 {
        if let Some(&id) = self.ids.get(tag) {
            return id;
        }
        let id = self.next;
        self.next += 1;
        self.ids.insert(tag.to_string(), id);
        id
    }
}

/// Integer encoding of a single tagchunk: `Chunk` always maps to `1` (so any
/// two chunks are "equal" tokens for alignment purposes, regardless of their
/// text); `Start`/`End` map to per-tag ids offset into disjoint ranges so a
/// `<p>` start never collides with a `<p>` end, or with any chunk.
const CHUNK_TOKEN: u32 = 1;
const START_BASE: u32 = 2;
const END_BASE: u32 = 65536;

fn encode_one(tc: &Tagchunk, interner: &mut TagInterner) -> u32 {
    match tc {
        Tagchunk::Chunk { .. } => CHUNK_TOKEN,
        Tagchunk::Start { tag } => START_BASE + interner.id(tag),
        Tagchunk::End { tag } => END_BASE + interner.id(tag),
    }
}

/// Encodes a pair of tagchunk streams (C2) using one shared tag-intern table,
/// so they can be fed to the generic integer aligner (C3).
pub fn encode(src: &TagchunkStream, tgt: &TagchunkStream) -> (Vec<u32>, Vec<u32>) {
    let mut interner = TagInterner::new();
    let src_ints = src.iter().map(|tc| encode_one(tc, &mut interner)).collect();
    let tgt_ints = tgt.iter().map(|tc| encode_one(tc, &mut interner)).collect();
    (src_ints, tgt_ints)
}
