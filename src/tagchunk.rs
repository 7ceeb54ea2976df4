use serde::Serialize;

/// One unit in a reduced document stream.
///
/// A flat enum, not a class hierarchy: the reducer never needs virtual
/// dispatch between the three cases, only pattern matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tagchunk {
    Start { tag: String },
    End { tag: String },
    Chunk { text: String, length: usize },
}

impl Tagchunk {
    pub fn chunk(text: impl Into<String>) -> Self {
        let text = text.into();
        let length = text.chars().count();
        Tagchunk::Chunk { text, length }
    }

    pub fn is_chunk(&self) -> bool {
        matches!(self, Tagchunk::Chunk { .. })
    }

    pub fn as_chunk_text(&self) -> Option<&str> {
        match self {
            Tagchunk::Chunk { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn chunk_length(&self) -> Option<usize> {
        match self {
            Tagchunk::Chunk { length, .. } => Some(*length),
            _ => None,
        }
    }
}

/// Ordered, read-only sequence of [`Tagchunk`]s produced by the HTML reducer.
pub type TagchunkStream = Vec<Tagchunk>;

/// One step of a [`Tagchunk`]-level STRAND alignment: the source and target
/// indices (or `None` for a gap on that side), the tagchunks themselves, and
/// the running alignment cost at this step.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedStep {
    pub src_index: Option<usize>,
    pub src: Option<Tagchunk>,
    pub tgt_index: Option<usize>,
    pub tgt: Option<Tagchunk>,
    pub cost_at_step: u32,
}

/// Candidate-pair statistics computed by the STRAND aligner (C4).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairStats {
    pub difference_ratio: f64,
    pub length_correlation: f64,
    pub p_value: f64,
    pub n_chunks: usize,
}

impl PairStats {
    pub fn empty() -> Self {
        PairStats {
            difference_ratio: 0.0,
            length_correlation: 0.0,
            p_value: 0.0,
            n_chunks: 0,
        }
    }
}
