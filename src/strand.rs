use crate::align;
use crate::config::GRID_SIZE_LIMIT;
use crate::encode;
use crate::stats;
use crate::tagchunk::{AlignedStep, PairStats, Tagchunk, TagchunkStream};

/// Drives the tagchunk encoder (C2) and the generic aligner (C3) over a pair
/// of reduced documents (C4), then scores the result: `difference_ratio` is
/// the realized alignment cost normalized by the combined stream length, and
/// `length_correlation`/`p_value` come from Pearson's r over the chunk
/// lengths of every Chunk-Chunk bead.
///
/// Returns an empty alignment and [`PairStats::empty`] if either stream is
/// empty or the `|S|*|T|` grid-size guard trips -- the same contract as the
/// guard in [`align::align`], surfaced one level up so callers never have to
/// special-case a `None`.
pub fn strand_align(src: &TagchunkStream, tgt: &TagchunkStream) -> (Vec<AlignedStep>, PairStats) {
    let s_size = src.len() as u64;
    let t_size = tgt.len() as u64;

    if s_size == 0 || t_size == 0 || s_size * t_size > GRID_SIZE_LIMIT {
        return (Vec::new(), PairStats::empty());
    }

    let (src_ints, tgt_ints) = encode::encode(src, tgt);
    let Some(alignment) = align::align(&src_ints, &tgt_ints) else {
        return (Vec::new(), PairStats::empty());
    };

    let difference_ratio = alignment.cost as f64 / (src.len() + tgt.len()) as f64;

    let mut steps = Vec::with_capacity(alignment.pairs.len());
    let mut src_lengths = Vec::new();
    let mut tgt_lengths = Vec::new();
    let mut running_cost = 0u32;

    for (i, j) in alignment.pairs {
        let src_index = if i >= 0 { Some(i as usize) } else { None };
        let tgt_index = if j >= 0 { Some(j as usize) } else { None };

        let src_tc: Option<Tagchunk> = src_index.map(|idx| src[idx].clone());
        let tgt_tc: Option<Tagchunk> = tgt_index.map(|idx| tgt[idx].clone());

        let step_cost = match (src_index, tgt_index) {
            (Some(si), Some(tj)) if src_ints[si] == tgt_ints[tj] => 0,
            _ => 1,
        };
        running_cost += step_cost;

        if let (Some(s), Some(t)) = (&src_tc, &tgt_tc) {
            if let (Some(sl), Some(tl)) = (s.chunk_length(), t.chunk_length()) {
                src_lengths.push(sl as f64);
                tgt_lengths.push(tl as f64);
            }
        }

        steps.push(AlignedStep {
            src_index,
            src: src_tc,
            tgt_index,
            tgt: tgt_tc,
            cost_at_step: running_cost,
        });
    }

    let (length_correlation, p_value) = stats::pearson_with_p(&src_lengths, &tgt_lengths);
    let pair_stats = PairStats {
        difference_ratio,
        length_correlation,
        p_value,
        n_chunks: src_lengths.len(),
    };

    (steps, pair_stats)
}
