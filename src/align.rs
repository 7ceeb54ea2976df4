use crate::config::GRID_SIZE_LIMIT;

/// Result of a weighted global (Needleman-Wunsch) alignment: the total cost
/// and the step-by-step index pairs in document order. `-1` marks a gap on
/// that side, per spec.md §3 (`i=-1` is a source gap, `j=-1` a target gap;
/// `(-1,-1)` never occurs).
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub cost: u32,
    pub pairs: Vec<(i64, i64)>,
}

/// Generic weighted global sequence alignment with fixed integer costs:
/// match 0, mismatch +1, gap (either side) +1.
///
/// Traceback tie-breaking is deterministic: diagonal (match/mismatch) is
/// preferred over up (source gap... er, target gap) over left, so repeated
/// calls on the same input always produce the same alignment.
///
/// Returns `None` if `|s| * |t| > GRID_SIZE_LIMIT` -- the grid-size guard
/// from spec.md §4.3/§5 -- without allocating the `O(mn)` DP table.
pub fn align<T: PartialEq>(s: &[T], t: &[T]) -> Option<Alignment> {
    let m = s.len();
    let n = t.len();

    if (m as u64) * (n as u64) > GRID_SIZE_LIMIT {
        return None;
    }

    let cols = n + 1;
    let mut d = vec![0u32; (m + 1) * cols];
    for i in 0..=m {
        d[i * cols] = i as u32;
    }
    for j in 0..=n {
        d[j] = j as u32;
    }

    for i in 1..=m {
        for j in 1..=n {
            let sub_cost = if s[i - 1] == t[j - 1] { 0 } else { 1 };
            let diag = d[(i - 1) * cols + (j - 1)] + sub_cost;
            let up = d[(i - 1) * cols + j] + 1;
            let left = d[i * cols + (j - 1)] + 1;
            d[i * cols + j] = diag.min(up).min(left);
        }
    }

    let cost = d[m * cols + n];

    let mut pairs = Vec::with_capacity(m + n);
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 {
            let sub_cost = if s[i - 1] == t[j - 1] { 0 } else { 1 };
            if d[i * cols + j] == d[(i - 1) * cols + (j - 1)] + sub_cost {
                pairs.push((i as i64 - 1, j as i64 - 1));
                i -= 1;
                j -= 1;
                continue;
            }
        }
        if i > 0 && d[i * cols + j] == d[(i - 1) * cols + j] + 1 {
            pairs.push((i as i64 - 1, -1));
            i -= 1;
            continue;
        }
        // Must be the left move: j > 0 and d[i][j] == d[i][j-1] + 1.
        pairs.push((-1, j as i64 - 1));
        j -= 1;
    }
    pairs.reverse();

    Some(Alignment { cost, pairs })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_zero_cost_diagonal() {
        let s = vec![1u32, 2, 3, 4];
        let a = align(&s, &s).unwrap();
        assert_eq!(a.cost, 0);
        assert_eq!(
            a.pairs,
            vec![(0, 0), (1, 1), (2, 2), (3, 3)]
        );
    }

    #[test]
    fn symmetry_mirrors_gaps() {
        let s = vec![1u32, 2, 3];
        let t = vec![1u32, 2];
        let st = align(&s, &t).unwrap();
        let ts = align(&t, &s).unwrap();
        assert_eq!(st.cost, ts.cost);
        let mirrored: Vec<(i64, i64)> = ts.pairs.iter().map(|&(i, j)| (j, i)).collect();
        assert_eq!(st.pairs, mirrored);
    }

    #[test]
    fn single_insertion_costs_one() {
        let s = vec![10u32];
        let t = vec![10u32, 20u32];
        let a = align(&s, &t).unwrap();
        assert_eq!(a.cost, 1);
        assert_eq!(a.pairs, vec![(0, 0), (-1, 1)]);
    }

    #[test]
    fn empty_source_is_all_target_gaps() {
        let s: Vec<u32> = vec![];
        let t = vec![1u32, 2, 3];
        let a = align(&s, &t).unwrap();
        assert_eq!(a.cost, 3);
        assert_eq!(a.pairs, vec![(-1, 0), (-1, 1), (-1, 2)]);
    }

    #[test]
    fn empty_target_is_all_source_gaps() {
        let s = vec![1u32, 2, 3];
        let t: Vec<u32> = vec![];
        let a = align(&s, &t).unwrap();
        assert_eq!(a.cost, 3);
        assert_eq!(a.pairs, vec![(0, -1), (1, -1), (2, -1)]);
    }

    #[test]
    fn cost_matches_non_match_step_count() {
        let s = vec![1u32, 9, 3, 9];
        let t = vec![1u32, 2, 3, 4];
        let a = align(&s, &t).unwrap();
        let non_match_steps = a
            .pairs
            .iter()
            .filter(|&&(i, j)| i < 0 || j < 0 || s[i as usize] != t[j as usize])
            .count() as u32;
        assert_eq!(a.cost, non_match_steps);
    }

    #[test]
    fn grid_guard_rejects_product_above_limit() {
        // Zero-sized types let us construct slices whose *lengths* multiply
        // past the limit without allocating anything real.
        let s = vec![(); 100_000];
        let t = vec![(); 100_000];
        assert!((s.len() as u64) * (t.len() as u64) > GRID_SIZE_LIMIT);
        assert!(align(&s, &t).is_none());
    }
}
