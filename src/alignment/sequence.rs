use std::collections::HashMap;
use std::ops::Range;

use crate::types::{AlignmentOp, OpKind};

/// Matching run: `reference[a..a + size] == candidate[b..b + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    a: usize,
    b: usize,
    size: usize,
}

/// Word-level diff built from recursively taking the longest common run.
///
/// Ties between equally long runs go to the one starting earliest in the
/// reference, then earliest in the candidate, so the output is deterministic.
/// The ops cover both sequences end to end with no gaps.
pub fn align_tokens(reference: &[&str], candidate: &[&str]) -> Vec<AlignmentOp> {
    let mut positions: HashMap<&str, Vec<usize>> = HashMap::new();
    for (j, token) in candidate.iter().enumerate() {
        positions.entry(*token).or_default().push(j);
    }

    let mut blocks = Vec::new();
    collect_blocks(
        reference,
        &positions,
        0..reference.len(),
        0..candidate.len(),
        &mut blocks,
    );
    let blocks = merge_adjacent(blocks);

    let mut ops = Vec::with_capacity(blocks.len() * 2 + 1);
    let (mut i, mut j) = (0usize, 0usize);
    let sentinel = Block {
        a: reference.len(),
        b: candidate.len(),
        size: 0,
    };
    for block in blocks.into_iter().chain(std::iter::once(sentinel)) {
        let kind = match (i < block.a, j < block.b) {
            (true, true) => Some(OpKind::Replace),
            (true, false) => Some(OpKind::Delete),
            (false, true) => Some(OpKind::Insert),
            (false, false) => None,
        };
        if let Some(kind) = kind {
            ops.push(AlignmentOp::new(kind, i..block.a, j..block.b));
        }
        if block.size > 0 {
            ops.push(AlignmentOp::new(
                OpKind::Equal,
                block.a..block.a + block.size,
                block.b..block.b + block.size,
            ));
        }
        i = block.a + block.size;
        j = block.b + block.size;
    }
    ops
}

fn collect_blocks(
    reference: &[&str],
    positions: &HashMap<&str, Vec<usize>>,
    a_range: Range<usize>,
    b_range: Range<usize>,
    out: &mut Vec<Block>,
) {
    if a_range.is_empty() || b_range.is_empty() {
        return;
    }
    let Some(block) = longest_match(reference, positions, a_range.clone(), b_range.clone())
    else {
        return;
    };

    collect_blocks(
        reference,
        positions,
        a_range.start..block.a,
        b_range.start..block.b,
        out,
    );
    out.push(block);
    collect_blocks(
        reference,
        positions,
        block.a + block.size..a_range.end,
        block.b + block.size..b_range.end,
        out,
    );
}

fn longest_match(
    reference: &[&str],
    positions: &HashMap<&str, Vec<usize>>,
    a_range: Range<usize>,
    b_range: Range<usize>,
) -> Option<Block> {
    let mut best = Block {
        a: a_range.start,
        b: b_range.start,
        size: 0,
    };
    // run_len[j] = length of the common run ending at reference[i - 1] / candidate[j].
    let mut run_len: HashMap<usize, usize> = HashMap::new();
    for i in a_range {
        let mut next_run_len = HashMap::new();
        if let Some(js) = positions.get(reference[i]) {
            for &j in js {
                if j < b_range.start {
                    continue;
                }
                if j >= b_range.end {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| run_len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_run_len.insert(j, k);
                if k > best.size {
                    best = Block {
                        a: i + 1 - k,
                        b: j + 1 - k,
                        size: k,
                    };
                }
            }
        }
        run_len = next_run_len;
    }
    (best.size > 0).then_some(best)
}

fn merge_adjacent(blocks: Vec<Block>) -> Vec<Block> {
    let mut merged: Vec<Block> = Vec::with_capacity(blocks.len());
    for block in blocks {
        if let Some(last) = merged.last_mut() {
            if last.a + last.size == block.a && last.b + last.size == block.b {
                last.size += block.size;
                continue;
            }
        }
        merged.push(block);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<&str> {
        text.split_whitespace().collect()
    }

    fn assert_covers(ops: &[AlignmentOp], ref_len: usize, cand_len: usize) {
        let (mut i, mut j) = (0, 0);
        for op in ops {
            assert_eq!(op.reference.start, i, "gap in reference at {op:?}");
            assert_eq!(op.candidate.start, j, "gap in candidate at {op:?}");
            i = op.reference.end;
            j = op.candidate.end;
        }
        assert_eq!((i, j), (ref_len, cand_len));
    }

    #[test]
    fn identical_sequences_yield_single_equal() {
        let tokens = words("the quick brown fox jumps over the lazy dog");
        let ops = align_tokens(&tokens, &tokens);
        assert_eq!(
            ops,
            vec![AlignmentOp::new(OpKind::Equal, 0..9, 0..9)]
        );
    }

    #[test]
    fn empty_sides() {
        assert!(align_tokens(&[], &[]).is_empty());
        assert_eq!(
            align_tokens(&words("a b"), &[]),
            vec![AlignmentOp::new(OpKind::Delete, 0..2, 0..0)]
        );
        assert_eq!(
            align_tokens(&[], &words("a b")),
            vec![AlignmentOp::new(OpKind::Insert, 0..0, 0..2)]
        );
    }

    #[test]
    fn substitution_in_the_middle() {
        let reference = words("she likes pizza a lot");
        let candidate = words("she likes pasta a lot");
        let ops = align_tokens(&reference, &candidate);
        assert_eq!(
            ops,
            vec![
                AlignmentOp::new(OpKind::Equal, 0..2, 0..2),
                AlignmentOp::new(OpKind::Replace, 2..3, 2..3),
                AlignmentOp::new(OpKind::Equal, 3..5, 3..5),
            ]
        );
    }

    #[test]
    fn omission_and_insertion() {
        let reference = words("i really like green tea");
        let candidate = words("i like green iced tea");
        let ops = align_tokens(&reference, &candidate);
        assert_eq!(
            ops,
            vec![
                AlignmentOp::new(OpKind::Equal, 0..1, 0..1),
                AlignmentOp::new(OpKind::Delete, 1..2, 1..1),
                AlignmentOp::new(OpKind::Equal, 2..4, 1..3),
                AlignmentOp::new(OpKind::Insert, 4..4, 3..4),
                AlignmentOp::new(OpKind::Equal, 4..5, 4..5),
            ]
        );
    }

    #[test]
    fn ties_prefer_earliest_reference_match() {
        // "a" and "b" are both length-1 runs; "a" comes first in the reference.
        let ops = align_tokens(&words("a b"), &words("b a"));
        assert_eq!(
            ops,
            vec![
                AlignmentOp::new(OpKind::Insert, 0..0, 0..1),
                AlignmentOp::new(OpKind::Equal, 0..1, 1..2),
                AlignmentOp::new(OpKind::Delete, 1..2, 2..2),
            ]
        );
    }

    #[test]
    fn longest_run_anchors_alignment() {
        let reference = words("x the cat sat y");
        let candidate = words("the cat sat on x");
        let ops = align_tokens(&reference, &candidate);
        assert_covers(&ops, reference.len(), candidate.len());
        assert!(ops.contains(&AlignmentOp::new(OpKind::Equal, 1..4, 0..3)));
    }

    #[test]
    fn ops_always_cover_both_sequences() {
        let cases = [
            ("a b c d e", "a x c y e z"),
            ("the the the", "the"),
            ("one two three", "four five"),
            ("a a b b", "b b a a"),
            ("", "lonely"),
        ];
        for (r, c) in cases {
            let reference = words(r);
            let candidate = words(c);
            let ops = align_tokens(&reference, &candidate);
            assert_covers(&ops, reference.len(), candidate.len());
            for op in &ops {
                if op.kind == OpKind::Equal {
                    assert_eq!(
                        &reference[op.reference.clone()],
                        &candidate[op.candidate.clone()]
                    );
                }
            }
        }
    }
}
