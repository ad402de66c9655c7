//! Lexical similarity for short-answer grading.
//!
//! Implements the matching-blocks ratio: find the longest common run of
//! characters, recurse on the pieces to its left and right, and score
//! `2 * matched / (len(a) + len(b))`.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static NOISE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s\p{P}\p{S}]+").unwrap());

/// A run of equal characters: `a[a..a+size] == b[b..b+size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchBlock {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Remove whitespace, punctuation and symbols, then lowercase.
pub fn strip_for_comparison(text: &str) -> String {
    NOISE.replace_all(text, "").to_lowercase()
}

/// Similarity ratio in `[0, 1]`, symmetric in its arguments.
///
/// The greedy block search can depend on argument order, so the better of
/// both orders is reported. Two empty strings are identical (1.0).
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let forward = matched_len(&a, &b);
    let backward = matched_len(&b, &a);
    2.0 * forward.max(backward) as f64 / total as f64
}

fn matched_len(a: &[char], b: &[char]) -> usize {
    matching_blocks(a, b).iter().map(|m| m.size).sum()
}

/// Non-overlapping matching blocks of `a` and `b`, ordered by position.
pub fn matching_blocks(a: &[char], b: &[char]) -> Vec<MatchBlock> {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b2j.entry(*c).or_default().push(j);
    }

    let mut blocks = Vec::new();
    let mut queue = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let m = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if m.size == 0 {
            continue;
        }
        if alo < m.a && blo < m.b {
            queue.push((alo, m.a, blo, m.b));
        }
        if m.a + m.size < ahi && m.b + m.size < bhi {
            queue.push((m.a + m.size, ahi, m.b + m.size, bhi));
        }
        blocks.push(m);
    }

    blocks.sort_by_key(|m| (m.a, m.b));
    blocks
}

/// Longest common run inside `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Ties go to the run starting earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> MatchBlock {
    let mut best = MatchBlock {
        a: alo,
        b: blo,
        size: 0,
    };
    // j2len[j] = length of the run ending at a[i-1] and b[j]
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(c) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| j2len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next.insert(j, k);
                if k > best.size {
                    best = MatchBlock {
                        a: i + 1 - k,
                        b: j + 1 - k,
                        size: k,
                    };
                }
            }
        }
        j2len = next;
    }

    best
}
