//! String distance metrics
//!
//! The index relies on the metric contract: non-negative, symmetric, zero
//! iff equal, and the triangle inequality. Levenshtein satisfies all four.

/// A distance function over strings usable by the metric index
pub trait Metric: Send + Sync {
    fn distance(&self, a: &str, b: &str) -> u32;
}

/// Levenshtein edit distance with a single rolling buffer
///
/// O(m * n) time, O(n) space where n is the length of the first argument.
#[derive(Debug, Clone, Copy, Default)]
pub struct Levenshtein;

impl Metric for Levenshtein {
    fn distance(&self, a: &str, b: &str) -> u32 {
        levenshtein(a, b)
    }
}

/// Edit distance between two strings, over chars rather than bytes
pub fn levenshtein(a: &str, b: &str) -> u32 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let n = a_chars.len();
    let m = b_chars.len();

    if n == 0 {
        return m as u32;
    }
    if m == 0 {
        return n as u32;
    }

    // buffer[j] holds the cell above the one being computed; left and
    // diagonal carry the rest of the classic DP row.
    let mut buffer: Vec<u32> = (0..=n as u32).collect();

    for i in 1..=m {
        let mut left = i as u32;
        let mut diagonal = (i - 1) as u32;

        for j in 1..=n {
            let up = buffer[j];
            let cost = if b_chars[i - 1] != a_chars[j - 1] { 1 } else { 0 };
            buffer[j] = (up + 1).min(left + 1).min(diagonal + cost);
            left = buffer[j];
            diagonal = up;
        }
    }

    buffer[n]
}
