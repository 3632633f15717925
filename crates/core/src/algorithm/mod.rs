//! Sequence algorithms
//!
//! Longest common subsequence over token texts (used by both the oversized
//! edit splitter and the diff highlighter) and character-level edit distance
//! (used by the approximate locator).
pub mod levenshtein;

/// Compute the longest common subsequence of `original` and `modified`
///
/// Returns the matched index pairs in increasing order of both coordinates.
/// When several maximal alignments exist the walk goes forward from the left
/// and takes a match as soon as it is available; on a mismatch it advances
/// whichever side keeps the remaining achievable match count, preferring to
/// advance `original` on ties.
///
/// Time and memory are `O(n * m)`; callers bound the input size.
pub fn longest_common_subsequence<T: PartialEq>(original: &[T], modified: &[T]) -> Vec<(usize, usize)> {
    let n = original.len();
    let m = modified.len();

    if n == 0 || m == 0 {
        return Vec::new();
    }

    // dp[i][j] = LCS length of original[i..] and modified[j..]
    let width = m + 1;
    let mut dp = vec![0u32; (n + 1) * width];

    for i in (0..n).rev() {
        for j in (0..m).rev() {
            dp[i * width + j] = if original[i] == modified[j] {
                dp[(i + 1) * width + j + 1] + 1
            } else {
                dp[(i + 1) * width + j].max(dp[i * width + j + 1])
            };
        }
    }

    let mut lcs = Vec::with_capacity(dp[0] as usize);
    let mut i = 0;
    let mut j = 0;

    while i < n && j < m {
        if original[i] == modified[j] {
            lcs.push((i, j));
            i += 1;
            j += 1;
        } else if dp[(i + 1) * width + j] >= dp[i * width + j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }

    lcs
}
