//! Normalized string similarity on a 0–100 scale.
//!
//! Window scores come from `rapidfuzz` (bit-parallel indel similarity).
//! `partial_ratio` is the best `ratio` of the shorter string against every
//! equally long window of the longer one, including windows clipped at
//! either end.

use rapidfuzz::fuzz;

/// Indel similarity of two strings, 0–100.
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    100.0 * fuzz::ratio(a.chars(), b.chars())
}

/// Best [`ratio`] of the shorter string against any window of the longer.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    partial_ratio_cutoff(a, b, 0.0).unwrap_or(0.0)
}

/// [`partial_ratio`], or `None` when no window reaches `cutoff`.
///
/// Each window is scored with the running best as its floor, so windows
/// that cannot improve on it are rejected without a full comparison.
pub fn partial_ratio_cutoff(a: &str, b: &str, cutoff: f64) -> Option<f64> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return (cutoff <= 0.0).then_some(0.0);
    }
    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    let m = short.len();
    let n = long.len();

    let mut best: Option<f64> = None;
    let score = |window: &[char], best: &mut Option<f64>| {
        let floor = best.unwrap_or(cutoff) / 100.0;
        let args = fuzz::Args::default().score_cutoff(floor);
        if let Some(s) = fuzz::ratio_with_args(short.iter().copied(), window.iter().copied(), &args) {
            let s = 100.0 * s;
            if best.is_none_or(|b| s > b) {
                *best = Some(s);
            }
        }
    };

    for start in 0..=(n - m) {
        score(&long[start..start + m], &mut best);
        if best.is_some_and(|b| b >= 100.0) {
            return Some(100.0);
        }
    }
    for k in 1..m {
        score(&long[..k], &mut best);
        score(&long[n - k..], &mut best);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn ratio_basics() {
        assert!(close(ratio("abc", "abc"), 100.0));
        assert!(close(ratio("abc", "xyz"), 0.0));
        // Two indel edits over eight chars.
        assert!(close(ratio("abcd", "abed"), 75.0));
        assert!(close(ratio("", ""), 100.0));
    }

    #[test]
    fn partial_ratio_finds_embedded_substring() {
        assert!(close(partial_ratio("sadewa", "/v/2025/10/01/ekonomi/purbaya-sadewa.md"), 100.0));
        // Argument order does not matter.
        assert!(close(partial_ratio("/v/x/sadewa.md", "sadewa"), 100.0));
    }

    #[test]
    fn partial_ratio_tolerates_separator_differences() {
        let score = partial_ratio(
            "purbaya yudhi sadewa",
            "/vault/2025/10/01/ekonomi/purbaya-yudhi-sadewa-janji-pertumbuhan.md",
        );
        // Two of twenty characters differ.
        assert!(close(score, 90.0), "{score}");
    }

    #[test]
    fn partial_ratio_is_case_sensitive() {
        assert!(partial_ratio("politik", "/v/POLITIK/x.md") < 50.0);
    }

    #[test]
    fn partial_ratio_uses_clipped_edge_windows() {
        // Only a prefix of the query overhangs the start of the candidate.
        let score = partial_ratio("xxabc", "abcqqqqqqq");
        assert!(close(score, ratio("xxabc", "abc")), "{score}");
    }

    #[test]
    fn partial_ratio_of_empty_is_zero() {
        assert!(close(partial_ratio("", "abc"), 0.0));
        assert!(close(partial_ratio("abc", ""), 0.0));
    }

    #[test]
    fn cutoff_rejects_weak_matches_and_keeps_the_best_score() {
        let path = "/vault/2025/10/01/ekonomi/purbaya-yudhi-sadewa-janji-pertumbuhan.md";
        let full = partial_ratio("purbaya yudhi sadewa", path);
        let cut = partial_ratio_cutoff("purbaya yudhi sadewa", path, 75.0).unwrap();
        assert!(close(full, cut), "{full} vs {cut}");
        assert_eq!(partial_ratio_cutoff("zzzzzzzz", path, 75.0), None);
    }

    #[test]
    fn query_longer_than_the_path_is_scored_against_path_windows() {
        let query = "pemerintah memangkas anggaran negara ".repeat(12);
        let path = "/v/2025/03/23/politik/pemerintah-memangkas-anggaran.md";
        let score = partial_ratio(&query, path);
        assert!(score > 0.0 && score < 100.0, "{score}");
        assert_eq!(partial_ratio_cutoff(&query, path, 99.0), None);
    }
}
