//! Weighted approximate string matching.
//!
//! Shared by project search, the command palette, and the FAQ chat stub.
//!
//! # Scoring
//!
//! For one field value, the score is the smallest edit distance between the
//! lowercased query and *any substring* of the lowercased value, divided by
//! the query length and clamped to `[0, 1]`. `0.0` is an exact substring hit.
//! A field matches when its best value scores at or below the threshold.
//!
//! An item matches when at least one field matches. Its score is the product
//! over matched fields of `max(score, ε) ^ weight`, with weights normalized
//! to sum to 1, so hits on heavily weighted fields produce lower (better)
//! scores. Results are ordered by ascending score; ties keep input order.

/// Floor applied to perfect field scores so the weight still matters.
const SCORE_FLOOR: f64 = 1e-6;

/// A weighted, threshold-gated fuzzy matcher over a fixed list of fields.
#[derive(Debug, Clone)]
pub struct Matcher {
    names: Vec<&'static str>,
    weights: Vec<f64>,
    threshold: f64,
}

/// Outcome of matching one item.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    pub index: usize,
    pub score: f64,
    pub fields: Vec<&'static str>,
}

impl Matcher {
    /// `fields` are `(name, weight)` pairs; weights are normalized.
    pub fn new(fields: &[(&'static str, f64)], threshold: f64) -> Self {
        let total: f64 = fields.iter().map(|(_, w)| w.max(0.0)).sum();
        let weights = fields
            .iter()
            .map(|(_, w)| {
                if total > 0.0 {
                    w.max(0.0) / total
                } else {
                    1.0 / fields.len() as f64
                }
            })
            .collect();
        Self {
            names: fields.iter().map(|(n, _)| *n).collect(),
            weights,
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Scores one item. `values[i]` holds the values of field `i` (a field
    /// may be multi-valued, like a tag list). `None` when nothing matches.
    pub fn score_item(&self, query: &str, values: &[Vec<&str>]) -> Option<(f64, Vec<&'static str>)> {
        let pattern: Vec<char> = query.trim().to_lowercase().chars().collect();
        if pattern.is_empty() {
            return None;
        }

        let mut total = 1.0;
        let mut matched = Vec::new();

        for (i, field_values) in values.iter().enumerate().take(self.names.len()) {
            let best = field_values
                .iter()
                .map(|v| substring_score(&pattern, v))
                .fold(f64::INFINITY, f64::min);

            if best <= self.threshold {
                total *= best.max(SCORE_FLOOR).powf(self.weights[i]);
                matched.push(self.names[i]);
            }
        }

        if matched.is_empty() {
            None
        } else {
            Some((total, matched))
        }
    }

    /// Matches every item and returns hits ordered best-first (stable).
    pub fn search<'a, T, F>(&self, items: &'a [T], query: &str, extract: F) -> Vec<FuzzyMatch>
    where
        F: Fn(&'a T) -> Vec<Vec<&'a str>>,
    {
        let mut hits: Vec<FuzzyMatch> = items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                self.score_item(query, &extract(item))
                    .map(|(score, fields)| FuzzyMatch {
                        index,
                        score,
                        fields,
                    })
            })
            .collect();

        hits.sort_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits
    }
}

/// Normalized best approximate-substring distance of `pattern` within `text`.
pub fn substring_score(pattern: &[char], text: &str) -> f64 {
    if pattern.is_empty() {
        return 0.0;
    }
    let text: Vec<char> = text.to_lowercase().chars().collect();
    let m = pattern.len();

    // Column-wise DP where the match may start anywhere in `text`:
    // row 0 is all zeros, and the answer is the minimum of the last row.
    let mut prev: Vec<usize> = (0..=m).collect();
    let mut best = prev[m];
    let mut curr = vec![0usize; m + 1];

    for &tc in &text {
        curr[0] = 0;
        for i in 1..=m {
            let cost = if pattern[i - 1] == tc { 0 } else { 1 };
            curr[i] = (prev[i - 1] + cost).min(prev[i] + 1).min(curr[i - 1] + 1);
        }
        best = best.min(curr[m]);
        std::mem::swap(&mut prev, &mut curr);
    }

    (best as f64 / m as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_exact_substring_scores_zero() {
        assert_eq!(substring_score(&chars("burp"), "Burp Suite automation"), 0.0);
    }

    #[test]
    fn test_single_typo() {
        let score = substring_score(&chars("phishng"), "Phishing detection");
        assert!(score > 0.0 && score <= 0.2, "score was {}", score);
    }

    #[test]
    fn test_unrelated_text_scores_high() {
        let score = substring_score(&chars("kubernetes"), "mobile app");
        assert!(score > 0.5, "score was {}", score);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(substring_score(&chars("abc"), ""), 1.0);
    }

    #[test]
    fn test_weighted_fields_prefer_title() {
        let matcher = Matcher::new(&[("title", 0.7), ("body", 0.3)], 0.4);
        let items = vec![("other", "network scanner"), ("scanner", "something else")];
        let hits = matcher.search(&items, "scanner", |(t, b)| vec![vec![*t], vec![*b]]);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].index, 1);
        assert_eq!(hits[0].fields, vec!["title"]);
    }

    #[test]
    fn test_below_threshold_excluded() {
        let matcher = Matcher::new(&[("label", 1.0)], 0.3);
        let items = vec!["Contact", "FAQ"];
        let hits = matcher.search(&items, "contact", |s| vec![vec![*s]]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 0);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let matcher = Matcher::new(&[("label", 1.0)], 0.4);
        let items = vec!["alpha one", "alpha two", "alpha three"];
        let hits = matcher.search(&items, "alpha", |s| vec![vec![*s]]);
        let order: Vec<usize> = hits.iter().map(|h| h.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }
}
