//! Preference ordering.
//!
//! Quality alone does not capture RFC 2616 specificity: at equal quality an
//! exact type outranks `type/*`, which outranks `*/*`. Remaining ties fall
//! back to header position so the result is deterministic.

use crate::types::PreferenceEntry;
use std::cmp::Ordering;

/// Compare two entries by rank. `Less` means `a` is preferred.
pub fn compare_entries(a: &PreferenceEntry, b: &PreferenceEntry) -> Ordering {
    rank_quality(b.quality)
        .total_cmp(&rank_quality(a.quality))
        .then_with(|| a.is_catch_all().cmp(&b.is_catch_all()))
        .then_with(|| a.is_wildcard_subtype().cmp(&b.is_wildcard_subtype()))
        .then_with(|| a.index.cmp(&b.index))
}

// NaN ranks below every real quality; -0.0 and 0.0 rank together.
fn rank_quality(quality: f64) -> f64 {
    if quality.is_nan() {
        f64::NEG_INFINITY
    } else {
        quality + 0.0
    }
}

/// Return the entries in preference order. The input is left untouched.
///
/// # Example
///
/// ```
/// use parley_negotiation::{parse_header, sort_entries};
///
/// let ranked = sort_entries(&parse_header("*/*, text/*, text/html"));
/// let values: Vec<&str> = ranked.iter().map(|e| e.value.as_str()).collect();
/// assert_eq!(values, ["text/html", "text/*", "*/*"]);
/// ```
pub fn sort_entries(entries: &[PreferenceEntry]) -> Vec<PreferenceEntry> {
    let mut ranked = entries.to_vec();
    ranked.sort_by(compare_entries);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_header;

    fn values(entries: &[PreferenceEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.value.as_str()).collect()
    }

    #[test]
    fn test_quality_descending() {
        let ranked = sort_entries(&parse_header("a/a;q=0.2,b/b;q=0.9,c/c"));
        assert_eq!(values(&ranked), vec!["c/c", "b/b", "a/a"]);
    }

    #[test]
    fn test_wildcards_after_exact_at_equal_quality() {
        let ranked = sort_entries(&parse_header("image/*;q=0.6,*/*;q=0.6,image/jpeg;q=0.6"));
        assert_eq!(values(&ranked), vec!["image/jpeg", "image/*", "*/*"]);
    }

    #[test]
    fn test_quality_beats_specificity() {
        let ranked = sort_entries(&parse_header("text/html;q=0.5,*/*"));
        assert_eq!(values(&ranked), vec!["*/*", "text/html"]);
    }

    #[test]
    fn test_ties_keep_header_order() {
        let ranked = sort_entries(&parse_header("text/*,image/*,application/json,text/html"));
        assert_eq!(
            values(&ranked),
            vec!["application/json", "text/html", "text/*", "image/*"]
        );
    }

    #[test]
    fn test_catch_all_entries_keep_header_order() {
        let ranked = sort_entries(&parse_header("*/*;a=1,*/*;a=2"));
        assert_eq!(ranked[0].index, 0);
        assert_eq!(ranked[1].index, 1);
    }

    #[test]
    fn test_sort_does_not_mutate_input() {
        let entries = parse_header("*/*,text/html");
        let ranked = sort_entries(&entries);
        assert_eq!(entries[0].value, "*/*");
        assert_eq!(ranked[0].value, "text/html");
        assert_eq!(ranked[0].index, 1);
    }

    #[test]
    fn test_compare_is_antisymmetric_for_wildcards() {
        let exact = PreferenceEntry::new("text/html", 5);
        let wildcard = PreferenceEntry::new("text/*", 0);
        assert_eq!(compare_entries(&exact, &wildcard), Ordering::Less);
        assert_eq!(compare_entries(&wildcard, &exact), Ordering::Greater);
    }

    #[test]
    fn test_nan_quality_ranks_last() {
        let entries: Vec<PreferenceEntry> = (0..40)
            .map(|i| {
                let entry = PreferenceEntry::new(format!("type/sub{i}"), i);
                if i % 3 == 0 {
                    entry.with_quality(f64::NAN)
                } else {
                    entry.with_quality((i % 5) as f64 / 5.0)
                }
            })
            .collect();

        let ranked = sort_entries(&entries);
        assert_eq!(ranked.len(), 40);
        assert!(ranked[..26].iter().all(|e| !e.quality.is_nan()));
        assert!(ranked[26..].iter().all(|e| e.quality.is_nan()));

        let indices: Vec<usize> = ranked.iter().map(|e| e.index).collect();
        let resorted: Vec<usize> = sort_entries(&ranked).iter().map(|e| e.index).collect();
        assert_eq!(indices, resorted);
    }

    #[test]
    fn test_negative_zero_ties_with_zero() {
        let a = PreferenceEntry::new("a/a", 0).with_quality(-0.0);
        let b = PreferenceEntry::new("b/b", 1).with_quality(0.0);
        assert_eq!(compare_entries(&a, &b), Ordering::Less);
        assert_eq!(compare_entries(&b, &a), Ordering::Greater);
    }
}
