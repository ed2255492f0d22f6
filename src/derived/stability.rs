use std::collections::HashSet;

use crate::listening::Artist;

fn id_set(artists: &[Artist]) -> HashSet<&str> {
    artists.iter().map(|a| a.id.as_str()).collect()
}

/// Jaccard overlap of the artist ids across the three listening windows.
///
/// `1.0` means the same artists dominate every window, `0.0` means no artist
/// appears in all three (or there are no artists at all).
pub fn compute_stability_score(short: &[Artist], medium: &[Artist], long: &[Artist]) -> f64 {
    let short_ids = id_set(short);
    let medium_ids = id_set(medium);
    let long_ids = id_set(long);

    let union: HashSet<&str> = short_ids
        .iter()
        .chain(medium_ids.iter())
        .chain(long_ids.iter())
        .copied()
        .collect();
    if union.is_empty() {
        return 0.0;
    }

    let intersection = short_ids
        .iter()
        .filter(|id| medium_ids.contains(*id) && long_ids.contains(*id))
        .count();

    intersection as f64 / union.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artists(ids: &[&str]) -> Vec<Artist> {
        ids.iter().map(|id| Artist::new(*id, *id, &[])).collect()
    }

    #[test]
    fn identical_windows_are_fully_stable() {
        let a = artists(&["a1", "a2"]);
        assert_eq!(compute_stability_score(&a, &a, &a), 1.0);
    }

    #[test]
    fn empty_windows_score_zero() {
        assert_eq!(compute_stability_score(&[], &[], &[]), 0.0);
    }

    #[test]
    fn partial_overlap() {
        let short = artists(&["a1", "a2"]);
        let medium = artists(&["a1", "a2", "a3"]);
        let long = artists(&["a2", "a3"]);
        assert_eq!(compute_stability_score(&short, &medium, &long), 1.0 / 3.0);
    }

    #[test]
    fn argument_order_does_not_matter() {
        let x = artists(&["a1", "a2", "a4"]);
        let y = artists(&["a1", "a3"]);
        let z = artists(&["a1", "a2", "a3"]);
        let expected = compute_stability_score(&x, &y, &z);
        assert_eq!(compute_stability_score(&y, &z, &x), expected);
        assert_eq!(compute_stability_score(&z, &x, &y), expected);
        assert_eq!(compute_stability_score(&x, &z, &y), expected);
    }

    #[test]
    fn duplicate_ids_within_a_window_count_once() {
        let a = artists(&["a1", "a1"]);
        assert_eq!(compute_stability_score(&a, &a, &a), 1.0);
    }
}
