use std::collections::BTreeSet;

/// Jaccard index of two token sets: |A ∩ B| / |A ∪ B|.
///
/// Two empty sets score `blank_score`; callers pick whether blank questions
/// are considered identical (1.0) or unrelated (0.0).
pub fn jaccard_similarity(a: &BTreeSet<String>, b: &BTreeSet<String>, blank_score: f64) -> f64 {
    if a.is_empty() && b.is_empty() {
        return blank_score;
    }

    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn identical_sets_score_one() {
        let a = set(&["love", "future"]);
        assert_eq!(jaccard_similarity(&a, &a.clone(), 1.0), 1.0);
    }

    #[test]
    fn disjoint_sets_score_zero() {
        assert_eq!(
            jaccard_similarity(&set(&["love"]), &set(&["career"]), 1.0),
            0.0
        );
    }

    #[test]
    fn partial_overlap_is_symmetric() {
        let a = set(&["will", "get", "job"]);
        let b = set(&["will", "get", "promotion", "soon"]);
        let ab = jaccard_similarity(&a, &b, 1.0);
        assert_eq!(ab, jaccard_similarity(&b, &a, 1.0));
        assert!((ab - 2.0 / 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn one_empty_side_scores_zero() {
        assert_eq!(jaccard_similarity(&set(&[]), &set(&["love"]), 1.0), 0.0);
    }

    #[test]
    fn blank_pair_uses_blank_score() {
        assert_eq!(jaccard_similarity(&set(&[]), &set(&[]), 1.0), 1.0);
        assert_eq!(jaccard_similarity(&set(&[]), &set(&[]), 0.0), 0.0);
    }
}
