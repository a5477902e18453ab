//! Next-word selection: eligibility plus a deterministic multi-factor ranking.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::core::graph::{DomainGraph, GraphError};
use crate::core::types::{Difficulty, ProgressStatus};

pub const DEFAULT_LIMIT: usize = 5;
/// Score bonus per word a candidate unlocks.
const UNLOCK_BONUS: i64 = 10;

/// Catalog entry for ranking: the word fields the engine needs, nothing more.
#[derive(Debug, Clone)]
pub struct CatalogWord {
    pub id: Uuid,
    pub difficulty: Difficulty,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub word_id: Uuid,
    pub status: ProgressStatus,
    pub difficulty: Difficulty,
    pub score: i64,
}

/// Ranks the words a learner should attempt next.
///
/// A word is a candidate iff it is active, not already mastered, and every one
/// of its prerequisites is mastered (none means always eligible). Candidates
/// are scored `difficulty.weight() + 10 * unlock_count` and sorted by score
/// descending; ties break on ascending sort order, then ascending word id, so
/// the ranking is stable across calls. An empty result is a normal outcome.
pub fn recommend_next(
    words: &[CatalogWord],
    edges: &[(Uuid, Uuid)],
    mastered: &HashSet<Uuid>,
    progress: &HashMap<Uuid, ProgressStatus>,
    limit: usize,
) -> Result<Vec<Recommendation>, GraphError> {
    let ids: Vec<Uuid> = words.iter().map(|w| w.id).collect();
    let graph = DomainGraph::new(&ids, edges)?;

    let active: HashSet<Uuid> = words
        .iter()
        .filter(|w| w.is_active)
        .map(|w| w.id)
        .collect();

    let mut candidates: Vec<(&CatalogWord, i64)> = Vec::new();
    for word in words {
        if !word.is_active || mastered.contains(&word.id) {
            continue;
        }
        // An inactive, unmastered prerequisite still blocks its dependents.
        if !graph.prerequisites_of(word.id).all(|p| mastered.contains(&p)) {
            continue;
        }

        // Only learnable (active) dependents count toward the unlock bonus.
        let unlock_count = graph
            .dependents_of(word.id)
            .filter(|d| active.contains(d))
            .count();
        let score = word.difficulty.weight() + UNLOCK_BONUS * unlock_count as i64;
        candidates.push((word, score));
    }

    candidates.sort_by(|(a, score_a), (b, score_b)| {
        score_b
            .cmp(score_a)
            .then(a.sort_order.cmp(&b.sort_order))
            .then(a.id.cmp(&b.id))
    });

    Ok(candidates
        .into_iter()
        .take(limit)
        .map(|(word, score)| Recommendation {
            word_id: word.id,
            status: progress
                .get(&word.id)
                .copied()
                .unwrap_or(ProgressStatus::Unlocked),
            difficulty: word.difficulty,
            score,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(n: u32, difficulty: Difficulty, sort_order: i32) -> CatalogWord {
        CatalogWord {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("cw{n}").as_bytes()),
            difficulty,
            sort_order,
            is_active: true,
        }
    }

    #[test]
    fn test_no_prerequisites_is_eligible() {
        let words = [word(0, Difficulty::Beginner, 1)];
        let out = recommend_next(
            &words,
            &[],
            &HashSet::new(),
            &HashMap::new(),
            DEFAULT_LIMIT,
        )
        .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].status, ProgressStatus::Unlocked);
        assert_eq!(out[0].score, 100);
    }

    #[test]
    fn test_partial_prerequisites_not_candidate() {
        // x requires a and b; only a is mastered.
        let a = word(0, Difficulty::Beginner, 1);
        let b = word(1, Difficulty::Beginner, 2);
        let x = word(2, Difficulty::Intermediate, 3);
        let edges = [(x.id, a.id), (x.id, b.id)];
        let mastered = HashSet::from([a.id]);

        let words = [a.clone(), b.clone(), x.clone()];
        let out =
            recommend_next(&words, &edges, &mastered, &HashMap::new(), DEFAULT_LIMIT).unwrap();
        assert!(out.iter().all(|r| r.word_id != x.id));
        assert!(out.iter().any(|r| r.word_id == b.id));
    }

    #[test]
    fn test_mastered_words_excluded() {
        let a = word(0, Difficulty::Beginner, 1);
        let mastered = HashSet::from([a.id]);
        let out = recommend_next(
            &[a],
            &[],
            &mastered,
            &HashMap::new(),
            DEFAULT_LIMIT,
        )
        .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_inactive_words_excluded() {
        let mut a = word(0, Difficulty::Beginner, 1);
        a.is_active = false;
        let out = recommend_next(
            &[a],
            &[],
            &HashSet::new(),
            &HashMap::new(),
            DEFAULT_LIMIT,
        )
        .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_unlock_count_can_beat_difficulty_tier() {
        // Intermediate unlocking six words (50 + 60 = 110) outranks a beginner
        // leaf (100).
        let beginner = word(0, Difficulty::Beginner, 1);
        let hub = word(1, Difficulty::Intermediate, 2);
        let dependents: Vec<CatalogWord> = (2..8)
            .map(|n| word(n, Difficulty::Advanced, n as i32))
            .collect();
        let edges: Vec<(Uuid, Uuid)> = dependents.iter().map(|d| (d.id, hub.id)).collect();

        let mut words = vec![beginner.clone(), hub.clone()];
        words.extend(dependents);
        let out =
            recommend_next(&words, &edges, &HashSet::new(), &HashMap::new(), 2).unwrap();
        assert_eq!(out[0].word_id, hub.id);
        assert_eq!(out[0].score, 110);
        assert_eq!(out[1].word_id, beginner.id);
        assert_eq!(out[1].score, 100);
    }

    #[test]
    fn test_tiebreak_is_sort_order_then_id() {
        let mut first = word(0, Difficulty::Beginner, 2);
        let mut second = word(1, Difficulty::Beginner, 1);
        // Same score; lower sort order wins regardless of slice order.
        let out = recommend_next(
            &[first.clone(), second.clone()],
            &[],
            &HashSet::new(),
            &HashMap::new(),
            DEFAULT_LIMIT,
        )
        .unwrap();
        assert_eq!(out[0].word_id, second.id);

        // Equal sort order falls back to id ordering.
        first.sort_order = 1;
        second.sort_order = 1;
        let out = recommend_next(
            &[first.clone(), second.clone()],
            &[],
            &HashSet::new(),
            &HashMap::new(),
            DEFAULT_LIMIT,
        )
        .unwrap();
        let expected_first = if first.id < second.id { first.id } else { second.id };
        assert_eq!(out[0].word_id, expected_first);
    }

    #[test]
    fn test_inactive_prerequisite_still_blocks() {
        let mut prereq = word(0, Difficulty::Beginner, 1);
        prereq.is_active = false;
        let dependent = word(1, Difficulty::Beginner, 2);
        let edges = [(dependent.id, prereq.id)];
        let out = recommend_next(
            &[prereq, dependent],
            &edges,
            &HashSet::new(),
            &HashMap::new(),
            DEFAULT_LIMIT,
        )
        .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_inactive_dependents_add_no_bonus() {
        let hub = word(0, Difficulty::Beginner, 1);
        let mut dormant = word(1, Difficulty::Advanced, 2);
        dormant.is_active = false;
        let edges = [(dormant.id, hub.id)];
        let out = recommend_next(
            &[hub.clone(), dormant],
            &edges,
            &HashSet::new(),
            &HashMap::new(),
            DEFAULT_LIMIT,
        )
        .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].word_id, hub.id);
        assert_eq!(out[0].score, 100);
    }

    #[test]
    fn test_limit_truncates() {
        let words: Vec<CatalogWord> = (0..8)
            .map(|n| word(n, Difficulty::Beginner, n as i32))
            .collect();
        let out = recommend_next(&words, &[], &HashSet::new(), &HashMap::new(), 3).unwrap();
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_status_reported_from_progress_map() {
        let a = word(0, Difficulty::Beginner, 1);
        let progress = HashMap::from([(a.id, ProgressStatus::Practicing)]);
        let out = recommend_next(
            &[a.clone()],
            &[],
            &HashSet::new(),
            &progress,
            DEFAULT_LIMIT,
        )
        .unwrap();
        assert_eq!(out[0].status, ProgressStatus::Practicing);
    }

    #[test]
    fn test_fully_mastered_domain_yields_empty() {
        let a = word(0, Difficulty::Beginner, 1);
        let b = word(1, Difficulty::Intermediate, 2);
        let edges = [(b.id, a.id)];
        let mastered = HashSet::from([a.id, b.id]);
        let out = recommend_next(
            &[a, b],
            &edges,
            &mastered,
            &HashMap::new(),
            DEFAULT_LIMIT,
        )
        .unwrap();
        assert!(out.is_empty());
    }
}
