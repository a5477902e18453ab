//! Recommendation scenarios over a small animal-themed curriculum:
//!
//!   dog, cat, bird, fish          (beginner roots)
//!   rabbit   <- cat, fish         (intermediate)
//!   squirrel <- bird, cat         (intermediate)
//!   horse    <- dog               (intermediate)
//!   cow      <- horse             (intermediate)
//!   hedgehog <- rabbit, squirrel  (advanced)
//!   fox      <- squirrel, hedgehog (advanced)

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use learningtoy_backend::core::recommend::{recommend_next, CatalogWord, DEFAULT_LIMIT};
use learningtoy_backend::core::types::{Difficulty, ProgressStatus};

struct Curriculum {
    words: Vec<CatalogWord>,
    edges: Vec<(Uuid, Uuid)>,
    by_name: HashMap<&'static str, Uuid>,
}

fn curriculum() -> Curriculum {
    let names: [(&str, Difficulty); 10] = [
        ("dog", Difficulty::Beginner),
        ("cat", Difficulty::Beginner),
        ("bird", Difficulty::Beginner),
        ("fish", Difficulty::Beginner),
        ("rabbit", Difficulty::Intermediate),
        ("squirrel", Difficulty::Intermediate),
        ("horse", Difficulty::Intermediate),
        ("cow", Difficulty::Intermediate),
        ("hedgehog", Difficulty::Advanced),
        ("fox", Difficulty::Advanced),
    ];

    let mut by_name = HashMap::new();
    let mut words = Vec::new();
    for (order, (name, difficulty)) in names.iter().enumerate() {
        let id = Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes());
        by_name.insert(*name, id);
        words.push(CatalogWord {
            id,
            difficulty: *difficulty,
            sort_order: order as i32 + 1,
            is_active: true,
        });
    }

    let prereqs: [(&str, &[&str]); 6] = [
        ("rabbit", &["cat", "fish"]),
        ("squirrel", &["bird", "cat"]),
        ("horse", &["dog"]),
        ("cow", &["horse"]),
        ("hedgehog", &["rabbit", "squirrel"]),
        ("fox", &["squirrel", "hedgehog"]),
    ];

    let mut edges = Vec::new();
    for (word, list) in prereqs {
        for prereq in list {
            edges.push((by_name[word], by_name[prereq]));
        }
    }

    Curriculum {
        words,
        edges,
        by_name,
    }
}

fn mastered(curriculum: &Curriculum, names: &[&str]) -> HashSet<Uuid> {
    names.iter().map(|name| curriculum.by_name[name]).collect()
}

#[test]
fn fresh_learner_only_sees_roots() {
    let c = curriculum();
    let out = recommend_next(
        &c.words,
        &c.edges,
        &HashSet::new(),
        &HashMap::new(),
        DEFAULT_LIMIT,
    )
    .unwrap();

    let roots = mastered(&c, &["dog", "cat", "bird", "fish"]);
    assert_eq!(out.len(), 4);
    assert!(out.iter().all(|r| roots.contains(&r.word_id)));
    assert!(out.iter().all(|r| r.status == ProgressStatus::Unlocked));
}

#[test]
fn root_ranking_follows_unlock_counts() {
    // cat unlocks rabbit and squirrel (120); dog unlocks horse, bird unlocks
    // squirrel, fish unlocks rabbit (110 each, sort order breaks the ties).
    let c = curriculum();
    let out = recommend_next(
        &c.words,
        &c.edges,
        &HashSet::new(),
        &HashMap::new(),
        DEFAULT_LIMIT,
    )
    .unwrap();

    assert_eq!(out[0].word_id, c.by_name["cat"]);
    assert_eq!(out[0].score, 120);
    assert_eq!(out[1].word_id, c.by_name["dog"]);
    assert_eq!(out[2].word_id, c.by_name["bird"]);
    assert_eq!(out[3].word_id, c.by_name["fish"]);
}

#[test]
fn mastering_roots_unlocks_the_next_tier() {
    let c = curriculum();
    let done = mastered(&c, &["cat", "fish"]);
    let out = recommend_next(&c.words, &c.edges, &done, &HashMap::new(), DEFAULT_LIMIT).unwrap();

    let ids: Vec<Uuid> = out.iter().map(|r| r.word_id).collect();
    assert!(ids.contains(&c.by_name["rabbit"]));
    // squirrel still needs bird; hedgehog still needs both intermediates.
    assert!(!ids.contains(&c.by_name["squirrel"]));
    assert!(!ids.contains(&c.by_name["hedgehog"]));
}

#[test]
fn partially_met_prerequisites_do_not_unlock() {
    let c = curriculum();
    let done = mastered(&c, &["cat"]);
    let out = recommend_next(&c.words, &c.edges, &done, &HashMap::new(), DEFAULT_LIMIT).unwrap();

    let ids: Vec<Uuid> = out.iter().map(|r| r.word_id).collect();
    assert!(!ids.contains(&c.by_name["rabbit"]));
    assert!(!ids.contains(&c.by_name["squirrel"]));
}

#[test]
fn progress_status_is_carried_through() {
    let c = curriculum();
    let progress = HashMap::from([
        (c.by_name["dog"], ProgressStatus::Practicing),
        (c.by_name["cat"], ProgressStatus::InProgress),
    ]);
    let out = recommend_next(&c.words, &c.edges, &HashSet::new(), &progress, DEFAULT_LIMIT)
        .unwrap();

    let status_of = |name: &str| {
        out.iter()
            .find(|r| r.word_id == c.by_name[name])
            .map(|r| r.status)
    };
    assert_eq!(status_of("dog"), Some(ProgressStatus::Practicing));
    assert_eq!(status_of("cat"), Some(ProgressStatus::InProgress));
    assert_eq!(status_of("bird"), Some(ProgressStatus::Unlocked));
}

#[test]
fn whole_curriculum_mastered_gives_empty_list() {
    let c = curriculum();
    let everything: HashSet<Uuid> = c.words.iter().map(|w| w.id).collect();
    let out = recommend_next(
        &c.words,
        &c.edges,
        &everything,
        &HashMap::new(),
        DEFAULT_LIMIT,
    )
    .unwrap();
    assert!(out.is_empty());
}

#[test]
fn foreign_edge_is_rejected_not_ignored() {
    let c = curriculum();
    let mut edges = c.edges.clone();
    edges.push((
        c.by_name["fox"],
        Uuid::new_v5(&Uuid::NAMESPACE_OID, b"another-domain-word"),
    ));
    assert!(recommend_next(
        &c.words,
        &edges,
        &HashSet::new(),
        &HashMap::new(),
        DEFAULT_LIMIT
    )
    .is_err());
}

#[test]
fn limit_one_returns_single_best() {
    let c = curriculum();
    let out = recommend_next(&c.words, &c.edges, &HashSet::new(), &HashMap::new(), 1).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].word_id, c.by_name["cat"]);
}
