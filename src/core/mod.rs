//! Curriculum graph and mastery-progress engine.
//!
//! Pure computation over snapshots the caller supplies: no I/O, no clock reads,
//! no shared state. Routes feed it rows from the database and timestamps from
//! their own clock, keeping every entry point deterministic and testable.

pub mod graph;
pub mod mastery;
pub mod recommend;
pub mod types;

pub use graph::{compute_depths, levels, DomainGraph, GraphError};
pub use mastery::{apply_attempt, ProgressState};
pub use recommend::{recommend_next, CatalogWord, Recommendation};
pub use types::{Difficulty, ProgressStatus};
