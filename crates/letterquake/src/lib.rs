pub mod config;
pub mod core;
pub mod geometry;
pub mod letters;
pub mod scene;
pub mod score;
pub mod trial;

// Re-export key types at crate root for convenience
pub use config::GameConfig;
pub use core::physics::{
    BodyDesc, BodyId, BodyType, ColliderMaterial, PhysicsBody, PhysicsWorld, SpringDesc,
};
pub use core::time::FixedTimestep;
pub use geometry::decompose::decompose;
pub use geometry::polygon::Polygon;
pub use letters::builder::{
    build_fragments, compute_compound_center_of_mass, letter_scale, Fragment,
};
pub use letters::Letter;
pub use scene::{LetterEntry, LetterId, Role, TowerScene};
pub use score::layout::{replay_layout, serialize_layout, LetterPlacement};
pub use score::store::{MemoryScoreStore, ScoreRecord, ScoreStore, ScoreSubmission};
pub use trial::session::TrialSession;
pub use trial::stability::{all_still, find_highest_point, tower_height};
pub use trial::stage::{StageEvent, StageMachine, TrialStage};

use thiserror::Error;

/// Crate-wide error type. "Body not found" situations are deliberately not
/// errors — mid-simulation callbacks may outlive bodies, and those paths are
/// silent no-ops instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("letter has no outlines")]
    EmptyLetter,
    #[error("outline is degenerate (fewer than 3 usable vertices)")]
    DegenerateOutline,
    #[error("convex fragment rejected by the physics engine")]
    BadFragment,
    #[error("trial already running")]
    TrialAlreadyRunning,
    #[error("no letters placed")]
    NoLetters,
    #[error("submission not available in stage {0:?}")]
    SubmissionNotReady(trial::stage::TrialStage),
    #[error("a submission is already in flight")]
    SubmissionInFlight,
}

pub type Result<T> = std::result::Result<T, Error>;
