//! Score layout serialization and the persistence contract.

pub mod layout;
pub mod store;

pub use layout::{replay_layout, serialize_layout, LetterPlacement};
pub use store::{MemoryScoreStore, ScoreRecord, ScoreStore, ScoreSubmission};
