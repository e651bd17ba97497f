//! Trial orchestration: stability measurement, the gravity/earthquake
//! stage machine, and the session loop tying them to the scene.

pub mod session;
pub mod stability;
pub mod stage;

pub use session::TrialSession;
pub use stage::{StageEvent, StageMachine, TrialStage};
