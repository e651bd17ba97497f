//! Runs a trial end to end: fixed-step simulation, stillness evaluation,
//! stage machine updates, shake dispatch, and the submission handshake.

use crate::core::time::FixedTimestep;
use crate::scene::{LetterId, Role, TowerScene};
use crate::score::layout::serialize_layout;
use crate::score::store::ScoreSubmission;
use crate::trial::stability;
use crate::trial::stage::{StageEvent, StageMachine, TrialStage};
use crate::{Error, Result};

pub struct TrialSession {
    scene: TowerScene,
    machine: StageMachine,
    timestep: FixedTimestep,
    /// Simulation clock: fixed steps since trial start, in seconds.
    clock: f64,
    highest: Option<(LetterId, f32)>,
    submission_in_flight: bool,
}

impl TrialSession {
    pub fn new(scene: TowerScene) -> Self {
        let config = scene.config();
        let machine = StageMachine::new(
            config.min_seconds_stable as f64,
            config.shake_delay as f64,
        );
        let timestep = FixedTimestep::new(config.fixed_dt, config.max_substeps);
        Self {
            scene,
            machine,
            timestep,
            clock: 0.0,
            highest: None,
            submission_in_flight: false,
        }
    }

    pub fn scene(&self) -> &TowerScene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut TowerScene {
        &mut self.scene
    }

    pub fn stage(&self) -> TrialStage {
        self.machine.stage()
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Highest trial letter seen at the latest step.
    pub fn highest(&self) -> Option<(LetterId, f32)> {
        self.highest
    }

    /// Current tower height above the ground surface, if a trial runs.
    pub fn tower_height(&self) -> Option<f32> {
        self.highest
            .map(|(_, top)| stability::tower_height(top, self.scene.config()))
    }

    // -- Lifecycle --------------------------------------------------------

    pub fn start_trial(&mut self) -> Result<()> {
        if self.machine.is_running() {
            return Err(Error::TrialAlreadyRunning);
        }
        if !self.scene.has_manipulable_letters() {
            return Err(Error::NoLetters);
        }
        self.scene.start_trial()?;
        self.machine.start();
        self.timestep.reset();
        self.clock = 0.0;
        self.highest = None;
        Ok(())
    }

    /// Abandon the trial and return to arranging. Safe at any stage.
    pub fn stop_trial(&mut self) {
        self.scene.stop_trial();
        self.machine.reset();
        self.timestep.reset();
        self.clock = 0.0;
        self.highest = None;
        self.submission_in_flight = false;
    }

    /// Advance the session by one variable frame. Runs a bounded number of
    /// fixed steps; each one steps the world, evaluates stillness, updates
    /// the stage machine, and dispatches any shake it requests. Returned
    /// events let callers react (sounds, UI), the physics side effects have
    /// already been applied.
    pub fn advance(&mut self, frame_dt: f32) -> Vec<StageEvent> {
        let linear = self.scene.config().linear_speed_threshold;
        let angular = self.scene.config().angular_speed_threshold;
        let dt = self.timestep.dt();

        let mut events = Vec::new();
        for _ in 0..self.timestep.accumulate(frame_dt) {
            self.scene.step(dt);
            if !self.machine.is_running() {
                continue;
            }
            self.clock += dt as f64;
            let still = stability::all_still(&self.scene, linear, angular);
            if let Some(event) = self.machine.update(self.clock, still) {
                match event {
                    StageEvent::ShakeRequested => self.scene.apply_shake(),
                }
                events.push(event);
            }
            self.highest = stability::find_highest_point(&self.scene, Role::Trial);
        }
        events
    }

    // -- Submission handshake ---------------------------------------------

    pub fn can_submit(&self) -> bool {
        self.machine.submission_armed() && !self.submission_in_flight
    }

    /// Freeze the surviving layout into a submission. The slot stays armed
    /// until the caller reports the outcome, but only one submission may be
    /// in flight at a time.
    pub fn begin_submission(&mut self, player_name: &str) -> Result<ScoreSubmission> {
        if self.submission_in_flight {
            return Err(Error::SubmissionInFlight);
        }
        if !self.machine.submission_armed() {
            return Err(Error::SubmissionNotReady(self.machine.stage()));
        }
        let (_, top) =
            stability::find_highest_point(&self.scene, Role::Trial).ok_or(Error::NoLetters)?;
        let score = stability::tower_height(top, self.scene.config());
        let letters = serialize_layout(&self.scene);
        self.submission_in_flight = true;
        log::info!("submission started for {player_name}: score {score}");
        Ok(ScoreSubmission {
            player_name: player_name.to_owned(),
            score,
            letters,
        })
    }

    /// Report the submission outcome. Success consumes the slot; failure
    /// releases the guard so the same result can be submitted again.
    pub fn finish_submission(&mut self, success: bool) {
        if !self.submission_in_flight {
            log::warn!("finish_submission without one in flight");
            return;
        }
        self.submission_in_flight = false;
        if success {
            self.machine.take_submission_slot();
        } else {
            log::warn!("submission failed; slot stays armed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::letters::Letter;

    const FRAME: f32 = 1.0 / 60.0;

    fn session_with_letter() -> TrialSession {
        let mut scene = TowerScene::new(GameConfig::default());
        scene.add_letter_default(Letter::O).unwrap();
        TrialSession::new(scene)
    }

    /// Run frames until the session reaches `stage` or the time budget runs
    /// out, returning all events seen.
    fn run_until(session: &mut TrialSession, stage: TrialStage, budget_s: f32) -> Vec<StageEvent> {
        let mut events = Vec::new();
        let frames = (budget_s / FRAME) as usize;
        for _ in 0..frames {
            events.extend(session.advance(FRAME));
            if session.stage() == stage {
                break;
            }
        }
        events
    }

    #[test]
    fn start_requires_letters() {
        let scene = TowerScene::new(GameConfig::default());
        let mut session = TrialSession::new(scene);
        assert!(matches!(session.start_trial(), Err(Error::NoLetters)));
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut session = session_with_letter();
        session.start_trial().unwrap();
        assert!(matches!(
            session.start_trial(),
            Err(Error::TrialAlreadyRunning)
        ));
    }

    #[test]
    fn stop_allows_restart() {
        let mut session = session_with_letter();
        session.start_trial().unwrap();
        session.stop_trial();
        assert_eq!(session.stage(), TrialStage::NotStarted);
        session.start_trial().unwrap();
    }

    #[test]
    fn settling_letter_reaches_stable_after_gravity() {
        let mut session = session_with_letter();
        session.start_trial().unwrap();
        run_until(&mut session, TrialStage::StableAfterGravity, 20.0);
        assert_eq!(session.stage(), TrialStage::StableAfterGravity);
        assert!(session.tower_height().unwrap() > 0.5);
    }

    #[test]
    fn debounce_takes_three_simulated_seconds() {
        let mut session = session_with_letter();
        session.start_trial().unwrap();

        // Track the latest entry into the still stage; a bounce during
        // settling restarts the debounce window.
        let mut still_at = None;
        let mut prev = session.stage();
        for _ in 0..(20.0 / FRAME) as usize {
            session.advance(FRAME);
            let stage = session.stage();
            if stage == TrialStage::LettersStillAfterGravity
                && prev != TrialStage::LettersStillAfterGravity
            {
                still_at = Some(session.clock());
            }
            if stage == TrialStage::StableAfterGravity {
                break;
            }
            prev = stage;
        }
        assert_eq!(session.stage(), TrialStage::StableAfterGravity);
        let waited = session.clock() - still_at.expect("still stage was entered");
        assert!(
            (waited - 3.0).abs() < 0.05,
            "debounce took {waited}s, expected ~3s"
        );
    }

    #[test]
    fn full_trial_survives_the_earthquake() {
        let mut session = session_with_letter();
        session.start_trial().unwrap();
        let events = run_until(&mut session, TrialStage::StableAfterEarthquake, 60.0);
        assert_eq!(session.stage(), TrialStage::StableAfterEarthquake);
        let shakes = events
            .iter()
            .filter(|e| **e == StageEvent::ShakeRequested)
            .count();
        assert_eq!(shakes, 1, "exactly one shake per trial");
        assert!(session.can_submit());
    }

    #[test]
    fn shake_event_kicks_the_ground() {
        let mut session = session_with_letter();
        session.start_trial().unwrap();
        let push = session.scene().config().push_velocity;
        let frames = (20.0 / FRAME) as usize;
        for _ in 0..frames {
            let events = session.advance(FRAME);
            if events.contains(&StageEvent::ShakeRequested) {
                let vel = session.scene().ground_velocity();
                assert!((vel.x - push).abs() < 1e-4, "ground vx={}", vel.x);
                return;
            }
        }
        panic!("shake never fired");
    }

    #[test]
    fn submission_handshake_guards_and_rearming() {
        let mut session = session_with_letter();
        session.start_trial().unwrap();
        run_until(&mut session, TrialStage::StableAfterEarthquake, 60.0);
        assert!(session.can_submit());

        let submission = session.begin_submission("ada").unwrap();
        assert_eq!(submission.player_name, "ada");
        assert!(submission.score > 0.0);
        assert_eq!(submission.letters.len(), 1);

        // One in flight at a time.
        assert!(!session.can_submit());
        assert!(matches!(
            session.begin_submission("ada"),
            Err(Error::SubmissionInFlight)
        ));

        // Failure releases the guard without consuming the slot.
        session.finish_submission(false);
        assert!(session.can_submit());

        // Success consumes the slot.
        let _ = session.begin_submission("ada").unwrap();
        session.finish_submission(true);
        assert!(!session.can_submit());
        assert!(matches!(
            session.begin_submission("ada"),
            Err(Error::SubmissionNotReady(TrialStage::StableAfterEarthquake))
        ));
    }

    #[test]
    fn submission_before_stable_is_rejected() {
        let mut session = session_with_letter();
        session.start_trial().unwrap();
        assert!(matches!(
            session.begin_submission("ada"),
            Err(Error::SubmissionNotReady(TrialStage::AppliedGravity))
        ));
    }
}
