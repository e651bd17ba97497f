//! The trial stage machine. Driven once per fixed simulation step with the
//! simulation clock and the current stillness verdict; all debouncing is
//! expressed as deadlines against that clock, never host timers.

/// Stages of a trial, in forward order. The first half is the gravity
/// phase, the second half the earthquake phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TrialStage {
    NotStarted,
    AppliedGravity,
    LettersStillAfterGravity,
    StableAfterGravity,
    AppliedEarthquake,
    LettersStillAfterEarthquake,
    StableAfterEarthquake,
}

/// Side effect requested by a stage transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    /// Kick the ground platform. Emitted exactly once per forward entry
    /// into `AppliedEarthquake`.
    ShakeRequested,
}

pub struct StageMachine {
    stage: TrialStage,
    min_seconds_stable: f64,
    shake_delay: f64,
    /// When the current "letters still" observation matures into "stable".
    stable_deadline: Option<f64>,
    /// When the scheduled earthquake fires, set on entering
    /// `StableAfterGravity`.
    shake_at: Option<f64>,
    shake_pending: bool,
    submission_armed: bool,
}

impl StageMachine {
    pub fn new(min_seconds_stable: f64, shake_delay: f64) -> Self {
        Self {
            stage: TrialStage::NotStarted,
            min_seconds_stable,
            shake_delay,
            stable_deadline: None,
            shake_at: None,
            shake_pending: false,
            submission_armed: false,
        }
    }

    pub fn stage(&self) -> TrialStage {
        self.stage
    }

    pub fn is_running(&self) -> bool {
        self.stage != TrialStage::NotStarted
    }

    /// Begin a trial: gravity has just been applied.
    pub fn start(&mut self) {
        self.reset();
        self.stage = TrialStage::AppliedGravity;
    }

    /// Back to idle, all bookkeeping cleared.
    pub fn reset(&mut self) {
        self.stage = TrialStage::NotStarted;
        self.stable_deadline = None;
        self.shake_at = None;
        self.shake_pending = false;
        self.submission_armed = false;
    }

    /// Whether a score may be submitted right now.
    pub fn submission_armed(&self) -> bool {
        self.submission_armed
    }

    /// Consume the submission slot. Returns `false` when the slot is not
    /// armed; it re-arms only by re-entering `StableAfterEarthquake`.
    pub fn take_submission_slot(&mut self) -> bool {
        std::mem::take(&mut self.submission_armed)
    }

    /// Advance the machine. `now` is the simulation clock in seconds,
    /// `all_still` the stillness verdict for this step. At most one
    /// transition happens per call.
    pub fn update(&mut self, now: f64, all_still: bool) -> Option<StageEvent> {
        match self.stage {
            TrialStage::NotStarted => None,

            TrialStage::AppliedGravity => {
                if all_still {
                    self.enter_still(TrialStage::LettersStillAfterGravity, now);
                }
                None
            }

            TrialStage::LettersStillAfterGravity => {
                if !all_still {
                    self.regress(TrialStage::AppliedGravity);
                } else if self.deadline_passed(now) {
                    self.stage = TrialStage::StableAfterGravity;
                    self.stable_deadline = None;
                    self.shake_at = Some(now + self.shake_delay);
                    self.shake_pending = true;
                    log::debug!("stage -> {:?}", self.stage);
                }
                None
            }

            TrialStage::StableAfterGravity => {
                if !all_still {
                    self.regress(TrialStage::AppliedGravity);
                    None
                } else if self.shake_at.is_some_and(|at| now >= at) {
                    self.stage = TrialStage::AppliedEarthquake;
                    self.shake_at = None;
                    log::debug!("stage -> {:?}", self.stage);
                    if std::mem::take(&mut self.shake_pending) {
                        Some(StageEvent::ShakeRequested)
                    } else {
                        None
                    }
                } else {
                    None
                }
            }

            TrialStage::AppliedEarthquake => {
                if all_still {
                    self.enter_still(TrialStage::LettersStillAfterEarthquake, now);
                }
                None
            }

            TrialStage::LettersStillAfterEarthquake => {
                if !all_still {
                    self.regress(TrialStage::AppliedEarthquake);
                } else if self.deadline_passed(now) {
                    self.stage = TrialStage::StableAfterEarthquake;
                    self.stable_deadline = None;
                    self.submission_armed = true;
                    log::debug!("stage -> {:?}", self.stage);
                }
                None
            }

            TrialStage::StableAfterEarthquake => {
                if !all_still {
                    self.submission_armed = false;
                    self.regress(TrialStage::AppliedEarthquake);
                }
                None
            }
        }
    }

    fn enter_still(&mut self, stage: TrialStage, now: f64) {
        self.stage = stage;
        self.stable_deadline = Some(now + self.min_seconds_stable);
        log::debug!("stage -> {:?}", self.stage);
    }

    /// Motion during a still/stable stage drops back to the start of the
    /// current phase. The shake never re-fires on re-entry.
    fn regress(&mut self, stage: TrialStage) {
        self.stage = stage;
        self.stable_deadline = None;
        self.shake_at = None;
        self.shake_pending = false;
        log::debug!("stage -> {:?} (motion resumed)", self.stage);
    }

    fn deadline_passed(&self, now: f64) -> bool {
        self.stable_deadline.is_some_and(|deadline| now >= deadline)
    }
}
