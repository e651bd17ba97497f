/// Fixed timestep accumulator.
/// Ensures the simulation advances at a consistent rate regardless of how
/// unevenly the caller's frames arrive.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
    /// Maximum steps paid back per frame; excess time is dropped so a long
    /// stall never turns into a spiral of catch-up steps.
    max_substeps: u32,
}

impl FixedTimestep {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_substeps: max_substeps.max(1),
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        self.accumulator = self
            .accumulator
            .min(self.dt * self.max_substeps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Drop any banked time, so the next frame starts clean.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
