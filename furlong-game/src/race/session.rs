//! High-level session wrapper binding a controller to its race-day state.

use std::rc::Rc;

use crate::config::SimConfig;
use crate::race::{RaceController, RngBundle, TickOutcome};
use crate::roster::RosterData;
use crate::state::{RacePhase, RaceState};

/// One full race day: schedule generation through game completion.
#[derive(Debug)]
pub struct RaceSession {
    controller: RaceController,
    state: RaceState,
}

impl RaceSession {
    /// Construct a session over the data embedded in the crate.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(SimConfig::load_from_static(), RosterData::load_from_static(), seed)
    }

    /// Construct a session from explicit configuration and roster data.
    ///
    /// # Panics
    ///
    /// Panics when the supplied configuration violates validation rules.
    #[must_use]
    pub fn with_config(cfg: SimConfig, data: RosterData, seed: u64) -> Self {
        let controller = RaceController::with_config(cfg, data, seed);
        let mut state = RaceState {
            seed,
            ..RaceState::default()
        };
        state.horses = controller.generate_roster();
        Self { controller, state }
    }

    /// Build the card for this session, replacing any previous one.
    pub fn generate_schedule(&mut self) {
        self.controller.generate_schedule(&mut self.state);
    }

    /// Begin round zero, or resume after a stop.
    pub fn start(&mut self) {
        self.controller.start(&mut self.state);
    }

    /// Advance the gate to the next round once its predecessor has finished.
    pub fn prepare_next_round(&mut self) {
        self.controller.prepare_next_round(&mut self.state);
    }

    /// Halt the session without discarding schedule or rankings.
    pub fn stop(&mut self) {
        self.controller.stop(&mut self.state);
    }

    /// Discard everything and roll a fresh roster.
    pub fn reset(&mut self) {
        self.controller.reset(&mut self.state);
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) -> TickOutcome {
        self.controller.tick(&mut self.state)
    }

    /// Borrow the underlying immutable session state.
    #[must_use]
    pub const fn state(&self) -> &RaceState {
        &self.state
    }

    /// Current progression phase.
    #[must_use]
    pub fn phase(&self) -> RacePhase {
        self.state.phase()
    }

    /// The resolved simulation configuration.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        self.controller.config()
    }

    /// Expose the shared RNG bundle for instrumentation.
    #[must_use]
    pub fn rng_bundle(&self) -> Rc<RngBundle> {
        self.controller.rng_bundle()
    }

    /// Apply a closure to the mutable session state.
    pub fn with_state_mut<R>(&mut self, f: impl FnOnce(&mut RaceState) -> R) -> R {
        f(&mut self.state)
    }

    /// Deterministically reseed the session.
    pub fn reseed(&mut self, seed: u64) {
        self.controller.reseed(seed);
        self.state.seed = seed;
    }

    /// Consume the session, returning the underlying state.
    #[must_use]
    pub fn into_state(self) -> RaceState {
        self.state
    }
}
