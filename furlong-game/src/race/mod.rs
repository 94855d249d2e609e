//! Race progression: the controller mediating every intent, and the
//! deterministic RNG streams backing one session.
//!
//! Illegal intents are absorbed as no-ops rather than surfaced as errors, so
//! rapid or duplicated presentation-layer calls cannot corrupt a session.

use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;
use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use crate::config::SimConfig;
use crate::roster::{self, Horse, RosterData};
use crate::schedule::build_schedule;
use crate::state::{self, RaceState};

pub mod driver;
pub mod session;
mod sim;

pub use session::RaceSession;

/// Result of advancing the simulation by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do: no round is racing.
    Idle,
    /// Positions advanced; the round is still running.
    Advanced,
    /// This tick finished the indexed round; the next one awaits preparation.
    RoundFinished(usize),
    /// This tick finished the final round; the session is over.
    RaceFinished,
}

/// Domain-separated RNG streams backing one session. Identical seeds
/// reproduce identical rosters, draws, and races.
#[derive(Debug)]
pub struct RngBundle {
    roster: RefCell<CountingRng<ChaCha20Rng>>,
    draw: RefCell<CountingRng<ChaCha20Rng>>,
    pace: RefCell<CountingRng<ChaCha20Rng>>,
    clock: RefCell<CountingRng<ChaCha20Rng>>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        let roster = CountingRng::new(derive_stream_seed(seed, b"roster"));
        let draw = CountingRng::new(derive_stream_seed(seed, b"draw"));
        let pace = CountingRng::new(derive_stream_seed(seed, b"pace"));
        let clock = CountingRng::new(derive_stream_seed(seed, b"clock"));
        Self {
            roster: RefCell::new(roster),
            draw: RefCell::new(draw),
            pace: RefCell::new(pace),
            clock: RefCell::new(clock),
        }
    }

    /// Access the roster (condition roll) stream.
    #[must_use]
    pub fn roster(&self) -> RefMut<'_, CountingRng<ChaCha20Rng>> {
        self.roster.borrow_mut()
    }

    /// Access the schedule draw stream.
    #[must_use]
    pub fn draw(&self) -> RefMut<'_, CountingRng<ChaCha20Rng>> {
        self.draw.borrow_mut()
    }

    /// Access the per-tick pace stream.
    #[must_use]
    pub fn pace(&self) -> RefMut<'_, CountingRng<ChaCha20Rng>> {
        self.pace.borrow_mut()
    }

    /// Access the synthetic-time stream.
    #[must_use]
    pub fn clock(&self) -> RefMut<'_, CountingRng<ChaCha20Rng>> {
        self.clock.borrow_mut()
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<ChaCha20Rng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}

/// Mediates every intent against a session's [`RaceState`].
#[derive(Debug)]
pub struct RaceController {
    cfg: SimConfig,
    data: RosterData,
    rng: Rc<RngBundle>,
}

impl RaceController {
    /// Create a controller over the data embedded in the crate.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(SimConfig::load_from_static(), RosterData::load_from_static(), seed)
    }

    /// Create a controller with explicit configuration and roster data.
    ///
    /// # Panics
    ///
    /// Panics when the supplied configuration violates validation rules.
    #[must_use]
    pub fn with_config(cfg: SimConfig, data: RosterData, seed: u64) -> Self {
        cfg.validate().expect("valid simulation config");
        let mut resolved = cfg;
        resolved.sanitize();
        Self {
            cfg: resolved,
            data,
            rng: Rc::new(RngBundle::from_user_seed(seed)),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.cfg
    }

    /// Expose the shared RNG bundle.
    #[must_use]
    pub fn rng_bundle(&self) -> Rc<RngBundle> {
        self.rng.clone()
    }

    /// Deterministically reseed controller-owned RNG streams.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = Rc::new(RngBundle::from_user_seed(seed));
    }

    /// Roll a fresh roster from the identity data.
    #[must_use]
    pub fn generate_roster(&self) -> Vec<Horse> {
        roster::generate_roster(&self.data, &mut *self.rng.roster())
    }

    /// Replace the card wholesale. Ignored while a round is racing.
    pub fn generate_schedule(&self, state: &mut RaceState) {
        if state.is_racing {
            return;
        }
        let rounds = build_schedule(&state.horses, &self.cfg, &mut *self.rng.draw());
        state.install_schedule(rounds);
        state.logs.push(String::from(state::LOG_SCHEDULE_GENERATED));
    }

    /// Begin (or, after a stop, resume) the session. Ignored without a
    /// schedule or while the session is already active, so rapid repeated
    /// start intents collapse into one.
    pub fn start(&self, state: &mut RaceState) {
        if !state.schedule_generated || state.is_race_active {
            return;
        }
        state.is_race_active = true;
        state.logs.push(String::from(state::LOG_RACE_STARTED));
        self.run_next_round(state);
    }

    /// Run the round the gate points at. Already-completed rounds are left
    /// alone so a stray trigger cannot re-race them.
    fn run_next_round(&self, state: &mut RaceState) {
        if state.current_round >= state.total_rounds
            || state.rounds.get(state.current_round).is_none()
        {
            state.stop_race();
            state.logs.push(String::from(state::LOG_RACE_STOPPED));
            return;
        }
        let index = state.current_round;
        if state.rounds[index].completed {
            return;
        }
        state.begin_round(index);
        state.logs.push(String::from(state::LOG_ROUND_STARTED));
    }

    /// Advance the active round by one tick. The racing flag is polled
    /// first, so clearing it cancels the loop at the next tick boundary.
    pub fn tick(&self, state: &mut RaceState) -> TickOutcome {
        if !state.is_racing {
            return TickOutcome::Idle;
        }
        let index = state.current_round;
        let Some(round) = state.rounds.get_mut(index) else {
            state.stop_race();
            return TickOutcome::Idle;
        };
        if round.completed {
            state.is_racing = false;
            return TickOutcome::Idle;
        }

        sim::advance_positions(round, &self.cfg, &mut *self.rng.pace());
        let capped = round.ticks >= self.cfg.max_round_ticks;
        if !round.has_finisher() && !capped {
            return TickOutcome::Advanced;
        }

        round.results = sim::rank_field(&round.participants, &mut *self.rng.clock());
        round.completed = true;
        state::debug_log(&format!(
            "round {} finished after {} ticks",
            round.id, round.ticks
        ));

        if state.is_race_active && index + 1 < state.total_rounds {
            state.is_racing = false;
            state.preparation_pending = true;
            state.logs.push(String::from(state::LOG_ROUND_FINISHED));
            TickOutcome::RoundFinished(index)
        } else {
            state.stop_race();
            state.logs.push(String::from(state::LOG_RACE_FINISHED));
            TickOutcome::RaceFinished
        }
    }

    /// Move the gate to the next round and return its field to the line.
    /// A no-op when no round remains. While the session is active the
    /// prepared round starts running immediately.
    pub fn prepare_next_round(&self, state: &mut RaceState) {
        let next = state.current_round + 1;
        if next >= state.total_rounds {
            return;
        }
        state.prepare_round(next);
        if state.is_race_active {
            self.run_next_round(state);
        }
    }

    /// Halt the session, keeping the schedule and every computed ranking.
    /// Positions persist, so a later start resumes rather than restarts.
    pub fn stop(&self, state: &mut RaceState) {
        state.stop_race();
        state.logs.push(String::from(state::LOG_RACE_STOPPED));
    }

    /// Discard the schedule and all flags, and roll a fresh roster with new
    /// condition scores. Callers should gate this on `!is_racing`.
    pub fn reset(&self, state: &mut RaceState) {
        let seed = state.seed;
        let horses = self.generate_roster();
        *state = RaceState {
            horses,
            seed,
            ..RaceState::default()
        };
        state.logs.push(String::from(state::LOG_RACE_RESET));
    }
}
