//! Session state: the roster, rounds, and flags one race day carries.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::numbers::{clamp_f64_to_f32, usize_to_f64};
use crate::roster::Horse;
use crate::schedule::Round;

const DEBUG_ENV_VAR: &str = "FURLONG_DEBUG_LOGS";

pub const LOG_BOOT: &str = "log.gates-ready";
pub const LOG_SCHEDULE_GENERATED: &str = "log.schedule-generated";
pub const LOG_RACE_STARTED: &str = "log.race-started";
pub const LOG_ROUND_STARTED: &str = "log.round-started";
pub const LOG_ROUND_FINISHED: &str = "log.round-finished";
pub const LOG_RACE_STOPPED: &str = "log.race-stopped";
pub const LOG_RACE_FINISHED: &str = "log.race-finished";
pub const LOG_RACE_RESET: &str = "log.race-reset";

/// Read-only view of the flag set for presentation and tests. The flags on
/// [`RaceState`] remain the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RacePhase {
    NoSchedule,
    ScheduleReady,
    RoundPending,
    RoundRunning,
    RoundComplete,
    GameComplete,
}

impl RacePhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoSchedule => "no-schedule",
            Self::ScheduleReady => "schedule-ready",
            Self::RoundPending => "round-pending",
            Self::RoundRunning => "round-running",
            Self::RoundComplete => "round-complete",
            Self::GameComplete => "game-complete",
        }
    }
}

impl fmt::Display for RacePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one race day carries, from schedule generation to completion.
/// Cleared wholesale on reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceState {
    pub horses: Vec<Horse>,
    pub current_round: usize,
    pub total_rounds: usize,
    pub rounds: Vec<Round>,
    pub is_racing: bool,
    pub is_race_active: bool,
    pub schedule_generated: bool,
    pub preparation_pending: bool,
    pub seed: u64,
    #[serde(default)]
    pub logs: Vec<String>,
}

impl Default for RaceState {
    fn default() -> Self {
        Self {
            horses: Vec::new(),
            current_round: 0,
            total_rounds: 0,
            rounds: Vec::new(),
            is_racing: false,
            is_race_active: false,
            schedule_generated: false,
            preparation_pending: false,
            seed: 0,
            logs: vec![String::from(LOG_BOOT)],
        }
    }
}

impl RaceState {
    /// Replace the card wholesale and rewind to the first round.
    pub(crate) fn install_schedule(&mut self, rounds: Vec<Round>) {
        self.total_rounds = rounds.len();
        self.rounds = rounds;
        self.schedule_generated = true;
        self.current_round = 0;
        self.preparation_pending = false;
    }

    /// Mark the indexed round as running. Round zero re-zeroes its field,
    /// guarding against re-entry.
    pub(crate) fn begin_round(&mut self, index: usize) {
        self.is_racing = true;
        self.current_round = index;
        self.preparation_pending = false;
        if index == 0 {
            if let Some(round) = self.rounds.get_mut(index) {
                round.zero_positions();
            }
        }
    }

    /// Move the gate to the indexed round and return its field to the line.
    pub(crate) fn prepare_round(&mut self, index: usize) {
        self.preparation_pending = false;
        self.current_round = index;
        if let Some(round) = self.rounds.get_mut(index) {
            round.zero_positions();
        }
    }

    /// Halt the tick loop and the session, keeping schedule and results.
    pub(crate) fn stop_race(&mut self) {
        self.is_racing = false;
        self.is_race_active = false;
    }

    /// The round the gate currently points at, if a schedule exists.
    #[must_use]
    pub fn current_round_data(&self) -> Option<&Round> {
        self.rounds.get(self.current_round)
    }

    /// Rounds that have already produced a ranking.
    pub fn completed_rounds(&self) -> impl Iterator<Item = &Round> {
        self.rounds.iter().filter(|r| r.completed)
    }

    /// Completed share of the card as a percentage.
    #[must_use]
    pub fn race_progress(&self) -> f32 {
        if self.rounds.is_empty() || self.total_rounds == 0 {
            return 0.0;
        }
        let done = self.completed_rounds().count();
        clamp_f64_to_f32(usize_to_f64(done) / usize_to_f64(self.total_rounds) * 100.0)
    }

    /// Derive the progression phase from the flag set.
    #[must_use]
    pub fn phase(&self) -> RacePhase {
        if !self.schedule_generated {
            return RacePhase::NoSchedule;
        }
        if !self.rounds.is_empty() && self.rounds.iter().all(|r| r.completed) {
            return RacePhase::GameComplete;
        }
        if self.is_racing {
            return RacePhase::RoundRunning;
        }
        if self.preparation_pending {
            return RacePhase::RoundComplete;
        }
        if self.is_race_active {
            return RacePhase::RoundPending;
        }
        RacePhase::ScheduleReady
    }
}

#[cfg(debug_assertions)]
fn debug_log_enabled() -> bool {
    matches!(std::env::var(DEBUG_ENV_VAR), Ok(val) if val != "0")
}

#[cfg(not(debug_assertions))]
const fn debug_log_enabled() -> bool {
    false
}

pub(crate) fn debug_log(message: &str) {
    if debug_log_enabled() {
        eprintln!("[furlong] {message}");
    }
}
