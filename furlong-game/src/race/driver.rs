//! Tick drivers: a synchronous runner for tests and headless callers, plus
//! an optional wall-clock driver behind the `async` feature.
//!
//! The engine itself never waits on wall time; it only advances when a
//! driver calls [`RaceSession::tick`], so tests can step it deterministically.

use crate::race::TickOutcome;
use crate::race::session::RaceSession;

/// Observer verdict consulted between ticks by the wall-clock driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Stop,
}

/// Drive the active round to completion without waiting on wall time.
/// Returns `Idle` immediately when no round is racing.
pub fn run_round_to_completion(session: &mut RaceSession) -> TickOutcome {
    loop {
        match session.tick() {
            TickOutcome::Advanced => {}
            outcome => return outcome,
        }
    }
}

/// Drive the active round at the configured tick cadence. The observer runs
/// before every tick; returning [`TickControl::Stop`] halts the session at
/// that tick boundary, mirroring the cooperative cancellation of the
/// in-process racing flag.
#[cfg(feature = "async")]
pub async fn drive_round<F>(session: &mut RaceSession, mut on_tick: F) -> TickOutcome
where
    F: FnMut(&crate::state::RaceState) -> TickControl,
{
    let period = std::time::Duration::from_millis(session.config().tick_ms);
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        if on_tick(session.state()) == TickControl::Stop {
            session.stop();
        }
        match session.tick() {
            TickOutcome::Advanced => {}
            outcome => return outcome,
        }
    }
}
