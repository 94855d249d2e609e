//! Per-tick movement and ranking for a single round.

use rand::Rng;

use crate::config::SimConfig;
use crate::roster::{CONDITION_MAX, Horse};
use crate::schedule::{RaceResultEntry, ResultOrder, Round};

/// Advance every participant by one tick's speed, clamped to the target.
/// A horse on the wire stays on the wire.
pub(crate) fn advance_positions<R: Rng>(round: &mut Round, cfg: &SimConfig, rng: &mut R) {
    for horse in &mut round.participants {
        let base = f64::from(horse.condition) / f64::from(CONDITION_MAX) * cfg.base_speed;
        let jitter = if cfg.speed_jitter > 0.0 {
            rng.gen_range(0.0..cfg.speed_jitter)
        } else {
            0.0
        };
        horse.position = (horse.position + base + jitter).min(round.distance);
    }
    round.ticks = round.ticks.saturating_add(1);
}

/// Stable descending sort by final position; ties keep field order.
pub(crate) fn rank_field<R: Rng>(participants: &[Horse], rng: &mut R) -> ResultOrder {
    let mut order: Vec<&Horse> = participants.iter().collect();
    order.sort_by(|a, b| b.position.total_cmp(&a.position));
    order
        .iter()
        .zip(1u8..)
        .map(|(horse, rank)| RaceResultEntry {
            rank,
            horse_id: horse.id,
            name: horse.name.clone(),
            time: synthetic_time(rng),
        })
        .collect()
}

// Cosmetic S.mmm gate-to-wire time; never consulted for the ordering.
fn synthetic_time<R: Rng>(rng: &mut R) -> String {
    format!("{}.{:03}", rng.gen_range(0..60), rng.gen_range(0..1000))
}
