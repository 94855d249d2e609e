//! Race card construction: the per-round draw of fields from the roster.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::SimConfig;
use crate::roster::Horse;

/// Finishing order of one round, stored inline (one slot per field member).
pub type ResultOrder = SmallVec<[RaceResultEntry; 10]>;

/// One line of a completed round's ranking. The time is a cosmetic display
/// value and plays no part in the ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceResultEntry {
    pub rank: u8,
    pub horse_id: u32,
    pub name: String,
    pub time: String,
}

/// One race of the card: a fixed distance and the field drawn for it.
/// Completes exactly once; results are write-once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: u32,
    pub distance: f64,
    pub participants: Vec<Horse>,
    #[serde(default)]
    pub results: ResultOrder,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub ticks: u32,
}

impl Round {
    #[must_use]
    pub fn new(id: u32, distance: f64, participants: Vec<Horse>) -> Self {
        Self {
            id,
            distance,
            participants,
            results: ResultOrder::new(),
            completed: false,
            ticks: 0,
        }
    }

    /// Whether any participant has reached the target distance.
    #[must_use]
    pub fn has_finisher(&self) -> bool {
        self.participants.iter().any(|h| h.position >= self.distance)
    }

    /// Return every participant to the start line.
    pub fn zero_positions(&mut self) {
        for horse in &mut self.participants {
            horse.position = 0.0;
        }
        self.ticks = 0;
    }
}

/// Build the full card: one round per configured distance, each field drawn
/// independently by shuffling the roster and taking a prefix. A horse may
/// appear in several rounds or in none.
pub fn build_schedule<R: Rng>(roster: &[Horse], cfg: &SimConfig, rng: &mut R) -> Vec<Round> {
    let field_size = cfg.field_size.min(roster.len());
    cfg.distances
        .iter()
        .zip(1u32..)
        .map(|(&distance, id)| {
            let mut pool: Vec<Horse> = roster.to_vec();
            pool.shuffle(rng);
            pool.truncate(field_size);
            for horse in &mut pool {
                horse.position = 0.0;
            }
            Round::new(id, distance, pool)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{RosterData, generate_roster};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn fixture_roster(seed: u64) -> Vec<Horse> {
        let data = RosterData::load_from_static();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        generate_roster(&data, &mut rng)
    }

    #[test]
    fn card_has_one_round_per_distance_in_order() {
        let roster = fixture_roster(2);
        let cfg = SimConfig::default();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let rounds = build_schedule(&roster, &cfg, &mut rng);

        assert_eq!(rounds.len(), 6);
        let distances: Vec<f64> = rounds.iter().map(|r| r.distance).collect();
        assert_eq!(
            distances,
            vec![1200.0, 1400.0, 1600.0, 1800.0, 2000.0, 2200.0]
        );
        for (idx, round) in rounds.iter().enumerate() {
            assert_eq!(round.id as usize, idx + 1);
            assert_eq!(round.participants.len(), 10);
            assert!(round.results.is_empty());
            assert!(!round.completed);
            assert!(round.participants.iter().all(|h| h.position == 0.0));
        }
    }

    #[test]
    fn fields_are_drawn_from_the_roster_without_duplicates() {
        let roster = fixture_roster(4);
        let cfg = SimConfig::default();
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let rounds = build_schedule(&roster, &cfg, &mut rng);

        for round in &rounds {
            let mut ids: Vec<u32> = round.participants.iter().map(|h| h.id).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), 10, "a horse was drawn twice into one field");
            assert!(ids.iter().all(|id| (1..=20).contains(id)));
        }
    }

    #[test]
    fn snapshots_are_independent_of_the_master_roster() {
        let roster = fixture_roster(6);
        let cfg = SimConfig::default();
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let mut rounds = build_schedule(&roster, &cfg, &mut rng);

        rounds[0].participants[0].position = 800.0;
        assert!(roster.iter().all(|h| h.position == 0.0));
    }

    #[test]
    fn undersized_roster_shrinks_the_field() {
        let roster = fixture_roster(8);
        let cfg = SimConfig::default();
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let rounds = build_schedule(&roster[..4], &cfg, &mut rng);
        assert!(rounds.iter().all(|r| r.participants.len() == 4));
    }

    #[test]
    fn zero_positions_rewinds_field_and_tick_count() {
        let roster = fixture_roster(10);
        let mut round = Round::new(1, 1200.0, roster[..10].to_vec());
        round.participants[3].position = 640.0;
        round.ticks = 12;

        round.zero_positions();
        assert!(round.participants.iter().all(|h| h.position == 0.0));
        assert_eq!(round.ticks, 0);
    }
}
