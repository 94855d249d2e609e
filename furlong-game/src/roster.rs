//! Horse identities and roster generation.
//!
//! The 20 name/color pairs are static data, so every generated roster has the
//! same identities; only the condition scores vary with the RNG.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::numbers::round_f64_to_i32;

const DEFAULT_ROSTER_DATA: &str = include_str!("../assets/data/roster.json");

/// Lowest rollable condition score.
pub const CONDITION_MIN: u8 = 1;
/// Highest rollable condition score.
pub const CONDITION_MAX: u8 = 100;

/// One competitor. Rounds hold cloned snapshots, so position mutation during
/// a race never touches the master roster record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Horse {
    pub id: u32,
    pub name: String,
    pub color: String,
    pub condition: u8,
    #[serde(default)]
    pub position: f64,
}

impl Horse {
    /// Percentage of the given distance covered, clamped to 0..=100 for display.
    #[must_use]
    pub fn progress_pct(&self, distance: f64) -> i32 {
        if distance <= 0.0 {
            return 0;
        }
        round_f64_to_i32((self.position / distance * 100.0).clamp(0.0, 100.0))
    }
}

/// A single name/color identity from the roster data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub color: String,
}

/// Container for the horse identity data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RosterData {
    pub entries: Vec<RosterEntry>,
}

impl RosterData {
    /// Create empty roster data (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Load roster data from JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid roster data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load the roster identities embedded in the crate.
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_ROSTER_DATA).unwrap_or_default()
    }
}

/// Roll a fresh roster: stable ids and identities, random conditions,
/// everyone at the start line.
pub fn generate_roster<R: Rng>(data: &RosterData, rng: &mut R) -> Vec<Horse> {
    data.entries
        .iter()
        .zip(1u32..)
        .map(|(entry, id)| Horse {
            id,
            name: entry.name.clone(),
            color: entry.color.clone(),
            condition: rng.gen_range(CONDITION_MIN..=CONDITION_MAX),
            position: 0.0,
        })
        .collect()
}
