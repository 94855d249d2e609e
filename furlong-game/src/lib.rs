//! Furlong Race Engine
//!
//! Platform-agnostic core logic for a multi-round horse race: roster
//! generation, race card scheduling, tick-driven round simulation, and the
//! progression state machine. This crate provides the full game mechanics
//! without UI or platform-specific dependencies; presentation layers read
//! the state surface and dispatch intents.

pub mod config;
pub mod numbers;
pub mod race;
pub mod roster;
pub mod schedule;
pub mod seed;
pub mod state;

// Re-export commonly used types
pub use config::{SimConfig, SimConfigError};
pub use race::driver::{TickControl, run_round_to_completion};
pub use race::{CountingRng, RaceController, RaceSession, RngBundle, TickOutcome};
pub use roster::{Horse, RosterData, RosterEntry, generate_roster};
pub use schedule::{RaceResultEntry, ResultOrder, Round, build_schedule};
pub use seed::{decode_to_seed, encode_friendly, generate_code_from_entropy};
pub use state::{RacePhase, RaceState};

#[cfg(feature = "async")]
pub use race::driver::drive_round;

/// Trait for abstracting data loading operations
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the horse identity data backing roster generation.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster data cannot be loaded.
    fn load_roster_data(&self) -> Result<RosterData, Self::Error>;

    /// Load the simulation tuning configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or parsed.
    fn load_sim_config(&self) -> Result<SimConfig, Self::Error>;
}

/// Loader over the JSON assets embedded in the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticAssets;

impl DataLoader for StaticAssets {
    type Error = std::convert::Infallible;

    fn load_roster_data(&self) -> Result<RosterData, Self::Error> {
        Ok(RosterData::load_from_static())
    }

    fn load_sim_config(&self) -> Result<SimConfig, Self::Error> {
        Ok(SimConfig::load_from_static())
    }
}

/// Main engine for constructing race sessions
pub struct RaceEngine<L>
where
    L: DataLoader,
{
    data_loader: L,
}

impl<L> RaceEngine<L>
where
    L: DataLoader,
{
    /// Create a new engine with the provided data loader
    pub const fn new(data_loader: L) -> Self {
        Self { data_loader }
    }

    /// Create a session with the given seed.
    ///
    /// # Errors
    ///
    /// Returns an error if roster data or configuration cannot be loaded.
    ///
    /// # Panics
    ///
    /// Panics when the loaded configuration violates validation rules.
    pub fn create_session(&self, seed: u64) -> Result<RaceSession, L::Error> {
        let data = self.data_loader.load_roster_data()?;
        let cfg = self.data_loader.load_sim_config()?;
        Ok(RaceSession::with_config(cfg, data, seed))
    }

    /// Create a session from a shared race card code.
    ///
    /// # Errors
    ///
    /// Returns an error when the code does not decode or loading fails.
    pub fn session_from_code(&self, code: &str) -> Result<RaceSession, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
    {
        let seed = seed::decode_to_seed(code)
            .ok_or_else(|| anyhow::anyhow!("unrecognized race card code: {code}"))?;
        self.create_session(seed).map_err(Into::into)
    }
}
