pub use config::SimulationConfig;
pub use error::{Error, Result};
pub use registry::Registry;
pub use render::{Color, Frame, Palette, Renderer};
pub use sampler::{BernoulliSampler, FixedSampler, TurnSampler};
pub use selftest::self_test;
pub use simulation::{Simulation, TickReport};
pub use sink::{MemoryStrip, PixelSink, TerminalStrip};
pub use topology::{locate, Position, Waypoint, NUM_PIXELS};
pub use util::Interval;
pub use vehicle::{MoveOutcome, Vehicle};

mod config;
mod debug;
mod error;
mod registry;
pub mod render;
mod sampler;
mod selftest;
mod simulation;
pub mod sink;
pub mod topology;
mod util;
pub mod vehicle;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A pixel index on the LED strip.
pub type Location = usize;

/// Unique ID of a [Vehicle]. IDs are handed out in order from 0.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct VehicleId(pub usize);

impl VehicleId {
    /// The ID as an index into per-vehicle tables.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
