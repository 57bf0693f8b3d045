use crate::{Location, VehicleId};
use thiserror::Error;

/// A specialized [Result](std::result::Result) type for simulation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the simulation.
#[derive(Debug, Error)]
pub enum Error {
    /// A (street, address) pair outside the fixed road network.
    #[error("invalid position: street {street}, address {address}")]
    InvalidPosition { street: u8, address: i8 },

    /// A vehicle ID which has never been registered.
    #[error("unknown vehicle {0}")]
    UnknownVehicle(VehicleId),

    /// Two vehicles were configured to start on the same pixel.
    #[error("vehicle {id} starts on occupied location {location}")]
    OccupiedStart { id: VehicleId, location: Location },

    /// The turn probability must lie within [0, 1].
    #[error("invalid turn probability {0}")]
    InvalidProbability(f64),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The startup self-test found problems with the topology tables.
    #[error("self-test failed: {}", .0.join("; "))]
    SelfTest(Vec<String>),
}
