use crate::error::{Error, Result};
use crate::topology::Position;
use crate::{Location, VehicleId};
use std::collections::BTreeMap;

/// The shared record of where every vehicle is, sometimes called the "cloud".
///
/// Holds the last committed position of each vehicle. Vehicles consult it
/// before moving so that no two of them ever share a pixel, and the renderer
/// draws from it. Only a vehicle's own commit writes its entry.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    /// Committed positions, keyed by vehicle ID.
    positions: BTreeMap<VehicleId, Position>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Default::default()
    }

    /// Overwrites the stored position of a vehicle. Performs no collision check.
    pub fn update(&mut self, id: VehicleId, position: Position) {
        self.positions.insert(id, position);
    }

    /// Gets the committed position of a vehicle.
    pub fn position_of(&self, id: VehicleId) -> Result<Position> {
        self.positions
            .get(&id)
            .copied()
            .ok_or(Error::UnknownVehicle(id))
    }

    /// Gets the pixel index of a vehicle.
    pub fn location_of(&self, id: VehicleId) -> Result<Location> {
        self.position_of(id).map(|position| position.location())
    }

    /// Gets the street a vehicle is on.
    pub fn street_of(&self, id: VehicleId) -> Result<u8> {
        self.position_of(id).map(|position| position.street())
    }

    /// Gets the address of a vehicle along its street.
    pub fn address_of(&self, id: VehicleId) -> Result<i8> {
        self.position_of(id).map(|position| position.address())
    }

    /// Returns true if no vehicle other than `id` occupies `location`.
    pub fn is_free(&self, id: VehicleId, location: Location) -> bool {
        self.iter()
            .filter(|(other, _)| *other != id)
            .all(|(_, position)| position.location() != location)
    }

    /// Iterates over the registered vehicles in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (VehicleId, Position)> + '_ {
        self.positions
            .iter()
            .map(|(id, position)| (*id, *position))
    }

    /// The number of registered vehicles.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if no vehicle has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
