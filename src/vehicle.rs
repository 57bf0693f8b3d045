use crate::debug::debug_move;
use crate::error::Result;
use crate::registry::Registry;
use crate::sampler::TurnSampler;
use crate::topology::{branch_at, Branch, Position, UTurn, Waypoint, BRANCHES, U_TURNS};
use crate::{Location, VehicleId};
use log::{debug, trace};

/// The only supported direction of travel.
pub const FORWARD: i8 = 1;

/// A simulated vehicle.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// The vehicle's ID.
    id: VehicleId,
    /// The vehicle's current position, kept in step with its registry entry.
    position: Position,
    /// The number of addresses advanced per step. Always [FORWARD].
    direction: i8,
}

/// The result of asking a vehicle to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The vehicle moved and the registry was updated.
    Moved { from: Position, to: Position },
    /// The next position was occupied; nothing changed.
    Blocked { at: Position, wanted: Position },
}

impl Vehicle {
    /// Creates a new vehicle.
    pub(crate) fn new(id: VehicleId, position: Position) -> Self {
        Self {
            id,
            position,
            direction: FORWARD,
        }
    }

    /// Gets the vehicle's ID.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// Gets the vehicle's position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// The street the vehicle is on.
    pub fn street(&self) -> u8 {
        self.position.street()
    }

    /// The vehicle's address along its street.
    pub fn address(&self) -> i8 {
        self.position.address()
    }

    /// The direction of travel.
    pub fn direction(&self) -> i8 {
        self.direction
    }

    /// The pixel index of the vehicle.
    pub fn location(&self) -> Location {
        self.position.location()
    }

    /// Works out where the vehicle would go next, without moving it.
    /// The sampler is only consulted at branch points.
    pub fn propose(&self, sampler: &mut impl TurnSampler) -> Result<Position> {
        let divert = branch_at(self.position).is_some() && sampler.sample();
        next_position(self.position, self.direction, divert)
    }

    /// Advances the vehicle one step if its next position is free.
    ///
    /// A blocked vehicle stays where it is and the registry is left untouched.
    /// An error means the topology tables sent the vehicle off the network.
    pub fn step(
        &mut self,
        registry: &mut Registry,
        sampler: &mut impl TurnSampler,
    ) -> Result<MoveOutcome> {
        let from = self.position;
        let to = self.propose(sampler)?;

        if !registry.is_free(self.id, to.location()) {
            trace!("vehicle {} blocked at {:?}, wanted {:?}", self.id, from, to);
            debug_move(self.id, from, to, true);
            return Ok(MoveOutcome::Blocked {
                at: from,
                wanted: to,
            });
        }

        self.position = to;
        registry.update(self.id, to);
        trace!("vehicle {} moved {:?} -> {:?}", self.id, from, to);
        debug_move(self.id, from, to, false);
        Ok(MoveOutcome::Moved { from, to })
    }
}

/// Computes the position following `position`.
///
/// Applies, in order: the side street turn if `divert` is set and the position
/// is a branch point; the end-of-road transition keyed on the starting pixel;
/// and finally the forward step.
pub fn next_position(position: Position, direction: i8, divert: bool) -> Result<Position> {
    transition(position, direction, divert, &BRANCHES, &U_TURNS)
}

/// [next_position] over the given tables.
fn transition(
    position: Position,
    direction: i8,
    divert: bool,
    branches: &[Branch],
    u_turns: &[UTurn],
) -> Result<Position> {
    // Taken before any branch, so a turn onto a side street cannot skip the u-turn.
    let location = position.location();
    let mut waypoint = Waypoint::from(position);

    if divert {
        if let Some(branch) = branches.iter().find(|branch| branch.at == position) {
            debug!("turning from {:?} onto street {}", position, branch.onto.street);
            waypoint = branch.onto;
        }
    }

    if let Some(u_turn) = u_turns.iter().find(|u_turn| u_turn.terminal == location) {
        waypoint = u_turn.onto;
    }

    waypoint.advance(direction).validate()
}
