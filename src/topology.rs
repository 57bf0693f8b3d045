//! The fixed road network and its mapping onto the LED strip.
//!
//! The network has eight streets. Streets 0 and 4 are the main roads with ten
//! addresses each; the remaining six are ramps with four addresses each. The
//! strip is wired as street 0, then the ramps 1 to 3, then street 4, then the
//! ramps 5 to 7, giving 44 pixels in total.

use crate::error::{Error, Result};
use crate::util::Interval;
use crate::Location;
use itertools::iproduct;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The number of streets in the network.
pub const NUM_STREETS: u8 = 8;

/// The number of pixels on the strip, one per valid position.
pub const NUM_PIXELS: usize = 44;

/// The number of addresses on a main road.
const MAIN_STREET_LEN: i8 = 10;

/// The number of addresses on a ramp.
const RAMP_LEN: i8 = 4;

/// The offsets, relative to a vehicle, of the street lights lit around it.
pub const LOOKAHEAD: [i8; 3] = [-1, 1, 2];

/// Gets the number of addresses on the given street, or `None` if there is no such street.
pub const fn street_len(street: u8) -> Option<i8> {
    match street {
        0 | 4 => Some(MAIN_STREET_LEN),
        1..=3 | 5..=7 => Some(RAMP_LEN),
        _ => None,
    }
}

/// Returns true if the (street, address) pair lies on the network.
pub const fn is_valid(street: u8, address: i8) -> bool {
    match street_len(street) {
        Some(len) => address >= 0 && address < len,
        None => false,
    }
}

/// Converts a street and address into a pixel index on the strip.
pub fn locate(street: u8, address: i8) -> Result<Location> {
    if !is_valid(street, address) {
        return Err(Error::InvalidPosition { street, address });
    }
    Ok(pixel_index(street, address))
}

/// The layout formula. Only meaningful for valid positions.
const fn pixel_index(street: u8, address: i8) -> Location {
    let mut location = address as usize;
    if street > 0 {
        location += MAIN_STREET_LEN as usize + (street as usize - 1) * RAMP_LEN as usize;
    }
    if street > 4 {
        location += (MAIN_STREET_LEN - RAMP_LEN) as usize;
    }
    location
}

/// A validated position on the road network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Waypoint", into = "Waypoint")]
pub struct Position {
    street: u8,
    address: i8,
}

impl Position {
    /// Creates a position, checking that it lies on the network.
    pub fn new(street: u8, address: i8) -> Result<Self> {
        if is_valid(street, address) {
            Ok(Self { street, address })
        } else {
            Err(Error::InvalidPosition { street, address })
        }
    }

    /// Creates a position for the topology tables. Fails to compile if invalid.
    pub(crate) const fn fixed(street: u8, address: i8) -> Self {
        assert!(is_valid(street, address), "position is off the network");
        Self { street, address }
    }

    /// Gets the position occupying the given pixel.
    pub fn from_location(location: Location) -> Option<Self> {
        BY_LOCATION.get(location).copied().flatten()
    }

    /// The street the position lies on.
    pub fn street(&self) -> u8 {
        self.street
    }

    /// The offset along the street.
    pub fn address(&self) -> i8 {
        self.address
    }

    /// The pixel index of the position.
    pub const fn location(&self) -> Location {
        pixel_index(self.street, self.address)
    }

    /// Gets the position `delta` addresses along the same street,
    /// or `None` if it would run off either end.
    pub fn offset(&self, delta: i8) -> Option<Self> {
        let address = self.address.checked_add(delta)?;
        Self::new(self.street, address).ok()
    }

    /// Returns true if the position is the last address of its street.
    pub fn is_terminal(&self) -> bool {
        street_len(self.street) == Some(self.address + 1)
    }
}

/// An unvalidated (street, address) pair.
///
/// Transitions onto a new street produce an address of -1, meaning the vehicle
/// is about to enter the street from its start; it becomes valid after the
/// following forward step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Waypoint {
    pub street: u8,
    pub address: i8,
}

impl Waypoint {
    pub const fn new(street: u8, address: i8) -> Self {
        Self { street, address }
    }

    /// Moves the waypoint along its street.
    pub fn advance(self, direction: i8) -> Self {
        Self {
            street: self.street,
            address: self.address.saturating_add(direction),
        }
    }

    /// Checks that the waypoint lies on the network.
    pub fn validate(self) -> Result<Position> {
        Position::new(self.street, self.address)
    }
}

impl From<Position> for Waypoint {
    fn from(position: Position) -> Self {
        Self::new(position.street, position.address)
    }
}

impl TryFrom<Waypoint> for Position {
    type Error = Error;

    fn try_from(waypoint: Waypoint) -> Result<Self> {
        waypoint.validate()
    }
}

/// A point where a vehicle may divert onto a side street.
#[derive(Clone, Copy, Debug)]
pub struct Branch {
    /// The position the vehicle must be at.
    pub at: Position,
    /// Where the vehicle is placed before its forward step.
    pub onto: Waypoint,
}

/// The side streets, keyed by their entry points on the main roads.
pub const BRANCHES: [Branch; 3] = [
    Branch {
        at: Position::fixed(0, 4),
        onto: Waypoint::new(1, -1),
    },
    Branch {
        at: Position::fixed(4, 1),
        onto: Waypoint::new(2, -1),
    },
    Branch {
        at: Position::fixed(4, 7),
        onto: Waypoint::new(3, -1),
    },
];

/// The redirection applied when a vehicle reaches the end of a street.
#[derive(Clone, Copy, Debug)]
pub struct UTurn {
    /// The last pixel of the street.
    pub terminal: Location,
    /// Where the vehicle is placed before its forward step.
    pub onto: Waypoint,
}

/// The end-of-road transitions. Ramps 5 to 7 merge back into a main road
/// part way along it, just past the side street they came from.
pub const U_TURNS: [UTurn; 8] = [
    UTurn {
        terminal: Position::fixed(0, 9).location(),
        onto: Waypoint::new(4, -1),
    },
    UTurn {
        terminal: Position::fixed(1, 3).location(),
        onto: Waypoint::new(5, -1),
    },
    UTurn {
        terminal: Position::fixed(2, 3).location(),
        onto: Waypoint::new(6, -1),
    },
    UTurn {
        terminal: Position::fixed(3, 3).location(),
        onto: Waypoint::new(7, -1),
    },
    UTurn {
        terminal: Position::fixed(4, 9).location(),
        onto: Waypoint::new(0, -1),
    },
    UTurn {
        terminal: Position::fixed(5, 3).location(),
        onto: Waypoint::new(0, 4),
    },
    UTurn {
        terminal: Position::fixed(6, 3).location(),
        onto: Waypoint::new(4, 1),
    },
    UTurn {
        terminal: Position::fixed(7, 3).location(),
        onto: Waypoint::new(4, 7),
    },
];

/// Warning lights shown on another street while a vehicle approaches
/// a junction with it.
#[derive(Clone, Copy, Debug)]
pub struct IntersectionCue {
    /// The street the vehicle is on.
    pub street: u8,
    /// The addresses on that street which trigger the cue.
    pub addresses: Interval<i8>,
    /// The positions lit by the cue.
    pub lights: &'static [Position],
}

/// The junction warnings: the main roads warn the start of each side street,
/// and each merging ramp warns the stretch of main road it joins.
pub const INTERSECTION_CUES: [IntersectionCue; 6] = [
    IntersectionCue {
        street: 0,
        addresses: Interval::new(3, 4),
        lights: &[Position::fixed(1, 0), Position::fixed(1, 1)],
    },
    IntersectionCue {
        street: 4,
        addresses: Interval::new(0, 1),
        lights: &[Position::fixed(2, 0), Position::fixed(2, 1)],
    },
    IntersectionCue {
        street: 4,
        addresses: Interval::new(6, 7),
        lights: &[Position::fixed(3, 0), Position::fixed(3, 1)],
    },
    IntersectionCue {
        street: 5,
        addresses: Interval::new(2, 3),
        lights: &[
            Position::fixed(0, 4),
            Position::fixed(0, 5),
            Position::fixed(0, 6),
        ],
    },
    IntersectionCue {
        street: 6,
        addresses: Interval::new(2, 3),
        lights: &[
            Position::fixed(4, 1),
            Position::fixed(4, 2),
            Position::fixed(4, 3),
        ],
    },
    IntersectionCue {
        street: 7,
        addresses: Interval::new(2, 3),
        lights: &[
            Position::fixed(4, 7),
            Position::fixed(4, 8),
            Position::fixed(4, 9),
        ],
    },
];

/// Gets the side street a vehicle at `position` may divert onto.
pub fn branch_at(position: Position) -> Option<&'static Branch> {
    BRANCHES.iter().find(|branch| branch.at == position)
}

/// Gets the end-of-road transition for a vehicle starting its move at `location`.
pub fn u_turn_at(location: Location) -> Option<&'static UTurn> {
    U_TURNS.iter().find(|u_turn| u_turn.terminal == location)
}

/// Gets the intersection cues triggered by a vehicle at `position`.
pub fn cues_for(position: Position) -> impl Iterator<Item = &'static IntersectionCue> {
    INTERSECTION_CUES.iter().filter(move |cue| {
        cue.street == position.street() && cue.addresses.contains(position.address())
    })
}

/// Iterates over every valid position, street by street.
pub fn all_positions() -> impl Iterator<Item = Position> {
    iproduct!(0..NUM_STREETS, 0..MAIN_STREET_LEN)
        .filter_map(|(street, address)| Position::new(street, address).ok())
}

/// Reverse lookup from pixel index to position.
static BY_LOCATION: Lazy<[Option<Position>; NUM_PIXELS]> = Lazy::new(|| {
    let mut table = [None; NUM_PIXELS];
    for position in all_positions() {
        if let Some(slot) = table.get_mut(position.location()) {
            *slot = Some(position);
        }
    }
    table
});
