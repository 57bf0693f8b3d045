use crate::registry::Registry;
use crate::topology::{cues_for, Position, LOOKAHEAD, NUM_PIXELS};
use crate::{Location, VehicleId};
use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::ops::Index;

/// An RGB colour for one pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const OFF: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// The colour of the look-ahead and junction lights.
pub const SIGNAL_COLOR: Color = Color::YELLOW;

/// Vehicle marker colours, keyed by vehicle ID.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(pub Vec<Color>);

impl Palette {
    /// Gets the marker colour of a vehicle. IDs beyond the end of the palette wrap around.
    pub fn color_of(&self, id: VehicleId) -> Color {
        id.index()
            .checked_rem(self.0.len())
            .and_then(|idx| self.0.get(idx))
            .copied()
            .unwrap_or(Color::WHITE)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(vec![
            Color::BLUE,
            Color::RED,
            Color::GREEN,
            Color::MAGENTA,
            Color::CYAN,
            Color::WHITE,
        ])
    }
}

/// The colour of every pixel on the strip for one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pixels: [Color; NUM_PIXELS],
}

impl Frame {
    /// Creates a frame with every pixel off.
    pub fn new() -> Self {
        Self {
            pixels: [Color::OFF; NUM_PIXELS],
        }
    }

    /// Turns every pixel off.
    pub fn clear(&mut self) {
        self.pixels = [Color::OFF; NUM_PIXELS];
    }

    /// Sets a pixel. Locations past the end of the strip are ignored.
    pub fn set(&mut self, location: Location, color: Color) {
        if let Some(pixel) = self.pixels.get_mut(location) {
            *pixel = color;
        }
    }

    /// The pixels in strip order.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Iterates over the pixels with their locations.
    pub fn iter(&self) -> impl Iterator<Item = (Location, Color)> + '_ {
        self.pixels.iter().copied().enumerate()
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<Location> for Frame {
    type Output = Color;

    fn index(&self, location: Location) -> &Color {
        &self.pixels[location]
    }
}

/// The street lights one behind and two ahead of a vehicle, where they exist.
pub fn street_lights(position: Position) -> ArrayVec<Position, { LOOKAHEAD.len() }> {
    LOOKAHEAD
        .iter()
        .filter_map(|delta| position.offset(*delta))
        .collect()
}

/// Every signal light a vehicle at `position` switches on.
pub fn signal_lights(position: Position) -> SmallVec<[Location; 6]> {
    let street = street_lights(position).into_iter();
    let junctions = cues_for(position).flat_map(|cue| cue.lights.iter().copied());
    street
        .chain(junctions)
        .map(|position| position.location())
        .collect()
}

/// Draws the registry onto the strip.
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    palette: Palette,
}

impl Renderer {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// The marker colours used by this renderer.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Renders a fresh frame.
    pub fn render(&self, registry: &Registry) -> Frame {
        let mut frame = Frame::new();
        self.render_into(registry, &mut frame);
        frame
    }

    /// Clears `frame` and renders into it. All signal lights are drawn
    /// before any vehicle, so markers always sit on top.
    pub fn render_into(&self, registry: &Registry, frame: &mut Frame) {
        frame.clear();
        for (_, position) in registry.iter() {
            for location in signal_lights(position) {
                frame.set(location, SIGNAL_COLOR);
            }
        }
        for (id, position) in registry.iter() {
            frame.set(position.location(), self.palette.color_of(id));
        }
    }
}
