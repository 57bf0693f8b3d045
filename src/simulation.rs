use crate::config::SimulationConfig;
#[cfg(feature = "debug")]
use crate::debug::take_debug_frame;
use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::render::{Frame, Renderer};
use crate::sampler::{BernoulliSampler, TurnSampler};
use crate::sink::PixelSink;
use crate::topology::Position;
use crate::vehicle::{MoveOutcome, Vehicle};
use crate::VehicleId;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use std::time::{Duration, Instant};

/// A traffic simulation.
pub struct Simulation<S> {
    /// The committed position of every vehicle.
    registry: Registry,
    /// The vehicles being simulated, in ID order.
    vehicles: Vec<Vehicle>,
    /// Draws the registry onto the strip.
    renderer: Renderer,
    /// The frame shown during the current tick.
    frame: Frame,
    /// Decides turns at branch points.
    sampler: S,
    /// The number of ticks simulated so far.
    tick: usize,
    /// The slowest tick seen so far.
    slowest: Duration,
    /// Debugging information from the previously simulated tick.
    #[cfg(feature = "debug")]
    debug: serde_json::Value,
}

/// A summary of one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// The number of vehicles which moved.
    pub moved: usize,
    /// The number of vehicles which were blocked.
    pub blocked: usize,
    /// The time spent rendering and moving.
    pub elapsed: Duration,
}

impl Simulation<BernoulliSampler<StdRng>> {
    /// Creates a simulation from a config, with vehicles placed and a seeded turn sampler.
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        let sampler = BernoulliSampler::seeded(config.turn_probability, config.seed)?;
        let mut sim = Self::with_renderer(Renderer::new(config.palette.clone()), sampler);
        for position in &config.vehicles {
            sim.add_vehicle(*position)?;
        }
        info!(
            "simulation ready with {} vehicles, turn probability {}",
            sim.vehicles.len(),
            config.turn_probability
        );
        Ok(sim)
    }
}

impl<S: TurnSampler> Simulation<S> {
    /// Creates an empty simulation with the default palette.
    pub fn new(sampler: S) -> Self {
        Self::with_renderer(Renderer::default(), sampler)
    }

    /// Creates an empty simulation.
    pub fn with_renderer(renderer: Renderer, sampler: S) -> Self {
        Self {
            registry: Registry::new(),
            vehicles: vec![],
            renderer,
            frame: Frame::new(),
            sampler,
            tick: 0,
            slowest: Duration::ZERO,
            #[cfg(feature = "debug")]
            debug: serde_json::Value::Null,
        }
    }

    /// Adds a vehicle and registers its position. IDs are handed out in order from 0.
    pub fn add_vehicle(&mut self, position: Position) -> Result<VehicleId> {
        let id = VehicleId(self.vehicles.len());
        if !self.registry.is_free(id, position.location()) {
            return Err(Error::OccupiedStart {
                id,
                location: position.location(),
            });
        }
        self.registry.update(id, position);
        self.vehicles.push(Vehicle::new(id, position));
        debug!("vehicle {} placed at {:?}", id, position);
        Ok(id)
    }

    /// Simulates one tick: shows the current positions on `sink`,
    /// then moves every vehicle once, lowest ID first.
    pub fn step(&mut self, sink: &mut impl PixelSink) -> Result<TickReport> {
        let start = Instant::now();

        self.renderer.render_into(&self.registry, &mut self.frame);
        sink.write_frame(&self.frame)?;

        let mut report = TickReport::default();
        for vehicle in &mut self.vehicles {
            match vehicle.step(&mut self.registry, &mut self.sampler)? {
                MoveOutcome::Moved { .. } => report.moved += 1,
                MoveOutcome::Blocked { .. } => report.blocked += 1,
            }
        }

        report.elapsed = start.elapsed();
        if report.elapsed > self.slowest {
            self.slowest = report.elapsed;
            debug!("slowest tick so far: {:?}", self.slowest);
        }
        self.tick += 1;
        debug!(
            "tick {}: {} moved, {} blocked",
            self.tick, report.moved, report.blocked
        );

        #[cfg(feature = "debug")]
        {
            self.debug = take_debug_frame();
        }

        Ok(report)
    }

    /// Runs ticks at a fixed cadence until `max_ticks` have passed, or forever.
    pub fn run(
        &mut self,
        sink: &mut impl PixelSink,
        interval: Duration,
        max_ticks: Option<usize>,
    ) -> Result<()> {
        info!("running at one tick per {:?}", interval);
        let mut remaining = max_ticks;
        while remaining != Some(0) {
            let report = self.step(sink)?;
            match interval.checked_sub(report.elapsed) {
                Some(delay) => std::thread::sleep(delay),
                None => warn!(
                    "tick {} took {:?}, longer than the {:?} interval",
                    self.tick, report.elapsed, interval
                ),
            }
            remaining = remaining.map(|n| n - 1);
        }
        info!("stopped after {} ticks", self.tick);
        Ok(())
    }

    /// Gets the number of ticks simulated so far.
    pub fn tick(&self) -> usize {
        self.tick
    }

    /// Gets the slowest tick seen so far.
    pub fn slowest_tick(&self) -> Duration {
        self.slowest
    }

    /// Gets the registry of committed positions.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Gets the frame shown during the last tick.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Returns an iterator over all the vehicles in ID order.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter()
    }

    /// Gets a reference to the vehicle with the given ID.
    pub fn get_vehicle(&self, id: VehicleId) -> Result<&Vehicle> {
        self.vehicles.get(id.index()).ok_or(Error::UnknownVehicle(id))
    }

    /// Gets the moves made during the previous tick as a JSON array.
    #[cfg(feature = "debug")]
    pub fn debug(&mut self) -> serde_json::Value {
        self.debug.clone()
    }
}
