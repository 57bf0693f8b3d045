use led_traffic::{self_test, Simulation, SimulationConfig, TerminalStrip};
use log::error;

/// Logs go to stderr, keeping stdout for the strip.
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("LED_TRAFFIC_LOG", "info"))
        .init();
}

fn run() -> led_traffic::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if config.self_test {
        self_test()?;
    }

    let mut sim = Simulation::from_config(&config)?;
    let mut strip = TerminalStrip::new(std::io::stdout());
    sim.run(&mut strip, config.tick_interval(), config.max_ticks)
}

fn main() {
    init_logging();
    if let Err(err) = run() {
        error!("{}", err);
        std::process::exit(1);
    }
}
