//! Startup checks on the fixed topology tables.
//!
//! Each check reports one status line through the logger. A vehicle driven by
//! a broken table would run off the network mid-run, so the binary refuses to
//! start when any check fails.

use crate::error::{Error, Result};
use crate::topology::{
    all_positions, is_valid, street_len, Position, BRANCHES, INTERSECTION_CUES, NUM_PIXELS,
    U_TURNS,
};
use crate::vehicle::{next_position, FORWARD};
use itertools::Itertools;
use log::{error, info};
use pathfinding::directed::bfs::bfs_reach;

/// A named check and the problems it found.
struct Check {
    name: &'static str,
    problems: Vec<String>,
}

/// Runs every check, logging a line for each. Fails if any check found a problem.
pub fn self_test() -> Result<()> {
    let mut failures = vec![];
    for check in checks() {
        if check.problems.is_empty() {
            info!("self-test: {} ok", check.name);
        } else {
            for problem in &check.problems {
                error!("self-test: {} FAILED: {}", check.name, problem);
                failures.push(format!("{}: {}", check.name, problem));
            }
        }
    }
    if failures.is_empty() {
        Ok(())
    } else {
        Err(Error::SelfTest(failures))
    }
}

fn checks() -> Vec<Check> {
    vec![
        Check {
            name: "pixel mapping",
            problems: check_mapping(),
        },
        Check {
            name: "end-of-road table",
            problems: check_u_turns(),
        },
        Check {
            name: "transition targets",
            problems: check_targets(),
        },
        Check {
            name: "junction lights",
            problems: check_cues(),
        },
        Check {
            name: "reachability",
            problems: check_reachability(),
        },
    ]
}

/// Every pixel belongs to exactly one position.
fn check_mapping() -> Vec<String> {
    let locations = all_positions().map(|p| p.location()).sorted().collect_vec();
    let mut problems = locations
        .iter()
        .tuple_windows()
        .filter(|(a, b)| a == b)
        .map(|(a, _)| format!("pixel {} is shared", a))
        .collect_vec();
    if locations.len() != NUM_PIXELS || locations.last() != Some(&(NUM_PIXELS - 1)) {
        problems.push(format!(
            "{} positions cover pixels up to {:?}, strip has {}",
            locations.len(),
            locations.last(),
            NUM_PIXELS
        ));
    }
    problems
}

/// Each street's last pixel has exactly one end-of-road transition.
fn check_u_turns() -> Vec<String> {
    let mut problems = vec![];
    for u_turn in &U_TURNS {
        match Position::from_location(u_turn.terminal) {
            Some(position) if position.is_terminal() => {}
            _ => problems.push(format!("pixel {} is not the end of a street", u_turn.terminal)),
        }
    }
    for position in all_positions().filter(Position::is_terminal) {
        let count = U_TURNS
            .iter()
            .filter(|u_turn| u_turn.terminal == position.location())
            .count();
        if count != 1 {
            problems.push(format!("{:?} has {} end-of-road transitions", position, count));
        }
    }
    problems
}

/// Branch and end-of-road targets land on the network after the forward step.
fn check_targets() -> Vec<String> {
    let branches = BRANCHES.iter().map(|branch| branch.onto);
    let u_turns = U_TURNS.iter().map(|u_turn| u_turn.onto);
    branches
        .chain(u_turns)
        .filter(|onto| onto.advance(FORWARD).validate().is_err())
        .map(|onto| format!("{:?} leads off the network", onto))
        .collect()
}

/// Junction warnings trigger on real addresses and never overlap on one street.
fn check_cues() -> Vec<String> {
    let mut problems = vec![];
    for cue in &INTERSECTION_CUES {
        let in_range = street_len(cue.street).is_some()
            && is_valid(cue.street, cue.addresses.min)
            && is_valid(cue.street, cue.addresses.max);
        if !in_range {
            problems.push(format!(
                "street {} addresses {:?} are off the network",
                cue.street, cue.addresses
            ));
        }
    }
    for (a, b) in INTERSECTION_CUES.iter().tuple_combinations() {
        if a.street == b.street && a.addresses.overlaps(&b.addresses) {
            problems.push(format!(
                "street {} addresses {:?} and {:?} overlap",
                a.street, a.addresses, b.addresses
            ));
        }
    }
    problems
}

/// Every position can be reached from the start of street 0.
fn check_reachability() -> Vec<String> {
    let start = Position::fixed(0, 0);
    let reached = reachable_from(start);
    all_positions()
        .filter(|position| !reached.contains(position))
        .map(|position| format!("{:?} is unreachable", position))
        .collect()
}

/// Finds every position a vehicle could eventually reach, ignoring other vehicles.
pub fn reachable_from(start: Position) -> Vec<Position> {
    bfs_reach(start, |position| {
        [false, true]
            .into_iter()
            .filter_map(|divert| next_position(*position, FORWARD, divert).ok())
            .unique()
            .collect_vec()
    })
    .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reference_topology_passes() {
        for check in checks() {
            assert!(check.problems.is_empty(), "{}: {:?}", check.name, check.problems);
        }
        assert!(self_test().is_ok());
    }

    #[test]
    fn whole_network_is_reachable() {
        let reached = reachable_from(Position::new(0, 0).unwrap());
        assert_eq!(reached.len(), NUM_PIXELS);
    }

    #[test]
    fn ramp_reaches_everything() {
        let reached = reachable_from(Position::new(6, 1).unwrap());
        assert_eq!(reached.len(), NUM_PIXELS);
    }
}
