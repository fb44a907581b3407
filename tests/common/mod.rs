//! Shared fixture for the randomized integration tests
//!
//! Each test builds its own [`Fixture`] so runs never share RNG state. The
//! defaults can be overridden from the environment:
//!
//! - `HEAPS_TEST_NODES`: nodes per round (default 100)
//! - `HEAPS_TEST_LOOPS`: rounds per check (default 100)
//! - `HEAPS_TEST_SEED`: RNG seed (default 3141592653589793238)

#![allow(dead_code)]

use std::env;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_cartesian_heaps::cartesian::OrderedNode;
use rust_cartesian_heaps::pairing::PairingNode;

pub const DEFAULT_NODES: usize = 100;
pub const DEFAULT_LOOPS: usize = 100;
pub const DEFAULT_SEED: u64 = 3141592653589793238;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureConfig {
    pub nodes: usize,
    pub loops: usize,
    pub seed: u64,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        FixtureConfig {
            nodes: DEFAULT_NODES,
            loops: DEFAULT_LOOPS,
            seed: DEFAULT_SEED,
        }
    }
}

impl FixtureConfig {
    /// Defaults, overridden by any `HEAPS_TEST_*` variable that parses.
    pub fn from_env() -> Self {
        let defaults = FixtureConfig::default();
        FixtureConfig {
            nodes: env_or("HEAPS_TEST_NODES", defaults.nodes),
            loops: env_or("HEAPS_TEST_LOOPS", defaults.loops),
            seed: env_or("HEAPS_TEST_SEED", defaults.seed),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

pub struct Fixture {
    pub config: FixtureConfig,
    rng: StdRng,
}

impl Fixture {
    pub fn new(config: FixtureConfig) -> Self {
        Fixture {
            rng: StdRng::seed_from_u64(config.seed),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(FixtureConfig::from_env())
    }

    /// A fresh batch of random keys, one per node.
    pub fn keys(&mut self) -> Vec<u32> {
        (0..self.config.nodes).map(|_| self.rng.gen()).collect()
    }

    /// Keys drawn from a small range so that ties are common.
    pub fn narrow_keys(&mut self, bound: u32) -> Vec<u32> {
        (0..self.config.nodes)
            .map(|_| self.rng.gen_range(0..bound))
            .collect()
    }

    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    pub fn ordered_nodes(&mut self) -> Vec<OrderedNode<u32>> {
        self.keys().into_iter().map(OrderedNode::new).collect()
    }

    pub fn pairing_nodes(&mut self) -> Vec<PairingNode<u32>> {
        self.keys().into_iter().map(PairingNode::new).collect()
    }
}
